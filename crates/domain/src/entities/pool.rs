use crate::enums::FeeMode;
use crate::value_objects::identifiers::PoolId;
use serde::{Deserialize, Serialize};

/// Host-side description of a pool, as presented at activation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolKey {
    pub id: PoolId,
    pub fee_mode: FeeMode,
}

impl PoolKey {
    pub fn new(id: impl Into<PoolId>, fee_mode: FeeMode) -> Self {
        Self {
            id: id.into(),
            fee_mode,
        }
    }

    pub fn dynamic(id: impl Into<PoolId>) -> Self {
        Self::new(id, FeeMode::Dynamic)
    }
}
