use serde::{Deserialize, Serialize};

/// How a pool's trading fee is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeeMode {
    /// Fixed fee in hundredths of a basis point, set at pool creation.
    Static(u32),
    /// Fee supplied before every trade by a dynamic fee controller.
    Dynamic,
}

impl FeeMode {
    pub fn is_dynamic(&self) -> bool {
        matches!(self, FeeMode::Dynamic)
    }
}
