use crate::error::RegistryError;
use crate::registry::PoolFeeRegistry;
use dynfee_data::VolatilityOracle;
use dynfee_domain::entities::PoolKey;
use dynfee_domain::value_objects::{Fee, PoolId};

/// Calls a pool host makes into its dynamic fee controller.
pub trait DynamicFeeHook: Send + Sync {
    /// Invoked once before a pool starts trading.
    ///
    /// # Errors
    /// Activation must abort if this fails.
    fn on_pool_activate(&self, key: &PoolKey) -> Result<(), RegistryError>;

    /// Invoked before every trade; the result is used verbatim as the fee.
    ///
    /// # Errors
    /// The triggering trade must abort if this fails.
    fn compute_fee(&self, pool: &PoolId) -> Result<Fee, RegistryError>;
}

impl<O: VolatilityOracle> DynamicFeeHook for PoolFeeRegistry<O> {
    fn on_pool_activate(&self, key: &PoolKey) -> Result<(), RegistryError> {
        PoolFeeRegistry::on_pool_activate(self, key)
    }

    fn compute_fee(&self, pool: &PoolId) -> Result<Fee, RegistryError> {
        PoolFeeRegistry::compute_fee(self, pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryConfig;
    use dynfee_data::providers::InMemoryOracle;
    use dynfee_domain::enums::FeeMode;
    use std::sync::Arc;

    #[test]
    fn test_registry_behind_trait_object() {
        let registry = PoolFeeRegistry::from_config(&RegistryConfig::default(), InMemoryOracle::new())
            .unwrap();
        let hook: Arc<dyn DynamicFeeHook> = Arc::new(registry);

        assert!(hook.on_pool_activate(&PoolKey::dynamic("a")).is_ok());
        assert!(hook
            .on_pool_activate(&PoolKey::new("b", FeeMode::Static(100)))
            .is_err());
        assert_eq!(hook.compute_fee(&PoolId::new("a")).unwrap(), Fee::new(3000));
    }
}
