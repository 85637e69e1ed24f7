//! Configuration for the cache facade

use crate::client::{INPUTS_SUFFIX, OUTPUTS_SUFFIX};

/// Cache facade configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Identity of the instrumented store operation. Namespaces its
    /// counter and call logs, so it must be stable across restarts and
    /// unique among wrapped operations sharing a store.
    pub store_identity: String,
    /// Wipe the store namespace when the facade is constructed
    pub clear_on_open: bool,
}

impl CacheConfig {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.store_identity.is_empty() {
            return Err("store_identity must not be empty".into());
        }
        if self.store_identity.ends_with(INPUTS_SUFFIX)
            || self.store_identity.ends_with(OUTPUTS_SUFFIX)
        {
            return Err(format!(
                "store_identity must not end with the reserved {} or {} suffixes",
                INPUTS_SUFFIX, OUTPUTS_SUFFIX
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            store_identity: "Cache.store".to_string(),
            clear_on_open: true,
        }
    }
}
