//! Connection configuration for the Redis adapter

use std::time::Duration;

/// Redis connection configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Connection URL, e.g. `redis://127.0.0.1:6379/0`. The database
    /// index in the URL is the namespace `clear_all` wipes.
    pub url: String,
    /// Timeout for establishing the connection; `None` blocks until the
    /// OS gives up
    pub connect_timeout: Option<Duration>,
}

impl RedisConfig {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.url.is_empty() {
            return Err("url must not be empty".into());
        }
        if !["redis://", "rediss://", "redis+unix://", "unix://"]
            .iter()
            .any(|scheme| self.url.starts_with(scheme))
        {
            return Err(format!("unsupported connection URL scheme: {}", self.url));
        }
        if let Some(timeout) = self.connect_timeout {
            if timeout.is_zero() {
                return Err("connect_timeout must be > 0".into());
            }
        }
        Ok(())
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379/0".to_string(),
            connect_timeout: Some(Duration::from_secs(5)),
        }
    }
}
