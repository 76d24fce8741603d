//! Database adapters for schema metadata collection.

use std::time::Duration;

/// Connection pool limits.
///
/// The export issues one query at a time, so the pool never holds more than
/// one busy connection; these bounds exist because the driver would
/// otherwise pool without limits.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum idle connections kept open
    pub min_idle_connections: u32,
    /// Acquire connection timeout
    pub acquire_timeout: Duration,
    /// Maximum connection lifetime
    pub max_lifetime: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_idle_connections: 0,
            acquire_timeout: Duration::from_secs(30),
            max_lifetime: Duration::from_secs(180), // 3 minutes
        }
    }
}

pub mod mysql;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_config_defaults() {
        let config = ConnectionConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_idle_connections, 0);
        assert_eq!(config.acquire_timeout, Duration::from_secs(30));
        assert_eq!(config.max_lifetime, Duration::from_secs(180));
    }
}
