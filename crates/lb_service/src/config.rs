//! Service tunables.

use serde::{Deserialize, Serialize};

/// Knobs for transfer sessions. Loadable from any serde source; every field
/// has a default so a missing or partial config section is fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Capacity of the per-session frame channels. This is the whole
    /// producer-side buffer: once it is full, the streamer suspends until
    /// the transport drains a frame.
    pub stream_queue_depth: usize,
    /// Bearer token lifetime.
    pub token_ttl_days: i64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            stream_queue_depth: 32,
            token_ttl_days: 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_yields_defaults() {
        let config: ServiceConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.stream_queue_depth, 32);
        assert_eq!(config.token_ttl_days, 7);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: ServiceConfig = serde_json::from_str(r#"{"token_ttl_days": 1}"#).unwrap();
        assert_eq!(config.token_ttl_days, 1);
        assert_eq!(config.stream_queue_depth, 32);
    }
}
