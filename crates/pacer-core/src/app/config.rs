//! PacerConfig - サービス全体の設定
//!
//! 既定値は `Default`。永続化された設定（`service.request.interval`）は
//! 起動後に `Service::apply_settings` でレートゲートへ反映する。

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::restart::RestartPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacerConfig {
    /// Default minimum interval between outbound calls, in milliseconds.
    pub request_interval_ms: u64,

    /// Ring size of the state-change broadcast channel.
    pub event_capacity: usize,

    /// Backoff between worker loop restarts after a task failure.
    pub restart: RestartPolicy,
}

impl PacerConfig {
    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }
}

impl Default for PacerConfig {
    fn default() -> Self {
        Self {
            request_interval_ms: 1000,
            event_capacity: 64,
            restart: RestartPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: PacerConfig = serde_json::from_str(r#"{"request_interval_ms": 250}"#).unwrap();
        assert_eq!(config.request_interval(), Duration::from_millis(250));
        assert_eq!(config.event_capacity, 64);
        assert_eq!(config.restart, RestartPolicy::default());
    }
}
