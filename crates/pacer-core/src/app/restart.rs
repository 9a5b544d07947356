//! Restart policy: decides how long the supervisor waits before restarting
//! the worker loop after a task failure.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Exponential backoff, capped.
///
/// delay = base_delay * multiplier^(failures - 1), at most `max_delay`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestartPolicy {
    pub base_delay_ms: u64,
    pub multiplier: f64,
    pub max_delay_ms: u64,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            base_delay_ms: 100,
            multiplier: 2.0,
            max_delay_ms: 30_000,
        }
    }
}

impl RestartPolicy {
    /// Delay before the restart that follows `failures` consecutive failures
    /// (1-indexed; 0 is treated as 1).
    pub fn next_delay(&self, failures: u32) -> Duration {
        let exponent = failures.saturating_sub(1).min(i32::MAX as u32) as i32;
        let delay_ms = self.base_delay_ms as f64 * self.multiplier.powi(exponent);
        let capped = delay_ms.min(self.max_delay_ms as f64).max(0.0);
        Duration::from_millis(capped as u64)
    }
}
