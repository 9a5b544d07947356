//! Events - ライフサイクルの状態変化イベント
//!
//! 遷移が起きるたびに `StateChange` が broadcast されます。
//! 配送は best-effort で、受信者がいなくても遷移は止まりません。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::LifecycleState;

/// A single lifecycle transition, `(original -> current)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub original: LifecycleState,
    pub current: LifecycleState,
    pub at: DateTime<Utc>,
}

impl StateChange {
    pub fn new(original: LifecycleState, current: LifecycleState, at: DateTime<Utc>) -> Self {
        Self {
            original,
            current,
            at,
        }
    }

    /// `(original, current)` without the timestamp, handy for assertions.
    pub fn pair(&self) -> (LifecycleState, LifecycleState) {
        (self.original, self.current)
    }
}
