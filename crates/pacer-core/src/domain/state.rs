//! LifecycleState - ワーカーのライフサイクル状態
//!
//! 状態遷移は `lifecycle::LifecycleMachine` だけが行います。
//! このモジュールは状態そのものと、外部に公開する状態コードを定義します。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of the worker.
///
/// State transitions:
/// - Stopped -> StartPending (`start`)
/// - Running | StartPending -> StopPending (`stop`)
/// - StartPending -> Running (checkpoint)
/// - StopPending -> Stopped (checkpoint, caller blocks)
/// - Running -> StartPending (`idle`)
///
/// There is no terminal state; the machine cycles indefinitely.
///
/// The discriminants are the status codes reported over the control surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum LifecycleState {
    /// Initial state. Checkpoints block until `start`.
    #[default]
    Stopped = 1,

    /// `start` was requested; the next checkpoint promotes to Running.
    StartPending = 2,

    /// `stop` was requested; the next checkpoint demotes to Stopped.
    StopPending = 3,

    /// Checkpoints pass through immediately.
    Running = 4,
}

impl LifecycleState {
    /// Status code reported by the control surface.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(LifecycleState::Stopped),
            2 => Some(LifecycleState::StartPending),
            3 => Some(LifecycleState::StopPending),
            4 => Some(LifecycleState::Running),
            _ => None,
        }
    }

    /// Is `start` legal from this state?
    pub fn can_start(self) -> bool {
        matches!(self, LifecycleState::Stopped)
    }

    /// Is `stop` legal from this state?
    pub fn can_stop(self) -> bool {
        matches!(self, LifecycleState::Running | LifecycleState::StartPending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleState::Stopped => "stopped",
            LifecycleState::StartPending => "start_pending",
            LifecycleState::StopPending => "stop_pending",
            LifecycleState::Running => "running",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
