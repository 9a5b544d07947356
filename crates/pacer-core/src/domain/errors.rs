//! Errors - エラー型と分類
//!
//! # 分類
//! - **IllegalTransition**: `start`/`stop` が許されない状態から呼ばれた（非致命的）
//! - **TaskFailed**: タスクの `run()` が失敗した（ワーカーループを終わらせる）
//! - 通知の配送失敗はエラーにしない（best-effort）

use thiserror::Error;

use super::state::LifecycleState;
use crate::ports::{FetchError, SettingsError, StoreError};

/// Core error type.
#[derive(Debug, Error)]
pub enum PacerError {
    #[error("no task registered for name={0}")]
    TaskNotFound(String),

    #[error("duplicate task registration for name={0}")]
    DuplicateTask(String),

    #[error("invalid args for task={name}: {source}")]
    InvalidArgs {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{op} is not allowed from state={from}")]
    IllegalTransition {
        op: &'static str,
        from: LifecycleState,
    },

    #[error("task={name} failed: {source}")]
    TaskFailed {
        name: String,
        #[source]
        source: TaskError,
    },

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("a worker is already running for this service")]
    WorkerAlreadySpawned,
}

impl PacerError {
    /// Illegal transitions are reported, never fatal.
    pub fn is_illegal_transition(&self) -> bool {
        matches!(self, PacerError::IllegalTransition { .. })
    }
}

/// Error returned by a task's `run()`.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl TaskError {
    pub fn other(message: impl Into<String>) -> Self {
        TaskError::Other(message.into())
    }
}
