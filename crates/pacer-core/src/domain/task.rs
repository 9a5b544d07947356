use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TaskId;

/// Named operation plus its arguments, submitted via `assign`.
///
/// Immutable once created and consumed exactly once by the worker loop.
/// `id` and `submitted_at` are for logs and replies only; ordering is the
/// queue's FIFO order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    id: TaskId,
    name: String,
    args: Vec<serde_json::Value>,
    submitted_at: DateTime<Utc>,
}

impl TaskDescriptor {
    pub fn new(
        id: TaskId,
        name: impl Into<String>,
        args: Vec<serde_json::Value>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            args,
            submitted_at,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[serde_json::Value] {
        &self.args
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}
