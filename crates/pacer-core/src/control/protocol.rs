//! Protocol - コマンドと返信の wire 形式
//!
//! # 形式
//! - Command: `{"op": "start"}`、`{"op": "assign", "name": "...", "args": [...]}` など
//! - Reply: untagged。op ごとに形が決まっているのでタグは付けない

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::app::Pong;
use crate::domain::{LifecycleState, TaskId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Start,
    Stop,
    Status,
    Assign {
        name: String,
        #[serde(default)]
        args: Vec<Value>,
    },
    Ping {
        #[serde(default)]
        payload: Value,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    /// Result of `start`/`stop`. `status` is the state code after the call.
    Transition {
        ok: bool,
        status: u8,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Assigned {
        task_id: TaskId,
    },
    Status {
        status: u8,
        state: LifecycleState,
    },
    Pong(Pong),
    /// The command could not be decoded.
    Rejected {
        error: String,
    },
}

impl Reply {
    pub fn rejected(error: impl ToString) -> Self {
        Reply::Rejected {
            error: error.to_string(),
        }
    }
}
