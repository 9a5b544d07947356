//! Handler - Command を Service の操作に振り分ける

use tracing::debug;

use super::protocol::{Command, Reply};
use crate::app::Service;
use crate::domain::PacerError;

impl Service {
    /// Apply one control command. Never fails; errors become replies.
    pub fn handle(&self, command: Command) -> Reply {
        debug!(?command, "control command");
        match command {
            Command::Start => self.transition_reply(self.start()),
            Command::Stop => self.transition_reply(self.stop()),
            Command::Status => {
                let state = self.status();
                Reply::Status {
                    status: state.code(),
                    state,
                }
            }
            Command::Assign { name, args } => Reply::Assigned {
                task_id: self.assign(name, args),
            },
            Command::Ping { payload } => Reply::Pong(self.ping(payload)),
        }
    }

    /// Decode a JSON command and apply it.
    pub fn handle_json(&self, line: &str) -> Reply {
        match serde_json::from_str::<Command>(line) {
            Ok(command) => self.handle(command),
            Err(err) => Reply::rejected(err),
        }
    }

    fn transition_reply(&self, result: Result<(), PacerError>) -> Reply {
        Reply::Transition {
            ok: result.is_ok(),
            status: self.status().code(),
            error: result.err().map(|err| err.to_string()),
        }
    }
}
