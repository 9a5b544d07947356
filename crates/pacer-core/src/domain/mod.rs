//! Domain model (ids, task descriptors, lifecycle state, events, errors).

pub mod errors;
pub mod events;
pub mod ids;
pub mod state;
pub mod task;

pub use self::errors::{PacerError, TaskError};
pub use self::events::StateChange;
pub use self::ids::TaskId;
pub use self::state::LifecycleState;
pub use self::task::TaskDescriptor;
