//! Lifecycle: the cooperative start/stop gate.

mod machine;

pub use machine::{Checkpoint, LifecycleMachine};
