//! Queue module: the hand-off queue between `assign` and the worker loop.

mod handoff;

pub use handoff::{Dequeue, HandoffQueue};
