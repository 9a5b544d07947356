//! Typed - 名前付きタスク API
//!
//! # 二層構造
//! - **表層（Typed）**: `NamedTask` - 名前と引数の型を静的に対応付ける
//! - **内部（Dyn）**: `TaskBuilder` - object-safe、registry に格納される

pub mod builder;
pub mod registry;
pub mod task;

pub use self::builder::{FnBuilder, TaskBuilder, TypedBuilder};
pub use self::registry::{TaskFactory, TaskRegistry};
pub use self::task::{NamedTask, Task, TaskContext};
