//! TaskBuilder - 名前から Task インスタンスを作る型消去された builder
//!
//! - `TypedBuilder<T>`: `NamedTask` を JSON 引数からデコードする
//! - `FnBuilder<F>`: 依存を持つタスク用のクロージャ builder

use std::marker::PhantomData;

use super::task::{NamedTask, Task};

/// Object-safe builder stored in the registry.
pub trait TaskBuilder: Send + Sync {
    fn build(&self, args: &[serde_json::Value]) -> Result<Box<dyn Task>, serde_json::Error>;
}

pub struct TypedBuilder<T: NamedTask> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: NamedTask> TypedBuilder<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: NamedTask> Default for TypedBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: NamedTask> TaskBuilder for TypedBuilder<T> {
    fn build(&self, args: &[serde_json::Value]) -> Result<Box<dyn Task>, serde_json::Error> {
        let task: T = serde_json::from_value(serde_json::Value::Array(args.to_vec()))?;
        Ok(Box::new(task))
    }
}

pub struct FnBuilder<F> {
    build: F,
}

impl<F> FnBuilder<F>
where
    F: Fn(&[serde_json::Value]) -> Result<Box<dyn Task>, serde_json::Error> + Send + Sync,
{
    pub fn new(build: F) -> Self {
        Self { build }
    }
}

impl<F> TaskBuilder for FnBuilder<F>
where
    F: Fn(&[serde_json::Value]) -> Result<Box<dyn Task>, serde_json::Error> + Send + Sync,
{
    fn build(&self, args: &[serde_json::Value]) -> Result<Box<dyn Task>, serde_json::Error> {
        (self.build)(args)
    }
}
