//! TaskRegistry - 名前と builder の対応表
//!
//! 起動時に組み立て（mutable）、実行時は共有して読むだけ（immutable）。
//! ロック不要にするため `Arc<TaskRegistry>` として渡す。

use std::collections::HashMap;
use std::sync::Arc;

use super::builder::{FnBuilder, TaskBuilder, TypedBuilder};
use super::task::{NamedTask, Task};
use crate::domain::{PacerError, TaskDescriptor};

/// Produces a task instance from a descriptor.
pub trait TaskFactory: Send + Sync {
    fn create(&self, descriptor: &TaskDescriptor) -> Result<Box<dyn Task>, PacerError>;
}

#[derive(Default)]
pub struct TaskRegistry {
    builders: HashMap<String, Arc<dyn TaskBuilder>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    pub fn register<T: NamedTask>(&mut self) -> Result<(), PacerError> {
        self.insert(T::NAME, Arc::new(TypedBuilder::<T>::new()))
    }

    /// Registers a builder closure, for tasks that need injected state.
    pub fn register_fn<F>(&mut self, name: &str, build: F) -> Result<(), PacerError>
    where
        F: Fn(&[serde_json::Value]) -> Result<Box<dyn Task>, serde_json::Error>
            + Send
            + Sync
            + 'static,
    {
        self.insert(name, Arc::new(FnBuilder::new(build)))
    }

    fn insert(&mut self, name: &str, builder: Arc<dyn TaskBuilder>) -> Result<(), PacerError> {
        if self.builders.contains_key(name) {
            return Err(PacerError::DuplicateTask(name.to_string()));
        }
        self.builders.insert(name.to_string(), builder);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn registered_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.builders.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

impl TaskFactory for TaskRegistry {
    fn create(&self, descriptor: &TaskDescriptor) -> Result<Box<dyn Task>, PacerError> {
        let name = descriptor.name();
        let builder = self
            .builders
            .get(name)
            .ok_or_else(|| PacerError::TaskNotFound(name.to_string()))?;

        builder
            .build(descriptor.args())
            .map_err(|source| PacerError::InvalidArgs {
                name: name.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;
    use crate::typed::task::fixtures::{Fail, FetchAll};
    use chrono::Utc;
    use serde_json::json;
    use ulid::Ulid;

    fn fail() -> Fail {
        Fail {
            message: "x".into(),
        }
    }

    fn descriptor(name: &str, args: Vec<serde_json::Value>) -> TaskDescriptor {
        TaskDescriptor::new(TaskId::from_ulid(Ulid::new()), name, args, Utc::now())
    }

    #[test]
    fn register_and_create() {
        let mut registry = TaskRegistry::new();
        registry.register::<FetchAll>().unwrap();

        let created = registry.create(&descriptor(
            FetchAll::NAME,
            vec![json!("k"), json!(["https://a.test"])],
        ));
        assert!(created.is_ok());
    }

    #[test]
    fn double_registration_is_rejected() {
        let mut registry = TaskRegistry::new();
        registry.register::<Fail>().unwrap();
        let result = registry.register::<Fail>();
        assert!(matches!(result, Err(PacerError::DuplicateTask(name)) if name == Fail::NAME));

        let result =
            registry.register_fn(Fail::NAME, |_| Ok(Box::new(fail()) as Box<dyn Task>));
        assert!(matches!(result, Err(PacerError::DuplicateTask(_))));
    }

    #[test]
    fn unknown_name_is_not_found() {
        let registry = TaskRegistry::new();
        let err = registry.create(&descriptor("missing", vec![])).err().unwrap();
        assert!(matches!(err, PacerError::TaskNotFound(name) if name == "missing"));
    }

    #[test]
    fn undecodable_args_are_reported() {
        let mut registry = TaskRegistry::new();
        registry.register::<FetchAll>().unwrap();

        let err = registry
            .create(&descriptor(FetchAll::NAME, vec![json!(1)]))
            .err()
            .unwrap();
        assert!(matches!(err, PacerError::InvalidArgs { name, .. } if name == FetchAll::NAME));
    }

    #[test]
    fn registered_names_are_sorted() {
        let mut registry = TaskRegistry::new();
        registry.register::<FetchAll>().unwrap();
        registry.register::<Fail>().unwrap();
        registry
            .register_fn("a.closure", |_| Ok(Box::new(fail()) as Box<dyn Task>))
            .unwrap();

        assert_eq!(
            registry.registered_names(),
            vec!["a.closure", Fail::NAME, FetchAll::NAME]
        );
        assert_eq!(registry.len(), 3);
        assert!(registry.contains("a.closure"));
    }
}
