//! ServiceBuilder - Service の構築とワイヤリング
//!
//! # Fail-fast 設計
//! - `expect_tasks()` で期待されるタスク名を登録
//! - `build()` 時に「期待集合 ⊆ 登録済み集合」をチェック
//! - 不足があれば BuildError を返す

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use super::config::PacerConfig;
use super::service::Service;
use super::worker_loop::WorkerLoop;
use crate::domain::PacerError;
use crate::gate::{RateGate, ThrottledFetch};
use crate::impls::InMemoryStore;
use crate::lifecycle::LifecycleMachine;
use crate::ports::{Clock, Fetch, KeyValueStore, SystemClock, UlidGenerator};
use crate::queue::HandoffQueue;
use crate::typed::{NamedTask, Task, TaskFactory, TaskRegistry};

/// # 使用例
/// ```ignore
/// let service = Service::builder()
///     .register::<Crawl>()?
///     .expect_tasks(&["crawl"])
///     .fetch(Arc::new(MyFetcher))
///     .build()?;
/// ```
pub struct ServiceBuilder {
    config: PacerConfig,
    registry: TaskRegistry,
    factory: Option<Arc<dyn TaskFactory>>,
    expected_tasks: Option<Vec<String>>,
    fetch: Option<Arc<dyn Fetch>>,
    store: Option<Arc<dyn KeyValueStore>>,
    clock: Arc<dyn Clock>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("missing tasks: {0:?}. These tasks were expected but not registered.")]
    MissingTasks(Vec<String>),

    #[error("no network primitive configured; call `fetch()` before `build()`")]
    MissingFetch,
}

impl ServiceBuilder {
    pub fn new() -> Self {
        Self {
            config: PacerConfig::default(),
            registry: TaskRegistry::new(),
            factory: None,
            expected_tasks: None,
            fetch: None,
            store: None,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn config(mut self, config: PacerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn register<T: NamedTask>(mut self) -> Result<Self, PacerError> {
        self.registry.register::<T>()?;
        Ok(self)
    }

    pub fn register_fn<F>(mut self, name: &str, build: F) -> Result<Self, PacerError>
    where
        F: Fn(&[serde_json::Value]) -> Result<Box<dyn Task>, serde_json::Error>
            + Send
            + Sync
            + 'static,
    {
        self.registry.register_fn(name, build)?;
        Ok(self)
    }

    /// Use an external task factory instead of the built-in registry.
    pub fn factory(mut self, factory: Arc<dyn TaskFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Task names that must be registered. Only checked against the
    /// built-in registry.
    pub fn expect_tasks(mut self, names: &[&str]) -> Self {
        self.expected_tasks = Some(names.iter().map(|name| name.to_string()).collect());
        self
    }

    pub fn fetch(mut self, fetch: Arc<dyn Fetch>) -> Self {
        self.fetch = Some(fetch);
        self
    }

    /// Defaults to an `InMemoryStore`.
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Result<Service, BuildError> {
        if self.factory.is_none()
            && let Some(expected_tasks) = &self.expected_tasks
        {
            let missing: Vec<String> = expected_tasks
                .iter()
                .filter(|name| !self.registry.contains(name))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(BuildError::MissingTasks(missing));
            }
        }
        let raw_fetch = self.fetch.ok_or(BuildError::MissingFetch)?;

        let lifecycle = Arc::new(LifecycleMachine::with_clock(
            self.config.event_capacity,
            Arc::clone(&self.clock),
        ));
        let queue = Arc::new(HandoffQueue::new());
        let gate = Arc::new(RateGate::new(
            Arc::clone(&lifecycle),
            self.config.request_interval(),
        ));
        let fetch: Arc<dyn Fetch> = Arc::new(ThrottledFetch::new(Arc::clone(&gate), raw_fetch));
        let store: Arc<dyn KeyValueStore> = match self.store {
            Some(store) => store,
            None => Arc::new(InMemoryStore::new()),
        };
        let factory: Arc<dyn TaskFactory> = match self.factory {
            Some(factory) => factory,
            None => Arc::new(self.registry),
        };

        let worker = Arc::new(WorkerLoop::new(
            Arc::clone(&queue),
            Arc::clone(&lifecycle),
            factory,
            fetch,
            store,
        ));

        Ok(Service {
            config: self.config,
            lifecycle,
            queue,
            gate,
            worker,
            ids: Arc::new(UlidGenerator::new(Arc::clone(&self.clock))),
            clock: self.clock,
            worker_spawned: AtomicBool::new(false),
        })
    }
}

impl Default for ServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
