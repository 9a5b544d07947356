//! WorkerLoop - タスク実行ループ
//!
//! # フロー
//! 1. HandoffQueue::dequeue() で TaskDescriptor を取得（空なら待つ）
//! 2. TaskFactory で Task を生成
//! 3. スロットル済みの Fetch とストアを渡して実行
//! 4. LifecycleMachine::idle() でタスク間の停止要求を拾う
//!
//! タスクの失敗は握りつぶさずに `run()` から返す。再起動は supervisor の仕事。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::time::Instant;
use tracing::info;

use crate::domain::{PacerError, TaskDescriptor};
use crate::lifecycle::LifecycleMachine;
use crate::ports::{Fetch, KeyValueStore};
use crate::queue::HandoffQueue;
use crate::typed::{TaskContext, TaskFactory};

pub struct WorkerLoop {
    queue: Arc<HandoffQueue<TaskDescriptor>>,
    lifecycle: Arc<LifecycleMachine>,
    factory: Arc<dyn TaskFactory>,
    /// Already wrapped by the rate gate.
    fetch: Arc<dyn Fetch>,
    store: Arc<dyn KeyValueStore>,
    completed: AtomicU64,
}

impl WorkerLoop {
    pub fn new(
        queue: Arc<HandoffQueue<TaskDescriptor>>,
        lifecycle: Arc<LifecycleMachine>,
        factory: Arc<dyn TaskFactory>,
        fetch: Arc<dyn Fetch>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            queue,
            lifecycle,
            factory,
            fetch,
            store,
            completed: AtomicU64::new(0),
        }
    }

    /// Number of tasks that ran to completion.
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Dequeue, execute, idle, forever.
    ///
    /// Returns `Err` on the first task failure. The loop holds its own handle
    /// to the queue, so in practice it never returns `Ok`.
    /// Must not run concurrently with itself on the same lifecycle.
    pub async fn run(&self) -> Result<(), PacerError> {
        loop {
            let Some(descriptor) = self.queue.dequeue().await else {
                return Ok(());
            };
            self.execute(&descriptor).await?;
            self.lifecycle.idle().await;
        }
    }

    /// Execute one descriptor.
    pub async fn execute(&self, descriptor: &TaskDescriptor) -> Result<(), PacerError> {
        let task = self.factory.create(descriptor)?;
        let ctx = TaskContext::new(
            descriptor.id(),
            Arc::clone(&self.fetch),
            Arc::clone(&self.store),
        );

        info!(task_id = %descriptor.id(), name = descriptor.name(), "task started");
        let started = Instant::now();

        task.run(&ctx)
            .await
            .map_err(|source| PacerError::TaskFailed {
                name: descriptor.name().to_string(),
                source,
            })?;

        self.completed.fetch_add(1, Ordering::Relaxed);
        info!(
            task_id = %descriptor.id(),
            name = descriptor.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "task finished"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LifecycleState, TaskId};
    use crate::impls::InMemoryStore;
    use crate::ports::{FetchError, FetchRequest, FetchResponse};
    use crate::typed::{NamedTask, TaskRegistry};
    use crate::typed::task::fixtures::{Fail, FetchAll};
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use ulid::Ulid;

    struct Echo;

    #[async_trait]
    impl Fetch for Echo {
        async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
            Ok(FetchResponse::ok(format!("body of {}", request.input)))
        }
    }

    fn descriptor(name: &str, args: Vec<serde_json::Value>) -> TaskDescriptor {
        TaskDescriptor::new(TaskId::from_ulid(Ulid::new()), name, args, Utc::now())
    }

    type Fixture = (
        WorkerLoop,
        Arc<HandoffQueue<TaskDescriptor>>,
        Arc<LifecycleMachine>,
    );

    fn worker(store: Arc<InMemoryStore>) -> Fixture {
        let mut registry = TaskRegistry::new();
        registry.register::<FetchAll>().unwrap();
        registry.register::<Fail>().unwrap();

        let queue = Arc::new(HandoffQueue::new());
        let lifecycle = Arc::new(LifecycleMachine::new(16));
        let worker = WorkerLoop::new(
            Arc::clone(&queue),
            Arc::clone(&lifecycle),
            Arc::new(registry),
            Arc::new(Echo),
            store,
        );
        (worker, queue, lifecycle)
    }

    #[tokio::test]
    async fn execute_runs_task_against_store() {
        let store = Arc::new(InMemoryStore::new());
        let (worker, _queue, _lifecycle) = worker(Arc::clone(&store));

        worker
            .execute(&descriptor(
                FetchAll::NAME,
                vec![json!("pages"), json!(["a", "b"])],
            ))
            .await
            .unwrap();

        assert_eq!(
            store.get("pages").await.unwrap(),
            Some(json!(["body of a", "body of b"]))
        );
        assert_eq!(worker.completed(), 1);
    }

    #[tokio::test]
    async fn run_stops_on_task_failure() {
        let store = Arc::new(InMemoryStore::new());
        let (worker, queue, lifecycle) = worker(Arc::clone(&store));
        lifecycle.start().unwrap();
        lifecycle.checkpoint().await;

        queue.enqueue(descriptor(FetchAll::NAME, vec![json!("first"), json!([])]));
        queue.enqueue(descriptor(Fail::NAME, vec![json!("boom")]));
        queue.enqueue(descriptor(FetchAll::NAME, vec![json!("never"), json!([])]));

        let err = worker.run().await.unwrap_err();
        assert!(matches!(err, PacerError::TaskFailed { ref name, .. } if name == Fail::NAME));
        assert!(err.to_string().contains("boom"));

        // the first task ran and idled the machine; the third is still queued
        assert_eq!(worker.completed(), 1);
        assert_eq!(lifecycle.status(), LifecycleState::StartPending);
        assert_eq!(queue.len(), 1);
        assert!(store.get("never").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_task_fails_the_loop() {
        let (worker, queue, _lifecycle) = worker(Arc::new(InMemoryStore::new()));
        queue.enqueue(descriptor("nope", vec![]));

        let err = worker.run().await.unwrap_err();
        assert!(matches!(err, PacerError::TaskNotFound(_)));
    }

    #[tokio::test]
    async fn run_waits_on_empty_queue() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        let queue = Arc::new(HandoffQueue::new());
        let worker = WorkerLoop::new(
            Arc::clone(&queue),
            Arc::new(LifecycleMachine::new(4)),
            Arc::new(TaskRegistry::new()),
            Arc::new(Echo),
            store,
        );

        let run = worker.run();
        tokio::pin!(run);
        assert!(
            tokio::time::timeout(std::time::Duration::from_millis(20), &mut run)
                .await
                .is_err()
        );
        assert!(queue.is_blocked());
        assert_eq!(queue.len(), -1);
    }
}
