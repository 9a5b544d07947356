//! Service - コアの部品一式と外部向けの操作面
//!
//! プロセス起動時に一つ作り、必要な場所へ `Arc` で渡す。グローバルなシングルトンは持たない。
//!
//! # 操作面
//! - `start()` / `stop()` / `assign()` / `status()` / `ping()`
//! - `subscribe()`: 状態変化イベント
//! - `spawn_worker()`: supervisor 付きでワーカーループを起動

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{info, warn};

use super::config::PacerConfig;
use super::supervisor::WorkerHandle;
use super::worker_loop::WorkerLoop;
use crate::domain::{LifecycleState, PacerError, StateChange, TaskDescriptor, TaskId};
use crate::gate::RateGate;
use crate::lifecycle::LifecycleMachine;
use crate::ports::{Clock, IdGenerator, Settings, SettingsLoader};
use crate::queue::HandoffQueue;

/// Reply to `ping`: the payload echoed back as `{"pang": payload}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pong {
    pub pang: serde_json::Value,
}

pub struct Service {
    pub(super) config: PacerConfig,
    pub(super) lifecycle: Arc<LifecycleMachine>,
    pub(super) queue: Arc<HandoffQueue<TaskDescriptor>>,
    pub(super) gate: Arc<RateGate>,
    pub(super) worker: Arc<WorkerLoop>,
    pub(super) ids: Arc<dyn IdGenerator>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) worker_spawned: AtomicBool,
}

impl Service {
    pub fn builder() -> super::builder::ServiceBuilder {
        super::builder::ServiceBuilder::new()
    }

    pub fn start(&self) -> Result<(), PacerError> {
        self.lifecycle
            .start()
            .inspect(|()| info!("start requested"))
            .inspect_err(|err| warn!(error = %err, "start rejected"))
    }

    pub fn stop(&self) -> Result<(), PacerError> {
        self.lifecycle
            .stop()
            .inspect(|()| info!("stop requested"))
            .inspect_err(|err| warn!(error = %err, "stop rejected"))
    }

    /// Queue a named task. Never blocks.
    pub fn assign(&self, name: impl Into<String>, args: Vec<serde_json::Value>) -> TaskId {
        let descriptor = TaskDescriptor::new(
            self.ids.generate_task_id(),
            name,
            args,
            self.clock.now(),
        );
        let task_id = descriptor.id();
        info!(task_id = %task_id, name = descriptor.name(), "task assigned");
        self.queue.enqueue(descriptor);
        task_id
    }

    pub fn status(&self) -> LifecycleState {
        self.lifecycle.status()
    }

    /// Transport liveness check: `{"pang": payload}`.
    pub fn ping(&self, payload: serde_json::Value) -> Pong {
        Pong { pang: payload }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.lifecycle.subscribe()
    }

    /// Load persisted settings and apply the request interval.
    pub async fn apply_settings(&self, loader: &dyn SettingsLoader) -> Result<Settings, PacerError> {
        let settings = loader.load().await?;
        self.gate.set_min_interval(settings.request_interval());
        info!(
            request_interval_ms = settings.request_interval_ms,
            "settings applied"
        );
        Ok(settings)
    }

    /// Run the worker loop under the configured restart policy.
    ///
    /// Only one worker per service: the lifecycle machine has a single
    /// continuation slot. Later calls fail with `WorkerAlreadySpawned`.
    pub fn spawn_worker(&self) -> Result<WorkerHandle, PacerError> {
        if self.worker_spawned.swap(true, Ordering::AcqRel) {
            return Err(PacerError::WorkerAlreadySpawned);
        }
        Ok(WorkerHandle::spawn(
            Arc::clone(&self.worker),
            self.config.restart.clone(),
        ))
    }

    pub fn config(&self) -> &PacerConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> &Arc<LifecycleMachine> {
        &self.lifecycle
    }

    pub fn queue(&self) -> &Arc<HandoffQueue<TaskDescriptor>> {
        &self.queue
    }

    pub fn gate(&self) -> &Arc<RateGate> {
        &self.gate
    }

    pub fn worker(&self) -> &Arc<WorkerLoop> {
        &self.worker
    }
}
