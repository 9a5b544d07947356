//! Supervisor - ワーカーループを tokio タスクで動かし、失敗したら再起動する
//!
//! - タスクの失敗は `error!` でログに出し、`RestartPolicy` の分だけ待ってから再起動
//! - 失敗した TaskDescriptor は再実行しない（リトライはタスク自身の責務）
//! - `request_shutdown()` で実行中のループごと止める

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::restart::RestartPolicy;
use super::worker_loop::WorkerLoop;

/// Handle to a supervised worker loop.
pub struct WorkerHandle {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl WorkerHandle {
    pub fn spawn(worker: Arc<WorkerLoop>, policy: RestartPolicy) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(supervise(worker, policy, shutdown_rx));
        Self { shutdown_tx, join }
    }

    /// Request shutdown.
    /// Unlike `stop()`, this drops the in-flight task at its next await.
    pub fn request_shutdown(&self) {
        // ignore send error: the supervisor may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Shutdown and wait for the supervisor to exit.
    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        let _ = self.join.await;
    }
}

async fn supervise(
    worker: Arc<WorkerLoop>,
    policy: RestartPolicy,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut failures = 0u32;
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let completed_before = worker.completed();
        let result = tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
            result = worker.run() => result,
        };

        let err = match result {
            Ok(()) => {
                info!("worker loop finished");
                break;
            }
            Err(err) => err,
        };

        // 連続失敗のときだけ backoff を伸ばす
        if worker.completed() > completed_before {
            failures = 0;
        }
        failures = failures.saturating_add(1);
        let delay = policy.next_delay(failures);
        error!(
            error = %err,
            failures,
            delay_ms = delay.as_millis() as u64,
            "worker loop failed; restarting"
        );

        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::time::sleep(delay) => {}
        }
    }
    info!("worker supervisor exited");
}
