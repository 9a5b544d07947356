//! RateGate - 外部呼び出しの最小間隔を守るスロットル
//!
//! # フロー
//! 1. `LifecycleMachine::checkpoint()` を待つ（停止中ならここでブロック）
//! 2. `wait = last_call + min_interval - now` を計算し、正なら sleep
//! 3. カーソルを現在時刻に更新して呼び出し側に戻る
//!
//! カーソルはプロセス全体で一つ。タスクをまたいで間隔が守られる。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};
use tracing::trace;

use crate::lifecycle::LifecycleMachine;

pub struct RateGate {
    lifecycle: Arc<LifecycleMachine>,
    /// Default interval used by `pass()`, in milliseconds.
    min_interval_ms: AtomicU64,
    /// Instant the previous call proceeded. Held across the wait so concurrent
    /// callers are spaced from each other's proceed instants.
    last_call: Mutex<Option<Instant>>,
}

impl RateGate {
    pub fn new(lifecycle: Arc<LifecycleMachine>, min_interval: Duration) -> Self {
        Self {
            lifecycle,
            min_interval_ms: AtomicU64::new(duration_to_ms(min_interval)),
            last_call: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms.load(Ordering::Relaxed))
    }

    /// Applies `service.request.interval` from settings.
    pub fn set_min_interval(&self, min_interval: Duration) {
        self.min_interval_ms
            .store(duration_to_ms(min_interval), Ordering::Relaxed);
    }

    /// `gate()` with the configured default interval.
    pub async fn pass(&self) {
        self.gate(self.min_interval()).await
    }

    /// Checkpoint, then wait until `min_interval` has elapsed since the
    /// previous call proceeded.
    pub async fn gate(&self, min_interval: Duration) {
        self.lifecycle.checkpoint().await;

        let mut last_call = self.last_call.lock().await;
        if let Some(last) = *last_call {
            let ready_at = last + min_interval;
            if ready_at > Instant::now() {
                trace!(
                    wait_ms = (ready_at - Instant::now()).as_millis() as u64,
                    "throttling outbound call"
                );
                sleep_until(ready_at).await;
            }
        }
        *last_call = Some(Instant::now());
    }
}

fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
