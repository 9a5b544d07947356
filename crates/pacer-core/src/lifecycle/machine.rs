//! LifecycleMachine - 協調的な一時停止/再開のための四状態マシン
//!
//! すべての外部呼び出しは `checkpoint()` を通る。`stop()` は意図を記録するだけで、
//! 実際に止まるのは次の checkpoint。止まった呼び出し側は continuation スロットに
//! 保存され、次の `start()` で再開される。
//!
//! # 単一オーナー規律
//! continuation スロットは一つだけ。`checkpoint()`/`idle()` を複数の呼び出し側から
//! 同時に使ってはいけない（ワーカーループ一本につきマシン一つ）。

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use tokio::sync::{broadcast, oneshot};
use tracing::{debug, warn};

use crate::domain::{LifecycleState, PacerError, StateChange};
use crate::ports::{Clock, SystemClock};

struct MachineState {
    state: LifecycleState,
    /// Resume signal of the caller parked in `Stopped`, if any.
    continuation: Option<oneshot::Sender<()>>,
}

/// Four-state lifecycle gate with a single continuation slot.
pub struct LifecycleMachine {
    inner: Mutex<MachineState>,
    events: broadcast::Sender<StateChange>,
    clock: Arc<dyn Clock>,
}

impl LifecycleMachine {
    /// `event_capacity` is the broadcast ring size shared by all subscribers.
    pub fn new(event_capacity: usize) -> Self {
        Self::with_clock(event_capacity, Arc::new(SystemClock))
    }

    pub fn with_clock(event_capacity: usize, clock: Arc<dyn Clock>) -> Self {
        let (events, _rx) = broadcast::channel(event_capacity.max(1));
        Self {
            inner: Mutex::new(MachineState {
                state: LifecycleState::Stopped,
                continuation: None,
            }),
            events,
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, MachineState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn status(&self) -> LifecycleState {
        self.lock().state
    }

    /// Receiver of every subsequent transition, in transition order.
    ///
    /// Slow receivers observe `RecvError::Lagged` and skip the oldest events;
    /// the machine itself never waits for them.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.events.subscribe()
    }

    /// `Stopped -> StartPending`, waking a parked checkpoint if there is one.
    pub fn start(&self) -> Result<(), PacerError> {
        let mut inner = self.lock();
        if !inner.state.can_start() {
            return Err(PacerError::IllegalTransition {
                op: "start",
                from: inner.state,
            });
        }
        self.transition(&mut inner, LifecycleState::StartPending);

        if let Some(resume) = inner.continuation.take() {
            // the parked caller may have given up already
            let _ = resume.send(());
        }
        Ok(())
    }

    /// `Running | StartPending -> StopPending`. Takes effect at the next checkpoint.
    pub fn stop(&self) -> Result<(), PacerError> {
        let mut inner = self.lock();
        if !inner.state.can_stop() {
            return Err(PacerError::IllegalTransition {
                op: "stop",
                from: inner.state,
            });
        }
        self.transition(&mut inner, LifecycleState::StopPending);
        Ok(())
    }

    /// The gate every outbound call passes before proceeding.
    ///
    /// - `Running`: passes.
    /// - `StartPending`: promotes to `Running` and passes.
    /// - `StopPending`: demotes to `Stopped` and blocks until `start()`.
    /// - `Stopped`: blocks until `start()`.
    ///
    /// The transition happens when this is called, not when the future is polled.
    pub fn checkpoint(&self) -> Checkpoint {
        let mut inner = self.lock();
        match inner.state {
            LifecycleState::Running => Checkpoint::passed(),
            LifecycleState::StartPending => {
                self.transition(&mut inner, LifecycleState::Running);
                Checkpoint::passed()
            }
            LifecycleState::StopPending => {
                self.transition(&mut inner, LifecycleState::Stopped);
                Self::park(&mut inner)
            }
            LifecycleState::Stopped => Self::park(&mut inner),
        }
    }

    /// Called by the worker loop between tasks.
    ///
    /// From `Running` it demotes to `StartPending` and never blocks, so the
    /// next checkpoint has to re-affirm `Running` and a `stop()` issued between
    /// tasks is honoured. From any other state it is exactly `checkpoint()`.
    pub fn idle(&self) -> Checkpoint {
        {
            let mut inner = self.lock();
            if inner.state == LifecycleState::Running {
                self.transition(&mut inner, LifecycleState::StartPending);
                return Checkpoint::passed();
            }
        }
        self.checkpoint()
    }

    fn transition(&self, inner: &mut MachineState, next: LifecycleState) {
        let original = inner.state;
        inner.state = next;
        debug!(from = %original, to = %next, "lifecycle transition");

        // best-effort: no receivers is not an error
        let _ = self
            .events
            .send(StateChange::new(original, next, self.clock.now()));
    }

    fn park(inner: &mut MachineState) -> Checkpoint {
        let (tx, rx) = oneshot::channel();
        if let Some(previous) = inner.continuation.replace(tx)
            && !previous.is_closed()
        {
            warn!("continuation slot overwritten; the earlier checkpoint stays blocked");
        }
        Checkpoint {
            resume: Some(rx),
            displaced: false,
        }
    }
}

/// Future returned by [`LifecycleMachine::checkpoint`] and [`LifecycleMachine::idle`].
///
/// A checkpoint whose continuation was overwritten (or whose machine was
/// dropped) never resolves, matching the single-slot semantics.
#[must_use = "a checkpoint does nothing unless awaited"]
pub struct Checkpoint {
    resume: Option<oneshot::Receiver<()>>,
    displaced: bool,
}

impl Checkpoint {
    fn passed() -> Self {
        Self {
            resume: None,
            displaced: false,
        }
    }

    /// Did this checkpoint park the caller?
    pub fn is_blocking(&self) -> bool {
        self.resume.is_some()
    }
}

impl Future for Checkpoint {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        if this.displaced {
            return Poll::Pending;
        }
        let Some(rx) = this.resume.as_mut() else {
            return Poll::Ready(());
        };
        match Pin::new(rx).poll(cx) {
            Poll::Ready(Ok(())) => {
                this.resume = None;
                Poll::Ready(())
            }
            Poll::Ready(Err(_)) => {
                this.displaced = true;
                Poll::Pending
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
