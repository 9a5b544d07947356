//! HandoffQueue - producer と consumer をどちらが先に来ても組み合わせる非同期キュー
//!
//! # 内部状態
//! - `items`: 届いたがまだ誰にも取られていない値
//! - `waiters`: 値がないまま待っている consumer（oneshot の送信側）
//!
//! どちらか一方しか非空にならない。`len() = items - waiters` で、負なら consumer が待っている。

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::task::{Context, Poll};

use tokio::sync::oneshot;

struct HandoffState<T> {
    items: VecDeque<T>,
    waiters: VecDeque<oneshot::Sender<T>>,
}

impl<T> HandoffState<T> {
    fn new() -> Self {
        Self {
            items: VecDeque::new(),
            waiters: VecDeque::new(),
        }
    }

    /// Give `item` to the oldest live waiter, or hand it back to the caller.
    fn offer(&mut self, mut item: T) -> Option<T> {
        while let Some(waiter) = self.waiters.pop_front() {
            match waiter.send(item) {
                Ok(()) => return None,
                // consumer dropped its future before anything arrived
                Err(returned) => item = returned,
            }
        }
        Some(item)
    }

    fn prune_closed_waiters(&mut self) {
        self.waiters.retain(|waiter| !waiter.is_closed());
    }
}

/// Unbounded FIFO that pairs `enqueue` and `dequeue` regardless of arrival order.
///
/// `dequeue` registers at call time, not at first poll, so the FIFO rank of a
/// consumer is fixed by the order of the `dequeue` calls.
pub struct HandoffQueue<T> {
    state: Arc<Mutex<HandoffState<T>>>,
}

impl<T> HandoffQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(HandoffState::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HandoffState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hands `item` to the oldest waiting consumer, or queues it.
    /// Never blocks.
    pub fn enqueue(&self, item: T) {
        let mut state = self.lock();
        if let Some(item) = state.offer(item) {
            state.items.push_back(item);
        }
    }

    /// Takes the oldest queued item, or registers as a waiting consumer.
    ///
    /// The returned future resolves to `None` only if the queue is dropped
    /// while waiting.
    pub fn dequeue(&self) -> Dequeue<T> {
        let mut state = self.lock();
        if let Some(item) = state.items.pop_front() {
            return Dequeue {
                slot: Slot::Ready(Some(item)),
                queue: Weak::new(),
            };
        }

        let (tx, rx) = oneshot::channel();
        state.waiters.push_back(tx);
        Dequeue {
            slot: Slot::Waiting(rx),
            queue: Arc::downgrade(&self.state),
        }
    }

    /// No delivered-but-unconsumed items.
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// At least one consumer is waiting for an item.
    pub fn is_blocked(&self) -> bool {
        let mut state = self.lock();
        state.prune_closed_waiters();
        !state.waiters.is_empty()
    }

    /// Drops every queued item. Waiting consumers stay registered.
    pub fn clear(&self) {
        self.lock().items.clear();
    }

    /// `queued items - waiting consumers`.
    pub fn len(&self) -> isize {
        let mut state = self.lock();
        state.prune_closed_waiters();
        state.items.len() as isize - state.waiters.len() as isize
    }
}

impl<T> Default for HandoffQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

enum Slot<T> {
    Ready(Option<T>),
    Waiting(oneshot::Receiver<T>),
}

/// Future returned by [`HandoffQueue::dequeue`].
///
/// Dropping it while it waits gives up its place. An item that was already
/// handed to it but never polled out goes back to the head of the queue.
pub struct Dequeue<T> {
    slot: Slot<T>,
    queue: Weak<Mutex<HandoffState<T>>>,
}

// `T` is only ever moved out, never pinned.
impl<T> Unpin for Dequeue<T> {}

impl<T> Future for Dequeue<T> {
    type Output = Option<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().slot {
            Slot::Ready(item) => Poll::Ready(item.take()),
            Slot::Waiting(rx) => Pin::new(rx).poll(cx).map(Result::ok),
        }
    }
}

impl<T> Drop for Dequeue<T> {
    fn drop(&mut self) {
        let Slot::Waiting(rx) = &mut self.slot else {
            return;
        };
        rx.close();
        let Ok(item) = rx.try_recv() else {
            return;
        };
        let Some(shared) = self.queue.upgrade() else {
            return;
        };
        let mut state = shared.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(item) = state.offer(item) {
            state.items.push_front(item);
        }
    }
}
