//! Single-item "keep only latest" handoff between threads.
//!
//! A pending item that has not been received yet is replaced by the next
//! `send`, so a slow consumer always sees the newest item and never a queue.
//! `tokio::sync::watch` only lends the current value by reference and
//! `mpsc` queues, so neither can move the newest frame to the analyzer.

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

struct State<T> {
    item: Option<T>,
    senders: usize,
    receiver_alive: bool,
    sent: u64,
    replaced: u64,
}

struct Shared<T> {
    state: Mutex<State<T>>,
    ready: Condvar,
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Counters shared by both ends of a slot.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SlotStats {
    /// Items accepted by `send`.
    pub sent: u64,
    /// Pending items discarded because a newer one arrived.
    pub replaced: u64,
}

/// The receiver is gone; the item is handed back.
pub struct SendError<T>(pub T);

impl<T> fmt::Debug for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SendError(..)")
    }
}

impl<T> fmt::Display for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("receiver dropped")
    }
}

impl<T> std::error::Error for SendError<T> {}

pub struct LatestSender<T> {
    shared: Arc<Shared<T>>,
}

pub struct LatestReceiver<T> {
    shared: Arc<Shared<T>>,
}

/// Create a connected sender/receiver pair.
pub fn channel<T>() -> (LatestSender<T>, LatestReceiver<T>) {
    let shared = Arc::new(Shared {
        state: Mutex::new(State {
            item: None,
            senders: 1,
            receiver_alive: true,
            sent: 0,
            replaced: 0,
        }),
        ready: Condvar::new(),
    });
    (
        LatestSender {
            shared: shared.clone(),
        },
        LatestReceiver { shared },
    )
}

impl<T> LatestSender<T> {
    /// Store `item`, discarding any pending one.
    ///
    /// Returns `Ok(true)` when a pending item was replaced.
    pub fn send(&self, item: T) -> Result<bool, SendError<T>> {
        let replaced = {
            let mut state = self.shared.lock();
            if !state.receiver_alive {
                return Err(SendError(item));
            }
            state.sent += 1;
            let replaced = state.item.replace(item);
            if replaced.is_some() {
                state.replaced += 1;
            }
            replaced
        };
        self.shared.ready.notify_one();

        // The displaced item is dropped outside the lock.
        Ok(replaced.is_some())
    }

    pub fn is_closed(&self) -> bool {
        !self.shared.lock().receiver_alive
    }

    pub fn stats(&self) -> SlotStats {
        let state = self.shared.lock();
        SlotStats {
            sent: state.sent,
            replaced: state.replaced,
        }
    }
}

impl<T> Clone for LatestSender<T> {
    fn clone(&self) -> Self {
        self.shared.lock().senders += 1;
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> Drop for LatestSender<T> {
    fn drop(&mut self) {
        self.shared.lock().senders -= 1;
        self.shared.ready.notify_all();
    }
}

impl<T> LatestReceiver<T> {
    /// Block until an item is available.
    ///
    /// Returns `None` once the slot is empty and every sender is dropped.
    pub fn recv(&self) -> Option<T> {
        let mut state = self.shared.lock();
        loop {
            if let Some(item) = state.item.take() {
                return Some(item);
            }
            if state.senders == 0 {
                return None;
            }
            state = self
                .shared
                .ready
                .wait(state)
                .unwrap_or_else(|e| e.into_inner());
        }
    }

    /// Take the pending item without blocking.
    pub fn try_recv(&self) -> Option<T> {
        self.shared.lock().item.take()
    }

    pub fn stats(&self) -> SlotStats {
        let state = self.shared.lock();
        SlotStats {
            sent: state.sent,
            replaced: state.replaced,
        }
    }
}

impl<T> Drop for LatestReceiver<T> {
    fn drop(&mut self) {
        let pending = {
            let mut state = self.shared.lock();
            state.receiver_alive = false;
            state.item.take()
        };
        drop(pending);
    }
}
