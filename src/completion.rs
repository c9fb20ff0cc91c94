//! Wait-group style completion tracking for detached workers.
//!
//! The caller adds one unit per worker before spawning, each worker holds a
//! [`CompletionGuard`], and [`CompletionCounter::wait`] resolves once every
//! guard has been dropped.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
pub struct CompletionCounter {
    pending: AtomicUsize,
    zero: Notify,
}

impl CompletionCounter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add(&self, n: usize) {
        self.pending.fetch_add(n, Ordering::AcqRel);
    }

    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Takes ownership of one previously added unit. The unit is released when
    /// the guard drops, including during unwinding.
    pub fn guard(self: &Arc<Self>) -> CompletionGuard {
        CompletionGuard {
            counter: Arc::clone(self),
        }
    }

    fn done(&self) {
        let prev = self.pending.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(prev > 0, "completion counter released below zero");
        if prev == 1 {
            self.zero.notify_waiters();
        }
    }

    pub async fn wait(&self) {
        loop {
            let notified = self.zero.notified();
            tokio::pin!(notified);
            // Register before reading the count so a release in between is not missed.
            notified.as_mut().enable();
            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}

#[derive(Debug)]
pub struct CompletionGuard {
    counter: Arc<CompletionCounter>,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.counter.done();
    }
}
