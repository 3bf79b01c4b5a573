//! # Call queue shared by callers and the dispatch loop.
//!
//! Ordered sequence of [`StopCall`]s behind a single mutex. Callers append at
//! the back; the dispatch loop pops from the front, pushes retries and pressed
//! buttons to the front, and pulls out same-floor calls when it boards.
//!
//! ## Rules
//! - Every operation takes the one lock; nobody ever observes a torn queue.
//! - The lock is never held across an `.await`.
//! - Once [`CallQueue::close`] runs, `push_back` refuses new entries and hands
//!   them back, so the caller can fail them instead of losing them.
//! - `push_back_and` announces a call before the lock is released, so the
//!   announcement always precedes anything the dispatch loop does with it.
//! - Only the dispatch loop calls `push_front`, and it is also the one that
//!   closes the queue; front pushes therefore never race with `close`.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::rides::{Floor, StopCall};

struct QueueState {
    calls: VecDeque<StopCall>,
    closed: bool,
}

/// Pending stops, oldest first.
pub(crate) struct CallQueue {
    inner: Mutex<QueueState>,
}

impl CallQueue {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(QueueState {
                calls: VecDeque::new(),
                closed: false,
            }),
        }
    }

    /// Appends a new call. Hands the call back if the queue is closed.
    pub(crate) fn push_back(&self, call: StopCall) -> Result<(), StopCall> {
        self.push_back_and(call, || {})
    }

    /// Like [`push_back`](Self::push_back), but runs `on_queued` before the
    /// lock is released, so nothing can pop the call first.
    ///
    /// `on_queued` runs only when the call is accepted and must not touch the queue.
    pub(crate) fn push_back_and(
        &self,
        call: StopCall,
        on_queued: impl FnOnce(),
    ) -> Result<(), StopCall> {
        let mut state = self.lock();
        if state.closed {
            return Err(call);
        }
        state.calls.push_back(call);
        on_queued();
        Ok(())
    }

    /// Puts a call ahead of everything else.
    pub(crate) fn push_front(&self, call: StopCall) {
        self.lock().calls.push_front(call);
    }

    pub(crate) fn pop_front(&self) -> Option<StopCall> {
        self.lock().calls.pop_front()
    }

    /// Removes every call matching `pred`, keeping both halves in order.
    pub(crate) fn remove_where<F>(&self, mut pred: F) -> Vec<StopCall>
    where
        F: FnMut(&StopCall) -> bool,
    {
        let mut state = self.lock();
        let mut removed = Vec::new();
        let mut kept = VecDeque::with_capacity(state.calls.len());
        for call in state.calls.drain(..) {
            if pred(&call) {
                removed.push(call);
            } else {
                kept.push_back(call);
            }
        }
        state.calls = kept;
        removed
    }

    /// Target floors of the next `n` calls.
    pub(crate) fn preview(&self, n: usize) -> Vec<Floor> {
        self.lock()
            .calls
            .iter()
            .take(n)
            .map(|call| call.target().clone())
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.lock().calls.len()
    }

    /// Refuses further `push_back`s and drains what is left.
    pub(crate) fn close(&self) -> Vec<StopCall> {
        let mut state = self.lock();
        state.closed = true;
        state.calls.drain(..).collect()
    }

    #[cfg(test)]
    pub(crate) fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
