//! # Journal: bounded in-memory event log
//!
//! A stateful subscriber that renders each [`Event`] to a text line (via its
//! `Display` impl) and keeps the most recent `capacity` lines. Dashboards read
//! it with [`Journal::tail`]; nothing is global, so several elevators can each
//! own a journal.
//!
//! ```text
//! Bus ──► SubscriberSet ──► Journal::on_event() ──► [line 1 .. line N] (ring)
//!                                                         │
//!                                   dashboard ◄── tail(n) ┘
//! ```

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::events::Event;
use crate::subscribers::Subscribe;

struct Lines {
    buf: VecDeque<String>,
    total: u64,
}

/// Bounded ring of rendered event lines.
pub struct Journal {
    lines: Mutex<Lines>,
    capacity: usize,
}

impl Journal {
    /// Creates a journal keeping at most `capacity` lines (min 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: Mutex::new(Lines {
                buf: VecDeque::with_capacity(capacity.min(4096)),
                total: 0,
            }),
            capacity,
        }
    }

    /// Appends a line, evicting the oldest one when full.
    pub fn record(&self, line: impl Into<String>) {
        let mut lines = self.lock();
        if lines.buf.len() == self.capacity {
            lines.buf.pop_front();
        }
        lines.buf.push_back(line.into());
        lines.total += 1;
    }

    /// Copy of every retained line, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.lock().buf.iter().cloned().collect()
    }

    /// Copy of the newest `n` lines, oldest first.
    pub fn tail(&self, n: usize) -> Vec<String> {
        let lines = self.lock();
        let skip = lines.buf.len().saturating_sub(n);
        lines.buf.iter().skip(skip).cloned().collect()
    }

    /// Number of lines ever recorded, including evicted ones.
    pub fn total(&self) -> u64 {
        self.lock().total
    }

    fn lock(&self) -> MutexGuard<'_, Lines> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Journal {
    /// 1024 retained lines.
    fn default() -> Self {
        Self::new(1024)
    }
}

#[async_trait]
impl Subscribe for Journal {
    async fn on_event(&self, event: &Event) {
        self.record(event.to_string());
    }

    fn name(&self) -> &'static str {
        "journal"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[test]
    fn test_keeps_newest_lines() {
        let journal = Journal::new(3);
        for i in 0..5 {
            journal.record(format!("line {i}"));
        }
        assert_eq!(journal.lines(), ["line 2", "line 3", "line 4"]);
        assert_eq!(journal.total(), 5);
    }

    #[test]
    fn test_tail_shorter_and_longer_than_buffer() {
        let journal = Journal::new(10);
        journal.record("a");
        journal.record("b");
        journal.record("c");
        assert_eq!(journal.tail(2), ["b", "c"]);
        assert_eq!(journal.tail(50), ["a", "b", "c"]);
        assert!(journal.tail(0).is_empty());
    }

    #[tokio::test]
    async fn test_renders_events() {
        let journal = Journal::new(0);
        journal.on_event(&Event::new(EventKind::ShutdownRequested)).await;
        assert_eq!(journal.lines(), ["Elevator shutdown requested"]);
    }
}
