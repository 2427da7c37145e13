//! Per-credential usage history

use crate::clock::elapsed;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::time::Duration;

/// Bounded history of request instants plus a lifetime counter
#[derive(Debug, Clone)]
pub struct UsageWindow {
    instants: VecDeque<DateTime<Utc>>,
    capacity: usize,
    lifetime: u64,
}

impl UsageWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            instants: VecDeque::with_capacity(capacity),
            capacity,
            lifetime: 0,
        }
    }

    /// Number of recorded instants strictly younger than `window` at `now`
    pub fn window_count(&self, now: DateTime<Utc>, window: Duration) -> usize {
        self.instants
            .iter()
            .filter(|&&at| elapsed(at, now) < window)
            .count()
    }

    /// Record a use at `now`, discarding the oldest instant past capacity
    pub fn record(&mut self, now: DateTime<Utc>) {
        self.instants.push_back(now);
        while self.instants.len() > self.capacity {
            self.instants.pop_front();
        }
        self.lifetime += 1;
    }

    /// Physically drop instants that have left the window
    pub fn prune(&mut self, now: DateTime<Utc>, window: Duration) {
        while let Some(&oldest) = self.instants.front() {
            if elapsed(oldest, now) >= window {
                self.instants.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn lifetime(&self) -> u64 {
        self.lifetime
    }

    pub fn retained(&self) -> usize {
        self.instants.len()
    }
}
