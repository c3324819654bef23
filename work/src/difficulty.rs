//! Adaptive difficulty adjustment based on recent block arrival rate.
//!
//! When blocks arrive faster than the target interval, difficulty increases
//! to slow admission; when they don't, it returns to the configured base.

use std::collections::VecDeque;

/// Extra bits the adjuster may add on top of the base difficulty.
const MAX_EXTRA_BITS: u32 = 8;

/// Tracks recent block timestamps in a sliding window and raises the
/// difficulty by one bit per halving of the observed block interval below
/// the target.
pub struct DifficultyAdjuster {
    window: VecDeque<u64>,
    window_size: usize,
    base_difficulty: u32,
    target_interval_secs: u64,
}

impl DifficultyAdjuster {
    pub fn new(base_difficulty: u32, target_interval_secs: u64, window_size: usize) -> Self {
        Self {
            window: VecDeque::with_capacity(window_size),
            window_size,
            base_difficulty,
            target_interval_secs,
        }
    }

    /// Record an accepted block's timestamp.
    pub fn record_block(&mut self, timestamp_secs: u64) {
        self.window.push_back(timestamp_secs);
        while self.window.len() > self.window_size {
            self.window.pop_front();
        }
    }

    /// Compute the current effective difficulty from recent arrival rate.
    pub fn current_difficulty(&self) -> u32 {
        if self.window.len() < 2 {
            return self.base_difficulty;
        }

        let first = self.window.front().unwrap();
        let last = self.window.back().unwrap();
        let elapsed = last.saturating_sub(*first);
        let intervals = (self.window.len() - 1) as u64;
        let avg_interval = (elapsed / intervals).max(1);

        if avg_interval >= self.target_interval_secs {
            return self.base_difficulty;
        }

        let ratio = self.target_interval_secs / avg_interval;
        let extra = ratio.ilog2().min(MAX_EXTRA_BITS);
        self.base_difficulty + extra
    }

    /// Update the base difficulty.
    pub fn set_base_difficulty(&mut self, new_base: u32) {
        self.base_difficulty = new_base;
    }
}
