// src/tracking/cooldown.rs

use crate::config::CooldownConfig;

/// Minimum spacing between two actions. The duration is passed on every
/// query because it follows the (style-scaled) settings of that tick.
#[derive(Debug, Clone, Default)]
pub struct Cooldown {
    last_action_ms: Option<f64>,
}

impl Cooldown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, now_ms: f64) {
        self.last_action_ms = Some(now_ms);
    }

    /// Remaining time, or `None` when no cooldown is active.
    pub fn remaining_ms(&self, now_ms: f64, cooldown_ms: f64) -> Option<u64> {
        let last = self.last_action_ms?;
        let elapsed = (now_ms - last).max(0.0);
        if elapsed < cooldown_ms {
            Some((cooldown_ms - elapsed).ceil() as u64)
        } else {
            None
        }
    }

    pub fn is_active(&self, now_ms: f64, cooldown_ms: f64) -> bool {
        self.remaining_ms(now_ms, cooldown_ms).is_some()
    }

    pub fn last_action_ms(&self) -> Option<f64> {
        self.last_action_ms
    }
}

/// Consecutive lane changes that timed out or were cancelled before
/// dispatch. Any successful lane change ends the streak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailureStreak {
    count: u32,
}

impl FailureStreak {
    pub fn record_failure(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    pub fn record_success(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Added to the adaptive action cooldown.
    pub fn penalty_ms(&self, config: &CooldownConfig) -> f64 {
        if self.count <= config.failure_streak_threshold {
            return 0.0;
        }
        (self.count as f64 * config.penalty_per_failure_ms).min(config.max_penalty_ms)
    }
}
