// src/pipeline/metrics.rs
//
// Engine counters. Cloning shares the same atomics, so a telemetry task
// can hold a handle while the engine keeps ticking.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct EngineMetrics {
    pub ticks: Arc<AtomicU64>,
    pub cues_played: Arc<AtomicU64>,
    pub commands_dispatched: Arc<AtomicU64>,
    pub lane_changes_succeeded: Arc<AtomicU64>,
    pub lane_changes_failed: Arc<AtomicU64>,
    pub pending_cancelled: Arc<AtomicU64>,
    pub returns_dispatched: Arc<AtomicU64>,
    pub lane_memory_expired: Arc<AtomicU64>,
    pub exit_reminders: Arc<AtomicU64>,
    pub delivery_failures: Arc<AtomicU64>,
    pub started_at: Instant,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self {
            ticks: Arc::new(AtomicU64::new(0)),
            cues_played: Arc::new(AtomicU64::new(0)),
            commands_dispatched: Arc::new(AtomicU64::new(0)),
            lane_changes_succeeded: Arc::new(AtomicU64::new(0)),
            lane_changes_failed: Arc::new(AtomicU64::new(0)),
            pending_cancelled: Arc::new(AtomicU64::new(0)),
            returns_dispatched: Arc::new(AtomicU64::new(0)),
            lane_memory_expired: Arc::new(AtomicU64::new(0)),
            exit_reminders: Arc::new(AtomicU64::new(0)),
            delivery_failures: Arc::new(AtomicU64::new(0)),
            started_at: Instant::now(),
        }
    }

    pub fn inc(&self, counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn tick_rate(&self) -> f64 {
        let ticks = self.ticks.load(Ordering::Relaxed);
        let elapsed = self.started_at.elapsed().as_secs_f64();
        if elapsed > 0.01 {
            ticks as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            ticks: self.ticks.load(Ordering::Relaxed),
            tick_rate: self.tick_rate(),
            cues_played: self.cues_played.load(Ordering::Relaxed),
            commands_dispatched: self.commands_dispatched.load(Ordering::Relaxed),
            lane_changes_succeeded: self.lane_changes_succeeded.load(Ordering::Relaxed),
            lane_changes_failed: self.lane_changes_failed.load(Ordering::Relaxed),
            pending_cancelled: self.pending_cancelled.load(Ordering::Relaxed),
            returns_dispatched: self.returns_dispatched.load(Ordering::Relaxed),
            lane_memory_expired: self.lane_memory_expired.load(Ordering::Relaxed),
            exit_reminders: self.exit_reminders.load(Ordering::Relaxed),
            delivery_failures: self.delivery_failures.load(Ordering::Relaxed),
            elapsed_secs: self.started_at.elapsed().as_secs_f64(),
        }
    }
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSummary {
    pub ticks: u64,
    pub tick_rate: f64,
    pub cues_played: u64,
    pub commands_dispatched: u64,
    pub lane_changes_succeeded: u64,
    pub lane_changes_failed: u64,
    pub pending_cancelled: u64,
    pub returns_dispatched: u64,
    pub lane_memory_expired: u64,
    pub exit_reminders: u64,
    pub delivery_failures: u64,
    pub elapsed_secs: f64,
}
