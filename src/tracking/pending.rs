// src/tracking/pending.rs
//
// Automatic-mode delay between the prepare cue and the actual command.

use crate::analysis::{Evaluation, NeedTrigger};
use crate::types::Direction;

#[derive(Debug, Clone, PartialEq)]
pub struct PendingLaneChange {
    pub direction: Direction,
    pub trigger: NeedTrigger,
    pub started_at_ms: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PendingResolution {
    /// Delay still running.
    Waiting { remaining_ms: f64 },
    /// Re-validation confirmed the same direction.
    Commit,
    Cancel { reason: String },
}

impl PendingLaneChange {
    pub fn new(direction: Direction, trigger: NeedTrigger, now_ms: f64) -> Self {
        Self {
            direction,
            trigger,
            started_at_ms: now_ms,
        }
    }

    pub fn remaining_ms(&self, now_ms: f64, delay_ms: f64) -> f64 {
        (delay_ms - (now_ms - self.started_at_ms)).max(0.0)
    }

    pub fn is_due(&self, now_ms: f64, delay_ms: f64) -> bool {
        now_ms - self.started_at_ms >= delay_ms
    }

    /// Decide what to do with this pending change once the delay has run out.
    /// `evaluation` must be a full re-evaluation taken at `now_ms`.
    pub fn resolve(&self, evaluation: &Evaluation) -> PendingResolution {
        if let Some(reason) = evaluation.failure_reason() {
            return PendingResolution::Cancel { reason };
        }

        match evaluation.decision() {
            Some(decision) if decision.direction == self.direction => PendingResolution::Commit,
            Some(decision) => PendingResolution::Cancel {
                reason: format!(
                    "direction changed from {} to {}",
                    self.direction.as_str(),
                    decision.direction.as_str()
                ),
            },
            None => PendingResolution::Cancel {
                reason: "no lane available".to_string(),
            },
        }
    }

    pub fn check(&self, now_ms: f64, delay_ms: f64, evaluation: impl FnOnce() -> Evaluation) -> PendingResolution {
        if !self.is_due(now_ms, delay_ms) {
            return PendingResolution::Waiting {
                remaining_ms: self.remaining_ms(now_ms, delay_ms),
            };
        }
        self.resolve(&evaluation())
    }
}
