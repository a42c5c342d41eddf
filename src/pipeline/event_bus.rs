// src/pipeline/event_bus.rs
//
// Transition log. The engine publishes; the caller drains whenever it
// wants telemetry. Bounded so an idle consumer cannot grow it forever.

use crate::tracking::LaneChangePurpose;
use crate::types::{CueKind, Direction};
use serde::Serialize;
use std::collections::VecDeque;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    ExitReminder {
        timestamp_ms: f64,
        message: String,
    },

    CuePlayed {
        timestamp_ms: f64,
        cue: CueKind,
    },

    LaneChangeDispatched {
        timestamp_ms: f64,
        direction: Direction,
        purpose: LaneChangePurpose,
        origin_lane: u32,
    },

    PendingCancelled {
        timestamp_ms: f64,
        direction: Direction,
        reason: String,
    },

    LaneChangeSucceeded {
        timestamp_ms: f64,
        direction: Direction,
        purpose: LaneChangePurpose,
        from_lane: u32,
        to_lane: u32,
        duration_ms: f64,
    },

    LaneChangeFailed {
        timestamp_ms: f64,
        direction: Direction,
        purpose: LaneChangePurpose,
        reason: String,
    },

    LaneMemoryCleared {
        timestamp_ms: f64,
        reason: String,
    },

    DeliveryFailed {
        timestamp_ms: f64,
        action: String,
        error: String,
    },
}

pub struct EventBus {
    events: VecDeque<EngineEvent>,
    max_pending: usize,
}

impl EventBus {
    pub fn new(max_pending: usize) -> Self {
        let max_pending = max_pending.max(1);
        Self {
            events: VecDeque::with_capacity(max_pending),
            max_pending,
        }
    }

    pub fn publish(&mut self, event: EngineEvent) {
        if self.events.len() >= self.max_pending {
            warn!(
                "Event bus full ({} events), dropping oldest",
                self.max_pending
            );
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<EngineEvent> {
        self.events.drain(..).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.events.len()
    }
}
