// src/tracking/in_progress.rs
//
// Follows a dispatched lane-change command until the lane index moves or
// the timeout runs out.

use super::lane_memory::LaneMemory;
use crate::analysis::LanePosition;
use crate::types::Direction;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneChangePurpose {
    Overtake,
    Return,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InProgressLaneChange {
    pub direction: Direction,
    pub purpose: LaneChangePurpose,
    pub origin_lane: u32,
    pub started_at_ms: f64,
    /// Lane memory held aside while a return command is in flight.
    pub parked_memory: Option<LaneMemory>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LaneChangeProgress {
    Waiting { elapsed_ms: f64 },
    Succeeded { to_lane: u32, duration_ms: f64 },
    TimedOut { duration_ms: f64 },
}

impl InProgressLaneChange {
    pub fn overtake(direction: Direction, origin_lane: u32, now_ms: f64) -> Self {
        Self {
            direction,
            purpose: LaneChangePurpose::Overtake,
            origin_lane,
            started_at_ms: now_ms,
            parked_memory: None,
        }
    }

    pub fn returning(direction: Direction, origin_lane: u32, now_ms: f64, memory: LaneMemory) -> Self {
        Self {
            direction,
            purpose: LaneChangePurpose::Return,
            origin_lane,
            started_at_ms: now_ms,
            parked_memory: Some(memory),
        }
    }

    pub fn check(&self, lanes: LanePosition, now_ms: f64, timeout_ms: f64) -> LaneChangeProgress {
        let elapsed_ms = (now_ms - self.started_at_ms).max(0.0);

        if self.origin_lane != 0 && lanes.current_lane != 0 && lanes.current_lane != self.origin_lane {
            return LaneChangeProgress::Succeeded {
                to_lane: lanes.current_lane,
                duration_ms: elapsed_ms,
            };
        }

        if elapsed_ms > timeout_ms {
            LaneChangeProgress::TimedOut {
                duration_ms: elapsed_ms,
            }
        } else {
            LaneChangeProgress::Waiting { elapsed_ms }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lane(current: u32) -> LanePosition {
        LanePosition {
            current_lane: current,
            total_lanes: 3,
        }
    }

    #[test]
    fn test_lane_index_change_succeeds() {
        let change = InProgressLaneChange::overtake(Direction::Right, 2, 0.0);
        assert_eq!(
            change.check(lane(2), 3_000.0, 12_000.0),
            LaneChangeProgress::Waiting { elapsed_ms: 3_000.0 }
        );
        assert_eq!(
            change.check(lane(3), 4_000.0, 12_000.0),
            LaneChangeProgress::Succeeded {
                to_lane: 3,
                duration_ms: 4_000.0
            }
        );
    }

    #[test]
    fn test_times_out_without_lane_change() {
        let change = InProgressLaneChange::overtake(Direction::Left, 2, 0.0);
        assert!(matches!(
            change.check(lane(2), 12_000.0, 12_000.0),
            LaneChangeProgress::Waiting { .. }
        ));
        assert!(matches!(
            change.check(lane(2), 12_001.0, 12_000.0),
            LaneChangeProgress::TimedOut { .. }
        ));
    }

    #[test]
    fn test_unknown_lanes_never_count_as_success() {
        let change = InProgressLaneChange::overtake(Direction::Left, 0, 0.0);
        assert!(matches!(
            change.check(lane(1), 1_000.0, 12_000.0),
            LaneChangeProgress::Waiting { .. }
        ));

        let change = InProgressLaneChange::overtake(Direction::Left, 2, 0.0);
        assert!(matches!(
            change.check(LanePosition::UNKNOWN, 1_000.0, 12_000.0),
            LaneChangeProgress::Waiting { .. }
        ));
    }
}
