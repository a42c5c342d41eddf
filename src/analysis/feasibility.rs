// src/analysis/feasibility.rs
//
// Per-side lane-change feasibility. Left is preferred; the first side that
// clears every check wins.

use crate::config::LaneGeometryConfig;
use crate::types::{CheckResult, Direction, VehicleSnapshot};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionDecision {
    pub direction: Direction,
    pub reason: String,
}

pub fn check_side(
    snapshot: &VehicleSnapshot,
    side: Direction,
    geometry: &LaneGeometryConfig,
) -> CheckResult {
    let label = side.as_str().to_lowercase();

    let neighbor = snapshot.neighbor(side);
    if neighbor.present {
        return CheckResult::fail(format!(
            "{} lane occupied (vehicle at {:.0} m)",
            label, neighbor.relative_distance_m
        ));
    }

    let has_room = snapshot
        .edge_distance(side)
        .map(|edge| edge > geometry.min_side_room_m)
        .unwrap_or(false);

    let confidence = snapshot.line_confidence(side);
    if confidence < geometry.min_line_confidence {
        return CheckResult::fail(format!(
            "{} lane line confidence {:.2} below {:.2}",
            label, confidence, geometry.min_line_confidence
        ));
    }

    if !has_room {
        return CheckResult::fail(format!("no {} lane available", label));
    }

    if snapshot.blindspot(side) {
        return CheckResult::fail(format!("{} blind spot occupied", label));
    }

    CheckResult::Pass(())
}

pub fn choose_direction(
    snapshot: &VehicleSnapshot,
    geometry: &LaneGeometryConfig,
) -> CheckResult<DirectionDecision> {
    let left = check_side(snapshot, Direction::Left, geometry);
    if left.is_pass() {
        return CheckResult::Pass(DirectionDecision {
            direction: Direction::Left,
            reason: "left lane clear".to_string(),
        });
    }

    let right = check_side(snapshot, Direction::Right, geometry);
    if right.is_pass() {
        return CheckResult::Pass(DirectionDecision {
            direction: Direction::Right,
            reason: format!(
                "right lane clear ({})",
                left.reason().unwrap_or("left unavailable")
            ),
        });
    }

    CheckResult::fail(left.reason().unwrap_or("no lane available").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NeighborLane;

    fn open_road() -> VehicleSnapshot {
        VehicleSnapshot {
            left_line_confidence: 0.9,
            right_line_confidence: 0.9,
            left_edge_distance_m: Some(5.0),
            right_edge_distance_m: Some(5.0),
            ..VehicleSnapshot::default()
        }
    }

    fn choose(snapshot: &VehicleSnapshot) -> CheckResult<DirectionDecision> {
        choose_direction(snapshot, &LaneGeometryConfig::default())
    }

    #[test]
    fn test_left_preferred_when_both_clear() {
        let decision = choose(&open_road());
        assert_eq!(decision.value().unwrap().direction, Direction::Left);
    }

    #[test]
    fn test_left_blindspot_selects_right() {
        let mut snapshot = open_road();
        snapshot.left_blindspot = true;
        let decision = choose(&snapshot);
        let decision = decision.value().unwrap();
        assert_eq!(decision.direction, Direction::Right);
        assert!(decision.reason.contains("blind spot"));
    }

    #[test]
    fn test_occupied_neighbor_fails_side() {
        let mut snapshot = open_road();
        snapshot.left_neighbor = NeighborLane {
            present: true,
            relative_distance_m: -8.0,
            relative_speed_mps: 0.0,
        };
        let result = check_side(&snapshot, Direction::Left, &LaneGeometryConfig::default());
        assert!(result.reason().unwrap().contains("occupied"));
    }

    #[test]
    fn test_weak_lines_fail_side() {
        let mut snapshot = open_road();
        snapshot.right_line_confidence = 0.4;
        let result = check_side(&snapshot, Direction::Right, &LaneGeometryConfig::default());
        assert!(result.reason().unwrap().contains("line confidence"));
    }

    #[test]
    fn test_missing_edge_means_no_room() {
        let mut snapshot = open_road();
        snapshot.left_edge_distance_m = None;
        let result = check_side(&snapshot, Direction::Left, &LaneGeometryConfig::default());
        assert_eq!(result.reason(), Some("no left lane available"));
    }

    #[test]
    fn test_both_blocked_reports_left_reason() {
        let mut snapshot = open_road();
        snapshot.left_blindspot = true;
        snapshot.right_edge_distance_m = Some(1.0);
        assert_eq!(choose(&snapshot).reason(), Some("left blind spot occupied"));
    }
}
