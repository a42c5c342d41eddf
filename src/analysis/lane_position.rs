// src/analysis/lane_position.rs
//
// Lane index from road-edge distances. Counts how many reference-width
// lanes fit between the ego vehicle and each edge.

use crate::config::LaneGeometryConfig;
use serde::Serialize;

/// 1-based lane index counted from the left edge. `(0, 0)` means unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LanePosition {
    pub current_lane: u32,
    pub total_lanes: u32,
}

impl LanePosition {
    pub const UNKNOWN: LanePosition = LanePosition {
        current_lane: 0,
        total_lanes: 0,
    };

    pub fn is_known(&self) -> bool {
        self.current_lane > 0 && self.total_lanes > 0
    }

    pub fn is_leftmost(&self) -> bool {
        self.is_known() && self.current_lane == 1
    }

    pub fn is_rightmost(&self) -> bool {
        self.is_known() && self.current_lane >= self.total_lanes
    }
}

pub fn estimate_lane_position(
    left_edge_m: Option<f64>,
    right_edge_m: Option<f64>,
    geometry: &LaneGeometryConfig,
) -> LanePosition {
    let (Some(left), Some(right)) = (left_edge_m, right_edge_m) else {
        return LanePosition::UNKNOWN;
    };
    if !(geometry.reference_lane_width_m > 0.0) {
        return LanePosition::UNKNOWN;
    }

    let left_lanes = lanes_beyond(left, geometry);
    let right_lanes = lanes_beyond(right, geometry);

    LanePosition {
        current_lane: left_lanes + 1,
        total_lanes: left_lanes + 1 + right_lanes,
    }
}

fn lanes_beyond(edge_m: f64, geometry: &LaneGeometryConfig) -> u32 {
    if edge_m > geometry.edge_presence_min_m {
        (edge_m / geometry.reference_lane_width_m).floor() as u32
    } else {
        0
    }
}
