// src/types.rs

use serde::{Deserialize, Serialize};

pub const MPS_TO_KPH: f64 = 3.6;

pub fn mps_to_kph(mps: f64) -> f64 {
    mps * MPS_TO_KPH
}

// ============================================================================
// INPUT
// ============================================================================

/// Nearest vehicle ahead in the ego lane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeadVehicle {
    pub distance_m: f64,
    /// Positive to the left of the ego centerline.
    pub lateral_offset_m: f64,
    pub speed_mps: f64,
    pub confidence: f64,
}

impl LeadVehicle {
    pub fn speed_kph(&self) -> f64 {
        mps_to_kph(self.speed_mps)
    }
}

/// Occupancy of the lane next to the ego vehicle on one side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeighborLane {
    pub present: bool,
    /// Negative when the vehicle is behind the ego bumper.
    pub relative_distance_m: f64,
    /// Neighbor speed minus ego speed.
    pub relative_speed_mps: f64,
}

impl NeighborLane {
    pub fn relative_speed_kph(&self) -> f64 {
        mps_to_kph(self.relative_speed_mps)
    }
}

/// Navigation road category code. Two values are reserved for
/// limited-access roads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoadClass(pub i32);

impl RoadClass {
    pub const HIGHWAY: RoadClass = RoadClass(0);
    pub const EXPRESSWAY: RoadClass = RoadClass(1);

    pub fn is_limited_access(self) -> bool {
        self == Self::HIGHWAY || self == Self::EXPRESSWAY
    }
}

/// One perception update. Immutable for the duration of a tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleSnapshot {
    pub ego_speed_mps: f64,
    pub steering_angle_deg: f64,
    pub lead: Option<LeadVehicle>,
    pub left_neighbor: NeighborLane,
    pub right_neighbor: NeighborLane,
    pub left_blindspot: bool,
    pub right_blindspot: bool,
    pub left_line_confidence: f64,
    pub right_line_confidence: f64,
    pub left_edge_distance_m: Option<f64>,
    pub right_edge_distance_m: Option<f64>,
    pub curvature: f64,

    // Navigation collaborator (all optional)
    pub road_class: Option<RoadClass>,
    pub maneuver_distance_m: Option<f64>,
    pub maneuver_text: Option<String>,
    pub exiting: bool,
}

impl VehicleSnapshot {
    pub fn ego_speed_kph(&self) -> f64 {
        mps_to_kph(self.ego_speed_mps)
    }

    pub fn neighbor(&self, side: Direction) -> &NeighborLane {
        match side {
            Direction::Left => &self.left_neighbor,
            Direction::Right => &self.right_neighbor,
        }
    }

    pub fn blindspot(&self, side: Direction) -> bool {
        match side {
            Direction::Left => self.left_blindspot,
            Direction::Right => self.right_blindspot,
        }
    }

    pub fn line_confidence(&self, side: Direction) -> f64 {
        match side {
            Direction::Left => self.left_line_confidence,
            Direction::Right => self.right_line_confidence,
        }
    }

    pub fn edge_distance(&self, side: Direction) -> Option<f64> {
        match side {
            Direction::Left => self.left_edge_distance_m,
            Direction::Right => self.right_edge_distance_m,
        }
    }
}

// ============================================================================
// SETTINGS ENUMS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Net lane-change contribution: left counts up, right counts down.
    pub fn signum(self) -> i32 {
        match self {
            Direction::Left => 1,
            Direction::Right => -1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }

    pub fn prepare_cue(self) -> CueKind {
        match self {
            Direction::Left => CueKind::LeftPrepare,
            Direction::Right => CueKind::RightPrepare,
        }
    }

    pub fn confirm_cue(self) -> CueKind {
        match self {
            Direction::Left => CueKind::LeftConfirm,
            Direction::Right => CueKind::RightConfirm,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OvertakeMode {
    #[default]
    Disabled,
    ManualConfirm,
    Automatic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrivingStyle {
    Conservative,
    #[default]
    Standard,
    Aggressive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CueKind {
    LeftPrepare,
    RightPrepare,
    LeftConfirm,
    RightConfirm,
    ExitReminder,
}

// ============================================================================
// CHECK RESULTS
// ============================================================================

/// Outcome of a single gate. `Fail` always carries a human-readable reason.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckResult<T = ()> {
    Pass(T),
    Fail(String),
}

impl<T> CheckResult<T> {
    pub fn fail(reason: impl Into<String>) -> Self {
        CheckResult::Fail(reason.into())
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, CheckResult::Pass(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            CheckResult::Pass(_) => None,
            CheckResult::Fail(reason) => Some(reason),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            CheckResult::Pass(value) => Some(value),
            CheckResult::Fail(_) => None,
        }
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OvertakeOutcome {
    #[default]
    None,
    Pending,
    Success,
    Failed,
    ConditionNotMet,
}

/// Coarse engine phase reported alongside the status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionPhase {
    Disabled,
    Monitoring,
    Confirming,
    Blocked,
    Cooldown,
    AwaitingDriver,
    Preparing,
    Cancelled,
    LaneChanging,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionStatus {
    pub phase: DecisionPhase,
    pub status_text: String,
    pub can_overtake: bool,
    pub last_direction: Option<Direction>,
    pub blocking_reason: Option<String>,
    pub cooldown_remaining_ms: Option<u64>,
    pub current_lane: u32,
    pub total_lanes: u32,
    pub lane_reminder: Option<String>,
    pub outcome: OvertakeOutcome,
    pub return_status: Option<String>,
    pub delivery_error: Option<String>,
}

impl DecisionStatus {
    pub fn new(phase: DecisionPhase, status_text: impl Into<String>) -> Self {
        Self {
            phase,
            status_text: status_text.into(),
            can_overtake: false,
            last_direction: None,
            blocking_reason: None,
            cooldown_remaining_ms: None,
            current_lane: 0,
            total_lanes: 0,
            lane_reminder: None,
            outcome: OvertakeOutcome::None,
            return_status: None,
            delivery_error: None,
        }
    }

    pub fn blocked_by(mut self, reason: impl Into<String>) -> Self {
        self.blocking_reason = Some(reason.into());
        self
    }
}
