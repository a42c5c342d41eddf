// src/analysis/mod.rs

pub mod evaluation;
pub mod exit_reminder;
pub mod feasibility;
pub mod lane_position;
pub mod need;
pub mod prerequisites;

pub use evaluation::{Evaluation, EvaluationContext};
pub use exit_reminder::ExitReminder;
pub use feasibility::{check_side, choose_direction, DirectionDecision};
pub use lane_position::{estimate_lane_position, LanePosition};
pub use need::{evaluate_need, NeedTrigger};
pub use prerequisites::check_prerequisites;
