// src/analysis/evaluation.rs
//
// One pass of the full decision chain. Shared by the debounced trigger,
// the manual confirm path and the pending re-validation so they can never
// disagree about what "conditions hold" means.

use super::feasibility::{choose_direction, DirectionDecision};
use super::need::{evaluate_need, NeedTrigger};
use super::prerequisites::check_prerequisites;
use crate::adaptive::ResolvedThresholds;
use crate::config::EngineConfig;
use crate::types::{CheckResult, OvertakeOutcome, VehicleSnapshot};

/// Engine state the decision chain depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationContext {
    pub outcome: OvertakeOutcome,
    pub follow_limit_reached: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub prerequisites: CheckResult,
    /// `None` when prerequisites failed.
    pub need: Option<CheckResult<NeedTrigger>>,
    /// `None` until direction selection is requested and need passed.
    pub direction: Option<CheckResult<DirectionDecision>>,
}

impl Evaluation {
    /// Prerequisites and need only. Cheap enough to run every tick.
    pub fn gates(
        snapshot: &VehicleSnapshot,
        thresholds: &ResolvedThresholds,
        config: &EngineConfig,
        context: EvaluationContext,
    ) -> Self {
        let prerequisites = check_prerequisites(snapshot, thresholds, &config.gate, context.outcome);
        let need = prerequisites.is_pass().then(|| {
            evaluate_need(
                snapshot,
                thresholds,
                &config.early_overtake,
                context.follow_limit_reached,
            )
        });

        Self {
            prerequisites,
            need,
            direction: None,
        }
    }

    /// Full chain including direction selection.
    pub fn full(
        snapshot: &VehicleSnapshot,
        thresholds: &ResolvedThresholds,
        config: &EngineConfig,
        context: EvaluationContext,
    ) -> Self {
        let mut evaluation = Self::gates(snapshot, thresholds, config, context);
        evaluation.select_direction(snapshot, config);
        evaluation
    }

    pub fn select_direction(&mut self, snapshot: &VehicleSnapshot, config: &EngineConfig) {
        if self.wants_overtake() && self.direction.is_none() {
            self.direction = Some(choose_direction(snapshot, &config.lane));
        }
    }

    /// Prerequisites and need both pass.
    pub fn wants_overtake(&self) -> bool {
        self.prerequisites.is_pass() && self.need.as_ref().map_or(false, |n| n.is_pass())
    }

    pub fn trigger(&self) -> Option<NeedTrigger> {
        self.need.as_ref().and_then(|n| n.value().copied())
    }

    pub fn decision(&self) -> Option<&DirectionDecision> {
        self.direction.as_ref().and_then(|d| d.value())
    }

    /// First failing stage, in evaluation order.
    pub fn failure_reason(&self) -> Option<String> {
        if let Some(reason) = self.prerequisites.reason() {
            return Some(reason.to_string());
        }
        if let Some(reason) = self.need.as_ref().and_then(|n| n.reason()) {
            return Some(reason.to_string());
        }
        self.direction
            .as_ref()
            .and_then(|d| d.reason())
            .map(str::to_string)
    }

    pub fn summary(&self) -> String {
        match (self.failure_reason(), self.decision(), self.trigger()) {
            (Some(reason), _, _) => format!("blocked: {}", reason),
            (None, Some(decision), Some(trigger)) => {
                format!("{} via {:?}: {}", decision.direction.as_str(), trigger, decision.reason)
            }
            (None, _, Some(trigger)) => format!("overtake wanted ({:?})", trigger),
            _ => "no evaluation".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{mps_to_kph, Direction, LeadVehicle, RoadClass};

    fn idle() -> EvaluationContext {
        EvaluationContext {
            outcome: OvertakeOutcome::None,
            follow_limit_reached: false,
        }
    }

    fn ready_snapshot() -> VehicleSnapshot {
        VehicleSnapshot {
            ego_speed_mps: 100.0 / mps_to_kph(1.0),
            lead: Some(LeadVehicle {
                distance_m: 60.0,
                lateral_offset_m: 0.0,
                speed_mps: 80.0 / mps_to_kph(1.0),
                confidence: 0.9,
            }),
            left_line_confidence: 0.9,
            right_line_confidence: 0.9,
            left_edge_distance_m: Some(5.0),
            right_edge_distance_m: Some(5.0),
            road_class: Some(RoadClass::HIGHWAY),
            ..VehicleSnapshot::default()
        }
    }

    #[test]
    fn test_full_chain_selects_left() {
        let evaluation = Evaluation::full(
            &ready_snapshot(),
            &ResolvedThresholds::default(),
            &EngineConfig::default(),
            idle(),
        );
        assert!(evaluation.wants_overtake());
        assert_eq!(evaluation.trigger(), Some(NeedTrigger::SpeedDifferential));
        assert_eq!(evaluation.decision().unwrap().direction, Direction::Left);
        assert_eq!(evaluation.failure_reason(), None);
    }

    #[test]
    fn test_prerequisite_failure_skips_need() {
        let mut snapshot = ready_snapshot();
        snapshot.lead = None;
        let evaluation = Evaluation::full(
            &snapshot,
            &ResolvedThresholds::default(),
            &EngineConfig::default(),
            idle(),
        );
        assert!(evaluation.need.is_none());
        assert!(evaluation.direction.is_none());
        assert_eq!(evaluation.failure_reason().as_deref(), Some("no lead vehicle"));
    }

    #[test]
    fn test_direction_failure_is_reported_last() {
        let mut snapshot = ready_snapshot();
        snapshot.left_blindspot = true;
        snapshot.right_blindspot = true;
        let evaluation = Evaluation::full(
            &snapshot,
            &ResolvedThresholds::default(),
            &EngineConfig::default(),
            idle(),
        );
        assert!(evaluation.wants_overtake());
        assert!(evaluation.decision().is_none());
        assert_eq!(
            evaluation.failure_reason().as_deref(),
            Some("left blind spot occupied")
        );
    }
}
