// src/analysis/prerequisites.rs
//
// Hard gates that must all hold before an overtake is even considered.
// Checked in a fixed order; the first failure is the reported reason.

use crate::adaptive::ResolvedThresholds;
use crate::config::GateConfig;
use crate::types::{CheckResult, OvertakeOutcome, VehicleSnapshot};

pub fn check_prerequisites(
    snapshot: &VehicleSnapshot,
    thresholds: &ResolvedThresholds,
    gate: &GateConfig,
    outcome: OvertakeOutcome,
) -> CheckResult {
    if let Some(class) = snapshot.road_class {
        if !class.is_limited_access() {
            return CheckResult::fail(format!(
                "road class {} is not a highway or expressway",
                class.0
            ));
        }
    }

    if let Some(distance) = snapshot.maneuver_distance_m {
        if distance > 0.0 && distance < thresholds.min_turn_distance_m {
            return CheckResult::fail(format!(
                "maneuver in {:.0} m (need {:.0} m)",
                distance, thresholds.min_turn_distance_m
            ));
        }
    }

    if outcome == OvertakeOutcome::Pending {
        return CheckResult::fail("lane change already in progress");
    }

    let Some(lead) = snapshot.lead else {
        return CheckResult::fail("no lead vehicle");
    };
    if !(lead.confidence >= gate.min_lead_confidence) {
        return CheckResult::fail(format!(
            "lead detection confidence {:.2} below {:.2}",
            lead.confidence, gate.min_lead_confidence
        ));
    }
    if lead.distance_m >= thresholds.max_lead_distance_m {
        return CheckResult::fail(format!(
            "lead vehicle too far ({:.0} m, max {:.0} m)",
            lead.distance_m, thresholds.max_lead_distance_m
        ));
    }

    let ego_kph = snapshot.ego_speed_kph();
    if ego_kph < thresholds.min_overtake_speed_kph {
        return CheckResult::fail(format!(
            "speed {:.0} km/h below {:.0} km/h",
            ego_kph, thresholds.min_overtake_speed_kph
        ));
    }

    let lead_kph = lead.speed_kph();
    if lead_kph < gate.lead_speed_floor_kph {
        return CheckResult::fail(format!(
            "lead vehicle too slow ({:.0} km/h), possible congestion",
            lead_kph
        ));
    }

    // Written so a non-finite reading fails the gate.
    if !(snapshot.curvature.abs() < gate.max_curvature) {
        return CheckResult::fail(format!("road curvature {:.3} too high", snapshot.curvature));
    }

    if !(snapshot.steering_angle_deg.abs() < gate.max_steering_deg) {
        return CheckResult::fail(format!(
            "steering angle {:.1}° too large",
            snapshot.steering_angle_deg
        ));
    }

    CheckResult::Pass(())
}
