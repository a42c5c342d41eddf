// src/analysis/need.rs

use crate::adaptive::ResolvedThresholds;
use crate::config::EarlyOvertakeConfig;
use crate::types::{CheckResult, VehicleSnapshot};
use serde::Serialize;

/// Which heuristic decided an overtake is worth it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedTrigger {
    /// Lead is much slower relative to us and sits in the sweet-spot range.
    EarlyRange,
    /// Plain speed gap above the style threshold.
    SpeedDifferential,
    /// Stuck behind the lead for longer than the follow limit.
    FollowTime,
}

/// Early range first, then the speed gap, then the follow limit.
pub fn evaluate_need(
    snapshot: &VehicleSnapshot,
    thresholds: &ResolvedThresholds,
    early: &EarlyOvertakeConfig,
    follow_limit_reached: bool,
) -> CheckResult<NeedTrigger> {
    let Some(lead) = snapshot.lead else {
        return CheckResult::fail("no lead vehicle");
    };

    let ego_kph = snapshot.ego_speed_kph();
    let lead_kph = lead.speed_kph();
    let gap_kph = ego_kph - lead_kph;

    if ego_kph > 0.0
        && lead_kph >= early.min_lead_speed_kph
        && lead_kph / ego_kph <= thresholds.early_speed_ratio
        && gap_kph >= early.min_speed_gap_kph
        && lead.distance_m >= early.min_distance_m
        && lead.distance_m <= early.max_distance_m
    {
        return CheckResult::Pass(NeedTrigger::EarlyRange);
    }

    if gap_kph >= thresholds.speed_diff_threshold_kph {
        return CheckResult::Pass(NeedTrigger::SpeedDifferential);
    }

    if follow_limit_reached {
        return CheckResult::Pass(NeedTrigger::FollowTime);
    }

    CheckResult::fail(format!(
        "speed differential insufficient ({:.0} km/h, need {:.0} km/h)",
        gap_kph, thresholds.speed_diff_threshold_kph
    ))
}
