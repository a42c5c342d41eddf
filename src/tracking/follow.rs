// src/tracking/follow.rs
//
// How long we have been stuck behind a lead. Past the configured limit the
// need check passes even when neither speed heuristic does.

use crate::config::FollowConfig;
use crate::types::VehicleSnapshot;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct FollowTimer {
    since_ms: Option<f64>,
    limit_logged: bool,
}

impl FollowTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update with this tick's snapshot. Returns true once following has
    /// lasted at least `max_follow_ms`.
    pub fn observe(&mut self, snapshot: &VehicleSnapshot, config: &FollowConfig, now_ms: f64) -> bool {
        if !is_following(snapshot, config) {
            self.reset();
            return false;
        }

        let since = *self.since_ms.get_or_insert(now_ms);
        let reached = now_ms - since >= config.max_follow_ms;
        if reached && !self.limit_logged {
            self.limit_logged = true;
            info!(
                "⏰ Following for {:.1} min, overtake need forced",
                (now_ms - since) / 60000.0
            );
        }
        reached
    }

    pub fn reset(&mut self) {
        self.since_ms = None;
        self.limit_logged = false;
    }
}

/// Close behind the lead in time, or the lead is clearly slower.
pub fn is_following(snapshot: &VehicleSnapshot, config: &FollowConfig) -> bool {
    let Some(lead) = snapshot.lead else {
        return false;
    };
    if lead.distance_m <= 0.0 {
        return false;
    }

    let ego_kph = snapshot.ego_speed_kph();
    if ego_kph - lead.speed_kph() > config.slower_lead_kph {
        return true;
    }
    snapshot.ego_speed_mps > 0.0 && lead.distance_m / snapshot.ego_speed_mps <= config.max_time_gap_s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{mps_to_kph, LeadVehicle};

    fn kph(value: f64) -> f64 {
        value / mps_to_kph(1.0)
    }

    fn behind(lead_kph: f64, distance_m: f64) -> VehicleSnapshot {
        VehicleSnapshot {
            ego_speed_mps: kph(100.0),
            lead: Some(LeadVehicle {
                distance_m,
                lateral_offset_m: 0.0,
                speed_mps: kph(lead_kph),
                confidence: 0.9,
            }),
            ..VehicleSnapshot::default()
        }
    }

    #[test]
    fn test_following_by_time_gap_or_speed() {
        let config = FollowConfig::default();
        // 30 m at 100 km/h is about 1.1 s
        assert!(is_following(&behind(98.0, 30.0), &config));
        assert!(!is_following(&behind(98.0, 80.0), &config));
        assert!(is_following(&behind(80.0, 80.0), &config));
        assert!(!is_following(&VehicleSnapshot::default(), &config));
    }

    #[test]
    fn test_limit_reached_after_continuous_following() {
        let config = FollowConfig {
            max_follow_ms: 5_000.0,
            ..FollowConfig::default()
        };
        let close = behind(98.0, 30.0);
        let mut timer = FollowTimer::new();

        assert!(!timer.observe(&close, &config, 1_000.0));
        assert!(!timer.observe(&close, &config, 5_900.0));
        assert!(timer.observe(&close, &config, 6_000.0));
        assert_eq!(timer.since_ms, Some(1_000.0));
    }

    #[test]
    fn test_gap_opening_restarts_timer() {
        let config = FollowConfig {
            max_follow_ms: 5_000.0,
            ..FollowConfig::default()
        };
        let mut timer = FollowTimer::new();
        timer.observe(&behind(98.0, 30.0), &config, 0.0);
        timer.observe(&behind(98.0, 80.0), &config, 3_000.0);
        assert_eq!(timer.since_ms, None);

        assert!(!timer.observe(&behind(98.0, 30.0), &config, 4_000.0));
        assert!(!timer.observe(&behind(98.0, 30.0), &config, 8_000.0));
        assert!(timer.observe(&behind(98.0, 30.0), &config, 9_000.0));
    }
}
