// src/analysis/exit_reminder.rs

use super::lane_position::LanePosition;
use crate::config::ExitReminderConfig;
use crate::types::VehicleSnapshot;
use tracing::info;

/// Reminds the driver to move right ahead of a highway exit.
/// Runs regardless of overtake mode. The caller owns the last-fired
/// timestamp and records `now_ms` whenever a message comes back.
pub struct ExitReminder {
    config: ExitReminderConfig,
}

impl ExitReminder {
    pub fn new(config: ExitReminderConfig) -> Self {
        Self { config }
    }

    /// Returns the reminder text when it fires this tick.
    pub fn check(
        &self,
        snapshot: &VehicleSnapshot,
        lanes: LanePosition,
        last_fired_ms: Option<f64>,
        now_ms: f64,
    ) -> Option<String> {
        if !is_exit_approaching(snapshot, &self.config) {
            return None;
        }
        if lanes.total_lanes <= 1 || lanes.current_lane >= lanes.total_lanes {
            return None;
        }
        if let Some(last) = last_fired_ms {
            if now_ms - last < self.config.cooldown_ms {
                return None;
            }
        }

        let message = match snapshot.maneuver_distance_m.filter(|d| *d > 0.0) {
            Some(distance) => format!(
                "Exit in {:.0} m: move right (lane {} of {})",
                distance, lanes.current_lane, lanes.total_lanes
            ),
            None => format!(
                "Exit ahead: move right (lane {} of {})",
                lanes.current_lane, lanes.total_lanes
            ),
        };
        info!("🚏 {}", message);
        Some(message)
    }

}

pub fn is_exit_approaching(snapshot: &VehicleSnapshot, config: &ExitReminderConfig) -> bool {
    let on_limited_access = snapshot
        .road_class
        .map(|class| class.is_limited_access())
        .unwrap_or(false);
    if !on_limited_access {
        return false;
    }
    if snapshot.exiting {
        return true;
    }

    let near = snapshot
        .maneuver_distance_m
        .map(|d| d > 0.0 && d < config.trigger_distance_m)
        .unwrap_or(false);
    near && snapshot
        .maneuver_text
        .as_deref()
        .map(|text| mentions_exit(text, &config.exit_tokens))
        .unwrap_or(false)
}

fn mentions_exit(text: &str, tokens: &[String]) -> bool {
    let text = text.to_lowercase();
    tokens
        .iter()
        .any(|token| !token.is_empty() && text.contains(&token.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RoadClass;

    fn highway_exit(distance: f64, text: &str) -> VehicleSnapshot {
        VehicleSnapshot {
            road_class: Some(RoadClass::HIGHWAY),
            maneuver_distance_m: Some(distance),
            maneuver_text: Some(text.to_string()),
            ..VehicleSnapshot::default()
        }
    }

    fn middle_lane() -> LanePosition {
        LanePosition {
            current_lane: 2,
            total_lanes: 3,
        }
    }

    #[test]
    fn test_fires_near_exit_when_not_rightmost() {
        let reminder = ExitReminder::new(ExitReminderConfig::default());
        let message = reminder.check(&highway_exit(900.0, "Take Exit 12B"), middle_lane(), None, 0.0);
        assert!(message.unwrap().contains("lane 2 of 3"));
    }

    #[test]
    fn test_respects_cooldown() {
        let reminder = ExitReminder::new(ExitReminderConfig::default());
        let snapshot = highway_exit(900.0, "exit ramp");
        assert!(reminder.check(&snapshot, middle_lane(), None, 0.0).is_some());
        assert!(reminder.check(&snapshot, middle_lane(), Some(0.0), 14_999.0).is_none());
        assert!(reminder.check(&snapshot, middle_lane(), Some(0.0), 15_000.0).is_some());
    }

    #[test]
    fn test_silent_in_rightmost_lane() {
        let reminder = ExitReminder::new(ExitReminderConfig::default());
        let rightmost = LanePosition {
            current_lane: 3,
            total_lanes: 3,
        };
        assert!(reminder.check(&highway_exit(900.0, "exit"), rightmost, None, 0.0).is_none());
    }

    #[test]
    fn test_requires_limited_access_road() {
        let mut snapshot = highway_exit(900.0, "exit");
        snapshot.road_class = Some(RoadClass(5));
        assert!(!is_exit_approaching(&snapshot, &ExitReminderConfig::default()));
        snapshot.road_class = None;
        assert!(!is_exit_approaching(&snapshot, &ExitReminderConfig::default()));
    }

    #[test]
    fn test_far_or_unrelated_maneuver_ignored() {
        let config = ExitReminderConfig::default();
        assert!(!is_exit_approaching(&highway_exit(2500.0, "exit"), &config));
        assert!(!is_exit_approaching(&highway_exit(800.0, "keep left"), &config));
    }

    #[test]
    fn test_explicit_exiting_flag_overrides_text() {
        let snapshot = VehicleSnapshot {
            road_class: Some(RoadClass::EXPRESSWAY),
            exiting: true,
            ..VehicleSnapshot::default()
        };
        assert!(is_exit_approaching(&snapshot, &ExitReminderConfig::default()));
    }
}
