// src/tracking/lane_memory.rs
//
// Return-to-origin tracking. After an overtake completes we remember where
// the original lane is and, every tick, decide whether going back is now
// worth it and safe.

use crate::adaptive::ResolvedThresholds;
use crate::analysis::LanePosition;
use crate::config::{GateConfig, ReturnConfig};
use crate::types::{Direction, VehicleSnapshot};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct LaneMemory {
    /// Lateral position of the origin lane centre relative to ours (left positive).
    pub origin_lateral_offset_m: f64,
    /// Positive after moving left, negative after moving right.
    pub net_lane_changes: i32,
    pub started_at_ms: f64,
    /// Start of the current run of ticks with the return lane clear.
    pub clear_since_ms: Option<f64>,
    pub return_attempts: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReturnAssessment {
    Expired,
    Waiting { reason: String },
    Ready { direction: Direction },
}

impl LaneMemory {
    pub fn after_overtake(direction: Direction, now_ms: f64, lane_width_m: f64) -> Self {
        let mut memory = Self {
            origin_lateral_offset_m: 0.0,
            net_lane_changes: 0,
            started_at_ms: now_ms,
            clear_since_ms: None,
            return_attempts: 0,
        };
        memory.apply_change(direction, lane_width_m);
        memory
    }

    /// Account for one completed lane change. Returns false once we are back
    /// in the origin lane and the memory should be dropped.
    pub fn apply_change(&mut self, direction: Direction, lane_width_m: f64) -> bool {
        self.net_lane_changes += direction.signum();
        self.origin_lateral_offset_m = -(self.net_lane_changes as f64) * lane_width_m;
        self.clear_since_ms = None;
        self.net_lane_changes != 0
    }

    pub fn return_direction(&self) -> Direction {
        if self.net_lane_changes > 0 {
            Direction::Right
        } else {
            Direction::Left
        }
    }

    pub fn age_ms(&self, now_ms: f64) -> f64 {
        (now_ms - self.started_at_ms).max(0.0)
    }

    pub fn is_expired(&self, now_ms: f64, config: &ReturnConfig) -> bool {
        self.age_ms(now_ms) > config.memory_timeout_ms
    }

    pub fn assess(
        &mut self,
        snapshot: &VehicleSnapshot,
        lanes: LanePosition,
        thresholds: &ResolvedThresholds,
        gate: &GateConfig,
        config: &ReturnConfig,
        lane_width_m: f64,
        now_ms: f64,
    ) -> ReturnAssessment {
        if self.is_expired(now_ms, config) {
            return ReturnAssessment::Expired;
        }

        let direction = self.return_direction();
        let target = snapshot.neighbor(direction);
        let target_clear =
            !target.present || target.relative_distance_m.abs() > config.clear_distance_m;
        self.clear_since_ms = if target_clear {
            Some(self.clear_since_ms.unwrap_or(now_ms))
        } else {
            None
        };

        let waiting = |reason: String| ReturnAssessment::Waiting { reason };

        if lanes.is_known() {
            let available = match direction {
                Direction::Right => !lanes.is_rightmost(),
                Direction::Left => !lanes.is_leftmost(),
            };
            if !available {
                return waiting(format!("no lane to the {}", direction.as_str().to_lowercase()));
            }
        }

        let ego_kph = snapshot.ego_speed_kph();
        if ego_kph < thresholds.min_overtake_speed_kph {
            return waiting(format!("speed {:.0} km/h too low to return", ego_kph));
        }
        if ego_kph > config.stability_speed_kph
            && !(snapshot.steering_angle_deg.abs() < gate.max_steering_deg)
        {
            return waiting("steering not stable".to_string());
        }

        if !target_clear {
            return waiting(format!(
                "{} lane occupied ({:.0} m)",
                direction.as_str().to_lowercase(),
                target.relative_distance_m
            ));
        }
        let clear_for = now_ms - self.clear_since_ms.unwrap_or(now_ms);
        if clear_for < config.clear_window_ms {
            return waiting(format!(
                "confirming {} lane clear ({:.1}s)",
                direction.as_str().to_lowercase(),
                (config.clear_window_ms - clear_for) / 1000.0
            ));
        }

        if let Some(lead) = snapshot.lead {
            let in_origin_band = (lead.lateral_offset_m - self.origin_lateral_offset_m).abs()
                <= lane_width_m / 2.0;
            if in_origin_band && lead.distance_m < config.clear_distance_m {
                return waiting("overtaken vehicle not yet passed".to_string());
            }
        }

        let target_speed = if target.present {
            ego_kph + target.relative_speed_kph()
        } else {
            ego_kph + config.empty_lane_boost_kph
        };
        let current_speed = snapshot.lead.map(|l| l.speed_kph()).unwrap_or(ego_kph);
        let advantage = target_speed - current_speed;
        let required = return_threshold_kph(
            thresholds.return_speed_advantage_kph,
            self.age_ms(now_ms),
            config,
        );
        debug!(
            "Return efficiency: target {:.0} km/h, current {:.0} km/h, advantage {:.1} (need {:.1})",
            target_speed, current_speed, advantage, required
        );
        if advantage < required {
            return waiting(format!(
                "return not worthwhile yet ({:.0}/{:.0} km/h)",
                advantage, required
            ));
        }

        if snapshot.blindspot(direction) {
            return waiting(format!("{} blind spot occupied", direction.as_str().to_lowercase()));
        }
        if target.present && !is_gap_safe(target.relative_distance_m, target.relative_speed_kph(), ego_kph, config) {
            return waiting(format!(
                "{} lane vehicle too close",
                direction.as_str().to_lowercase()
            ));
        }

        ReturnAssessment::Ready { direction }
    }
}

/// Required speed advantage for returning, given how long we have been in
/// the overtaking lane. Never increases with age.
pub fn return_threshold_kph(base_kph: f64, age_ms: f64, config: &ReturnConfig) -> f64 {
    let floor = base_kph * config.relaxed_ratio.min(config.taper_end_ratio);
    if age_ms >= config.taper_end_ms {
        return floor;
    }
    if age_ms <= config.taper_start_ms || config.taper_end_ms <= config.taper_start_ms {
        return base_kph;
    }

    let progress = (age_ms - config.taper_start_ms) / (config.taper_end_ms - config.taper_start_ms);
    base_kph * (1.0 - progress * (1.0 - config.taper_end_ratio))
}

/// A vehicle in the return lane is acceptable when it is far enough away
/// or the gap to it is opening.
fn is_gap_safe(distance_m: f64, relative_speed_kph: f64, ego_kph: f64, config: &ReturnConfig) -> bool {
    let safe_distance = config
        .min_safe_distance_m
        .max(config.safe_distance_per_kph * ego_kph);
    if distance_m.abs() > safe_distance {
        return true;
    }
    if distance_m < 0.0 {
        relative_speed_kph < -config.safe_speed_margin_kph
    } else {
        relative_speed_kph > config.safe_speed_margin_kph
    }
}
