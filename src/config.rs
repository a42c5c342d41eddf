// src/config.rs
//
// Fixed engine constants. Everything here is read once at construction;
// user-facing knobs (mode, style, tunable overrides) come from the
// settings store instead.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub timing: TimingConfig,
    pub cooldown: CooldownConfig,
    pub following: FollowConfig,
    pub lane: LaneGeometryConfig,
    pub gate: GateConfig,
    pub early_overtake: EarlyOvertakeConfig,
    pub returning: ReturnConfig,
    pub exit_reminder: ExitReminderConfig,
    pub tunables: BaseTunables,
    pub logging: LoggingConfig,
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: EngineConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub debounce_ticks: u32,
    pub pending_delay_ms: f64,
    pub manual_cue_cooldown_ms: f64,
    pub in_progress_timeout_ms: f64,
    /// Upper bound on settings staleness. Values above 1000 are clamped.
    pub settings_cache_ms: f64,
    pub event_bus_capacity: usize,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            debounce_ticks: 3,
            pending_delay_ms: 2500.0,
            manual_cue_cooldown_ms: 2500.0,
            in_progress_timeout_ms: 12000.0,
            settings_cache_ms: 1000.0,
            event_bus_capacity: 64,
        }
    }
}

/// Extra spacing added on top of the adaptive action cooldown after a run
/// of failed or cancelled lane changes. Never shortens it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CooldownConfig {
    /// Penalty starts once the streak is longer than this.
    pub failure_streak_threshold: u32,
    pub penalty_per_failure_ms: f64,
    pub max_penalty_ms: f64,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            failure_streak_threshold: 3,
            penalty_per_failure_ms: 2000.0,
            max_penalty_ms: 10000.0,
        }
    }
}

/// Following a lead for too long forces the need check to pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowConfig {
    pub max_follow_ms: f64,
    /// Time gap to the lead (s) at or below which we count as following.
    pub max_time_gap_s: f64,
    /// A lead slower than us by more than this also counts.
    pub slower_lead_kph: f64,
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self {
            max_follow_ms: 600000.0,
            max_time_gap_s: 2.0,
            slower_lead_kph: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneGeometryConfig {
    pub reference_lane_width_m: f64,
    /// Edge distances at or below this are treated as "no lane on that side".
    pub edge_presence_min_m: f64,
    pub min_side_room_m: f64,
    pub min_line_confidence: f64,
}

impl Default for LaneGeometryConfig {
    fn default() -> Self {
        Self {
            reference_lane_width_m: 3.2,
            edge_presence_min_m: 0.5,
            min_side_room_m: 3.0,
            min_line_confidence: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub min_lead_confidence: f64,
    /// Below this the lead is assumed to be stuck in congestion.
    pub lead_speed_floor_kph: f64,
    pub max_curvature: f64,
    pub max_steering_deg: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_lead_confidence: 0.5,
            lead_speed_floor_kph: 50.0,
            max_curvature: 0.02,
            max_steering_deg: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarlyOvertakeConfig {
    pub min_lead_speed_kph: f64,
    pub min_speed_gap_kph: f64,
    pub min_distance_m: f64,
    pub max_distance_m: f64,
}

impl Default for EarlyOvertakeConfig {
    fn default() -> Self {
        Self {
            min_lead_speed_kph: 50.0,
            min_speed_gap_kph: 20.0,
            min_distance_m: 30.0,
            max_distance_m: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReturnConfig {
    pub memory_timeout_ms: f64,
    pub clear_distance_m: f64,
    pub clear_window_ms: f64,
    /// Expected speed gain of an empty origin lane over ego speed.
    pub empty_lane_boost_kph: f64,
    pub taper_start_ms: f64,
    pub taper_end_ms: f64,
    /// Fraction of the efficiency threshold left at the end of the linear taper.
    pub taper_end_ratio: f64,
    /// Fraction left once the vehicle has stayed past `taper_end_ms`.
    pub relaxed_ratio: f64,
    pub safe_speed_margin_kph: f64,
    pub min_safe_distance_m: f64,
    pub safe_distance_per_kph: f64,
    pub max_attempts: u32,
    pub stability_speed_kph: f64,
}

impl Default for ReturnConfig {
    fn default() -> Self {
        Self {
            memory_timeout_ms: 30000.0,
            clear_distance_m: 50.0,
            clear_window_ms: 2000.0,
            empty_lane_boost_kph: 10.0,
            taper_start_ms: 15000.0,
            taper_end_ms: 30000.0,
            taper_end_ratio: 0.5,
            relaxed_ratio: 0.25,
            safe_speed_margin_kph: 5.0,
            min_safe_distance_m: 30.0,
            safe_distance_per_kph: 0.4,
            max_attempts: 3,
            stability_speed_kph: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExitReminderConfig {
    pub trigger_distance_m: f64,
    pub cooldown_ms: f64,
    /// Case-insensitive substrings of the maneuver text that mark an exit.
    pub exit_tokens: Vec<String>,
}

impl Default for ExitReminderConfig {
    fn default() -> Self {
        Self {
            trigger_distance_m: 1500.0,
            cooldown_ms: 15000.0,
            exit_tokens: vec!["exit".to_string(), "ramp".to_string()],
        }
    }
}

/// Style-independent base values for the adaptive parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseTunables {
    pub speed_diff_threshold_kph: f64,
    pub min_overtake_speed_kph: f64,
    pub max_lead_distance_m: f64,
    pub min_turn_distance_m: f64,
    pub action_cooldown_ms: f64,
    pub early_speed_ratio: f64,
    pub return_speed_advantage_kph: f64,
}

impl Default for BaseTunables {
    fn default() -> Self {
        Self {
            speed_diff_threshold_kph: 15.0,
            min_overtake_speed_kph: 75.0,
            max_lead_distance_m: 100.0,
            min_turn_distance_m: 1000.0,
            action_cooldown_ms: 20000.0,
            early_speed_ratio: 0.6,
            return_speed_advantage_kph: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "overtake_assist=info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "timing:\n  debounce_ticks: 5\nreturning:\n  max_attempts: 1\n";
        let config: EngineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.timing.debounce_ticks, 5);
        assert_eq!(config.timing.pending_delay_ms, 2500.0);
        assert_eq!(config.returning.max_attempts, 1);
        assert_eq!(config.lane.reference_lane_width_m, 3.2);
        assert_eq!(config.cooldown.failure_streak_threshold, 3);
        assert_eq!(config.following.max_follow_ms, 600000.0);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = EngineConfig::load("/nonexistent/overtake.yaml").unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/overtake.yaml"));
    }
}
