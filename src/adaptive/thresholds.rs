// src/adaptive/thresholds.rs

use super::style_profiles::StyleProfile;
use crate::config::BaseTunables;
use crate::types::DrivingStyle;
use serde::Serialize;

/// One style-scaled numeric threshold.
///
/// The base value (built-in nominal, or a user override) is clamped to
/// `[base_min, base_max]`, multiplied by the style factor, then clamped to
/// `[min_value, max_value]`. Pure: same inputs, same output.
#[derive(Clone, Debug, PartialEq)]
pub struct AdaptiveParameter {
    pub name: &'static str,

    pub nominal_value: f64,
    pub base_min: f64,
    pub base_max: f64,

    // Bounds on the resolved value
    pub min_value: f64,
    pub max_value: f64,
}

impl AdaptiveParameter {
    pub fn new(name: &'static str, nominal: f64, base: (f64, f64), resolved: (f64, f64)) -> Self {
        Self {
            name,
            nominal_value: nominal,
            base_min: base.0,
            base_max: base.1,
            min_value: resolved.0,
            max_value: resolved.1,
        }
    }

    pub fn base(&self, user_override: Option<f64>) -> f64 {
        user_override
            .filter(|v| v.is_finite())
            .unwrap_or(self.nominal_value)
            .clamp(self.base_min, self.base_max)
    }

    pub fn resolve(&self, user_override: Option<f64>, multiplier: f64) -> f64 {
        (self.base(user_override) * multiplier).clamp(self.min_value, self.max_value)
    }
}

/// Concrete thresholds in effect for one settings read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedThresholds {
    pub speed_diff_threshold_kph: f64,
    pub min_overtake_speed_kph: f64,
    pub max_lead_distance_m: f64,
    pub min_turn_distance_m: f64,
    pub action_cooldown_ms: f64,
    pub early_speed_ratio: f64,
    pub return_speed_advantage_kph: f64,
}

impl Default for ResolvedThresholds {
    fn default() -> Self {
        ThresholdTable::new(&BaseTunables::default()).resolve(DrivingStyle::Standard, |_| None)
    }
}

/// Every adaptive parameter, keyed by its tunable name.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdTable {
    pub speed_diff: AdaptiveParameter,
    pub min_overtake_speed: AdaptiveParameter,
    pub max_lead_distance: AdaptiveParameter,
    pub min_turn_distance: AdaptiveParameter,
    pub action_cooldown: AdaptiveParameter,
    pub early_speed_ratio: AdaptiveParameter,
    pub return_speed_advantage: AdaptiveParameter,
}

impl ThresholdTable {
    pub fn new(base: &BaseTunables) -> Self {
        Self {
            speed_diff: AdaptiveParameter::new(
                "speed_diff_threshold_kph",
                base.speed_diff_threshold_kph,
                (5.0, 30.0),
                (5.0, 30.0),
            ),
            min_overtake_speed: AdaptiveParameter::new(
                "min_overtake_speed_kph",
                base.min_overtake_speed_kph,
                (40.0, 120.0),
                (40.0, 130.0),
            ),
            max_lead_distance: AdaptiveParameter::new(
                "max_lead_distance_m",
                base.max_lead_distance_m,
                (30.0, 200.0),
                (25.0, 240.0),
            ),
            min_turn_distance: AdaptiveParameter::new(
                "min_turn_distance_m",
                base.min_turn_distance_m,
                (200.0, 3000.0),
                (150.0, 4500.0),
            ),
            // 0.5x..1.5x of the base range keeps the style ordering strict
            action_cooldown: AdaptiveParameter::new(
                "action_cooldown_ms",
                base.action_cooldown_ms,
                (5000.0, 60000.0),
                (2500.0, 90000.0),
            ),
            early_speed_ratio: AdaptiveParameter::new(
                "early_speed_ratio",
                base.early_speed_ratio,
                (0.3, 0.85),
                (0.25, 0.95),
            ),
            return_speed_advantage: AdaptiveParameter::new(
                "return_speed_advantage_kph",
                base.return_speed_advantage_kph,
                (2.0, 20.0),
                (1.0, 25.0),
            ),
        }
    }

    /// Resolve every parameter for `style`. `overrides` looks up a user
    /// value by tunable name.
    pub fn resolve<F>(&self, style: DrivingStyle, overrides: F) -> ResolvedThresholds
    where
        F: Fn(&str) -> Option<f64>,
    {
        let profile = StyleProfile::for_style(style);
        let get = |param: &AdaptiveParameter, multiplier: f64| {
            param.resolve(overrides(param.name), multiplier)
        };

        ResolvedThresholds {
            speed_diff_threshold_kph: get(&self.speed_diff, profile.speed_diff),
            min_overtake_speed_kph: get(&self.min_overtake_speed, profile.min_overtake_speed),
            max_lead_distance_m: get(&self.max_lead_distance, profile.max_lead_distance),
            min_turn_distance_m: get(&self.min_turn_distance, profile.min_turn_distance),
            action_cooldown_ms: get(&self.action_cooldown, profile.action_cooldown),
            early_speed_ratio: get(&self.early_speed_ratio, profile.early_speed_ratio),
            return_speed_advantage_kph: get(
                &self.return_speed_advantage,
                profile.return_speed_advantage,
            ),
        }
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::new(&BaseTunables::default())
    }
}
