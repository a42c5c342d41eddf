// src/adaptive/style_profiles.rs

use crate::types::DrivingStyle;

/// Per-style multipliers applied to the base tunables.
///
/// A multiplier above 1.0 makes that threshold stricter for every parameter
/// except `max_lead_distance` and `early_speed_ratio`, where a larger value
/// reaches further and therefore reads as more eager.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleProfile {
    pub name: &'static str,

    // Overtake trigger
    pub speed_diff: f64,
    pub min_overtake_speed: f64,
    pub max_lead_distance: f64,
    pub early_speed_ratio: f64,

    // Navigation and pacing
    pub min_turn_distance: f64,
    pub action_cooldown: f64,

    // Return to origin lane
    pub return_speed_advantage: f64,
}

impl StyleProfile {
    /// Waits for a clearly slower lead, keeps a long gap between actions
    pub fn conservative() -> Self {
        Self {
            name: "Conservative",
            speed_diff: 1.5,
            min_overtake_speed: 1.1,
            max_lead_distance: 0.8,
            early_speed_ratio: 0.9,
            min_turn_distance: 1.5,
            action_cooldown: 1.5,
            return_speed_advantage: 1.25,
        }
    }

    pub fn standard() -> Self {
        Self {
            name: "Standard",
            speed_diff: 1.0,
            min_overtake_speed: 1.0,
            max_lead_distance: 1.0,
            early_speed_ratio: 1.0,
            min_turn_distance: 1.0,
            action_cooldown: 1.0,
            return_speed_advantage: 1.0,
        }
    }

    /// Reacts to smaller deficits and re-arms quickly
    pub fn aggressive() -> Self {
        Self {
            name: "Aggressive",
            speed_diff: 0.7,
            min_overtake_speed: 0.9,
            max_lead_distance: 1.2,
            early_speed_ratio: 1.15,
            min_turn_distance: 0.7,
            action_cooldown: 0.5,
            return_speed_advantage: 0.75,
        }
    }

    pub fn for_style(style: DrivingStyle) -> Self {
        match style {
            DrivingStyle::Conservative => Self::conservative(),
            DrivingStyle::Standard => Self::standard(),
            DrivingStyle::Aggressive => Self::aggressive(),
        }
    }
}
