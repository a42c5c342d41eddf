// src/adaptive/mod.rs

pub mod style_profiles;
pub mod thresholds;

pub use style_profiles::StyleProfile;
pub use thresholds::{AdaptiveParameter, ResolvedThresholds, ThresholdTable};
