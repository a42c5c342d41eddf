// src/settings.rs
//
// User-facing settings collaborator plus a bounded-staleness cache so the
// engine does not hit the store on every tick.

use crate::adaptive::{ResolvedThresholds, ThresholdTable};
use crate::types::{DrivingStyle, OvertakeMode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Hard ceiling on how long a settings read may be reused.
pub const MAX_SETTINGS_AGE_MS: f64 = 1000.0;

/// Key-value settings store owned by another component.
pub trait SettingsStore {
    fn overtake_mode(&self) -> OvertakeMode;
    fn driving_style(&self) -> DrivingStyle;
    /// User override for a numeric tunable, or `None` to use the built-in base.
    fn tunable(&self, name: &str) -> Option<f64>;
    fn should_return_to_lane(&self) -> bool {
        true
    }
}

/// Plain in-memory settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticSettings {
    pub mode: OvertakeMode,
    pub style: DrivingStyle,
    pub should_return_to_lane: bool,
    pub tunables: HashMap<String, f64>,
}

impl Default for StaticSettings {
    fn default() -> Self {
        Self {
            mode: OvertakeMode::Disabled,
            style: DrivingStyle::Standard,
            should_return_to_lane: true,
            tunables: HashMap::new(),
        }
    }
}

impl StaticSettings {
    pub fn new(mode: OvertakeMode, style: DrivingStyle) -> Self {
        Self {
            mode,
            style,
            ..Self::default()
        }
    }

    pub fn with_tunable(mut self, name: &str, value: f64) -> Self {
        self.tunables.insert(name.to_string(), value);
        self
    }

    pub fn shared(self) -> SharedSettings {
        Arc::new(Mutex::new(self))
    }
}

impl SettingsStore for StaticSettings {
    fn overtake_mode(&self) -> OvertakeMode {
        self.mode
    }

    fn driving_style(&self) -> DrivingStyle {
        self.style
    }

    fn tunable(&self, name: &str) -> Option<f64> {
        self.tunables.get(name).copied()
    }

    fn should_return_to_lane(&self) -> bool {
        self.should_return_to_lane
    }
}

/// Settings that another owner can change while the engine runs.
pub type SharedSettings = Arc<Mutex<StaticSettings>>;

impl SettingsStore for SharedSettings {
    fn overtake_mode(&self) -> OvertakeMode {
        self.lock().map(|s| s.mode).unwrap_or_default()
    }

    fn driving_style(&self) -> DrivingStyle {
        self.lock().map(|s| s.style).unwrap_or_default()
    }

    fn tunable(&self, name: &str) -> Option<f64> {
        self.lock().ok().and_then(|s| s.tunables.get(name).copied())
    }

    fn should_return_to_lane(&self) -> bool {
        self.lock().map(|s| s.should_return_to_lane).unwrap_or(true)
    }
}

/// One resolved read of the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettingsSnapshot {
    pub mode: OvertakeMode,
    pub style: DrivingStyle,
    pub should_return_to_lane: bool,
    pub thresholds: ResolvedThresholds,
    pub read_at_ms: f64,
}

pub struct CachedSettings {
    store: Box<dyn SettingsStore>,
    table: ThresholdTable,
    max_age_ms: f64,
    cached: Option<SettingsSnapshot>,
}

impl CachedSettings {
    pub fn new(store: Box<dyn SettingsStore>, table: ThresholdTable, max_age_ms: f64) -> Self {
        Self {
            store,
            table,
            max_age_ms: max_age_ms.clamp(0.0, MAX_SETTINGS_AGE_MS),
            cached: None,
        }
    }

    pub fn current(&mut self, now_ms: f64) -> SettingsSnapshot {
        if let Some(cached) = self.cached {
            let age = now_ms - cached.read_at_ms;
            if (0.0..self.max_age_ms).contains(&age) {
                return cached;
            }
        }

        let snapshot = self.read(now_ms);
        if let Some(previous) = self.cached {
            if previous.mode != snapshot.mode || previous.style != snapshot.style {
                info!(
                    "⚙️ Settings changed: mode {:?} → {:?}, style {:?} → {:?}",
                    previous.mode, snapshot.mode, previous.style, snapshot.style
                );
            }
        }
        self.cached = Some(snapshot);
        snapshot
    }

    fn read(&self, now_ms: f64) -> SettingsSnapshot {
        let style = self.store.driving_style();
        let thresholds = self.table.resolve(style, |name| self.store.tunable(name));
        debug!(
            "Settings read: style={:?} speed_diff={:.1}km/h cooldown={:.0}ms",
            style, thresholds.speed_diff_threshold_kph, thresholds.action_cooldown_ms
        );

        SettingsSnapshot {
            mode: self.store.overtake_mode(),
            style,
            should_return_to_lane: self.store.should_return_to_lane(),
            thresholds,
            read_at_ms: now_ms,
        }
    }
}
