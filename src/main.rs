// src/main.rs
//
// Scenario replay driver: feeds a recorded/hand-written snapshot sequence
// through the engine with logging collaborators.

use anyhow::{Context, Result};
use overtake_assist::engine::preview_thresholds;
use overtake_assist::{
    DecisionStatus, DrivingStyle, EngineConfig, LoggingCuePlayer, LoggingDispatcher,
    OvertakeEngine, OvertakeMode, StaticSettings, VehicleSnapshot,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "config.yaml";
const DEFAULT_SCENARIO: &str = "scenarios/highway_overtake.yaml";

#[derive(Debug, Deserialize)]
struct Scenario {
    #[serde(default)]
    name: String,
    #[serde(default)]
    settings: StaticSettings,
    #[serde(default = "default_tick_interval")]
    tick_interval_ms: f64,
    /// Sleep between ticks so collaborators see real pacing.
    #[serde(default)]
    realtime: bool,
    steps: Vec<ScenarioStep>,
}

#[derive(Debug, Deserialize)]
struct ScenarioStep {
    #[serde(default)]
    label: Option<String>,
    #[serde(default = "default_repeat")]
    repeat: u32,
    #[serde(default)]
    mode: Option<OvertakeMode>,
    #[serde(default)]
    style: Option<DrivingStyle>,
    #[serde(default)]
    tunables: HashMap<String, f64>,
    snapshot: VehicleSnapshot,
}

fn default_tick_interval() -> f64 {
    100.0
}

fn default_repeat() -> u32 {
    1
}

impl Scenario {
    fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse scenario {}", path.display()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::var("OVERTAKE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG.to_string());
    let config = if Path::new(&config_path).exists() {
        Some(EngineConfig::load(&config_path)?)
    } else {
        None
    };
    let loaded_from_file = config.is_some();
    let config = config.unwrap_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("🚗 Overtake assist replay starting");
    if loaded_from_file {
        info!("✓ Configuration loaded from {}", config_path);
    } else {
        warn!("{} not found, using built-in defaults", config_path);
    }

    let scenario_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SCENARIO.to_string());
    let scenario = Scenario::load(&scenario_path)?;
    info!(
        "✓ Scenario '{}' loaded: {} steps, {:.0}ms per tick",
        scenario.name,
        scenario.steps.len(),
        scenario.tick_interval_ms
    );

    let settings = scenario.settings.clone().shared();
    let thresholds = preview_thresholds(&config, &settings);
    info!(
        "Thresholds ({:?}): speed_diff={:.1}km/h min_speed={:.0}km/h max_lead={:.0}m cooldown={:.1}s",
        scenario.settings.style,
        thresholds.speed_diff_threshold_kph,
        thresholds.min_overtake_speed_kph,
        thresholds.max_lead_distance_m,
        thresholds.action_cooldown_ms / 1000.0
    );

    let mut engine = OvertakeEngine::new(
        config,
        Box::new(settings.clone()),
        Box::new(LoggingCuePlayer),
        Box::new(LoggingDispatcher),
    );

    let mut now_ms = 0.0;
    let mut last_status: Option<DecisionStatus> = None;

    for step in &scenario.steps {
        if let Some(label) = &step.label {
            info!("▶ {}", label);
        }
        if let Ok(mut current) = settings.lock() {
            if let Some(mode) = step.mode {
                current.mode = mode;
            }
            if let Some(style) = step.style {
                current.style = style;
            }
            current.tunables.extend(step.tunables.iter().map(|(k, v)| (k.clone(), *v)));
        }

        for _ in 0..step.repeat.max(1) {
            let status = engine.tick(&step.snapshot, now_ms);
            log_status_change(now_ms, &status, last_status.as_ref());
            last_status = Some(status);

            for event in engine.drain_events() {
                match serde_json::to_string(&event) {
                    Ok(json) => info!("📣 {}", json),
                    Err(e) => warn!("Failed to serialize event: {}", e),
                }
            }

            now_ms += scenario.tick_interval_ms;
            if scenario.realtime {
                tokio::time::sleep(Duration::from_millis(scenario.tick_interval_ms as u64)).await;
            }
        }
    }

    let summary = engine.metrics().summary();
    info!("📊 Replay finished after {:.1}s simulated", now_ms / 1000.0);
    info!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

fn log_status_change(now_ms: f64, status: &DecisionStatus, previous: Option<&DecisionStatus>) {
    let changed = previous
        .map(|p| p.phase != status.phase || p.status_text != status.status_text)
        .unwrap_or(true);

    if changed {
        info!(
            "[{:>7.1}s] {:?}: {} (lane {}/{}, outcome {:?})",
            now_ms / 1000.0,
            status.phase,
            status.status_text,
            status.current_lane,
            status.total_lanes,
            status.outcome
        );
        if let Some(reason) = &status.blocking_reason {
            debug!("  blocked by: {}", reason);
        }
        if let Some(text) = &status.return_status {
            info!("  {}", text);
        }
    }
    if let Some(reminder) = &status.lane_reminder {
        info!("  🚏 {}", reminder);
    }
    if let Some(error) = &status.delivery_error {
        warn!("  delivery error: {}", error);
    }
}
