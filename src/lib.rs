// src/lib.rs

pub mod adaptive;
pub mod analysis;
pub mod collaborators;
pub mod config;
pub mod engine;
pub mod pipeline;
pub mod settings;
pub mod tracking;
pub mod types;

pub use collaborators::{CuePlayer, LaneChangeDispatcher, LoggingCuePlayer, LoggingDispatcher};
pub use config::EngineConfig;
pub use engine::{EngineState, OvertakeEngine};
pub use pipeline::{EngineEvent, EngineMetrics, MetricsSummary};
pub use settings::{SettingsStore, SharedSettings, StaticSettings};
pub use types::{
    CheckResult, CueKind, DecisionPhase, DecisionStatus, Direction, DrivingStyle, LeadVehicle,
    NeighborLane, OvertakeMode, OvertakeOutcome, RoadClass, VehicleSnapshot,
};
