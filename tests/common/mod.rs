// tests/common/mod.rs
//
// Recording collaborators and snapshot builders shared by the engine tests.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use overtake_assist::{
    CueKind, CuePlayer, DecisionStatus, Direction, DrivingStyle, EngineConfig,
    LaneChangeDispatcher, LeadVehicle, OvertakeEngine, OvertakeMode, RoadClass, SharedSettings,
    StaticSettings, VehicleSnapshot,
};
use std::sync::{Arc, Mutex};

pub const TICK_MS: f64 = 100.0;

#[derive(Clone, Default)]
pub struct RecordingCues(pub Arc<Mutex<Vec<CueKind>>>);

impl CuePlayer for RecordingCues {
    fn play(&mut self, cue: CueKind) -> Result<()> {
        self.0.lock().unwrap().push(cue);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingDispatcher(pub Arc<Mutex<Vec<Direction>>>);

impl LaneChangeDispatcher for RecordingDispatcher {
    fn dispatch(&mut self, direction: Direction) -> Result<()> {
        self.0.lock().unwrap().push(direction);
        Ok(())
    }
}

pub struct FailingDispatcher;

impl LaneChangeDispatcher for FailingDispatcher {
    fn dispatch(&mut self, _direction: Direction) -> Result<()> {
        Err(anyhow!("actuator bus offline"))
    }
}

pub struct Harness {
    pub engine: OvertakeEngine,
    pub settings: SharedSettings,
    pub cues: Arc<Mutex<Vec<CueKind>>>,
    pub commands: Arc<Mutex<Vec<Direction>>>,
}

impl Harness {
    pub fn new(mode: OvertakeMode) -> Self {
        Self::with_settings(StaticSettings::new(mode, DrivingStyle::Standard))
    }

    pub fn with_settings(settings: StaticSettings) -> Self {
        Self::build(settings, EngineConfig::default())
    }

    pub fn with_config(mode: OvertakeMode, config: EngineConfig) -> Self {
        Self::build(StaticSettings::new(mode, DrivingStyle::Standard), config)
    }

    fn build(settings: StaticSettings, config: EngineConfig) -> Self {
        let settings = settings.shared();
        let cues = RecordingCues::default();
        let commands = RecordingDispatcher::default();
        let engine = OvertakeEngine::new(
            config,
            Box::new(settings.clone()),
            Box::new(cues.clone()),
            Box::new(commands.clone()),
        );
        Self {
            engine,
            settings,
            cues: cues.0,
            commands: commands.0,
        }
    }

    pub fn with_failing_dispatcher(mode: OvertakeMode) -> Self {
        let settings = StaticSettings::new(mode, DrivingStyle::Standard).shared();
        let cues = RecordingCues::default();
        let engine = OvertakeEngine::new(
            EngineConfig::default(),
            Box::new(settings.clone()),
            Box::new(cues.clone()),
            Box::new(FailingDispatcher),
        );
        Self {
            engine,
            settings,
            cues: cues.0,
            commands: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn tick(&mut self, snapshot: &VehicleSnapshot, now_ms: f64) -> DecisionStatus {
        self.engine.tick(snapshot, now_ms)
    }

    /// Tick every 100 ms over `[from_ms, to_ms]`, returning each status.
    pub fn run(&mut self, snapshot: &VehicleSnapshot, from_ms: f64, to_ms: f64) -> Vec<DecisionStatus> {
        let mut statuses = Vec::new();
        let mut step = 0u32;
        loop {
            let now = from_ms + step as f64 * TICK_MS;
            if now > to_ms {
                break;
            }
            statuses.push(self.engine.tick(snapshot, now));
            step += 1;
        }
        statuses
    }

    pub fn cues(&self) -> Vec<CueKind> {
        self.cues.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<Direction> {
        self.commands.lock().unwrap().clone()
    }
}

pub fn kph(value: f64) -> f64 {
    value / 3.6
}

/// Middle lane of three, 100 km/h behind an 80 km/h lead 60 m ahead, both
/// neighbouring lanes open.
pub fn ready_snapshot() -> VehicleSnapshot {
    VehicleSnapshot {
        ego_speed_mps: kph(100.0),
        lead: Some(LeadVehicle {
            distance_m: 60.0,
            lateral_offset_m: 0.0,
            speed_mps: kph(80.0),
            confidence: 0.9,
        }),
        left_line_confidence: 0.9,
        right_line_confidence: 0.9,
        left_edge_distance_m: Some(4.8),
        right_edge_distance_m: Some(4.8),
        road_class: Some(RoadClass::HIGHWAY),
        ..VehicleSnapshot::default()
    }
}

/// Same road, ego now in lane `lane` of 3 with the lane ahead empty.
pub fn in_lane(lane: u32) -> VehicleSnapshot {
    let (left, right) = match lane {
        1 => (1.6, 8.0),
        2 => (4.8, 4.8),
        _ => (8.0, 1.6),
    };
    VehicleSnapshot {
        ego_speed_mps: kph(100.0),
        lead: None,
        left_line_confidence: 0.9,
        right_line_confidence: 0.9,
        left_edge_distance_m: Some(left),
        right_edge_distance_m: Some(right),
        road_class: Some(RoadClass::HIGHWAY),
        ..VehicleSnapshot::default()
    }
}
