// src/collaborators.rs
//
// Fire-and-forget side effects the engine triggers. Failures are reported
// back as errors; the engine logs them and never retries.

use crate::types::{CueKind, Direction};
use anyhow::Result;
use tracing::info;

pub trait CuePlayer {
    fn play(&mut self, cue: CueKind) -> Result<()>;
}

pub trait LaneChangeDispatcher {
    fn dispatch(&mut self, direction: Direction) -> Result<()>;
}

/// Writes cues to the log instead of a speaker.
#[derive(Debug, Default)]
pub struct LoggingCuePlayer;

impl CuePlayer for LoggingCuePlayer {
    fn play(&mut self, cue: CueKind) -> Result<()> {
        info!("🔔 Cue: {:?}", cue);
        Ok(())
    }
}

/// Writes lane-change commands to the log instead of the actuation layer.
#[derive(Debug, Default)]
pub struct LoggingDispatcher;

impl LaneChangeDispatcher for LoggingDispatcher {
    fn dispatch(&mut self, direction: Direction) -> Result<()> {
        info!("🛞 Lane change command: {}", direction.as_str());
        Ok(())
    }
}
