// src/tracking/mod.rs

pub mod cooldown;
pub mod debounce;
pub mod follow;
pub mod in_progress;
pub mod lane_memory;
pub mod pending;

pub use cooldown::{Cooldown, FailureStreak};
pub use debounce::Debouncer;
pub use follow::FollowTimer;
pub use in_progress::{InProgressLaneChange, LaneChangeProgress, LaneChangePurpose};
pub use lane_memory::{return_threshold_kph, LaneMemory, ReturnAssessment};
pub use pending::{PendingLaneChange, PendingResolution};
