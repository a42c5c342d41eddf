// src/engine.rs
//
// Per-tick orchestration. One caller drives `tick`; all state lives in
// `EngineState` and only changes inside a tick.

use crate::adaptive::{ResolvedThresholds, ThresholdTable};
use crate::analysis::{
    estimate_lane_position, Evaluation, EvaluationContext, ExitReminder, LanePosition,
};
use crate::collaborators::{CuePlayer, LaneChangeDispatcher};
use crate::config::EngineConfig;
use crate::pipeline::{EngineEvent, EngineMetrics, EventBus};
use crate::settings::{CachedSettings, SettingsSnapshot, SettingsStore};
use crate::tracking::{
    Cooldown, Debouncer, FailureStreak, FollowTimer, InProgressLaneChange, LaneChangeProgress,
    LaneChangePurpose, LaneMemory, PendingLaneChange, PendingResolution, ReturnAssessment,
};
use crate::types::{
    CueKind, DecisionPhase, DecisionStatus, Direction, OvertakeMode, OvertakeOutcome,
    VehicleSnapshot,
};
use tracing::{debug, info, warn};

// ============================================================================
// STATE
// ============================================================================

/// Everything the engine remembers between ticks.
///
/// `pending` and `in_progress` are never both set, and `outcome` is
/// `Pending` exactly while `in_progress` is set.
#[derive(Debug, Clone)]
pub struct EngineState {
    pub debounce: Debouncer,
    pub last_direction: Option<Direction>,
    pub outcome: OvertakeOutcome,
    pub pending: Option<PendingLaneChange>,
    pub in_progress: Option<InProgressLaneChange>,
    pub lane_memory: Option<LaneMemory>,
    pub action_cooldown: Cooldown,
    /// Lengthens the action cooldown after repeated failures.
    pub failure_streak: FailureStreak,
    pub manual_cue_cooldown: Cooldown,
    pub follow_timer: FollowTimer,
    pub exit_reminder_fired_ms: Option<f64>,
}

impl EngineState {
    fn new(debounce_ticks: u32) -> Self {
        Self {
            debounce: Debouncer::new(debounce_ticks),
            last_direction: None,
            outcome: OvertakeOutcome::None,
            pending: None,
            in_progress: None,
            lane_memory: None,
            action_cooldown: Cooldown::new(),
            failure_streak: FailureStreak::default(),
            manual_cue_cooldown: Cooldown::new(),
            follow_timer: FollowTimer::new(),
            exit_reminder_fired_ms: None,
        }
    }
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct OvertakeEngine {
    config: EngineConfig,
    settings: CachedSettings,
    cues: Box<dyn CuePlayer>,
    dispatcher: Box<dyn LaneChangeDispatcher>,
    exit_reminder: ExitReminder,
    state: EngineState,
    events: EventBus,
    metrics: EngineMetrics,
    delivery_error: Option<String>,
}

impl OvertakeEngine {
    pub fn new(
        config: EngineConfig,
        store: Box<dyn SettingsStore>,
        cues: Box<dyn CuePlayer>,
        dispatcher: Box<dyn LaneChangeDispatcher>,
    ) -> Self {
        let table = ThresholdTable::new(&config.tunables);
        let settings = CachedSettings::new(store, table, config.timing.settings_cache_ms);

        info!(
            "✅ Overtake engine ready: debounce={} ticks, pending delay={:.1}s, in-progress timeout={:.1}s",
            config.timing.debounce_ticks,
            config.timing.pending_delay_ms / 1000.0,
            config.timing.in_progress_timeout_ms / 1000.0
        );

        Self {
            exit_reminder: ExitReminder::new(config.exit_reminder.clone()),
            state: EngineState::new(config.timing.debounce_ticks),
            events: EventBus::new(config.timing.event_bus_capacity),
            metrics: EngineMetrics::new(),
            delivery_error: None,
            config,
            settings,
            cues,
            dispatcher,
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain()
    }

    /// Process one perception update.
    pub fn tick(&mut self, snapshot: &VehicleSnapshot, now_ms: f64) -> DecisionStatus {
        self.metrics.inc(&self.metrics.ticks);
        self.delivery_error = None;

        let settings = self.settings.current(now_ms);
        let lanes = estimate_lane_position(
            snapshot.left_edge_distance_m,
            snapshot.right_edge_distance_m,
            &self.config.lane,
        );
        let lane_reminder = self.check_exit_reminder(snapshot, lanes, now_ms);

        let (mut status, return_status) = self.decide(snapshot, settings, lanes, now_ms);

        status.current_lane = lanes.current_lane;
        status.total_lanes = lanes.total_lanes;
        status.lane_reminder = lane_reminder;
        status.outcome = self.state.outcome;
        if status.last_direction.is_none() {
            status.last_direction = self.state.last_direction;
        }
        if status.cooldown_remaining_ms.is_none() && settings.mode != OvertakeMode::Disabled {
            status.cooldown_remaining_ms = self.cooldown_remaining_ms(&settings.thresholds, now_ms);
        }
        if status.return_status.is_none() {
            status.return_status = return_status;
        }
        status.delivery_error = self.delivery_error.take();

        debug!(
            "Tick {:.0}ms: {:?} \"{}\" lane {}/{}",
            now_ms, status.phase, status.status_text, status.current_lane, status.total_lanes
        );
        status
    }

    fn decide(
        &mut self,
        snapshot: &VehicleSnapshot,
        settings: SettingsSnapshot,
        lanes: LanePosition,
        now_ms: f64,
    ) -> (DecisionStatus, Option<String>) {
        if settings.mode == OvertakeMode::Disabled {
            self.disable(now_ms);
            return (
                DecisionStatus::new(DecisionPhase::Disabled, "Overtake assist disabled"),
                None,
            );
        }

        if !settings.should_return_to_lane && self.state.lane_memory.is_some() {
            self.clear_lane_memory("return to original lane disabled", now_ms);
        }

        let context = EvaluationContext {
            outcome: self.state.outcome,
            follow_limit_reached: self
                .state
                .follow_timer
                .observe(snapshot, &self.config.following, now_ms),
        };

        if let Some(status) = self.advance_pending(snapshot, settings, context, lanes, now_ms) {
            return (status, None);
        }

        if let Some(status) = self.advance_in_progress(settings, lanes, now_ms) {
            return (status, None);
        }

        let return_status = match self.advance_return(snapshot, settings, lanes, now_ms) {
            ReturnStep::Idle => None,
            ReturnStep::Status(text) => Some(text),
            ReturnStep::Dispatched(status) => return (status, None),
        };

        (self.evaluate_overtake(snapshot, settings, context, lanes, now_ms), return_status)
    }

    /// Adaptive action cooldown plus any failure-streak penalty.
    fn action_cooldown_ms(&self, thresholds: &ResolvedThresholds) -> f64 {
        thresholds.action_cooldown_ms + self.state.failure_streak.penalty_ms(&self.config.cooldown)
    }

    fn cooldown_remaining_ms(&self, thresholds: &ResolvedThresholds, now_ms: f64) -> Option<u64> {
        self.state
            .action_cooldown
            .remaining_ms(now_ms, self.action_cooldown_ms(thresholds))
    }

    // ========================================================================
    // DISABLE
    // ========================================================================

    fn disable(&mut self, now_ms: f64) {
        let had_activity = self.state.pending.is_some()
            || self.state.in_progress.is_some()
            || self.state.lane_memory.is_some();

        if let Some(pending) = self.state.pending.take() {
            self.events.publish(EngineEvent::PendingCancelled {
                timestamp_ms: now_ms,
                direction: pending.direction,
                reason: "overtake assist disabled".to_string(),
            });
        }
        self.state.in_progress = None;
        if self.state.lane_memory.take().is_some() {
            self.events.publish(EngineEvent::LaneMemoryCleared {
                timestamp_ms: now_ms,
                reason: "overtake assist disabled".to_string(),
            });
        }
        self.state.debounce.reset();
        self.state.follow_timer.reset();
        self.state.outcome = OvertakeOutcome::None;

        if had_activity {
            info!("⏹️  Overtake assist disabled, tracking state reset");
        }
    }

    // ========================================================================
    // PENDING (automatic mode)
    // ========================================================================

    fn advance_pending(
        &mut self,
        snapshot: &VehicleSnapshot,
        settings: SettingsSnapshot,
        context: EvaluationContext,
        lanes: LanePosition,
        now_ms: f64,
    ) -> Option<DecisionStatus> {
        let pending = self.state.pending.clone()?;

        let resolution = if settings.mode != OvertakeMode::Automatic {
            PendingResolution::Cancel {
                reason: "automatic mode turned off".to_string(),
            }
        } else {
            let config = &self.config;
            pending.check(now_ms, config.timing.pending_delay_ms, || {
                Evaluation::full(snapshot, &settings.thresholds, config, context)
            })
        };

        let direction = pending.direction;
        let status = match resolution {
            PendingResolution::Waiting { remaining_ms } => {
                let mut status = DecisionStatus::new(
                    DecisionPhase::Preparing,
                    format!(
                        "Preparing {} lane change: {:.1}s",
                        direction.as_str(),
                        remaining_ms / 1000.0
                    ),
                );
                status.can_overtake = true;
                status.last_direction = Some(direction);
                status
            }
            PendingResolution::Commit => {
                self.state.pending = None;
                self.start_lane_change(direction, LaneChangePurpose::Overtake, lanes, now_ms, None);
                let mut status = DecisionStatus::new(
                    DecisionPhase::LaneChanging,
                    format!("Changing lanes {}", direction.as_str()),
                );
                status.can_overtake = true;
                status.last_direction = Some(direction);
                status
            }
            PendingResolution::Cancel { reason } => {
                self.state.pending = None;
                self.state.outcome = OvertakeOutcome::ConditionNotMet;
                if settings.mode == OvertakeMode::Automatic {
                    self.state.failure_streak.record_failure();
                }
                self.metrics.inc(&self.metrics.pending_cancelled);
                info!("❌ Pending {} lane change cancelled: {}", direction.as_str(), reason);
                self.events.publish(EngineEvent::PendingCancelled {
                    timestamp_ms: now_ms,
                    direction,
                    reason: reason.clone(),
                });
                DecisionStatus::new(
                    DecisionPhase::Cancelled,
                    format!("{} lane change cancelled", direction.as_str()),
                )
                .blocked_by(reason)
            }
        };
        Some(status)
    }

    // ========================================================================
    // IN-PROGRESS
    // ========================================================================

    fn advance_in_progress(
        &mut self,
        settings: SettingsSnapshot,
        lanes: LanePosition,
        now_ms: f64,
    ) -> Option<DecisionStatus> {
        let progress = self.state.in_progress.as_ref()?.check(
            lanes,
            now_ms,
            self.config.timing.in_progress_timeout_ms,
        );

        if let LaneChangeProgress::Waiting { elapsed_ms } = progress {
            let change = self.state.in_progress.as_ref()?;
            let mut status = DecisionStatus::new(
                DecisionPhase::LaneChanging,
                format!(
                    "{} {} in progress ({:.1}s)",
                    purpose_label(change.purpose),
                    change.direction.as_str(),
                    elapsed_ms / 1000.0
                ),
            );
            status.last_direction = Some(change.direction);
            return Some(status);
        }

        let change = self.state.in_progress.take()?;
        let width = self.config.lane.reference_lane_width_m;

        let status = match progress {
            LaneChangeProgress::Succeeded {
                to_lane,
                duration_ms,
            } => {
                self.state.outcome = OvertakeOutcome::Success;
                self.state.failure_streak.record_success();
                self.metrics.inc(&self.metrics.lane_changes_succeeded);
                info!(
                    "✅ {} {} completed: lane {} → {} in {:.1}s",
                    purpose_label(change.purpose),
                    change.direction.as_str(),
                    change.origin_lane,
                    to_lane,
                    duration_ms / 1000.0
                );
                self.events.publish(EngineEvent::LaneChangeSucceeded {
                    timestamp_ms: now_ms,
                    direction: change.direction,
                    purpose: change.purpose,
                    from_lane: change.origin_lane,
                    to_lane,
                    duration_ms,
                });

                match change.purpose {
                    LaneChangePurpose::Overtake if settings.should_return_to_lane => {
                        let memory = match self.state.lane_memory.take() {
                            Some(mut memory) => {
                                memory.apply_change(change.direction, width);
                                memory
                            }
                            None => LaneMemory::after_overtake(change.direction, now_ms, width),
                        };
                        self.keep_lane_memory(memory, now_ms);
                    }
                    LaneChangePurpose::Overtake => {}
                    LaneChangePurpose::Return => {
                        if let Some(mut memory) = change.parked_memory.clone() {
                            memory.apply_change(change.direction, width);
                            self.keep_lane_memory(memory, now_ms);
                        }
                    }
                }

                let mut status = DecisionStatus::new(
                    DecisionPhase::Completed,
                    format!(
                        "{} {} completed (lane {} → {})",
                        purpose_label(change.purpose),
                        change.direction.as_str(),
                        change.origin_lane,
                        to_lane
                    ),
                );
                status.last_direction = Some(change.direction);
                status
            }
            LaneChangeProgress::TimedOut { duration_ms } => {
                self.state.outcome = OvertakeOutcome::Failed;
                self.state.failure_streak.record_failure();
                self.metrics.inc(&self.metrics.lane_changes_failed);
                let reason = format!("no lane change observed after {:.1}s", duration_ms / 1000.0);
                warn!(
                    "⚠️  {} {} failed: {}",
                    purpose_label(change.purpose),
                    change.direction.as_str(),
                    reason
                );
                self.events.publish(EngineEvent::LaneChangeFailed {
                    timestamp_ms: now_ms,
                    direction: change.direction,
                    purpose: change.purpose,
                    reason: reason.clone(),
                });

                if let Some(mut memory) = change.parked_memory.clone() {
                    memory.return_attempts += 1;
                    memory.clear_since_ms = None;
                    if memory.return_attempts >= self.config.returning.max_attempts {
                        self.metrics.inc(&self.metrics.lane_memory_expired);
                        self.events.publish(EngineEvent::LaneMemoryCleared {
                            timestamp_ms: now_ms,
                            reason: format!("{} return attempts failed", memory.return_attempts),
                        });
                    } else {
                        self.state.lane_memory = Some(memory);
                    }
                }

                let mut status = DecisionStatus::new(
                    DecisionPhase::Failed,
                    format!(
                        "{} {} failed",
                        purpose_label(change.purpose),
                        change.direction.as_str()
                    ),
                )
                .blocked_by(reason);
                status.last_direction = Some(change.direction);
                status
            }
            LaneChangeProgress::Waiting { .. } => return None,
        };
        Some(status)
    }

    // ========================================================================
    // RETURN TO ORIGIN
    // ========================================================================

    fn advance_return(
        &mut self,
        snapshot: &VehicleSnapshot,
        settings: SettingsSnapshot,
        lanes: LanePosition,
        now_ms: f64,
    ) -> ReturnStep {
        if self.state.lane_memory.is_none() {
            return ReturnStep::Idle;
        }
        if settings.mode != OvertakeMode::Automatic {
            self.clear_lane_memory("automatic mode turned off", now_ms);
            return ReturnStep::Idle;
        }

        let assessment = match self.state.lane_memory.as_mut() {
            Some(memory) => memory.assess(
                snapshot,
                lanes,
                &settings.thresholds,
                &self.config.gate,
                &self.config.returning,
                self.config.lane.reference_lane_width_m,
                now_ms,
            ),
            None => return ReturnStep::Idle,
        };

        match assessment {
            ReturnAssessment::Expired => {
                self.metrics.inc(&self.metrics.lane_memory_expired);
                self.clear_lane_memory("return window expired", now_ms);
                ReturnStep::Status("Return window expired".to_string())
            }
            ReturnAssessment::Waiting { reason } => {
                let direction = self
                    .state
                    .lane_memory
                    .as_ref()
                    .map(|m| m.return_direction().as_str())
                    .unwrap_or("-");
                ReturnStep::Status(format!("Return {}: {}", direction, reason))
            }
            ReturnAssessment::Ready { direction } => {
                if let Some(remaining) = self.cooldown_remaining_ms(&settings.thresholds, now_ms) {
                    return ReturnStep::Status(format!(
                        "Return {}: cooldown {:.1}s",
                        direction.as_str(),
                        remaining as f64 / 1000.0
                    ));
                }

                let memory = self.state.lane_memory.take();
                self.metrics.inc(&self.metrics.returns_dispatched);
                info!("↩️  Returning {} toward original lane", direction.as_str());
                self.start_lane_change(direction, LaneChangePurpose::Return, lanes, now_ms, memory);

                let mut status = DecisionStatus::new(
                    DecisionPhase::LaneChanging,
                    format!("Returning {} to original lane", direction.as_str()),
                );
                status.last_direction = Some(direction);
                ReturnStep::Dispatched(status)
            }
        }
    }

    fn keep_lane_memory(&mut self, memory: LaneMemory, now_ms: f64) {
        if memory.net_lane_changes == 0 {
            self.events.publish(EngineEvent::LaneMemoryCleared {
                timestamp_ms: now_ms,
                reason: "back in original lane".to_string(),
            });
            self.state.lane_memory = None;
        } else {
            debug!(
                "Lane memory: net {} lane(s), origin offset {:.1}m",
                memory.net_lane_changes, memory.origin_lateral_offset_m
            );
            self.state.lane_memory = Some(memory);
        }
    }

    fn clear_lane_memory(&mut self, reason: &str, now_ms: f64) {
        if self.state.lane_memory.take().is_some() {
            info!("🧹 Lane memory cleared: {}", reason);
            self.events.publish(EngineEvent::LaneMemoryCleared {
                timestamp_ms: now_ms,
                reason: reason.to_string(),
            });
        }
    }

    // ========================================================================
    // OVERTAKE DECISION
    // ========================================================================

    fn evaluate_overtake(
        &mut self,
        snapshot: &VehicleSnapshot,
        settings: SettingsSnapshot,
        context: EvaluationContext,
        lanes: LanePosition,
        now_ms: f64,
    ) -> DecisionStatus {
        let thresholds = settings.thresholds;
        let mut evaluation = Evaluation::gates(snapshot, &thresholds, &self.config, context);

        if let Some(remaining) = self.cooldown_remaining_ms(&thresholds, now_ms) {
            self.state.debounce.reset();
            debug!("Cooldown {}ms, evaluation: {}", remaining, evaluation.summary());
            let failures = self.state.failure_streak.count();
            let text = if self.state.failure_streak.penalty_ms(&self.config.cooldown) > 0.0 {
                format!(
                    "Cooldown: {:.1}s remaining ({} failed attempts)",
                    remaining as f64 / 1000.0,
                    failures
                )
            } else {
                format!("Cooldown: {:.1}s remaining", remaining as f64 / 1000.0)
            };
            let mut status = DecisionStatus::new(DecisionPhase::Cooldown, text);
            status.cooldown_remaining_ms = Some(remaining);
            status.blocking_reason = evaluation.failure_reason();
            return status;
        }

        if !evaluation.wants_overtake() {
            self.state.debounce.reset();
            self.state.outcome = OvertakeOutcome::ConditionNotMet;
            let reason = evaluation
                .failure_reason()
                .unwrap_or_else(|| "conditions not met".to_string());
            debug!("Overtake not wanted: {}", reason);
            return DecisionStatus::new(DecisionPhase::Monitoring, format!("Monitoring: {}", reason))
                .blocked_by(reason);
        }

        if !self.state.debounce.observe() {
            return DecisionStatus::new(
                DecisionPhase::Confirming,
                format!(
                    "Confirming overtake ({}/{})",
                    self.state.debounce.count(),
                    self.state.debounce.threshold()
                ),
            );
        }

        evaluation.select_direction(snapshot, &self.config);
        debug!("Confirmed evaluation: {}", evaluation.summary());

        let (Some(decision), Some(trigger)) = (evaluation.decision().cloned(), evaluation.trigger())
        else {
            self.state.outcome = OvertakeOutcome::ConditionNotMet;
            let reason = evaluation
                .failure_reason()
                .unwrap_or_else(|| "no lane available".to_string());
            return DecisionStatus::new(DecisionPhase::Blocked, format!("Blocked: {}", reason))
                .blocked_by(reason);
        };

        let direction = decision.direction;
        self.state.last_direction = Some(direction);

        let mut status = match settings.mode {
            OvertakeMode::ManualConfirm => {
                if !self
                    .state
                    .manual_cue_cooldown
                    .is_active(now_ms, self.config.timing.manual_cue_cooldown_ms)
                {
                    self.state.manual_cue_cooldown.record(now_ms);
                    self.play_cue(direction.confirm_cue(), now_ms);
                    info!("👉 Suggesting {} overtake: {}", direction.as_str(), decision.reason);
                }
                DecisionStatus::new(
                    DecisionPhase::AwaitingDriver,
                    format!("Overtake {} possible: {}", direction.as_str(), decision.reason),
                )
            }
            OvertakeMode::Automatic => {
                self.state.debounce.reset();
                self.state.action_cooldown.record(now_ms);
                self.play_cue(direction.prepare_cue(), now_ms);
                self.state.pending = Some(PendingLaneChange::new(direction, trigger, now_ms));
                info!(
                    "🟡 Overtake {} armed ({:?}, lane {}/{}): {}",
                    direction.as_str(),
                    trigger,
                    lanes.current_lane,
                    lanes.total_lanes,
                    decision.reason
                );
                DecisionStatus::new(
                    DecisionPhase::Preparing,
                    format!(
                        "Preparing {} lane change: {:.1}s",
                        direction.as_str(),
                        self.config.timing.pending_delay_ms / 1000.0
                    ),
                )
            }
            OvertakeMode::Disabled => DecisionStatus::new(DecisionPhase::Disabled, "Overtake assist disabled"),
        };
        status.can_overtake = true;
        status.last_direction = Some(direction);
        status
    }

    // ========================================================================
    // SIDE EFFECTS
    // ========================================================================

    fn check_exit_reminder(
        &mut self,
        snapshot: &VehicleSnapshot,
        lanes: LanePosition,
        now_ms: f64,
    ) -> Option<String> {
        let message = self.exit_reminder.check(
            snapshot,
            lanes,
            self.state.exit_reminder_fired_ms,
            now_ms,
        )?;
        self.state.exit_reminder_fired_ms = Some(now_ms);
        self.metrics.inc(&self.metrics.exit_reminders);
        self.play_cue(CueKind::ExitReminder, now_ms);
        self.events.publish(EngineEvent::ExitReminder {
            timestamp_ms: now_ms,
            message: message.clone(),
        });
        Some(message)
    }

    /// Dispatch a command and start tracking it. Delivery failures do not
    /// roll anything back; the in-progress timeout reports them as failures.
    fn start_lane_change(
        &mut self,
        direction: Direction,
        purpose: LaneChangePurpose,
        lanes: LanePosition,
        now_ms: f64,
        memory: Option<LaneMemory>,
    ) {
        self.state.action_cooldown.record(now_ms);
        self.state.follow_timer.reset();
        match self.dispatcher.dispatch(direction) {
            Ok(()) => {
                self.metrics.inc(&self.metrics.commands_dispatched);
                info!(
                    "🚀 {} command sent: {} from lane {}",
                    purpose_label(purpose),
                    direction.as_str(),
                    lanes.current_lane
                );
                self.events.publish(EngineEvent::LaneChangeDispatched {
                    timestamp_ms: now_ms,
                    direction,
                    purpose,
                    origin_lane: lanes.current_lane,
                });
            }
            Err(e) => self.record_delivery_failure(format!("{} command", direction.as_str()), e, now_ms),
        }

        self.state.in_progress = Some(match (purpose, memory) {
            (LaneChangePurpose::Return, Some(memory)) => {
                InProgressLaneChange::returning(direction, lanes.current_lane, now_ms, memory)
            }
            _ => InProgressLaneChange::overtake(direction, lanes.current_lane, now_ms),
        });
        self.state.outcome = OvertakeOutcome::Pending;
    }

    fn play_cue(&mut self, cue: CueKind, now_ms: f64) {
        match self.cues.play(cue) {
            Ok(()) => {
                self.metrics.inc(&self.metrics.cues_played);
                self.events.publish(EngineEvent::CuePlayed {
                    timestamp_ms: now_ms,
                    cue,
                });
            }
            Err(e) => self.record_delivery_failure(format!("{:?} cue", cue), e, now_ms),
        }
    }

    fn record_delivery_failure(&mut self, action: String, error: anyhow::Error, now_ms: f64) {
        warn!("⚠️  {} failed: {:#}", action, error);
        self.metrics.inc(&self.metrics.delivery_failures);
        let message = format!("{}: {:#}", action, error);
        self.events.publish(EngineEvent::DeliveryFailed {
            timestamp_ms: now_ms,
            action,
            error: format!("{:#}", error),
        });
        self.delivery_error = Some(message);
    }
}

enum ReturnStep {
    Idle,
    Status(String),
    Dispatched(DecisionStatus),
}

fn purpose_label(purpose: LaneChangePurpose) -> &'static str {
    match purpose {
        LaneChangePurpose::Overtake => "Overtake",
        LaneChangePurpose::Return => "Return",
    }
}

/// Thresholds the engine would use right now for `store`, without ticking.
pub fn preview_thresholds(config: &EngineConfig, store: &dyn SettingsStore) -> ResolvedThresholds {
    ThresholdTable::new(&config.tunables).resolve(store.driving_style(), |name| store.tunable(name))
}
