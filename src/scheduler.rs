//! Recompute scheduler
//!
//! Decides, for every parameter change, whether the session reuses a cached
//! batch, defers the work, or solves now.
//!
//! Debounce policy: automatic recomputation is throttled to at most one
//! solve per `min_interval`, measured from the last computation. A candidate
//! that arrives inside the interval (and is not already cached) is kept as
//! the single *pending* request, replacing any older one, and fired by
//! [`RecomputeScheduler::tick`] once the interval has passed. The value the
//! user stops on is therefore always computed, and continuous dragging cannot
//! starve recomputation.
//!
//! Unchanged parameters are served from the cache, or from the display once
//! their batch has expired. When the display instead shows a failed attempt
//! at other parameters, the unchanged set goes through the gate again.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::constants::scheduler::{DEADLINE_SLACK, MIN_RECOMPUTE_INTERVAL};
use crate::error::{Result, SimError};
use crate::fingerprint::{Fingerprint, fingerprint};
use crate::params::ParameterSet;
use crate::perf::ResultCache;
use crate::solver::{TrajectoryBatch, TrajectorySolver, solve_batch};

/// Whether parameter changes recompute on their own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Auto,
    /// Only an explicit trigger recomputes
    Manual,
}

/// One evaluation request from the parameter surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Request {
    pub params: ParameterSet,
    pub mode: Mode,
    /// Explicit "compute now"; bypasses the debounce gate, not the cache
    pub trigger: bool,
}

impl Request {
    pub fn auto(params: ParameterSet) -> Self {
        Self {
            params,
            mode: Mode::Auto,
            trigger: false,
        }
    }

    pub fn manual(params: ParameterSet) -> Self {
        Self {
            params,
            mode: Mode::Manual,
            trigger: false,
        }
    }

    pub fn triggered(mut self) -> Self {
        self.trigger = true;
        self
    }
}

/// Scheduler phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing valid computed yet, or the last computation failed
    #[default]
    Stale,
    Computing,
    Fresh,
}

/// Display badge for an emission; no behavioral meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Solved by this evaluation
    Fresh,
    /// Served from cache or carried over from the previous emission
    Cached,
    /// Every trajectory failed
    Failed,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Fresh => "Fresh",
            Status::Cached => "Cached",
            Status::Failed => "Failed",
        }
    }
}

/// What the presentation layer receives after each evaluation
#[derive(Debug)]
pub struct Emission {
    pub batch: Arc<TrajectoryBatch>,
    pub status: Status,
    /// Fingerprint of the parameters `batch` belongs to
    pub fingerprint: Option<Fingerprint>,
    /// A deferred recompute is waiting for the debounce interval
    pub pending: bool,
    pub diagnostic: Option<SimError>,
}

#[derive(Debug)]
struct Displayed {
    fingerprint: Option<Fingerprint>,
    batch: Arc<TrajectoryBatch>,
    failed: bool,
}

/// Per-session scheduler state
///
/// Created once per session and only mutated by [`RecomputeScheduler`].
#[derive(Debug)]
pub struct SchedulerState {
    last_fingerprint: Option<Fingerprint>,
    last_computed_at: Option<Instant>,
    phase: Phase,
    pending: Option<Request>,
    displayed: Displayed,
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self {
            last_fingerprint: None,
            last_computed_at: None,
            phase: Phase::Stale,
            pending: None,
            displayed: Displayed {
                fingerprint: None,
                batch: Arc::new(TrajectoryBatch::empty()),
                failed: false,
            },
        }
    }
}

impl SchedulerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_fingerprint(&self) -> Option<Fingerprint> {
        self.last_fingerprint
    }

    pub fn last_computed_at(&self) -> Option<Instant> {
        self.last_computed_at
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pending(&self) -> Option<&Request> {
        self.pending.as_ref()
    }

    /// Batch currently shown by the presentation layer
    pub fn displayed_batch(&self) -> &Arc<TrajectoryBatch> {
        &self.displayed.batch
    }

    pub fn displayed_fingerprint(&self) -> Option<Fingerprint> {
        self.displayed.fingerprint
    }

    fn is_first(&self) -> bool {
        self.last_fingerprint.is_none() && self.last_computed_at.is_none()
    }

    fn show(&mut self, fingerprint: Fingerprint, batch: Arc<TrajectoryBatch>, status: Status) -> Emission {
        self.displayed = Displayed {
            fingerprint: Some(fingerprint),
            batch: Arc::clone(&batch),
            failed: status == Status::Failed,
        };
        Emission {
            batch,
            status,
            fingerprint: Some(fingerprint),
            pending: self.pending.is_some(),
            diagnostic: None,
        }
    }

    /// Re-emit what is already on display
    fn hold(&self) -> Emission {
        Emission {
            batch: Arc::clone(&self.displayed.batch),
            status: if self.displayed.failed {
                Status::Failed
            } else {
                Status::Cached
            },
            fingerprint: self.displayed.fingerprint,
            pending: self.pending.is_some(),
            diagnostic: None,
        }
    }
}

/// Scheduler tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerSettings {
    /// Automatic recomputes closer together than this are deferred
    pub min_interval: Duration,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            min_interval: MIN_RECOMPUTE_INTERVAL,
        }
    }
}

/// Reuse / debounce / recompute decisions over a session's state
pub struct RecomputeScheduler<S> {
    solver: S,
    settings: SchedulerSettings,
}

impl<S: TrajectorySolver> RecomputeScheduler<S> {
    pub fn new(solver: S, settings: SchedulerSettings) -> Self {
        Self { solver, settings }
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn settings(&self) -> &SchedulerSettings {
        &self.settings
    }

    /// Handle a parameter change, an initial load or a manual trigger
    ///
    /// Invalid parameters are rejected before fingerprinting and leave both
    /// `state` and `cache` untouched.
    pub fn evaluate(
        &self,
        state: &mut SchedulerState,
        cache: &mut ResultCache,
        request: Request,
        now: Instant,
    ) -> Result<Emission> {
        request.params.validate()?;

        let fp = fingerprint(&request.params);
        let first = state.is_first();
        let changed = state.last_fingerprint != Some(fp);
        let candidate = changed || request.trigger || state.last_computed_at.is_none();

        if !candidate {
            match cache.trajectories(&fp, now) {
                Some(batch) => {
                    state.pending = None;
                    return Ok(state.show(fp, batch, Status::Cached));
                }
                None if state.displayed.fingerprint == Some(fp) => {
                    state.pending = None;
                    return Ok(state.hold());
                }
                // Display belongs to a failed attempt at other parameters
                None => debug!(fingerprint = %fp.short(), "expired batch not on display"),
            }
        }

        if !first && !request.trigger {
            match request.mode {
                Mode::Manual => {
                    state.pending = None;
                    return Ok(state.hold());
                }
                Mode::Auto if !self.interval_elapsed(state, now) => {
                    if let Some(batch) = cache.trajectories(&fp, now) {
                        debug!(fingerprint = %fp.short(), "debounced change served from cache");
                        state.pending = None;
                        state.last_fingerprint = Some(fp);
                        return Ok(state.show(fp, batch, Status::Cached));
                    }
                    debug!(fingerprint = %fp.short(), "deferring recompute");
                    state.pending = Some(request);
                    return Ok(state.hold());
                }
                Mode::Auto => {}
            }
        }

        Ok(self.resolve(state, cache, &request.params, fp, now))
    }

    /// Fire the pending request once the debounce interval has passed
    pub fn tick(
        &self,
        state: &mut SchedulerState,
        cache: &mut ResultCache,
        now: Instant,
    ) -> Option<Result<Emission>> {
        let request = state.pending?;
        if !self.interval_elapsed(state, now) {
            return None;
        }
        state.pending = None;
        Some(self.evaluate(state, cache, request, now))
    }

    /// When the pending request becomes eligible, if there is one
    pub fn next_deadline(&self, state: &SchedulerState) -> Option<Instant> {
        state.pending?;
        state
            .last_computed_at
            .map(|at| at + self.settings.min_interval + DEADLINE_SLACK)
    }

    fn interval_elapsed(&self, state: &SchedulerState, now: Instant) -> bool {
        match state.last_computed_at {
            Some(at) => now.saturating_duration_since(at) > self.settings.min_interval,
            None => true,
        }
    }

    fn resolve(
        &self,
        state: &mut SchedulerState,
        cache: &mut ResultCache,
        params: &ParameterSet,
        fp: Fingerprint,
        now: Instant,
    ) -> Emission {
        state.pending = None;

        if let Some(batch) = cache.trajectories(&fp, now) {
            debug!(fingerprint = %fp.short(), "cache hit");
            state.last_fingerprint = Some(fp);
            state.phase = Phase::Fresh;
            return state.show(fp, batch, Status::Cached);
        }

        state.phase = Phase::Computing;
        let initial = cache.initial_conditions(params.count, now);
        let batch = crate::timed!("solve trajectories", {
            solve_batch(&self.solver, &initial, params)
        });
        state.last_computed_at = Some(now);

        let report = batch.report();
        if batch.is_empty() {
            let error = SimError::EmptyBatch {
                attempted: report.attempted,
            };
            warn!(fingerprint = %fp.short(), attempted = report.attempted, "{}", error);
            state.phase = Phase::Stale;
            let mut emission = state.show(fp, Arc::new(batch), Status::Failed);
            emission.diagnostic = Some(error);
            return emission;
        }

        info!(
            fingerprint = %fp.short(),
            succeeded = report.succeeded,
            attempted = report.attempted,
            "trajectories computed"
        );
        let batch = Arc::new(batch);
        cache.put_trajectories(fp, Arc::clone(&batch), now);
        state.last_fingerprint = Some(fp);
        state.phase = Phase::Fresh;
        state.show(fp, batch, Status::Fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::cache::TRAJECTORY_TTL;
    use crate::params::Quality;
    use crate::solver::testing::ScriptedSolver;

    const MS: Duration = Duration::from_millis(1);

    fn scheduler(solver: ScriptedSolver) -> RecomputeScheduler<ScriptedSolver> {
        RecomputeScheduler::new(solver, SchedulerSettings::default())
    }

    fn params(count: usize, amplitude: f64) -> ParameterSet {
        ParameterSet::new(count, amplitude, 15.0, Quality::Balanced)
    }

    #[test]
    fn test_repeat_evaluation_hits_cache() {
        let sched = scheduler(ScriptedSolver::new());
        let mut state = SchedulerState::new();
        let mut cache = ResultCache::default();
        let t0 = Instant::now();
        let p = params(8, 0.50);

        let first = sched.evaluate(&mut state, &mut cache, Request::auto(p), t0).unwrap();
        let second = sched.evaluate(&mut state, &mut cache, Request::auto(p), t0 + MS).unwrap();

        assert_eq!(first.status, Status::Fresh);
        assert_eq!(second.status, Status::Cached);
        assert!(Arc::ptr_eq(&first.batch, &second.batch));
        // One batch of 8 trajectories, solved once
        assert_eq!(sched.solver().calls(), 8);
        assert_eq!(state.phase(), Phase::Fresh);
    }

    #[test]
    fn test_partial_failure_is_fresh() {
        let sched = scheduler(ScriptedSolver::failing_on([0, 3, 7]));
        let mut state = SchedulerState::new();
        let mut cache = ResultCache::default();

        let emission = sched
            .evaluate(&mut state, &mut cache, Request::auto(params(8, 0.5)), Instant::now())
            .unwrap();

        assert_eq!(emission.batch.len(), 5);
        assert_eq!(emission.status, Status::Fresh);
        assert_eq!(emission.batch.report().failed(), 3);
        assert!(emission.diagnostic.is_none());
    }

    #[test]
    fn test_rapid_change_is_deferred_then_fired() {
        let sched = scheduler(ScriptedSolver::new());
        let mut state = SchedulerState::new();
        let mut cache = ResultCache::default();
        let t0 = Instant::now();

        let first = sched
            .evaluate(&mut state, &mut cache, Request::auto(params(2, 0.5)), t0)
            .unwrap();
        assert_eq!(sched.solver().calls(), 2);

        // Inside the interval: nothing solved, previous batch kept
        let second = sched
            .evaluate(&mut state, &mut cache, Request::auto(params(2, 0.6)), t0 + 200 * MS)
            .unwrap();
        assert_eq!(sched.solver().calls(), 2);
        assert_eq!(second.status, Status::Cached);
        assert!(second.pending);
        assert!(Arc::ptr_eq(&first.batch, &second.batch));
        assert_eq!(sched.next_deadline(&state), Some(t0 + 501 * MS));

        // Too early
        assert!(sched.tick(&mut state, &mut cache, t0 + 400 * MS).is_none());

        let fired = sched.tick(&mut state, &mut cache, t0 + 501 * MS).unwrap().unwrap();
        assert_eq!(fired.status, Status::Fresh);
        assert!(!fired.pending);
        assert_eq!(sched.solver().calls(), 4);
        assert_eq!(fired.fingerprint, Some(fingerprint(&params(2, 0.6))));
        assert!(sched.next_deadline(&state).is_none());
    }

    #[test]
    fn test_newest_pending_request_wins() {
        let sched = scheduler(ScriptedSolver::new());
        let mut state = SchedulerState::new();
        let mut cache = ResultCache::default();
        let t0 = Instant::now();

        sched.evaluate(&mut state, &mut cache, Request::auto(params(1, 0.1)), t0).unwrap();
        sched.evaluate(&mut state, &mut cache, Request::auto(params(1, 0.2)), t0 + 100 * MS).unwrap();
        sched.evaluate(&mut state, &mut cache, Request::auto(params(1, 0.3)), t0 + 200 * MS).unwrap();

        let fired = sched.tick(&mut state, &mut cache, t0 + 600 * MS).unwrap().unwrap();
        assert_eq!(fired.fingerprint, Some(fingerprint(&params(1, 0.3))));
        assert_eq!(sched.solver().calls(), 2);
    }

    #[test]
    fn test_continuous_dragging_does_not_starve() {
        let sched = scheduler(ScriptedSolver::new());
        let mut state = SchedulerState::new();
        let mut cache = ResultCache::default();
        let t0 = Instant::now();

        // A new value every 100 ms for 3 s, with a tick at every frame
        for step in 0..30u32 {
            let now = t0 + step * 100 * MS;
            let p = params(1, step as f64 * 0.01);
            sched.evaluate(&mut state, &mut cache, Request::auto(p), now).unwrap();
            sched.tick(&mut state, &mut cache, now + 50 * MS);
        }
        let last = params(1, 29.0 * 0.01);

        // At most one solve per interval
        assert!(sched.solver().calls() <= 7, "{} solves", sched.solver().calls());

        // The resting value gets computed once the interval passes
        let rest = t0 + 3500 * MS;
        if let Some(result) = sched.tick(&mut state, &mut cache, rest) {
            result.unwrap();
        }
        assert_eq!(state.last_fingerprint(), Some(fingerprint(&last)));
    }

    #[test]
    fn test_debounced_change_to_cached_params_is_served() {
        let sched = scheduler(ScriptedSolver::new());
        let mut state = SchedulerState::new();
        let mut cache = ResultCache::default();
        let t0 = Instant::now();
        let a = params(3, 0.5);
        let b = params(3, 0.9);

        let first = sched.evaluate(&mut state, &mut cache, Request::auto(a), t0).unwrap();
        sched.evaluate(&mut state, &mut cache, Request::auto(b), t0 + 600 * MS).unwrap();
        assert_eq!(sched.solver().calls(), 6);

        // Back to `a` well inside the interval: cached, not deferred
        let back = sched.evaluate(&mut state, &mut cache, Request::auto(a), t0 + 700 * MS).unwrap();
        assert_eq!(back.status, Status::Cached);
        assert!(!back.pending);
        assert!(Arc::ptr_eq(&back.batch, &first.batch));
        assert_eq!(state.last_fingerprint(), Some(fingerprint(&a)));
        assert_eq!(sched.solver().calls(), 6);
    }

    #[test]
    fn test_manual_mode_holds_without_trigger() {
        let sched = scheduler(ScriptedSolver::new());
        let mut state = SchedulerState::new();
        let mut cache = ResultCache::default();
        let t0 = Instant::now();
        let a = params(4, 0.5);
        let b = params(4, 1.5);

        // Initial load computes even in manual mode
        let shown = sched.evaluate(&mut state, &mut cache, Request::manual(a), t0).unwrap();
        assert_eq!(shown.status, Status::Fresh);
        let calls = sched.solver().calls();
        let fp_before = state.last_fingerprint();
        let computed_before = state.last_computed_at();
        let entries_before = cache.trajectory_stats().entries;

        let held = sched
            .evaluate(&mut state, &mut cache, Request::manual(b), t0 + 5000 * MS)
            .unwrap();

        assert_eq!(sched.solver().calls(), calls);
        assert_eq!(state.last_fingerprint(), fp_before);
        assert_eq!(state.last_computed_at(), computed_before);
        assert_eq!(cache.trajectory_stats().entries, entries_before);
        assert!(Arc::ptr_eq(&held.batch, &shown.batch));
        assert!(!held.pending);
        assert!(sched.tick(&mut state, &mut cache, t0 + 10_000 * MS).is_none());
    }

    #[test]
    fn test_manual_trigger_bypasses_debounce_not_cache() {
        let sched = scheduler(ScriptedSolver::new());
        let mut state = SchedulerState::new();
        let mut cache = ResultCache::default();
        let t0 = Instant::now();
        let a = params(2, 0.5);
        let b = params(2, 1.0);

        sched.evaluate(&mut state, &mut cache, Request::manual(a), t0).unwrap();

        // Trigger right away: debounce interval ignored
        let computed = sched
            .evaluate(&mut state, &mut cache, Request::manual(b).triggered(), t0 + 10 * MS)
            .unwrap();
        assert_eq!(computed.status, Status::Fresh);
        assert_eq!(sched.solver().calls(), 4);

        // Triggering again for the same parameters is a cache hit
        let again = sched
            .evaluate(&mut state, &mut cache, Request::manual(b).triggered(), t0 + 20 * MS)
            .unwrap();
        assert_eq!(again.status, Status::Cached);
        assert_eq!(sched.solver().calls(), 4);
    }

    #[test]
    fn test_invalid_parameters_touch_nothing() {
        let sched = scheduler(ScriptedSolver::new());
        let mut state = SchedulerState::new();
        let mut cache = ResultCache::default();

        let bad = ParameterSet::new(0, 0.5, 15.0, Quality::Fast);
        let err = sched.evaluate(&mut state, &mut cache, Request::auto(bad).triggered(), Instant::now());

        assert!(matches!(err, Err(SimError::InvalidParameters(_))));
        assert_eq!(state.last_fingerprint(), None);
        assert_eq!(state.last_computed_at(), None);
        assert_eq!(state.phase(), Phase::Stale);
        assert_eq!(cache.trajectory_stats(), Default::default());
        assert_eq!(sched.solver().calls(), 0);

        let bad = ParameterSet::new(3, 0.5, -2.0, Quality::Fast);
        assert!(sched.evaluate(&mut state, &mut cache, Request::auto(bad), Instant::now()).is_err());
    }

    #[test]
    fn test_total_failure_reports_stale() {
        let sched = scheduler(ScriptedSolver::failing_always());
        let mut state = SchedulerState::new();
        let mut cache = ResultCache::default();
        let t0 = Instant::now();
        let p = params(4, 0.5);

        let failed = sched.evaluate(&mut state, &mut cache, Request::auto(p), t0).unwrap();
        assert_eq!(failed.status, Status::Failed);
        assert!(failed.batch.is_empty());
        assert!(matches!(failed.diagnostic, Some(SimError::EmptyBatch { attempted: 4 })));
        assert_eq!(state.phase(), Phase::Stale);
        assert_eq!(state.last_computed_at(), Some(t0));
        assert_eq!(state.last_fingerprint(), None);
        assert_eq!(cache.trajectory_stats().entries, 0);

        // Re-evaluating right away does not hot-loop the solver
        let again = sched.evaluate(&mut state, &mut cache, Request::auto(p), t0 + 10 * MS).unwrap();
        assert_eq!(sched.solver().calls(), 4);
        assert_eq!(again.status, Status::Failed);
        assert!(again.pending);
    }

    #[test]
    fn test_expired_batch_is_recomputed() {
        let sched = scheduler(ScriptedSolver::new());
        let mut state = SchedulerState::new();
        let mut cache = ResultCache::default();
        let t0 = Instant::now();
        let a = params(1, 0.5);
        let b = params(1, 0.7);

        sched.evaluate(&mut state, &mut cache, Request::auto(a), t0).unwrap();
        sched.evaluate(&mut state, &mut cache, Request::auto(b), t0 + 1000 * MS).unwrap();

        let late = t0 + TRAJECTORY_TTL + 2000 * MS;
        let back = sched.evaluate(&mut state, &mut cache, Request::auto(a), late).unwrap();
        assert_eq!(back.status, Status::Fresh);
        assert_eq!(sched.solver().calls(), 3);
    }

    #[test]
    fn test_unchanged_params_keep_display_after_expiry() {
        let sched = scheduler(ScriptedSolver::new());
        let mut state = SchedulerState::new();
        let mut cache = ResultCache::default();
        let t0 = Instant::now();
        let p = params(2, 0.5);

        let first = sched.evaluate(&mut state, &mut cache, Request::auto(p), t0).unwrap();
        let later = sched
            .evaluate(&mut state, &mut cache, Request::auto(p), t0 + TRAJECTORY_TTL + MS)
            .unwrap();

        assert_eq!(later.status, Status::Cached);
        assert!(Arc::ptr_eq(&first.batch, &later.batch));
        assert_eq!(sched.solver().calls(), 2);
    }

    #[test]
    fn test_oversized_parameters_are_rejected() {
        let sched = scheduler(ScriptedSolver::new());
        let mut state = SchedulerState::new();
        let mut cache = ResultCache::default();
        let t0 = Instant::now();

        let huge_horizon = ParameterSet::new(1, 0.5, 1e18, Quality::Fast);
        let err = sched.evaluate(&mut state, &mut cache, Request::auto(huge_horizon), t0);
        assert!(matches!(err, Err(SimError::InvalidParameters(_))));

        let huge_count = ParameterSet::new(usize::MAX, 0.5, 15.0, Quality::Fast);
        let err = sched.evaluate(&mut state, &mut cache, Request::auto(huge_count).triggered(), t0);
        assert!(matches!(err, Err(SimError::InvalidParameters(_))));

        assert_eq!(state.last_fingerprint(), None);
        assert_eq!(state.last_computed_at(), None);
        assert_eq!(state.phase(), Phase::Stale);
        assert_eq!(cache.trajectory_stats(), Default::default());
        assert_eq!(sched.solver().calls(), 0);
    }

    #[test]
    fn test_return_to_computed_params_clears_pending() {
        let sched = scheduler(ScriptedSolver::new());
        let mut state = SchedulerState::new();
        let mut cache = ResultCache::default();
        let t0 = Instant::now();
        let a = params(2, 0.5);
        let b = params(2, 0.8);

        let first = sched.evaluate(&mut state, &mut cache, Request::auto(a), t0).unwrap();
        let deferred = sched.evaluate(&mut state, &mut cache, Request::auto(b), t0 + 100 * MS).unwrap();
        assert!(deferred.pending);
        assert!(sched.next_deadline(&state).is_some());

        let back = sched.evaluate(&mut state, &mut cache, Request::auto(a), t0 + 200 * MS).unwrap();
        assert_eq!(back.status, Status::Cached);
        assert!(!back.pending);
        assert!(Arc::ptr_eq(&back.batch, &first.batch));
        assert!(state.pending().is_none());
        assert!(sched.next_deadline(&state).is_none());
        assert!(sched.tick(&mut state, &mut cache, t0 + 1000 * MS).is_none());
        assert_eq!(sched.solver().calls(), 2);
    }

    #[test]
    fn test_auto_trigger_bypasses_debounce() {
        let sched = scheduler(ScriptedSolver::new());
        let mut state = SchedulerState::new();
        let mut cache = ResultCache::default();
        let t0 = Instant::now();
        let a = params(2, 0.5);
        let b = params(2, 0.8);

        sched.evaluate(&mut state, &mut cache, Request::auto(a), t0).unwrap();
        let computed = sched
            .evaluate(&mut state, &mut cache, Request::auto(b).triggered(), t0 + 50 * MS)
            .unwrap();

        assert_eq!(computed.status, Status::Fresh);
        assert!(!computed.pending);
        assert_eq!(computed.fingerprint, Some(fingerprint(&b)));
        assert_eq!(state.last_computed_at(), Some(t0 + 50 * MS));
        assert!(sched.next_deadline(&state).is_none());
        assert_eq!(sched.solver().calls(), 4);
    }

    #[test]
    fn test_expired_params_recomputed_over_failed_display() {
        // `a` solves on calls 0 and 1, `b` fails on calls 2 and 3
        let sched = scheduler(ScriptedSolver::failing_on([2, 3]));
        let mut state = SchedulerState::new();
        let mut cache = ResultCache::default();
        let t0 = Instant::now();
        let a = params(2, 0.5);
        let b = params(2, 0.8);

        sched.evaluate(&mut state, &mut cache, Request::auto(a), t0).unwrap();
        let failed = sched.evaluate(&mut state, &mut cache, Request::auto(b), t0 + 1000 * MS).unwrap();
        assert_eq!(failed.status, Status::Failed);
        assert_eq!(state.last_fingerprint(), Some(fingerprint(&a)));

        let late = t0 + TRAJECTORY_TTL + 2000 * MS;
        let back = sched.evaluate(&mut state, &mut cache, Request::auto(a), late).unwrap();
        assert_eq!(back.status, Status::Fresh);
        assert_eq!(back.fingerprint, Some(fingerprint(&a)));
        assert_eq!(back.batch.len(), 2);
        assert_eq!(state.displayed_fingerprint(), Some(fingerprint(&a)));
        assert_eq!(sched.solver().calls(), 6);
    }
}
