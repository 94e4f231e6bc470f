//! One user session: scheduler, its state and the result cache
//!
//! The cache is scoped to the session, which in turn is owned by a single
//! thread (the background worker, or a test).

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::error::Result;
use crate::fingerprint::Fingerprint;
use crate::perf::{CacheTtls, ResultCache};
use crate::portrait::{PhasePortrait, PortraitKey, PortraitStyle};
use crate::scheduler::{Emission, RecomputeScheduler, Request, SchedulerSettings, SchedulerState};
use crate::solver::TrajectorySolver;

pub struct Session<S> {
    scheduler: RecomputeScheduler<S>,
    state: SchedulerState,
    cache: ResultCache,
}

impl<S: TrajectorySolver> Session<S> {
    pub fn new(solver: S, settings: SchedulerSettings, ttls: CacheTtls) -> Self {
        Self {
            scheduler: RecomputeScheduler::new(solver, settings),
            state: SchedulerState::new(),
            cache: ResultCache::new(ttls),
        }
    }

    pub fn evaluate(&mut self, request: Request, now: Instant) -> Result<Emission> {
        self.scheduler
            .evaluate(&mut self.state, &mut self.cache, request, now)
    }

    pub fn tick(&mut self, now: Instant) -> Option<Result<Emission>> {
        self.scheduler.tick(&mut self.state, &mut self.cache, now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline(&self.state)
    }

    /// Portrait for a batch, built from the cached or displayed batch on a miss
    ///
    /// `None` when the batch for `fingerprint` is no longer available.
    pub fn portrait(
        &mut self,
        fingerprint: Fingerprint,
        style: &PortraitStyle,
        now: Instant,
    ) -> Option<Arc<PhasePortrait>> {
        let key = PortraitKey::new(fingerprint, style);
        if let Some(portrait) = self.cache.portrait(&key, now) {
            return Some(portrait);
        }

        let batch = self.cache.trajectories(&fingerprint, now).or_else(|| {
            (self.state.displayed_fingerprint() == Some(fingerprint))
                .then(|| Arc::clone(self.state.displayed_batch()))
        })?;

        debug!(fingerprint = %fingerprint.short(), "building portrait");
        let portrait = Arc::new(PhasePortrait::build(&batch, style));
        self.cache.put_portrait(key, Arc::clone(&portrait), now);
        Some(portrait)
    }

    /// Drop expired entries from every cache
    pub fn expire(&mut self, now: Instant) -> usize {
        self.cache.expire(now)
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn solver(&self) -> &S {
        self.scheduler.solver()
    }
}
