//! What is currently on screen, fed by worker results

use std::sync::Arc;

use chrono::{DateTime, Local};
use pendulum_cache::scheduler::{Emission, Status};
use pendulum_cache::{Fingerprint, PhasePortrait, PortraitStyle, SimError, WorkerResult};

/// Latest emission and the portrait drawn for it
#[derive(Debug, Default)]
pub struct DisplayState {
    pub emission: Option<Emission>,
    pub portrait: Option<Arc<PhasePortrait>>,
    portrait_key: Option<(Fingerprint, PortraitStyle)>,
    requested: Option<(Fingerprint, PortraitStyle)>,
    /// Wall-clock time of the last Fresh emission
    pub last_computed: Option<DateTime<Local>>,
}

impl DisplayState {
    /// Apply a worker result; returns an error to surface in the UI
    pub fn accept(&mut self, result: WorkerResult) -> Option<SimError> {
        match result {
            WorkerResult::Emitted(mut emission) => {
                if emission.status == Status::Fresh {
                    self.last_computed = Some(Local::now());
                }
                if emission.batch.is_empty() {
                    self.portrait = None;
                    self.portrait_key = None;
                }
                let diagnostic = emission.diagnostic.take();
                self.emission = Some(emission);
                diagnostic
            }
            WorkerResult::Rendered {
                fingerprint,
                style,
                portrait,
            } => {
                if self.fingerprint() == Some(fingerprint) {
                    self.portrait = Some(portrait);
                    self.portrait_key = Some((fingerprint, style));
                }
                if self.requested == Some((fingerprint, style)) {
                    self.requested = None;
                }
                None
            }
            WorkerResult::Rejected { error } => Some(error),
        }
    }

    pub fn fingerprint(&self) -> Option<Fingerprint> {
        self.emission.as_ref().and_then(|e| e.fingerprint)
    }

    /// Portrait to ask the worker for, if the one on screen is out of date
    pub fn wanted_render(&self, style: &PortraitStyle) -> Option<(Fingerprint, PortraitStyle)> {
        let emission = self.emission.as_ref()?;
        if emission.batch.is_empty() {
            return None;
        }
        let wanted = (emission.fingerprint?, *style);
        if self.portrait_key == Some(wanted) || self.requested == Some(wanted) {
            return None;
        }
        Some(wanted)
    }

    pub fn mark_requested(&mut self, key: (Fingerprint, PortraitStyle)) {
        self.requested = Some(key);
    }

    pub fn is_pending(&self) -> bool {
        self.emission.as_ref().is_some_and(|e| e.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pendulum_cache::solver::{BatchReport, Trajectory, TrajectoryBatch};
    use pendulum_cache::{ParameterSet, fingerprint};

    fn batch(count: usize) -> Arc<TrajectoryBatch> {
        let trajectories = (0..count)
            .map(|k| {
                let time: Vec<f64> = (0..12).map(|i| i as f64).collect();
                Trajectory::new(time, vec![k as f64; 12], vec![0.0; 12], (k as f64, 0.0)).unwrap()
            })
            .collect();
        Arc::new(TrajectoryBatch::new(
            trajectories,
            BatchReport {
                attempted: count,
                succeeded: count,
            },
        ))
    }

    fn emitted(fp: Fingerprint, count: usize, status: Status) -> WorkerResult {
        WorkerResult::Emitted(Emission {
            batch: batch(count),
            status,
            fingerprint: Some(fp),
            pending: false,
            diagnostic: None,
        })
    }

    #[test]
    fn test_render_requested_once() {
        let fp = fingerprint(&ParameterSet::default());
        let style = PortraitStyle::default();
        let mut display = DisplayState::default();
        assert!(display.wanted_render(&style).is_none());

        assert!(display.accept(emitted(fp, 3, Status::Fresh)).is_none());
        assert!(display.last_computed.is_some());

        let wanted = display.wanted_render(&style).unwrap();
        display.mark_requested(wanted);
        assert!(display.wanted_render(&style).is_none());

        display.accept(WorkerResult::Rendered {
            fingerprint: fp,
            style,
            portrait: Arc::new(PhasePortrait::default()),
        });
        assert!(display.portrait.is_some());
        assert!(display.wanted_render(&style).is_none());

        // New style needs a new portrait
        let wider = PortraitStyle {
            line_width: 2.0,
            ..style
        };
        assert!(display.wanted_render(&wider).is_some());
    }

    #[test]
    fn test_stale_render_ignored() {
        let old = fingerprint(&ParameterSet::default());
        let new = fingerprint(&ParameterSet {
            count: 3,
            ..Default::default()
        });
        let mut display = DisplayState::default();
        display.accept(emitted(new, 3, Status::Cached));
        assert!(display.last_computed.is_none());

        display.accept(WorkerResult::Rendered {
            fingerprint: old,
            style: PortraitStyle::default(),
            portrait: Arc::new(PhasePortrait::default()),
        });
        assert!(display.portrait.is_none());
    }

    #[test]
    fn test_failed_emission_clears_portrait() {
        let fp = fingerprint(&ParameterSet::default());
        let mut display = DisplayState::default();
        display.portrait = Some(Arc::new(PhasePortrait::default()));

        let diagnostic = display.accept(WorkerResult::Emitted(Emission {
            batch: Arc::new(TrajectoryBatch::empty()),
            status: Status::Failed,
            fingerprint: Some(fp),
            pending: false,
            diagnostic: Some(SimError::EmptyBatch { attempted: 8 }),
        }));

        assert!(matches!(diagnostic, Some(SimError::EmptyBatch { attempted: 8 })));
        assert!(display.portrait.is_none());
        assert!(display.wanted_render(&PortraitStyle::default()).is_none());
    }
}
