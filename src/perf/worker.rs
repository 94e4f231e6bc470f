//! Background worker that owns the session and keeps solving off the UI thread
//!
//! The UI sends requests and polls results once per frame. Bursts of
//! evaluation requests are coalesced to the newest one, and pending debounced
//! requests are fired when their deadline passes even if the UI goes quiet.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, TryRecvError, channel};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use tracing::{debug, warn};

use crate::error::{Result, SimError};
use crate::fingerprint::Fingerprint;
use crate::portrait::{PhasePortrait, PortraitStyle};
use crate::scheduler::{Emission, Request};
use crate::session::Session;
use crate::solver::TrajectorySolver;

/// Requests that can be sent to the background worker
#[derive(Debug, Clone)]
pub enum WorkerRequest {
    /// Parameters changed, initial load, or manual trigger
    Evaluate(Request),
    /// Build (or fetch) the portrait of a batch
    Render {
        fingerprint: Fingerprint,
        style: PortraitStyle,
    },
    /// Shutdown the worker
    Shutdown,
}

/// Results returned from the background worker
#[derive(Debug)]
pub enum WorkerResult {
    Emitted(Emission),
    Rendered {
        fingerprint: Fingerprint,
        style: PortraitStyle,
        portrait: Arc<PhasePortrait>,
    },
    /// The request was refused (invalid parameters)
    Rejected { error: SimError },
}

/// Background worker that processes requests off the main thread
pub struct BackgroundWorker {
    tx: Sender<WorkerRequest>,
    rx: Receiver<WorkerResult>,
    handle: Option<JoinHandle<()>>,
}

impl BackgroundWorker {
    /// Spawn the worker thread; `notify` runs after every result is queued
    pub fn spawn<S>(session: Session<S>, notify: impl Fn() + Send + 'static) -> Self
    where
        S: TrajectorySolver + Send + 'static,
    {
        let (req_tx, req_rx) = channel::<WorkerRequest>();
        let (res_tx, res_rx) = channel::<WorkerResult>();

        let handle = thread::spawn(move || {
            Self::worker_loop(session, req_rx, res_tx, notify);
        });

        Self {
            tx: req_tx,
            rx: res_rx,
            handle: Some(handle),
        }
    }

    fn worker_loop<S: TrajectorySolver>(
        mut session: Session<S>,
        rx: Receiver<WorkerRequest>,
        tx: Sender<WorkerResult>,
        notify: impl Fn(),
    ) {
        let send = |result: WorkerResult| -> bool {
            let ok = tx.send(result).is_ok();
            if ok {
                notify();
            }
            ok
        };

        loop {
            let received = match session.next_deadline() {
                Some(deadline) => rx.recv_timeout(deadline.saturating_duration_since(Instant::now())),
                None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };

            let first = match received {
                Ok(request) => request,
                Err(RecvTimeoutError::Timeout) => {
                    if let Some(result) = session.tick(Instant::now()) {
                        if !send(Self::evaluation_result(result)) {
                            break;
                        }
                    }
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            };

            let mut burst = vec![first];
            loop {
                match rx.try_recv() {
                    Ok(request) => burst.push(request),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => break,
                }
            }

            for request in coalesce(burst) {
                let result = match request {
                    WorkerRequest::Evaluate(request) => {
                        Self::evaluation_result(session.evaluate(request, Instant::now()))
                    }
                    WorkerRequest::Render { fingerprint, style } => {
                        match session.portrait(fingerprint, &style, Instant::now()) {
                            Some(portrait) => WorkerResult::Rendered {
                                fingerprint,
                                style,
                                portrait,
                            },
                            None => {
                                debug!(fingerprint = %fingerprint.short(), "no batch to render");
                                continue;
                            }
                        }
                    }
                    WorkerRequest::Shutdown => return,
                };

                if !send(result) {
                    return;
                }
            }

            session.expire(Instant::now());
        }
    }

    fn evaluation_result(result: Result<Emission>) -> WorkerResult {
        match result {
            Ok(emission) => WorkerResult::Emitted(emission),
            Err(error) => {
                warn!(%error, "evaluation rejected");
                WorkerResult::Rejected { error }
            }
        }
    }

    /// Send a request to the worker (non-blocking)
    pub fn request(&self, req: WorkerRequest) -> Result<()> {
        self.tx.send(req).map_err(|_| SimError::WorkerDisconnected)
    }

    /// Poll for completed work (non-blocking)
    pub fn poll(&self) -> Option<WorkerResult> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }
}

impl Drop for BackgroundWorker {
    fn drop(&mut self) {
        let _ = self.tx.send(WorkerRequest::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Collapse a burst of requests
///
/// All evaluations are replaced by the newest one, placed where that newest
/// one was; a trigger anywhere in the burst carries over to it. Renders keep
/// their order.
fn coalesce(burst: Vec<WorkerRequest>) -> Vec<WorkerRequest> {
    let last_eval = burst
        .iter()
        .rposition(|r| matches!(r, WorkerRequest::Evaluate(_)));
    let triggered = burst
        .iter()
        .any(|r| matches!(r, WorkerRequest::Evaluate(req) if req.trigger));

    burst
        .into_iter()
        .enumerate()
        .filter_map(|(i, request)| match request {
            WorkerRequest::Evaluate(mut req) if Some(i) == last_eval => {
                req.trigger |= triggered;
                Some(WorkerRequest::Evaluate(req))
            }
            WorkerRequest::Evaluate(_) => None,
            other => Some(other),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::fingerprint;
    use crate::params::{ParameterSet, Quality};
    use crate::perf::CacheTtls;
    use crate::scheduler::{SchedulerSettings, Status};
    use crate::solver::testing::ScriptedSolver;
    use std::time::Duration;

    fn spawn() -> BackgroundWorker {
        let session = Session::new(
            ScriptedSolver::new(),
            SchedulerSettings {
                min_interval: Duration::from_millis(100),
            },
            CacheTtls::default(),
        );
        BackgroundWorker::spawn(session, || {})
    }

    fn wait_for(worker: &BackgroundWorker) -> WorkerResult {
        let start = Instant::now();
        while start.elapsed() < Duration::from_secs(5) {
            if let Some(result) = worker.poll() {
                return result;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("Expected a worker result");
    }

    fn params(amplitude: f64) -> ParameterSet {
        ParameterSet::new(3, amplitude, 10.0, Quality::Fast)
    }

    #[test]
    fn test_worker_evaluates_and_renders() {
        let worker = spawn();
        worker
            .request(WorkerRequest::Evaluate(Request::auto(params(0.5))))
            .unwrap();

        let fp = match wait_for(&worker) {
            WorkerResult::Emitted(emission) => {
                assert_eq!(emission.status, Status::Fresh);
                assert_eq!(emission.batch.len(), 3);
                emission.fingerprint.unwrap()
            }
            other => panic!("Expected Emitted, got {:?}", other),
        };

        worker
            .request(WorkerRequest::Render {
                fingerprint: fp,
                style: PortraitStyle::default(),
            })
            .unwrap();
        match wait_for(&worker) {
            WorkerResult::Rendered { portrait, .. } => assert_eq!(portrait.curves.len(), 3),
            other => panic!("Expected Rendered, got {:?}", other),
        }
    }

    #[test]
    fn test_worker_fires_deferred_request() {
        let worker = spawn();
        worker
            .request(WorkerRequest::Evaluate(Request::auto(params(0.5))))
            .unwrap();
        assert!(matches!(wait_for(&worker), WorkerResult::Emitted(_)));

        worker
            .request(WorkerRequest::Evaluate(Request::auto(params(0.9))))
            .unwrap();

        // Either deferred then fired, or already past the interval
        let mut last = wait_for(&worker);
        let deferred = matches!(&last, WorkerResult::Emitted(e) if e.pending && e.status == Status::Cached);
        if deferred {
            last = wait_for(&worker);
        }
        match last {
            WorkerResult::Emitted(emission) => {
                assert_eq!(emission.status, Status::Fresh);
                assert_eq!(emission.fingerprint, Some(fingerprint(&params(0.9))));
            }
            other => panic!("Expected Emitted, got {:?}", other),
        }
    }

    #[test]
    fn test_worker_rejects_invalid_parameters() {
        let worker = spawn();
        let bad = ParameterSet::new(0, 0.5, 10.0, Quality::Fast);
        worker
            .request(WorkerRequest::Evaluate(Request::auto(bad)))
            .unwrap();
        assert!(matches!(
            wait_for(&worker),
            WorkerResult::Rejected {
                error: SimError::InvalidParameters(_)
            }
        ));
    }

    #[test]
    fn test_coalesce_keeps_newest_evaluation() {
        let fp = fingerprint(&params(0.1));
        let burst = vec![
            WorkerRequest::Evaluate(Request::manual(params(0.1)).triggered()),
            WorkerRequest::Render {
                fingerprint: fp,
                style: PortraitStyle::default(),
            },
            WorkerRequest::Evaluate(Request::manual(params(0.2))),
            WorkerRequest::Evaluate(Request::manual(params(0.3))),
        ];

        let out = coalesce(burst);
        assert_eq!(out.len(), 2);
        assert!(matches!(out[0], WorkerRequest::Render { .. }));
        match &out[1] {
            WorkerRequest::Evaluate(req) => {
                assert_eq!(req.params, params(0.3));
                assert!(req.trigger);
            }
            other => panic!("Expected Evaluate, got {:?}", other),
        }
    }
}
