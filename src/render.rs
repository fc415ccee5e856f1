//! Background heatmap rendering
use log::{debug, error, warn};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{
    mpsc::{self, Receiver, RecvTimeoutError, Sender},
    Arc, Mutex, PoisonError,
};
use std::thread::{self, JoinHandle};

use crate::{
    cancel::CancellationToken,
    cfg::Config,
    heatmap::{BuildOutcome, Heatmap, HeatmapBuilder},
    prelude::Error,
    store::{SampleStore, SurveyData},
};

/// Renderer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildState {
    /// Waiting for new samples
    #[default]
    Idle,
    /// One build in flight
    Building,
    /// Torn down, no more builds
    Stopped,
}

/// Renderer output
#[derive(Debug, Clone)]
pub enum RenderEvent {
    /// New heatmap to display
    Done(Heatmap),
    /// Survey is empty: hide overlay and legend
    Empty,
    /// In flight build was cancelled
    Cancelled,
}

/// Renders heatmaps of a [SampleStore] on a dedicated worker thread.
///
/// At most one build is in flight: requests arriving meanwhile are
/// coalesced. When samples were recorded during a build, a new one
/// starts as soon as it completes.
#[derive(Debug)]
pub struct Renderer {
    builder: HeatmapBuilder,
    store: Arc<SampleStore>,
    state: Arc<Mutex<BuildState>>,
    cancel: CancellationToken,
    tx: Sender<RenderEvent>,
    rx: Receiver<RenderEvent>,
    workers: Vec<JoinHandle<()>>,
}

impl Renderer {
    /// Builds new [Renderer] of `store`
    pub fn new(cfg: &Config, store: Arc<SampleStore>) -> Result<Self, Error> {
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            builder: HeatmapBuilder::new(cfg)?,
            store,
            state: Arc::new(Mutex::new(BuildState::default())),
            cancel: CancellationToken::new(),
            tx,
            rx,
            workers: Vec::new(),
        })
    }
    /// Current state
    pub fn state(&self) -> BuildState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
    /// Requests a new heatmap. Returns true if a build was started,
    /// false if one is already in flight or the survey is empty.
    pub fn request(&mut self) -> Result<bool, Error> {
        self.workers.retain(|worker| !worker.is_finished());

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match *state {
            BuildState::Stopped => return Err(Error::RendererStopped),
            BuildState::Building => {
                debug!("renderer - build in flight: request coalesced");
                return Ok(false);
            },
            BuildState::Idle => {},
        }
        if self.store.is_empty() {
            debug!("renderer - nothing to display");
            return Ok(false);
        }

        let builder = self.builder.clone();
        let store = self.store.clone();
        let shared = self.state.clone();
        let cancel = self.cancel.clone();
        let tx = self.tx.clone();

        let handle = thread::Builder::new()
            .name("heatmap-renderer".to_string())
            .spawn(move || {
                Self::worker(
                    |data, token| builder.build(data, token),
                    store,
                    shared,
                    cancel,
                    tx,
                )
            })
            .map_err(Error::WorkerSpawn)?;

        *state = BuildState::Building;
        self.workers.push(handle);
        Ok(true)
    }
    /// Worker thread main loop. The state is released
    /// even if `build` panics.
    fn worker<B>(
        build: B,
        store: Arc<SampleStore>,
        state: Arc<Mutex<BuildState>>,
        cancel: CancellationToken,
        tx: Sender<RenderEvent>,
    ) where
        B: Fn(&SurveyData, &CancellationToken) -> BuildOutcome,
    {
        loop {
            let snapshot = store.snapshot();
            let captured = snapshot.len();

            let built = panic::catch_unwind(AssertUnwindSafe(|| build(&snapshot, &cancel)));
            let outcome = match built {
                Ok(outcome) => outcome,
                Err(_) => {
                    error!("renderer - build of {} samples panicked", captured);
                    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                    if *state != BuildState::Stopped {
                        *state = BuildState::Idle;
                    }
                    return;
                },
            };
            let event = match outcome {
                BuildOutcome::Done(heatmap) => RenderEvent::Done(heatmap),
                BuildOutcome::Empty => RenderEvent::Empty,
                BuildOutcome::Cancelled => RenderEvent::Cancelled,
            };
            let cancelled = matches!(event, RenderEvent::Cancelled);

            if tx.send(event).is_err() {
                error!("renderer - output channel closed");
            }

            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            if cancelled || *state == BuildState::Stopped {
                if *state != BuildState::Stopped {
                    *state = BuildState::Idle;
                }
                return;
            }
            let live = store.len();
            if live != captured {
                debug!(
                    "renderer - {} new samples during build: restarting",
                    live.abs_diff(captured)
                );
                continue;
            }
            *state = BuildState::Idle;
            return;
        }
    }
    /// Next render event, if any
    pub fn poll(&self) -> Option<RenderEvent> {
        self.rx.try_recv().ok()
    }
    /// Waits for the next render event
    pub fn wait(&self, timeout: std::time::Duration) -> Option<RenderEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                warn!("renderer - event channel disconnected");
                None
            },
        }
    }
    /// Cancels the in flight build (if any) and waits for the worker
    /// to terminate. No build can be requested afterwards.
    pub fn stop(&mut self) {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if *state == BuildState::Stopped {
                return;
            }
            *state = BuildState::Stopped;
        }
        self.cancel.cancel();
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                error!("renderer - worker panicked");
            }
        }
        debug!("renderer - stopped");
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.stop();
    }
}
