//! Survey session: ties location fixes and radio scans of one
//! tracked target into the sample store, and notifies listeners.
use log::{debug, info, warn};
use std::sync::Arc;

use crate::{
    cfg::{Config, TargetPolicy},
    prelude::{Error, GeoPoint, ScanResult, Signal},
    signal::level_of,
    source::{LocationSource, SignalSource},
    store::{SampleStore, SurveyData},
};

/// Tracked target and its last reading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetStatus {
    /// Target identifier
    pub target: String,
    /// Last reading
    pub signal: Signal,
}

impl std::fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.signal {
            Signal::Level(level) => write!(f, "{}: {} dBm", self.target, level),
            Signal::NoSignal => write!(f, "{} is out of range", self.target),
        }
    }
}

/// Survey notifications
#[derive(Debug, Clone, PartialEq)]
pub enum SurveyEvent {
    /// A radio scan completed
    ScanCompleted(Vec<ScanResult>),
    /// New reading of the tracked target
    TargetUpdated(TargetStatus),
    /// Survey samples changed
    DataUpdated(SurveyData),
    /// Last known location, as reported on start
    LastLocationUpdated(GeoPoint),
}

/// Implement this trait to be notified of [SurveyEvent]s.
/// Implemented for any `FnMut(&SurveyEvent)`.
pub trait Listener: Send {
    fn notify(&mut self, event: &SurveyEvent);
}

impl<F: FnMut(&SurveyEvent) + Send> Listener for F {
    fn notify(&mut self, event: &SurveyEvent) {
        self(event)
    }
}

/// Listener registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Survey session
pub struct Survey {
    /// Configuration
    cfg: Config,
    /// Samples
    store: Arc<SampleStore>,
    /// Events are only consumed while running
    running: bool,
    /// Tracked target
    target: Option<String>,
    /// Last recorded location
    last_location: Option<GeoPoint>,
    /// Last reading of the tracked target
    last_signal: Signal,
    listeners: Vec<(SubscriptionId, Box<dyn Listener>)>,
    next_id: u64,
}

impl std::fmt::Debug for Survey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Survey")
            .field("running", &self.running)
            .field("target", &self.target)
            .field("last_location", &self.last_location)
            .field("last_signal", &self.last_signal)
            .field("samples", &self.store.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Survey {
    /// Builds new [Survey] feeding `store`
    pub fn new(cfg: &Config, store: Arc<SampleStore>) -> Result<Self, Error> {
        cfg.validate()?;
        Ok(Self {
            cfg: cfg.clone(),
            store,
            running: false,
            target: None,
            last_location: None,
            last_signal: Signal::NoSignal,
            listeners: Vec::with_capacity(4),
            next_id: 0,
        })
    }
    /// Survey samples
    pub fn store(&self) -> &Arc<SampleStore> {
        &self.store
    }
    /// Starts consuming events. Publishes the last known location,
    /// if `location` has one.
    pub fn start<L: LocationSource>(&mut self, location: &L) {
        self.running = true;
        info!("survey - started");
        if let Some(point) = location.last_known() {
            self.publish(SurveyEvent::LastLocationUpdated(point));
        }
    }
    /// Stops consuming events. Samples are kept.
    pub fn stop(&mut self) {
        self.running = false;
        info!("survey - stopped");
    }
    pub fn is_running(&self) -> bool {
        self.running
    }
    /// Selects the target to survey.
    pub fn survey_target(&mut self, target: &str) {
        if self.target.as_deref() == Some(target) {
            return;
        }
        info!("survey - tracking \"{}\" ({})", target, self.cfg.target_policy);

        self.target = Some(target.to_string());
        self.last_signal = Signal::NoSignal;
        self.last_location = None;

        if self.cfg.target_policy == TargetPolicy::Reset {
            self.store.clear();
            self.publish(SurveyEvent::DataUpdated(SurveyData::default()));
        }
    }
    /// Tracked target
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }
    /// Last recorded location
    pub fn last_location(&self) -> Option<GeoPoint> {
        self.last_location
    }
    /// Last reading of the tracked target
    pub fn last_signal(&self) -> Signal {
        self.last_signal
    }
    /// Tracked target status, if any
    pub fn status(&self) -> Option<TargetStatus> {
        self.target.as_ref().map(|target| TargetStatus {
            target: target.clone(),
            signal: self.last_signal,
        })
    }
    /// New radio scan
    pub fn on_scan(&mut self, results: Vec<ScanResult>) {
        if !self.running {
            debug!("survey - stopped: scan dropped");
            return;
        }
        let signal = self
            .target
            .as_deref()
            .map(|target| level_of(&results, target));

        self.publish(SurveyEvent::ScanCompleted(results));

        if let Some(signal) = signal {
            self.last_signal = signal;
            if let Some(status) = self.status() {
                debug!("survey - {}", status);
                self.publish(SurveyEvent::TargetUpdated(status));
            }
        }
    }
    /// New location fix. Returns true if a sample was recorded.
    pub fn on_location(&mut self, point: GeoPoint) -> Result<bool, Error> {
        if !self.running {
            debug!("survey - stopped: fix dropped");
            return Ok(false);
        }
        if !point.is_valid() {
            return Err(Error::InvalidPoint {
                latitude: point.latitude(),
                longitude: point.longitude(),
            });
        }
        if self.target.is_none() {
            return Ok(false);
        }
        if self.last_location == Some(point) {
            return Ok(false);
        }
        if !self.last_signal.is_valid() && !self.cfg.record_out_of_range {
            debug!("survey - {} target out of range: not recorded", point);
            return Ok(false);
        }

        self.store.record(point, self.last_signal);
        self.last_location = Some(point);

        let snapshot = self.store.snapshot();
        self.publish(SurveyEvent::DataUpdated(snapshot));
        Ok(true)
    }
    /// Consumes all pending scans, then all pending fixes.
    /// Returns the number of recorded samples.
    pub fn consume<L: LocationSource, S: SignalSource>(
        &mut self,
        location: &mut L,
        signal: &mut S,
    ) -> usize {
        while let Some(results) = signal.next() {
            self.on_scan(results);
        }
        let mut recorded = 0;
        while let Some(point) = location.next() {
            match self.on_location(point) {
                Ok(true) => recorded += 1,
                Ok(false) => {},
                Err(e) => warn!("survey - {}", e),
            }
        }
        recorded
    }
    /// Registers a new listener, which immediately
    /// receives the current samples.
    pub fn subscribe<L: Listener + 'static>(&mut self, mut listener: L) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        listener.notify(&SurveyEvent::DataUpdated(self.store.snapshot()));
        self.listeners.push((id, Box::new(listener)));
        id
    }
    /// Unregisters a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let count = self.listeners.len();
        self.listeners.retain(|(k, _)| *k != id);
        self.listeners.len() != count
    }
    /// Notifies all listeners
    pub fn publish(&mut self, event: SurveyEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener.notify(&event);
        }
    }
}
