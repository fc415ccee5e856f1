//! Survey samples storage
use itertools::{Itertools, MinMaxResult};
use log::debug;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::prelude::{GeoPoint, Signal};

/// Observed signal range, over valid readings only.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SignalRange {
    /// Weakest reading
    pub min: i32,
    /// Strongest reading
    pub max: i32,
}

impl SignalRange {
    /// Range over given readings, [Signal::NoSignal] excluded.
    /// None when no valid reading exists.
    pub fn from_signals<I: IntoIterator<Item = Signal>>(signals: I) -> Option<Self> {
        match signals
            .into_iter()
            .filter_map(|signal| signal.level())
            .minmax()
        {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(level) => Some(Self {
                min: level,
                max: level,
            }),
            MinMaxResult::MinMax(min, max) => Some(Self { min, max }),
        }
    }
    /// True if all readings are identical
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

/// Point in time copy of the survey: one reading per location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyData {
    pub(crate) samples: HashMap<GeoPoint, Signal>,
}

impl SurveyData {
    /// Number of surveyed locations
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    /// Reading at given location, if surveyed
    pub fn get(&self, point: &GeoPoint) -> Option<Signal> {
        self.samples.get(point).copied()
    }
    /// Iterates (location, reading) pairs, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&GeoPoint, &Signal)> + '_ {
        self.samples.iter()
    }
    /// Iterates surveyed locations
    pub fn points(&self) -> impl Iterator<Item = &GeoPoint> + '_ {
        self.samples.keys()
    }
    /// Iterates readings, [Signal::NoSignal] included
    pub fn signals(&self) -> impl Iterator<Item = Signal> + '_ {
        self.samples.values().copied()
    }
    /// Valid readings range
    pub fn range(&self) -> Option<SignalRange> {
        SignalRange::from_signals(self.signals())
    }
}

impl FromIterator<(GeoPoint, Signal)> for SurveyData {
    fn from_iter<I: IntoIterator<Item = (GeoPoint, Signal)>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

/// Shared survey sample store, single source of truth.
/// Every call is atomic with respect to the others.
#[derive(Debug, Default)]
pub struct SampleStore {
    samples: RwLock<HashMap<GeoPoint, Signal>>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }
    /// Inserts or overwrites (last writer wins) the reading at `point`.
    /// Returns the previous reading, if any.
    pub fn record(&self, point: GeoPoint, signal: Signal) -> Option<Signal> {
        let mut samples = self.samples.write().unwrap_or_else(PoisonError::into_inner);
        let previous = samples.insert(point, signal);
        if let Some(previous) = previous {
            debug!("{} - {} overwritten by {}", point, previous, signal);
        }
        previous
    }
    /// Returns a copy of the current samples
    pub fn snapshot(&self) -> SurveyData {
        let samples = self.samples.read().unwrap_or_else(PoisonError::into_inner);
        SurveyData {
            samples: samples.clone(),
        }
    }
    /// Drops all samples
    pub fn clear(&self) {
        let mut samples = self.samples.write().unwrap_or_else(PoisonError::into_inner);
        debug!("store - {} samples dropped", samples.len());
        samples.clear();
    }
    /// Current number of samples
    pub fn len(&self) -> usize {
        self.samples
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
