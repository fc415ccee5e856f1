//! Signal readings and radio scan results
use itertools::Itertools;

/// Signal reading at one location.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Signal {
    /// Received signal strength, in the unit of the radio (usually dBm).
    /// Higher is stronger.
    Level(i32),
    /// No reading: emitter out of range or estimate not feasible.
    #[default]
    NoSignal,
}

impl Signal {
    /// Returns the raw level, if any
    pub fn level(&self) -> Option<i32> {
        match self {
            Self::Level(level) => Some(*level),
            Self::NoSignal => None,
        }
    }
    /// True if this is an actual reading
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Level(_))
    }
}

impl From<Option<i32>> for Signal {
    fn from(level: Option<i32>) -> Self {
        match level {
            Some(level) => Self::Level(level),
            None => Self::NoSignal,
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Level(level) => write!(f, "{} dBm", level),
            Self::NoSignal => write!(f, "no signal"),
        }
    }
}

/// One entry of a radio scan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanResult {
    /// Human readable network name, may be empty (hidden networks)
    pub ssid: String,
    /// Raw emitter identifier
    pub bssid: String,
    /// Received level [dBm]
    pub level: i32,
}

impl ScanResult {
    pub fn new(ssid: &str, bssid: &str, level: i32) -> Self {
        Self {
            ssid: ssid.to_string(),
            bssid: bssid.to_string(),
            level,
        }
    }
    /// Identifier this emitter is tracked by: the SSID,
    /// or the BSSID when the SSID is empty.
    pub fn identifier(&self) -> &str {
        if self.ssid.is_empty() {
            &self.bssid
        } else {
            &self.ssid
        }
    }
}

/// Unique identifiers of a scan, in first-seen order.
pub fn targets(results: &[ScanResult]) -> Vec<String> {
    results
        .iter()
        .map(|result| result.identifier())
        .unique()
        .map(|id| id.to_string())
        .collect()
}

/// Level of the tracked target within a scan. First match wins.
pub fn level_of(results: &[ScanResult], target: &str) -> Signal {
    results
        .iter()
        .find(|result| result.identifier() == target)
        .map(|result| Signal::Level(result.level))
        .unwrap_or(Signal::NoSignal)
}
