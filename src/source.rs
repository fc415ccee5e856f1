use crate::prelude::{GeoPoint, ScanResult};

/// Implement this trait to provide location fixes.
pub trait LocationSource {
    /// Provide location fixes in the order they were acquired,
    /// at whatever cadence the positioning system allows.
    /// Returns None when no new fix is pending.
    fn next(&mut self) -> Option<GeoPoint>;
    /// Last known location, if the positioning system has one.
    fn last_known(&self) -> Option<GeoPoint> {
        None
    }
}

/// Implement this trait to provide radio scans.
pub trait SignalSource {
    /// Provide completed scans in chronological order.
    /// Returns None when no new scan is pending.
    fn next(&mut self) -> Option<Vec<ScanResult>>;
}
