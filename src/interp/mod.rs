//! Spatial interpolation of sparse readings over a raster
pub mod idw;

pub use idw::InverseDistance;

use crate::prelude::Signal;

/// Estimates readings at arbitrary raster coordinates
/// from a set of known samples.
pub trait Interpolator {
    /// Number of known samples
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Estimates reading at (x, y). [Signal::NoSignal] when
    /// no estimate is feasible.
    fn interpolate(&self, x: f64, y: f64) -> Signal;
}
