//! Inverse distance weighting
use log::debug;
use nalgebra::Vector2;
use std::collections::BTreeMap;

use crate::{interp::Interpolator, prelude::Signal};

/// Inverse Distance Weighting interpolator.
///
/// z(x) = Σ w_i z_i / Σ w_i, with w_i = 1 / d_i^p
/// and d_i the euclidean pixel distance to known sample i.
/// A query that falls exactly on a known sample returns its reading.
#[derive(Debug, Clone)]
pub struct InverseDistance {
    /// Distance exponent (p)
    exponent: f64,
    /// Known samples, in pixel space
    known: Vec<(Vector2<f64>, i32)>,
}

impl InverseDistance {
    /// Builds new [InverseDistance] from known (pixel, reading) pairs.
    /// Readings sharing a pixel are merged into their mean.
    pub fn new<I: IntoIterator<Item = ((i64, i64), i32)>>(exponent: f64, known: I) -> Self {
        let mut pixels = BTreeMap::<(i64, i64), (i64, i64)>::new();
        for (pixel, level) in known {
            let (sum, count) = pixels.entry(pixel).or_insert((0, 0));
            *sum += level as i64;
            *count += 1;
        }
        let known = pixels
            .into_iter()
            .map(|((x, y), (sum, count))| {
                if count > 1 {
                    debug!("idw - ({}, {}) merged {} readings", x, y, count);
                }
                (Vector2::new(x as f64, y as f64), (sum / count) as i32)
            })
            .collect();
        Self { exponent, known }
    }
    /// Distance exponent
    pub fn exponent(&self) -> f64 {
        self.exponent
    }
    /// Known samples, ordered by pixel
    pub fn known(&self) -> &[(Vector2<f64>, i32)] {
        &self.known
    }
}

impl Interpolator for InverseDistance {
    fn len(&self) -> usize {
        self.known.len()
    }
    fn interpolate(&self, x: f64, y: f64) -> Signal {
        let target = Vector2::new(x, y);
        let (mut num, mut den) = (0.0_f64, 0.0_f64);
        for (pixel, level) in self.known.iter() {
            let d = (pixel - target).norm();
            if d == 0.0 {
                return Signal::Level(*level);
            }
            let w = 1.0 / d.powf(self.exponent);
            num += w * *level as f64;
            den += w;
        }
        let z = num / den;
        if z.is_finite() {
            Signal::Level(z.round() as i32)
        } else {
            Signal::NoSignal
        }
    }
}
