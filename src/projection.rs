//! Survey area planning and geographic to raster projection
use log::debug;
use nalgebra::Vector2;

use crate::{
    cfg::Padding,
    prelude::{AreaBounds, GeoPoint},
};

/// Raster dimensions for given area: the longest physical side maps to
/// `max_dimension`, the other one scales proportionally and is rounded up
/// to the next power of two. Both are at least 1.
pub fn raster_size(bounds: &AreaBounds, max_dimension: u32) -> (u32, u32) {
    let (width_m, height_m) = bounds.extent_m();
    let scale = |short_m: f64, long_m: f64| -> u32 {
        let ratio = if long_m > 0.0 { short_m / long_m } else { 1.0 };
        let pixels = (max_dimension as f64 * ratio) as u32;
        pixels.max(1).next_power_of_two()
    };
    let (width, height) = if width_m > height_m {
        (max_dimension, scale(height_m, width_m))
    } else {
        (scale(width_m, height_m), max_dimension)
    };
    (width.max(1), height.max(1))
}

/// Linear mapping between an [AreaBounds] and a raster.
/// Raster origin is top left: x grows eastward, y grows southward.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    /// Area covered
    pub(crate) bounds: AreaBounds,
    /// Raster width [px]
    pub(crate) width: u32,
    /// Raster height [px]
    pub(crate) height: u32,
}

impl Projection {
    /// Plans the projection of given survey locations: padded bounds and
    /// raster size. None when `points` is empty.
    pub fn plan<'a, I: IntoIterator<Item = &'a GeoPoint>>(
        points: I,
        padding: &Padding,
        max_dimension: u32,
    ) -> Option<Self> {
        let bounds =
            AreaBounds::including(points)?.padded(padding.latitude, padding.longitude);
        let (width, height) = raster_size(&bounds, max_dimension);
        debug!(
            "projection - {} {} -> {}x{}",
            bounds.southwest, bounds.northeast, width, height
        );
        Some(Self::new(bounds, width, height))
    }
    /// Builds new [Projection] of `bounds` onto a `width` x `height` raster
    pub fn new(bounds: AreaBounds, width: u32, height: u32) -> Self {
        Self {
            bounds,
            width,
            height,
        }
    }
    /// Covered area
    pub fn bounds(&self) -> AreaBounds {
        self.bounds
    }
    /// Raster (width, height) in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
    /// Projects `point` to (fractional) raster coordinates
    pub fn project(&self, point: &GeoPoint) -> Vector2<f64> {
        let sw = self.bounds.southwest;
        let x = self.width as f64 * (point.longitude - sw.longitude) / self.bounds.longitude_span();
        let y = self.height as f64
            * (1.0 - (point.latitude - sw.latitude) / self.bounds.latitude_span());
        Vector2::new(x, y)
    }
    /// Pixel `point` falls into (truncated coordinates)
    pub fn pixel(&self, point: &GeoPoint) -> (i64, i64) {
        let xy = self.project(point);
        (xy[0] as i64, xy[1] as i64)
    }
    /// Inverse of [Self::project]
    pub fn unproject(&self, x: f64, y: f64) -> GeoPoint {
        let sw = self.bounds.southwest;
        GeoPoint::new(
            sw.latitude + (1.0 - y / self.height as f64) * self.bounds.latitude_span(),
            sw.longitude + x / self.width as f64 * self.bounds.longitude_span(),
        )
    }
    /// Angular size of one pixel: (latitude, longitude) [ddeg]
    pub fn resolution(&self) -> (f64, f64) {
        (
            self.bounds.latitude_span() / self.height as f64,
            self.bounds.longitude_span() / self.width as f64,
        )
    }
}
