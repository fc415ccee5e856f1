//! Signal strength color gradient, shared by raster and legend
use crate::store::SignalRange;

/// Opaque color
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const GREEN: Self = Self::new(0, 255, 0);
    pub const ORANGE: Self = Self::new(255, 255, 0);
    pub const RED: Self = Self::new(255, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
    /// Returns Self with given opacity
    pub fn with_alpha(&self, a: u8) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }
}

/// Color with opacity
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
    pub fn to_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<(u8, u8, u8, u8)> for Rgba {
    fn from(rgba: (u8, u8, u8, u8)) -> Self {
        Self::new(rgba.0, rgba.1, rgba.2, rgba.3)
    }
}

/// Relative strength used for degenerate ranges
pub const NEUTRAL_RATIO: f64 = 0.5;

/// Maps a relative signal strength to a color:
/// 0 (strongest) is green, 0.5 orange, 1 (weakest) red.
/// Input is clamped to [0, 1].
pub fn map_relative(ratio: f64) -> Rgb {
    let ratio = if ratio.is_nan() {
        NEUTRAL_RATIO
    } else {
        ratio.clamp(0.0, 1.0)
    };
    if ratio < 0.5 {
        // raise red toward orange
        Rgb::new((ratio * 255.0 / 0.5) as u8, 255, 0)
    } else {
        // lower green toward red
        Rgb::new(255, ((1.0 - ratio) * 255.0 / 0.5) as u8, 0)
    }
}

/// Relative strength of `level` within `range`:
/// 0 for the strongest reading, 1 for the weakest.
pub fn relative(level: i32, range: &SignalRange) -> f64 {
    if range.is_degenerate() {
        NEUTRAL_RATIO
    } else {
        (level as i64 - range.max as i64) as f64 / (range.min as i64 - range.max as i64) as f64
    }
}
