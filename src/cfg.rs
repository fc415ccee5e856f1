use thiserror::Error;

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("invalid raster dimension {0}: should be a power of two, at most 4096")]
    InvalidDimension(u32),
    #[error("invalid idw exponent {0}")]
    InvalidExponent(f64),
    #[error("bounds padding should be finite and positive")]
    InvalidPadding,
    #[error("invalid legend length {0}: at least two entries required")]
    InvalidLegendLength(usize),
    #[error("unknown target policy \"{0}\"")]
    UnknownTargetPolicy(String),
}

/// Largest supported raster dimension [px]
pub const MAX_RASTER_DIMENSION: u32 = 4096;

/// What happens to collected samples when the tracked target changes.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TargetPolicy {
    /// Keep previous samples: readings of the former target
    /// remain in the heatmap.
    Retain,
    /// Start a fresh survey
    #[default]
    Reset,
}

impl std::str::FromStr for TargetPolicy {
    type Err = Error;
    fn from_str(s: &str) -> Result<TargetPolicy, Error> {
        let c = s.trim().to_lowercase();
        match c.as_str() {
            "retain" => Ok(TargetPolicy::Retain),
            "reset" => Ok(TargetPolicy::Reset),
            _ => Err(Error::UnknownTargetPolicy(c.to_string())),
        }
    }
}

impl std::fmt::Display for TargetPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Retain => write!(f, "retain"),
            Self::Reset => write!(f, "reset"),
        }
    }
}

/// Margins added around the tight bounding box of the samples,
/// so the raster extends past the outermost samples.
/// Fixed angular constants, not latitude corrected.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Padding {
    /// Latitude margin [ddeg]
    pub latitude: f64,
    /// Longitude margin [ddeg]
    pub longitude: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            latitude: 0.0001,
            longitude: 0.0002,
        }
    }
}

/// Survey location markers
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MarkerStyle {
    /// (r, g, b, a) fill color
    pub color: (u8, u8, u8, u8),
    /// Radius [m]
    pub radius_m: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: (0, 0, 0, 128),
            radius_m: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Longest raster dimension, in pixels
    pub max_dimension: u32,
    /// IDW distance exponent
    pub idw_exponent: f64,
    /// Bounds padding
    pub padding: Padding,
    /// Heatmap pixels opacity
    pub overlay_alpha: u8,
    /// Number of legend entries
    pub legend_length: usize,
    /// Behavior on target change
    pub target_policy: TargetPolicy,
    /// Record location fixes while the target is out of range,
    /// as [crate::prelude::Signal::NoSignal] samples.
    pub record_out_of_range: bool,
    /// Survey location markers
    pub marker: MarkerStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_dimension: 128,
            idw_exponent: 3.0,
            padding: Padding::default(),
            overlay_alpha: 128,
            legend_length: 5,
            target_policy: TargetPolicy::default(),
            record_out_of_range: false,
            marker: MarkerStyle::default(),
        }
    }
}

impl Config {
    /// Returns Self with given target policy
    pub fn with_target_policy(&self, policy: TargetPolicy) -> Self {
        let mut s = self.clone();
        s.target_policy = policy;
        s
    }
    /// Returns Self with given maximal raster dimension
    pub fn with_max_dimension(&self, max_dimension: u32) -> Self {
        let mut s = self.clone();
        s.max_dimension = max_dimension;
        s
    }
    /// Verifies Self is usable
    pub fn validate(&self) -> Result<(), Error> {
        if !self.max_dimension.is_power_of_two() || self.max_dimension > MAX_RASTER_DIMENSION {
            return Err(Error::InvalidDimension(self.max_dimension));
        }
        if !self.idw_exponent.is_finite() || self.idw_exponent <= 0.0 {
            return Err(Error::InvalidExponent(self.idw_exponent));
        }
        let (lat, lon) = (self.padding.latitude, self.padding.longitude);
        if !lat.is_finite() || !lon.is_finite() || lat <= 0.0 || lon <= 0.0 {
            return Err(Error::InvalidPadding);
        }
        if self.legend_length < 2 {
            return Err(Error::InvalidLegendLength(self.legend_length));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{Config, Error, TargetPolicy, MAX_RASTER_DIMENSION};
    use rstest::rstest;
    use std::str::FromStr;

    #[test]
    fn default_is_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.max_dimension, 128);
        assert_eq!(cfg.idw_exponent, 3.0);
        assert_eq!(cfg.overlay_alpha, 128);
        assert_eq!(cfg.legend_length, 5);
    }

    #[rstest]
    #[case(Config::default().with_max_dimension(0), Error::InvalidDimension(0))]
    #[case(Config::default().with_max_dimension(100), Error::InvalidDimension(100))]
    #[case(Config::default().with_max_dimension(8192), Error::InvalidDimension(8192))]
    #[case(Config::default().with_max_dimension(1 << 16), Error::InvalidDimension(1 << 16))]
    #[case(Config { idw_exponent: 0.0, ..Default::default() }, Error::InvalidExponent(0.0))]
    #[case(Config { legend_length: 1, ..Default::default() }, Error::InvalidLegendLength(1))]
    fn invalid(#[case] cfg: Config, #[case] expected: Error) {
        assert_eq!(cfg.validate(), Err(expected));
    }

    #[test]
    fn largest_dimension() {
        let cfg = Config::default().with_max_dimension(MAX_RASTER_DIMENSION);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn invalid_padding() {
        let mut cfg = Config::default();
        cfg.padding.longitude = -1.0;
        assert_eq!(cfg.validate(), Err(Error::InvalidPadding));
    }

    #[rstest]
    #[case("retain", TargetPolicy::Retain)]
    #[case(" Reset ", TargetPolicy::Reset)]
    #[case("RETAIN", TargetPolicy::Retain)]
    fn policy_parsing(#[case] s: &str, #[case] expected: TargetPolicy) {
        let policy = TargetPolicy::from_str(s).unwrap();
        assert_eq!(policy, expected);
        assert_eq!(TargetPolicy::from_str(&policy.to_string()), Ok(policy));
    }

    #[test]
    fn unknown_policy() {
        assert_eq!(
            TargetPolicy::from_str("forget"),
            Err(Error::UnknownTargetPolicy("forget".to_string()))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize() {
        let cfg: Config = serde_json::from_str(
            r#"{
                "max_dimension": 64,
                "target_policy": "retain",
                "padding": { "longitude": 0.0004 }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.max_dimension, 64);
        assert_eq!(cfg.target_policy, TargetPolicy::Retain);
        assert_eq!(cfg.padding.latitude, 0.0001);
        assert_eq!(cfg.padding.longitude, 0.0004);
        assert_eq!(cfg.idw_exponent, 3.0);
        assert!(cfg.validate().is_ok());
    }
}
