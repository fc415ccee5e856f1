#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

use thiserror::Error;

// private modules
mod cancel;
mod cfg;
mod color;
mod geo;
mod heatmap;
mod interp;
mod legend;
mod overlay;
mod projection;
mod raster;
mod render;
mod signal;
mod source;
mod store;
mod survey;

#[cfg(test)]
mod tests;

/// Errors
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] cfg::Error),
    #[error("failed to spawn renderer worker: {0}")]
    WorkerSpawn(std::io::Error),
    #[error("renderer is stopped")]
    RendererStopped,
    #[error("invalid location ({latitude}, {longitude})")]
    InvalidPoint { latitude: f64, longitude: f64 },
}

// prelude
pub mod prelude {
    pub use crate::cancel::CancellationToken;
    pub use crate::cfg::{Config, Error as ConfigError, MarkerStyle, Padding, TargetPolicy};
    pub use crate::color::{map_relative, relative, Rgb, Rgba};
    pub use crate::geo::{AreaBounds, GeoPoint};
    pub use crate::heatmap::{BuildOutcome, Heatmap, HeatmapBuilder};
    pub use crate::interp::{Interpolator, InverseDistance};
    pub use crate::legend::{legend, LegendEntry};
    pub use crate::overlay::{GroundOverlay, MapOverlay, Marker};
    pub use crate::projection::{raster_size, Projection};
    pub use crate::raster::RasterGrid;
    pub use crate::render::{BuildState, RenderEvent, Renderer};
    pub use crate::signal::{level_of, targets, ScanResult, Signal};
    pub use crate::source::{LocationSource, SignalSource};
    pub use crate::store::{SampleStore, SignalRange, SurveyData};
    pub use crate::survey::{Listener, SubscriptionId, Survey, SurveyEvent, TargetStatus};
    pub use crate::Error;
    // re-export
    pub use hifitime::Duration;
    pub use nalgebra::Vector2;
}
