//! Heatmap rasterization
use hifitime::Duration;
use log::{debug, info};
use std::sync::Arc;
use std::time::Instant;

use crate::{
    cancel::CancellationToken,
    cfg::Config,
    color::{map_relative, relative},
    interp::{Interpolator, InverseDistance},
    legend::{legend_of, LegendEntry},
    prelude::{AreaBounds, Error, Signal},
    projection::Projection,
    raster::RasterGrid,
    store::{SignalRange, SurveyData},
};

/// Known samples, in pixel space
type KnownPixels = Vec<((i64, i64), i32)>;

#[derive(Debug, Clone, Default)]
enum State {
    /// Bounds and raster size
    #[default]
    Planning,
    /// Known samples projection
    Projection(Projection),
    /// Per pixel estimation, row by row
    Rasterization(Projection, KnownPixels),
    /// Raster complete
    Done(Projection, RasterGrid),
    /// Abandoned between two rows
    Cancelled,
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Planning => write!(f, "planning"),
            Self::Projection(_) => write!(f, "projection"),
            Self::Rasterization(_, known) => write!(f, "rasterization ({} known)", known.len()),
            Self::Done(..) => write!(f, "done"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Heatmap of one survey snapshot
#[derive(Debug, Clone)]
pub struct Heatmap {
    /// Raster, immutable once built
    pub raster: Arc<RasterGrid>,
    /// Area the raster covers
    pub bounds: AreaBounds,
    /// Legend matching the raster colors
    pub legend: Vec<LegendEntry>,
    /// Valid readings range. None if no sample had a reading.
    pub range: Option<SignalRange>,
    /// Number of samples this was built from
    pub samples: usize,
    /// Build duration
    pub elapsed: Duration,
}

/// Outcome of a heatmap build
#[derive(Debug, Clone)]
pub enum BuildOutcome {
    /// Raster complete
    Done(Heatmap),
    /// Nothing to display
    Empty,
    /// Build abandoned, partial raster dropped
    Cancelled,
}

/// Builds heatmap rasters from survey snapshots
#[derive(Debug, Clone)]
pub struct HeatmapBuilder {
    cfg: Config,
}

impl HeatmapBuilder {
    /// Builds new [HeatmapBuilder] from given [Config]
    pub fn new(cfg: &Config) -> Result<Self, Error> {
        cfg.validate()?;
        Ok(Self { cfg: cfg.clone() })
    }
    /// Rasterizes `data`. `cancel` is checked before each raster row.
    pub fn build(&self, data: &SurveyData, cancel: &CancellationToken) -> BuildOutcome {
        let exponent = self.cfg.idw_exponent;
        self.build_with(data, cancel, |known| InverseDistance::new(exponent, known))
    }
    /// Rasterizes `data` with the [Interpolator] `estimator` builds
    /// from the known pixels.
    pub(crate) fn build_with<I, F>(
        &self,
        data: &SurveyData,
        cancel: &CancellationToken,
        estimator: F,
    ) -> BuildOutcome
    where
        I: Interpolator,
        F: Fn(KnownPixels) -> I,
    {
        let t0 = Instant::now();
        let range = data.range();
        let mut state = State::default();

        loop {
            debug!("heatmap - {}", state);
            match std::mem::take(&mut state) {
                State::Planning => {
                    match Projection::plan(
                        data.points(),
                        &self.cfg.padding,
                        self.cfg.max_dimension,
                    ) {
                        Some(proj) => state = State::Projection(proj),
                        None => {
                            debug!("heatmap - nothing to display");
                            return BuildOutcome::Empty;
                        },
                    }
                },
                State::Projection(proj) => {
                    let known = data
                        .iter()
                        .filter_map(|(point, signal)| {
                            signal.level().map(|level| (proj.pixel(point), level))
                        })
                        .collect();
                    state = State::Rasterization(proj, known);
                },
                State::Rasterization(proj, known) => {
                    let (width, height) = proj.size();
                    let mut raster = RasterGrid::new(width, height);

                    let estimator = estimator(known);
                    debug!(
                        "heatmap - {} known pixels from {} samples",
                        estimator.len(),
                        data.len()
                    );

                    let mut cancelled = false;
                    // without readings, every pixel remains unset
                    if let Some(range) = range.filter(|_| !estimator.is_empty()) {
                        for y in 0..raster.height() {
                            if cancel.is_cancelled() {
                                cancelled = true;
                                break;
                            }
                            for x in 0..raster.width() {
                                if let Signal::Level(level) =
                                    estimator.interpolate(x as f64, y as f64)
                                {
                                    let color = map_relative(relative(level, &range))
                                        .with_alpha(self.cfg.overlay_alpha);
                                    raster.set(x, y, color);
                                }
                            }
                        }
                    }
                    state = if cancelled {
                        State::Cancelled
                    } else {
                        State::Done(proj, raster)
                    };
                },
                State::Cancelled => {
                    debug!("heatmap - build cancelled");
                    return BuildOutcome::Cancelled;
                },
                State::Done(proj, raster) => {
                    let elapsed = Duration::from_seconds(t0.elapsed().as_secs_f64());
                    info!(
                        "heatmap - {}x{} raster from {} samples created in {}",
                        raster.width(),
                        raster.height(),
                        data.len(),
                        elapsed
                    );
                    return BuildOutcome::Done(Heatmap {
                        bounds: proj.bounds(),
                        legend: range
                            .map(|range| legend_of(&range, self.cfg.legend_length))
                            .unwrap_or_default(),
                        range,
                        samples: data.len(),
                        elapsed,
                        raster: Arc::new(raster),
                    });
                },
            }
        }
    }
}
