//! Map presentation: sample markers and the heatmap ground overlay
use itertools::Itertools;
use log::debug;
use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    cfg::MarkerStyle,
    color::Rgba,
    heatmap::Heatmap,
    legend::LegendEntry,
    prelude::{AreaBounds, GeoPoint},
    raster::RasterGrid,
    render::RenderEvent,
    store::SurveyData,
};

/// Overlays are stacked above map tiles and markers
pub const OVERLAY_Z_INDEX: u32 = 10;

/// Circle marking one recorded sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub point: GeoPoint,
    pub color: Rgba,
    /// Radius in meters
    pub radius_m: f64,
}

/// Raster stretched over the area it covers
#[derive(Debug, Clone)]
pub struct GroundOverlay {
    pub bounds: AreaBounds,
    pub image: Arc<RasterGrid>,
    pub z_index: u32,
}

/// Map state: one marker per sample, at most one ground overlay
/// and its legend.
#[derive(Debug, Clone, Default)]
pub struct MapOverlay {
    style: MarkerStyle,
    marked: HashSet<GeoPoint>,
    ground: Option<GroundOverlay>,
    legend: Vec<LegendEntry>,
}

impl MapOverlay {
    pub fn new(style: &MarkerStyle) -> Self {
        Self {
            style: *style,
            ..Default::default()
        }
    }
    /// Returns markers for samples of `data` not marked yet,
    /// south to north then west to east.
    pub fn new_markers(&mut self, data: &SurveyData) -> Vec<Marker> {
        let color = Rgba::from(self.style.color);
        let radius_m = self.style.radius_m;

        let fresh = data
            .points()
            .filter(|point| !self.marked.contains(*point))
            .copied()
            .sorted_by(|a, b| {
                a.latitude()
                    .total_cmp(&b.latitude())
                    .then(a.longitude().total_cmp(&b.longitude()))
            })
            .collect::<Vec<_>>();

        self.marked.extend(fresh.iter().copied());

        fresh
            .into_iter()
            .map(|point| Marker {
                point,
                color,
                radius_m,
            })
            .collect()
    }
    /// Number of marked samples
    pub fn markers(&self) -> usize {
        self.marked.len()
    }
    /// Displays `heatmap`: the ground overlay is created once,
    /// then its image and bounds are replaced.
    pub fn apply(&mut self, heatmap: &Heatmap) -> &GroundOverlay {
        self.legend = heatmap.legend.clone();
        let ground = self.ground.get_or_insert_with(|| {
            debug!("overlay - created");
            GroundOverlay {
                bounds: heatmap.bounds,
                image: heatmap.raster.clone(),
                z_index: OVERLAY_Z_INDEX,
            }
        });
        ground.bounds = heatmap.bounds;
        ground.image = heatmap.raster.clone();
        ground
    }
    /// Applies one renderer output
    pub fn handle(&mut self, event: &RenderEvent) {
        match event {
            RenderEvent::Done(heatmap) => {
                let _ = self.apply(heatmap);
            },
            RenderEvent::Empty => self.clear(),
            RenderEvent::Cancelled => {},
        }
    }
    pub fn ground(&self) -> Option<&GroundOverlay> {
        self.ground.as_ref()
    }
    pub fn legend(&self) -> &[LegendEntry] {
        &self.legend
    }
    /// Removes everything from the map
    pub fn clear(&mut self) {
        self.marked.clear();
        self.ground = None;
        self.legend.clear();
    }
}
