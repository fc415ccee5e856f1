use crate::color::Rgba;

/// Heatmap raster. Unset pixels (no estimate) are fully transparent.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterGrid {
    width: u32,
    height: u32,
    /// Row major pixels
    pixels: Vec<Option<Rgba>>,
}

impl RasterGrid {
    /// Builds new, fully unset, raster. Dimensions are floored at 1.
    pub(crate) fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            width,
            height,
            pixels: vec![None; width as usize * height as usize],
        }
    }
    pub(crate) fn set(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(index) = self.index(x, y) {
            self.pixels[index] = Some(color);
        }
    }
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }
    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
    /// Pixel color at (x, y). None if unset or out of the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.index(x, y).and_then(|index| self.pixels[index])
    }
    /// Number of set pixels
    pub fn coverage(&self) -> usize {
        self.pixels.iter().filter(|px| px.is_some()).count()
    }
    /// Row major RGBA8 buffer, unset pixels are transparent black
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|px| px.unwrap_or(Rgba::TRANSPARENT).to_array())
            .collect()
    }
}
