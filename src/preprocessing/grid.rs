//! RGBA pixel grid
//!
//! Thin wrapper over [`image::RgbaImage`]. Transforms never resize a grid in
//! place; they build a new one.

use crate::error::{NormalizeError, Result};
use image::{Rgba, RgbaImage};

/// Fully transparent pixel
pub const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Largest grid any transform may allocate (400 MB of RGBA)
pub const MAX_PIXELS: u64 = 100_000_000;

#[derive(Debug, Clone)]
pub struct PixelGrid(RgbaImage);

impl PixelGrid {
    /// Fully transparent grid
    pub fn new(width: u32, height: u32) -> Self {
        Self(RgbaImage::new(width, height))
    }

    /// Fully transparent grid, rejecting sizes that overflow or exceed [`MAX_PIXELS`]
    pub fn try_new(width: u64, height: u64) -> Result<Self> {
        let too_large = || NormalizeError::ImageTooLarge {
            width,
            height,
            max_pixels: MAX_PIXELS,
        };
        let w = u32::try_from(width).map_err(|_| too_large())?;
        let h = u32::try_from(height).map_err(|_| too_large())?;
        if width.saturating_mul(height) > MAX_PIXELS {
            return Err(too_large());
        }
        Ok(Self::new(w, h))
    }

    /// Wrap an existing RGBA buffer, rejecting lengths that disagree with the dimensions
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let len = data.len();
        if width as u64 * height as u64 * 4 != len as u64 {
            return Err(NormalizeError::DimensionMismatch { width, height, len });
        }
        RgbaImage::from_raw(width, height, data)
            .map(Self)
            .ok_or(NormalizeError::DimensionMismatch { width, height, len })
    }

    pub fn from_pixel(width: u32, height: u32, pixel: [u8; 4]) -> Self {
        Self(RgbaImage::from_pixel(width, height, Rgba(pixel)))
    }

    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> [u8; 4],
    {
        Self(RgbaImage::from_fn(width, height, |x, y| Rgba(f(x, y))))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.0
    }

    pub fn into_image(self) -> RgbaImage {
        self.0
    }

    pub fn as_raw(&self) -> &[u8] {
        self.0.as_raw()
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.0.into_raw()
    }

    /// Panics when `(x, y)` is outside the grid
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.0.get_pixel(x, y).0
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, pixel: [u8; 4]) {
        self.0.put_pixel(x, y, Rgba(pixel));
    }

    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.0.pixels().map(|px| px.0)
    }

    /// Smallest rectangle holding every pixel with non-zero alpha
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.0
            .enumerate_pixels()
            .filter(|(_, _, px)| px[3] > 0)
            .fold(None, |bbox, (x, y, _)| {
                Some(match bbox {
                    None => BoundingBox::new(x, x, y, y),
                    Some(b) => BoundingBox::new(
                        b.min_x.min(x),
                        b.max_x.max(x),
                        b.min_y.min(y),
                        b.max_y.max(y),
                    ),
                })
            })
    }
}

impl From<RgbaImage> for PixelGrid {
    fn from(image: RgbaImage) -> Self {
        Self(image)
    }
}

// Pixels only; color-space metadata carried by the buffer is not part of a grid's identity
impl PartialEq for PixelGrid {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions() == other.dimensions() && self.as_raw() == other.as_raw()
    }
}

impl Eq for PixelGrid {}

/// Inclusive pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
}

impl BoundingBox {
    pub fn new(min_x: u32, max_x: u32, min_y: u32, max_y: u32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    pub fn offset(&self, dx: u32, dy: u32) -> Self {
        Self::new(
            self.min_x + dx,
            self.max_x + dx,
            self.min_y + dy,
            self.max_y + dy,
        )
    }

    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y && self.max_x < width && self.max_y < height
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}..={}]x[{}..={}]",
            self.min_x, self.max_x, self.min_y, self.max_y
        )
    }
}
