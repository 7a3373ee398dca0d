use crate::error::{NormalizeError, Result};
use crate::preprocessing::PixelGrid;
use image::imageops;

use super::crop;

/// Transparent margin widths on each side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Margins {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Margins {
    pub fn left(width: u32) -> Self {
        Self {
            left: width,
            ..Default::default()
        }
    }

    pub fn symmetric(horizontal: u32, vertical: u32) -> Self {
        Self {
            left: horizontal,
            right: horizontal,
            top: vertical,
            bottom: vertical,
        }
    }
}

/// Surround the grid with transparent margins, copying source pixels verbatim
///
/// Fails with `ImageTooLarge` when the padded size does not fit a grid.
pub fn pad(grid: &PixelGrid, margins: Margins) -> Result<PixelGrid> {
    let (width, height) = grid.dimensions();
    let new_width = margins.left as u64 + width as u64 + margins.right as u64;
    let new_height = margins.top as u64 + height as u64 + margins.bottom as u64;

    let mut padded = PixelGrid::try_new(new_width, new_height)?.into_image();
    imageops::replace(
        &mut padded,
        grid.as_image(),
        margins.left as i64,
        margins.top as i64,
    );
    Ok(PixelGrid::from(padded))
}

/// Add `padding` transparent columns on the left
pub fn pad_left(grid: &PixelGrid, padding: u32) -> Result<PixelGrid> {
    pad(grid, Margins::left(padding))
}

/// Crop to the non-transparent bounding box, then add `horizontal` columns on
/// both sides and `vertical` rows above and below
pub fn pad_around_content(grid: &PixelGrid, horizontal: u32, vertical: u32) -> Result<PixelGrid> {
    let content = crop::crop_to_content(grid).map_err(|e| match e {
        NormalizeError::EmptyContent { width, height, .. } => NormalizeError::EmptyContent {
            stage: "box padding",
            width,
            height,
        },
        other => other,
    })?;
    pad(&content, Margins::symmetric(horizontal, vertical))
}
