use crate::error::{NormalizeError, Result};
use crate::preprocessing::{BoundingBox, PixelGrid};
use image::imageops;

/// Keep columns `[start, width)`, copying pixels verbatim
///
/// `start == 0` returns an identical grid, including for empty grids.
pub fn crop_columns(grid: &PixelGrid, start: u32) -> Result<PixelGrid> {
    let (width, height) = grid.dimensions();
    if start == 0 {
        return Ok(grid.clone());
    }
    if start >= width {
        return Err(NormalizeError::CropOutOfBounds {
            region: format!("columns [{}..{})", start, width),
            width,
            height,
        });
    }

    let cropped = imageops::crop_imm(grid.as_image(), start, 0, width - start, height).to_image();
    Ok(PixelGrid::from(cropped))
}

/// Copy exactly the pixels inside `bbox`
pub fn crop_to_box(grid: &PixelGrid, bbox: &BoundingBox) -> Result<PixelGrid> {
    let (width, height) = grid.dimensions();
    if !bbox.fits_within(width, height) {
        return Err(NormalizeError::CropOutOfBounds {
            region: bbox.to_string(),
            width,
            height,
        });
    }

    let cropped = imageops::crop_imm(
        grid.as_image(),
        bbox.min_x,
        bbox.min_y,
        bbox.width(),
        bbox.height(),
    )
    .to_image();
    Ok(PixelGrid::from(cropped))
}

/// Crop to the bounding box of non-transparent pixels
pub fn crop_to_content(grid: &PixelGrid) -> Result<PixelGrid> {
    let bbox = grid
        .bounding_box()
        .ok_or(NormalizeError::EmptyContent {
            stage: "bounding box crop",
            width: grid.width(),
            height: grid.height(),
        })?;
    crop_to_box(grid, &bbox)
}
