use crate::error::{NormalizeError, Result};
use crate::preprocessing::PixelGrid;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

/// Decode compressed image bytes into an RGBA grid
///
/// Any format the `image` crate can sniff is accepted; the result is always RGBA8.
pub fn decode(bytes: &[u8]) -> Result<PixelGrid> {
    if bytes.is_empty() {
        return Err(NormalizeError::Decode("empty input".to_string()));
    }

    let image = image::load_from_memory(bytes)
        .map_err(|e| NormalizeError::Decode(e.to_string()))?
        .into_rgba8();

    Ok(PixelGrid::from(image))
}

/// Encode a grid as an RGBA8 PNG
pub fn encode(grid: &PixelGrid) -> Result<Vec<u8>> {
    if grid.is_empty() {
        return Err(NormalizeError::Encode(format!(
            "cannot encode {}x{} image",
            grid.width(),
            grid.height()
        )));
    }

    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(
            grid.as_raw(),
            grid.width(),
            grid.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| NormalizeError::Encode(e.to_string()))?;

    Ok(buffer)
}
