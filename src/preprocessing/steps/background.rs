use crate::error::{NormalizeError, Result};
use crate::preprocessing::grid::TRANSPARENT;
use crate::preprocessing::{ColorMatchPolicy, PixelGrid};
use serde::Serialize;

use super::pad::{self, Margins};

/// Diagnostics from a background removal pass
///
/// Advisory only: the returned grid never depends on these numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemovalStats {
    /// Pixels that were classified (the retained window when recentering)
    pub total_pixels: u64,
    /// Pixels matching the background policy
    pub background_pixels: u64,
    /// Pixels copied through unchanged
    pub preserved_pixels: u64,
    pub original_width: u32,
    pub output_width: u32,
    /// Inclusive `(leftmost, rightmost)` content columns, set when recentering
    pub content_columns: Option<(u32, u32)>,
}

impl RemovalStats {
    pub fn preserved_percent(&self) -> f64 {
        if self.total_pixels == 0 {
            return 0.0;
        }
        self.preserved_pixels as f64 / self.total_pixels as f64 * 100.0
    }
}

/// Replace background pixels with full transparency
///
/// A pixel survives when it does not match `background` and has non-zero alpha;
/// everything else becomes `(0, 0, 0, 0)`. With `recenter`, columns outside the
/// leftmost/rightmost surviving pixels are dropped and the remaining window is
/// centered with `floor((width - content_width) / 2)` transparent columns on
/// each side.
pub fn remove_background(
    grid: &PixelGrid,
    background: &ColorMatchPolicy,
    recenter: bool,
) -> Result<(PixelGrid, RemovalStats)> {
    let (width, height) = grid.dimensions();
    let keep = |px: &[u8]| px[3] > 0 && !background.matches(px);

    let (left, window, padding) = if recenter {
        let (left, right) = content_columns(grid, &keep).ok_or(NormalizeError::EmptyContent {
            stage: "background removal",
            width,
            height,
        })?;
        let content_width = right - left + 1;
        (left, content_width, (width - content_width) / 2)
    } else {
        (0, width, 0)
    };

    let mut stats = RemovalStats {
        original_width: width,
        output_width: window + 2 * padding,
        content_columns: recenter.then(|| (left, left + window - 1)),
        ..Default::default()
    };

    let cleaned = PixelGrid::from_fn(window, height, |x, y| {
        let px = grid.pixel(left + x, y);
        stats.total_pixels += 1;
        if background.matches(&px) {
            stats.background_pixels += 1;
        }
        if keep(&px) {
            stats.preserved_pixels += 1;
            px
        } else {
            TRANSPARENT
        }
    });

    if padding == 0 {
        return Ok((cleaned, stats));
    }
    let centered = pad::pad(
        &cleaned,
        Margins {
            left: padding,
            right: padding,
            ..Default::default()
        },
    )?;
    Ok((centered, stats))
}

/// Leftmost and rightmost columns holding at least one kept pixel
fn content_columns<F>(grid: &PixelGrid, keep: &F) -> Option<(u32, u32)>
where
    F: Fn(&[u8]) -> bool,
{
    grid.as_image()
        .enumerate_pixels()
        .filter(|(_, _, px)| keep(&px.0))
        .fold(None, |bounds, (x, _, _)| {
            Some(match bounds {
                None => (x, x),
                Some((l, r)) => (l.min(x), r.max(x)),
            })
        })
}
