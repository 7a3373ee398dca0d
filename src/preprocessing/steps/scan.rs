use crate::preprocessing::{ColorMatchPolicy, PixelGrid};

/// Index of the first column, scanning left to right, holding a pixel that
/// matches the marker policy
pub fn find_marker_column(grid: &PixelGrid, marker: &ColorMatchPolicy) -> Option<u32> {
    (0..grid.width()).find(|&x| (0..grid.height()).any(|y| marker.matches(&grid.pixel(x, y))))
}
