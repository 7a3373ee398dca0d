use crate::preprocessing::grid::TRANSPARENT;
use crate::preprocessing::{Color, PixelGrid};

/// Paint every visible pixel with `ink`, keeping its alpha
///
/// Gives the recognizer uniform glyphs regardless of anti-aliasing colors.
pub fn flatten_foreground(grid: &PixelGrid, ink: Color) -> PixelGrid {
    PixelGrid::from_fn(grid.width(), grid.height(), |x, y| {
        let px = grid.pixel(x, y);
        if px[3] > 0 {
            [ink.r, ink.g, ink.b, px[3]]
        } else {
            TRANSPARENT
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_paints_visible_pixels() {
        let mut grid = PixelGrid::new(3, 1);
        grid.put_pixel(0, 0, [200, 180, 160, 255]);
        grid.put_pixel(1, 0, [50, 60, 70, 40]);
        grid.put_pixel(2, 0, [90, 90, 90, 0]);

        let out = flatten_foreground(&grid, Color::BLACK);
        assert_eq!(out.pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(out.pixel(1, 0), [0, 0, 0, 40]);
        assert_eq!(out.pixel(2, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_flatten_preserves_bounding_box() {
        let mut grid = PixelGrid::new(5, 5);
        grid.put_pixel(1, 1, [1, 2, 3, 255]);
        grid.put_pixel(3, 4, [4, 5, 6, 255]);

        let out = flatten_foreground(&grid, Color::new(10, 20, 30));
        assert_eq!(out.bounding_box(), grid.bounding_box());
        assert_eq!(out.pixel(3, 4), [10, 20, 30, 255]);
    }
}
