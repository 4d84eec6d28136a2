//! Affine geotransformation for rasters

use serde::{Deserialize, Serialize};

/// Affine transformation for north-up rasters.
///
/// Converts between pixel coordinates (col, row) and geographic coordinates
/// (x, y):
/// ```text
/// x = origin_x + col * pixel_width
/// y = origin_y + row * pixel_height
/// ```
///
/// `pixel_height` is negative for the usual top-down row order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Pixel width (cell size in X direction)
    pub pixel_width: f64,
    /// Pixel height (cell size in Y direction, usually negative)
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Create a new GeoTransform
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
        }
    }

    /// Convert pixel coordinates to geographic coordinates
    ///
    /// Returns the coordinates of the pixel center
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        let x = self.origin_x + (col as f64 + 0.5) * self.pixel_width;
        let y = self.origin_y + (row as f64 + 0.5) * self.pixel_height;
        (x, y)
    }

    /// Convert geographic coordinates to fractional pixel coordinates
    ///
    /// Use `.floor()` on the results to get integer indices. Returns NaN
    /// coordinates for a degenerate (zero pixel size) transform.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        if self.pixel_width.abs() < 1e-12 || self.pixel_height.abs() < 1e-12 {
            return (f64::NAN, f64::NAN);
        }

        let col = (x - self.origin_x) / self.pixel_width;
        let row = (y - self.origin_y) / self.pixel_height;
        (col, row)
    }

    /// Get the cell size (assumes square pixels)
    pub fn cell_size(&self) -> f64 {
        self.pixel_width.abs()
    }

    /// Return a transform covering the same origin with cells `factor`
    /// times larger in both directions.
    pub fn coarsened(&self, factor: usize) -> Self {
        Self {
            origin_x: self.origin_x,
            origin_y: self.origin_y,
            pixel_width: self.pixel_width * factor as f64,
            pixel_height: self.pixel_height * factor as f64,
        }
    }

    /// Calculate the bounding box (min_x, min_y, max_x, max_y) for a raster
    /// of the given dimensions.
    pub fn bounds(&self, width: usize, height: usize) -> (f64, f64, f64, f64) {
        let x0 = self.origin_x;
        let x1 = self.origin_x + width as f64 * self.pixel_width;
        let y0 = self.origin_y;
        let y1 = self.origin_y + height as f64 * self.pixel_height;

        (x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pixel_to_geo_roundtrip() {
        let gt = GeoTransform::new(100.0, 200.0, 10.0, -10.0);

        let (x, y) = gt.pixel_to_geo(5, 10);
        let (col, row) = gt.geo_to_pixel(x, y);

        assert_relative_eq!(col, 5.5, epsilon = 1e-10);
        assert_relative_eq!(row, 10.5, epsilon = 1e-10);
    }

    #[test]
    fn test_bounds() {
        let gt = GeoTransform::new(0.0, 100.0, 1.0, -1.0);
        let (min_x, min_y, max_x, max_y) = gt.bounds(100, 100);

        assert_relative_eq!(min_x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(min_y, 0.0, epsilon = 1e-10);
        assert_relative_eq!(max_x, 100.0, epsilon = 1e-10);
        assert_relative_eq!(max_y, 100.0, epsilon = 1e-10);
    }

    #[test]
    fn test_coarsened() {
        let gt = GeoTransform::new(10.0, 20.0, 0.5, -0.5);
        let c = gt.coarsened(4);
        assert_relative_eq!(c.pixel_width, 2.0, epsilon = 1e-12);
        assert_relative_eq!(c.pixel_height, -2.0, epsilon = 1e-12);
        assert_relative_eq!(c.origin_x, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_geo_to_pixel() {
        let gt = GeoTransform::new(0.0, 0.0, 0.0, -1.0);
        let (col, row) = gt.geo_to_pixel(5.0, 5.0);
        assert!(col.is_nan() && row.is_nan());
    }
}
