//! Grid decimation
//!
//! Re-samples an image on a coarser grid by keeping every n-th row and
//! column, starting at the origin cell.

use ndarray::Array2;
use pelagis_core::raster::{Raster, RasterElement};
use pelagis_core::{Error, Result};

/// Keep every `factor`-th row and column of a raster.
///
/// The output transform keeps the same origin with cells `factor` times
/// larger; the no-data value is carried over. A factor of 1 returns a copy.
///
/// # Arguments
/// * `raster` - Input raster
/// * `factor` - Decimation stride, must be at least 1
pub fn decimate<T: RasterElement>(raster: &Raster<T>, factor: usize) -> Result<Raster<T>> {
    if factor == 0 {
        return Err(Error::InvalidParameter {
            name: "factor",
            value: factor.to_string(),
            reason: "decimation stride must be at least 1".into(),
        });
    }
    if raster.is_empty() {
        return Err(Error::InvalidDimensions {
            rows: raster.rows(),
            cols: raster.cols(),
        });
    }

    let (rows, cols) = raster.shape();
    let out_rows = rows.div_ceil(factor);
    let out_cols = cols.div_ceil(factor);

    let mut data = Array2::<T>::zeros((out_rows, out_cols));
    for out_row in 0..out_rows {
        for out_col in 0..out_cols {
            data[(out_row, out_col)] =
                unsafe { raster.get_unchecked(out_row * factor, out_col * factor) };
        }
    }

    let mut output = raster.with_same_meta::<T>(out_rows, out_cols);
    output.set_transform(raster.transform().coarsened(factor));
    output.set_nodata(raster.nodata());
    *output.data_mut() = data;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting_raster(rows: usize, cols: usize) -> Raster<f64> {
        let values: Vec<f64> = (0..rows * cols).map(|v| v as f64).collect();
        Raster::from_vec(values, rows, cols).unwrap()
    }

    #[test]
    fn test_decimate_shape_and_values() {
        let r = counting_raster(10, 10);
        let d = decimate(&r, 3).unwrap();

        assert_eq!(d.shape(), (4, 4));
        assert_eq!(d.get(0, 0).unwrap(), 0.0);
        assert_eq!(d.get(1, 0).unwrap(), 30.0);
        assert_eq!(d.get(0, 1).unwrap(), 3.0);
        assert_eq!(d.get(3, 3).unwrap(), 99.0);
    }

    #[test]
    fn test_decimate_identity() {
        let r = counting_raster(4, 5);
        let d = decimate(&r, 1).unwrap();
        assert_eq!(d.shape(), r.shape());
        assert_eq!(d.get(3, 4).unwrap(), r.get(3, 4).unwrap());
    }

    #[test]
    fn test_decimate_scales_transform() {
        let mut r = counting_raster(8, 8);
        r.set_transform(pelagis_core::GeoTransform::new(0.0, 8.0, 1.0, -1.0));
        let d = decimate(&r, 2).unwrap();
        assert_eq!(d.transform().pixel_width, 2.0);
        assert_eq!(d.transform().pixel_height, -2.0);
    }

    #[test]
    fn test_decimate_zero_factor() {
        let r = counting_raster(4, 4);
        assert!(decimate(&r, 0).is_err());
    }
}
