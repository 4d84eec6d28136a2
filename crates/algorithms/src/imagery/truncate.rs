//! Percentile truncation
//!
//! Clamps outliers to percentile bounds before display. The usual contrast
//! stretch for satellite channels: values below the lower percentile and
//! above the upper percentile are pinned to those percentiles.

use crate::maybe_rayon::*;
use ndarray::Array2;
use pelagis_core::raster::Raster;
use pelagis_core::{Error, Result};

/// Clamp a raster's values to the given percentile bounds.
///
/// Percentiles are computed over valid (non-NaN) cells with the
/// nearest-rank method. NaN cells are preserved.
///
/// # Arguments
/// * `raster` - Input raster
/// * `min_percentile` - Lower bound percentile (0-100)
/// * `max_percentile` - Upper bound percentile (0-100), must exceed the lower
///
/// # Returns
/// Raster with values clamped to [p_min, p_max]
pub fn percentile_clip(
    raster: &Raster<f64>,
    min_percentile: f64,
    max_percentile: f64,
) -> Result<Raster<f64>> {
    if raster.is_empty() {
        return Err(Error::InvalidDimensions {
            rows: raster.rows(),
            cols: raster.cols(),
        });
    }
    if !(0.0..=100.0).contains(&min_percentile)
        || !(0.0..=100.0).contains(&max_percentile)
        || min_percentile >= max_percentile
    {
        return Err(Error::InvalidParameter {
            name: "percentiles",
            value: format!("{min_percentile}..{max_percentile}"),
            reason: "must be within 0-100 with min < max".into(),
        });
    }

    let mut values: Vec<f64> = raster.data().iter().copied().filter(|v| !v.is_nan()).collect();
    if values.is_empty() {
        return Err(Error::Algorithm("no valid cells to clip".into()));
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let low = nearest_rank(&values, min_percentile);
    let high = nearest_rank(&values, max_percentile);

    let (rows, cols) = raster.shape();
    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];
            for (col, out) in row_data.iter_mut().enumerate() {
                let v = unsafe { raster.get_unchecked(row, col) };
                if v.is_nan() {
                    continue;
                }
                *out = v.clamp(low, high);
            }
            row_data
        })
        .collect();

    let mut output = raster.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(f64::NAN));
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;

    Ok(output)
}

fn nearest_rank(sorted: &[f64], percentile: f64) -> f64 {
    let idx = (percentile / 100.0 * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}
