//! Artifact gap filling
//!
//! Fills connected regions of invalid samples (negative values) with an
//! estimate derived from each region's surrounding valid perimeter.
//! Typical use is removing retrieval artifacts from satellite-derived
//! measurement fields before display.

use crate::regions::label_components;
use pelagis_core::raster::{Neighborhood, NeighborhoodIterator, Raster};
use pelagis_core::{Algorithm, Error, Result};

/// Parameters for gap filling
#[derive(Debug, Clone)]
pub struct GapFillParams {
    /// Regions whose cell count exceeds this fraction of the grid are
    /// considered real features rather than artifacts and left unfilled.
    /// The comparison is strict: a region at exactly the threshold is
    /// still filled.
    pub max_region_fraction: f64,
}

impl Default for GapFillParams {
    fn default() -> Self {
        Self {
            max_region_fraction: 0.5,
        }
    }
}

/// Artifact gap-fill algorithm
#[derive(Debug, Clone, Default)]
pub struct GapFill;

impl Algorithm for GapFill {
    type Input = Raster<f64>;
    type Output = Raster<f64>;
    type Params = GapFillParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "GapFill"
    }

    fn description(&self) -> &'static str {
        "Fill artifact regions with the mean of their perimeter estimates"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        gap_fill_with(&input, params)
    }
}

/// NaN-aware mean of the 8 neighbors of a cell.
///
/// Neighbor positions falling outside the grid and NaN-valued neighbors
/// contribute nothing; if no neighbor contributes, the estimate is NaN.
pub fn perimeter_mean(raster: &Raster<f64>, row: usize, col: usize) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;

    for item in NeighborhoodIterator::new(raster, row, col, Neighborhood::Queen3x3) {
        if let Some((_, _, value)) = item
            && !value.is_nan()
        {
            sum += value;
            count += 1;
        }
    }

    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Fill artifact regions with default parameters.
///
/// See [`gap_fill_with`].
pub fn gap_fill(raster: &Raster<f64>) -> Result<Raster<f64>> {
    gap_fill_with(raster, GapFillParams::default())
}

/// Fill artifact regions of a measurement field.
///
/// Cells with negative values are invalid. Each 8-connected region of
/// invalid cells smaller than `max_region_fraction` of the grid is replaced
/// by a single value: the NaN-aware mean over the region's member cells of
/// each member's 8-neighbor mean ([`perimeter_mean`]). Larger regions are
/// left as NaN, as are regions with no valid perimeter at all.
///
/// The input raster is not modified; the returned raster carries the fills
/// with nodata set to NaN. Valid cells keep their original values. Regions
/// are processed in ascending label order (row-major discovery order), and
/// fills already written are visible to later regions' perimeter estimates.
///
/// # Arguments
/// * `raster` - Input measurement field; negative cells are artifacts
/// * `params` - Gap-fill parameters (region size threshold)
///
/// # Returns
/// Raster of identical shape with artifact regions filled
pub fn gap_fill_with(raster: &Raster<f64>, params: GapFillParams) -> Result<Raster<f64>> {
    if raster.is_empty() {
        return Err(Error::InvalidDimensions {
            rows: raster.rows(),
            cols: raster.cols(),
        });
    }
    if !params.max_region_fraction.is_finite()
        || params.max_region_fraction <= 0.0
        || params.max_region_fraction > 1.0
    {
        return Err(Error::InvalidParameter {
            name: "max_region_fraction",
            value: params.max_region_fraction.to_string(),
            reason: "must be in (0, 1]".into(),
        });
    }

    let (rows, cols) = raster.shape();

    // Invalidity mask and NaN-marked working copy. The mask drives the
    // labeling; the NaN marker keeps invalid cells out of neighbor means.
    let mut mask: Raster<u8> = raster.with_same_meta(rows, cols);
    let mut output = raster.clone();
    output.set_nodata(Some(f64::NAN));

    for row in 0..rows {
        for col in 0..cols {
            let value = unsafe { raster.get_unchecked(row, col) };
            if value < 0.0 {
                unsafe {
                    mask.set_unchecked(row, col, 1);
                    output.set_unchecked(row, col, f64::NAN);
                }
            }
        }
    }

    let (labels, component_count) = label_components(&mask, Neighborhood::Queen3x3)?;
    if component_count == 0 {
        return Ok(output);
    }

    // Member coordinates per region, one pass over the label grid.
    // Label 0 is the valid background and is never filled.
    let mut members: Vec<Vec<(usize, usize)>> = vec![Vec::new(); component_count];
    for row in 0..rows {
        for col in 0..cols {
            let label = unsafe { labels.get_unchecked(row, col) };
            if label > 0 {
                members[(label - 1) as usize].push((row, col));
            }
        }
    }

    let max_cells = rows as f64 * cols as f64 * params.max_region_fraction;

    for region in &members {
        if region.len() as f64 > max_cells {
            continue;
        }

        // Every member estimate is taken before the region's fill is written
        let mut sum = 0.0;
        let mut count = 0usize;
        for &(row, col) in region {
            let estimate = perimeter_mean(&output, row, col);
            if !estimate.is_nan() {
                sum += estimate;
                count += 1;
            }
        }

        let fill = if count == 0 { f64::NAN } else { sum / count as f64 };

        for &(row, col) in region {
            unsafe {
                output.set_unchecked(row, col, fill);
            }
        }
    }

    Ok(output)
}
