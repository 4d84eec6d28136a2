//! Geographic subsetting of lat/lon-gridded imagery
//!
//! Locates the index window of an image covering a geographic extent by
//! matching the extent corners against the image's latitude/longitude
//! grids with a spheric distance search. Intended for swath and granule
//! data whose coordinate grids are not regular, where a plain affine
//! lookup cannot be used.

use crate::maybe_rayon::*;
use ndarray::Array2;
use pelagis_core::geodesy::{spheric_distance, DistanceMode};
use pelagis_core::raster::{Raster, RasterElement};
use pelagis_core::{Error, Result};

/// Decimation stride applied to the along-track axis of swath grids
/// before the corner search.
const SWATH_STRIDE: usize = 10;

/// How many extent corners anchor the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Corners {
    /// Bottom-left and top-right corners only
    #[default]
    Two,
    /// All four corners
    Four,
}

/// Parameters for the geographic subset search
#[derive(Debug, Clone, Default)]
pub struct SubsetParams {
    /// Corner anchoring mode
    pub corners: Corners,
    /// Distance computation mode
    pub mode: DistanceMode,
    /// Treat the image as half/full-orbit swath data: decimate the longest
    /// axis before searching, then rescale the found indices.
    pub swath: bool,
}

/// Geographic extent in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoExtent {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

/// Inclusive index window into a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridWindow {
    pub row_min: usize,
    pub row_max: usize,
    pub col_min: usize,
    pub col_max: usize,
}

/// Find the index window of a lat/lon-gridded image covering an extent.
///
/// Each requested extent corner is matched to its nearest grid cell by
/// spheric distance; the window is the bounding box of the matched cells
/// (both bounds inclusive).
///
/// # Arguments
/// * `lat` - Per-cell latitudes in decimal degrees
/// * `lon` - Per-cell longitudes, same shape as `lat`
/// * `extent` - Geographic extent to cover
/// * `params` - Corner mode, distance mode, swath handling
pub fn geographic_subset(
    lat: &Raster<f64>,
    lon: &Raster<f64>,
    extent: GeoExtent,
    params: &SubsetParams,
) -> Result<GridWindow> {
    if lat.is_empty() {
        return Err(Error::InvalidDimensions {
            rows: lat.rows(),
            cols: lat.cols(),
        });
    }
    if lat.shape() != lon.shape() {
        return Err(Error::SizeMismatch {
            er: lat.rows(),
            ec: lat.cols(),
            ar: lon.rows(),
            ac: lon.cols(),
        });
    }
    if extent.lat_min >= extent.lat_max {
        return Err(Error::InvalidParameter {
            name: "extent",
            value: format!("lat {}..{}", extent.lat_min, extent.lat_max),
            reason: "lat_min must be below lat_max".into(),
        });
    }

    let (rows, cols) = lat.shape();

    // Swath grids are too large to search densely: decimate the along-track
    // (longest) axis, search the reduced grid, then rescale the indices.
    let along_rows = rows >= cols;
    let (search_lat, search_lon) = if params.swath {
        if along_rows {
            (stride_rows(lat, SWATH_STRIDE), stride_rows(lon, SWATH_STRIDE))
        } else {
            (stride_cols(lat, SWATH_STRIDE), stride_cols(lon, SWATH_STRIDE))
        }
    } else {
        (lat.clone(), lon.clone())
    };

    // Corner order: bottom-left, bottom-right, top-right, top-left
    let targets = [
        (extent.lat_min, extent.lon_min),
        (extent.lat_min, extent.lon_max),
        (extent.lat_max, extent.lon_max),
        (extent.lat_max, extent.lon_min),
    ];

    let mut corner_cells = [(0usize, 0usize); 4];
    for (cell, &(t_lat, t_lon)) in corner_cells.iter_mut().zip(&targets) {
        *cell = nearest_cell(&search_lat, &search_lon, t_lat, t_lon, params.mode)?;
    }

    if params.swath {
        for (row, col) in corner_cells.iter_mut() {
            if along_rows {
                *row = (*row * SWATH_STRIDE).min(rows - 1);
            } else {
                *col = (*col * SWATH_STRIDE).min(cols - 1);
            }
        }
    }

    let anchors: Vec<(usize, usize)> = match params.corners {
        // Bottom-left and top-right span the box
        Corners::Two => vec![corner_cells[0], corner_cells[2]],
        Corners::Four => corner_cells.to_vec(),
    };

    Ok(GridWindow {
        row_min: anchors.iter().map(|&(r, _)| r).min().unwrap(),
        row_max: anchors.iter().map(|&(r, _)| r).max().unwrap(),
        col_min: anchors.iter().map(|&(_, c)| c).min().unwrap(),
        col_max: anchors.iter().map(|&(_, c)| c).max().unwrap(),
    })
}

/// Extract the cells of a window as a new raster.
///
/// Both window bounds are inclusive. The window must lie within the raster.
pub fn extract_window<T: RasterElement>(
    raster: &Raster<T>,
    window: &GridWindow,
) -> Result<Raster<T>> {
    if window.row_min > window.row_max
        || window.col_min > window.col_max
        || window.row_max >= raster.rows()
        || window.col_max >= raster.cols()
    {
        return Err(Error::IndexOutOfBounds {
            row: window.row_max,
            col: window.col_max,
            rows: raster.rows(),
            cols: raster.cols(),
        });
    }

    let out_rows = window.row_max - window.row_min + 1;
    let out_cols = window.col_max - window.col_min + 1;

    let mut data = Array2::<T>::zeros((out_rows, out_cols));
    for row in 0..out_rows {
        for col in 0..out_cols {
            data[(row, col)] =
                unsafe { raster.get_unchecked(window.row_min + row, window.col_min + col) };
        }
    }

    let mut output = raster.with_same_meta::<T>(out_rows, out_cols);
    output.set_nodata(raster.nodata());
    *output.data_mut() = data;

    Ok(output)
}

/// Nearest grid cell to a lat/lon point by spheric distance.
fn nearest_cell(
    lat: &Raster<f64>,
    lon: &Raster<f64>,
    target_lat: f64,
    target_lon: f64,
    mode: DistanceMode,
) -> Result<(usize, usize)> {
    let (rows, cols) = lat.shape();

    let best = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_best: Option<(f64, usize, usize)> = None;
            for col in 0..cols {
                let cell_lat = unsafe { lat.get_unchecked(row, col) };
                let cell_lon = unsafe { lon.get_unchecked(row, col) };
                if cell_lat.is_nan() || cell_lon.is_nan() {
                    continue;
                }

                let d = spheric_distance(target_lat, target_lon, cell_lat, cell_lon, mode);
                if d.is_nan() {
                    continue;
                }
                if row_best.is_none_or(|(bd, _, _)| d < bd) {
                    row_best = Some((d, row, col));
                }
            }
            row_best
        })
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    best.map(|(_, row, col)| (row, col))
        .ok_or_else(|| Error::Algorithm("no valid coordinates in lat/lon grids".into()))
}

fn stride_rows(raster: &Raster<f64>, step: usize) -> Raster<f64> {
    let (rows, cols) = raster.shape();
    let out_rows = rows.div_ceil(step);

    let mut data = Array2::<f64>::zeros((out_rows, cols));
    for row in 0..out_rows {
        for col in 0..cols {
            data[(row, col)] = unsafe { raster.get_unchecked(row * step, col) };
        }
    }

    let mut output = raster.with_same_meta::<f64>(out_rows, cols);
    *output.data_mut() = data;
    output
}

fn stride_cols(raster: &Raster<f64>, step: usize) -> Raster<f64> {
    let (rows, cols) = raster.shape();
    let out_cols = cols.div_ceil(step);

    let mut data = Array2::<f64>::zeros((rows, out_cols));
    for row in 0..rows {
        for col in 0..out_cols {
            data[(row, col)] = unsafe { raster.get_unchecked(row, col * step) };
        }
    }

    let mut output = raster.with_same_meta::<f64>(rows, out_cols);
    *output.data_mut() = data;
    output
}
