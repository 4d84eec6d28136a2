//! Imagery preparation algorithms
//!
//! Routines that prepare satellite measurement fields for display:
//! - Normalization: min-max stretch to [0, 1] with contrast exponents
//! - Percentile truncation: outlier clamping
//! - Decimation: coarse re-sampling
//! - Geographic subsetting: extent-to-index window search on lat/lon grids

mod normalize;
mod resample;
mod subset;
mod truncate;

pub use normalize::{normalize_bands, NormalizeParams};
pub use resample::decimate;
pub use subset::{
    extract_window, geographic_subset, Corners, GeoExtent, GridWindow, SubsetParams,
};
pub use truncate::percentile_clip;
