//! # Pelagis Algorithms
//!
//! Ocean imagery preparation algorithms for Pelagis.
//!
//! ## Available Algorithm Categories
//!
//! - **regions**: Connected-component labeling, artifact gap filling
//! - **imagery**: Normalization, percentile truncation, decimation,
//!   geographic subsetting

pub mod imagery;
pub mod regions;

mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::imagery::{
        decimate, extract_window, geographic_subset, normalize_bands, percentile_clip, Corners,
        GeoExtent, GridWindow, NormalizeParams, SubsetParams,
    };
    pub use crate::regions::{
        gap_fill, gap_fill_with, label_components, perimeter_mean, GapFill, GapFillParams,
    };
    pub use pelagis_core::prelude::*;
}
