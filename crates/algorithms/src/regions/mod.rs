//! Region analysis on cell masks
//!
//! - **label**: Connected-component labeling (4- or 8-connectivity)
//! - **gapfill**: Artifact gap filling from region perimeter estimates

mod gapfill;
mod label;

pub use gapfill::{gap_fill, gap_fill_with, perimeter_mean, GapFill, GapFillParams};
pub use label::label_components;
