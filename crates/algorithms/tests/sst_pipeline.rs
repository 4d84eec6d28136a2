//! End-to-end preparation of a synthetic SST scene:
//! gap-fill artifacts, clamp outliers, normalize, and cut a geographic
//! subset from the lat/lon grids.

use pelagis_algorithms::imagery::{
    extract_window, geographic_subset, normalize_bands, percentile_clip, GeoExtent,
    NormalizeParams, SubsetParams,
};
use pelagis_algorithms::regions::gap_fill;
use pelagis_core::Raster;

const ROWS: usize = 20;
const COLS: usize = 30;

/// SST field warming from 12 to 28 degrees along the columns, with a 3x3
/// artifact block, an isolated artifact cell, and one hot outlier.
fn synthetic_sst() -> Raster<f64> {
    let mut sst: Raster<f64> = Raster::new(ROWS, COLS);
    for row in 0..ROWS {
        for col in 0..COLS {
            let t = 12.0 + 16.0 * col as f64 / (COLS - 1) as f64;
            sst.set(row, col, t).unwrap();
        }
    }

    for row in 5..8 {
        for col in 10..13 {
            sst.set(row, col, -32768.0).unwrap();
        }
    }
    sst.set(15, 25, -1.0).unwrap();
    sst.set(2, 2, 60.0).unwrap();

    sst
}

fn coordinate_grids() -> (Raster<f64>, Raster<f64>) {
    let mut lat: Raster<f64> = Raster::new(ROWS, COLS);
    let mut lon: Raster<f64> = Raster::new(ROWS, COLS);
    for row in 0..ROWS {
        for col in 0..COLS {
            lat.set(row, col, 45.0 - 0.1 * row as f64).unwrap();
            lon.set(row, col, -10.0 + 0.1 * col as f64).unwrap();
        }
    }
    (lat, lon)
}

#[test]
fn prepare_scene_for_display() {
    let sst = synthetic_sst();

    // 1. Fill retrieval artifacts
    let filled = gap_fill(&sst).unwrap();

    for row in 0..ROWS {
        for col in 0..COLS {
            let v = filled.get(row, col).unwrap();
            assert!(!v.is_nan(), "cell ({row}, {col}) left unfilled");
            assert!(v >= 0.0, "cell ({row}, {col}) still negative");
        }
    }

    // The block takes one shared fill value close to the surrounding field
    let block_fill = filled.get(6, 11).unwrap();
    assert_eq!(filled.get(5, 10).unwrap(), block_fill);
    assert_eq!(filled.get(7, 12).unwrap(), block_fill);
    assert!(
        (16.0..=21.0).contains(&block_fill),
        "block fill {block_fill} should sit in the local field range"
    );

    // The isolated artifact recovers the local gradient value
    let lone_fill = filled.get(15, 25).unwrap();
    let local = 12.0 + 16.0 * 25.0 / (COLS - 1) as f64;
    assert!(
        (lone_fill - local).abs() < 0.5,
        "lone fill {lone_fill} should be near {local}"
    );

    // 2. Clamp the hot outlier
    let clipped = percentile_clip(&filled, 2.0, 98.0).unwrap();
    assert!(
        clipped.get(2, 2).unwrap() <= 28.0,
        "outlier survived percentile clamp"
    );

    // 3. Normalize for display
    let normalized = normalize_bands(
        std::slice::from_ref(&clipped),
        &NormalizeParams::default(),
    )
    .unwrap();
    let (min, max) = normalized[0].value_range().unwrap();
    assert!((min - 0.0).abs() < 1e-12 && (max - 1.0).abs() < 1e-12);
}

#[test]
fn cut_geographic_subset() {
    let sst = synthetic_sst();
    let (lat, lon) = coordinate_grids();

    let extent = GeoExtent {
        lon_min: -9.0,
        lon_max: -8.5,
        lat_min: 44.0,
        lat_max: 44.5,
    };

    let window = geographic_subset(&lat, &lon, extent, &SubsetParams::default()).unwrap();
    assert_eq!((window.row_min, window.row_max), (5, 10));
    assert_eq!((window.col_min, window.col_max), (10, 15));

    let sub = extract_window(&sst, &window).unwrap();
    assert_eq!(sub.shape(), (6, 6));
    // Top-left of the window is scene cell (5, 10), inside the artifact block
    assert_eq!(sub.get(0, 0).unwrap(), -32768.0);
    // Bottom-right is plain gradient
    let expected = 12.0 + 16.0 * 15.0 / (COLS - 1) as f64;
    assert!((sub.get(5, 5).unwrap() - expected).abs() < 1e-12);
}
