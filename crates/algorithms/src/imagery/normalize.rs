//! Image normalization
//!
//! Min-max normalization of multi-band images to [0, 1] with a per-band
//! contrast exponent. Bands can be normalized independently (each band
//! stretched to its own range) or jointly (one range across all bands,
//! preserving inter-band relations).

use crate::maybe_rayon::*;
use ndarray::Array2;
use pelagis_core::raster::Raster;
use pelagis_core::{Error, Result};

/// Parameters for image normalization
#[derive(Debug, Clone)]
pub struct NormalizeParams {
    /// Per-band contrast exponents applied after scaling to [0, 1].
    /// Empty means 1.0 (linear) for every band; otherwise the length must
    /// match the band count and every exponent must be finite and positive.
    pub contrast: Vec<f64>,
    /// Normalize each band against its own range rather than the joint
    /// range of all bands.
    pub independent: bool,
}

impl Default for NormalizeParams {
    fn default() -> Self {
        Self {
            contrast: Vec::new(),
            independent: true,
        }
    }
}

/// Normalize image bands to [0, 1] with optional contrast stretch.
///
/// In independent mode each band is scaled by its own valid min/max and the
/// contrast exponent is applied; the result stays within [0, 1]. In joint
/// mode one min/max over all bands scales every band, contrast is applied,
/// and a second joint pass renormalizes to [0, 1].
///
/// NaN cells are preserved. A band with no valid cells is an error in
/// independent mode; in joint mode it simply contributes nothing to the
/// joint range (and remains NaN in the output).
pub fn normalize_bands(
    bands: &[Raster<f64>],
    params: &NormalizeParams,
) -> Result<Vec<Raster<f64>>> {
    if bands.is_empty() {
        return Err(Error::InvalidParameter {
            name: "bands",
            value: "[]".into(),
            reason: "at least one band is required".into(),
        });
    }

    let shape = bands[0].shape();
    for band in &bands[1..] {
        if band.shape() != shape {
            return Err(Error::SizeMismatch {
                er: shape.0,
                ec: shape.1,
                ar: band.rows(),
                ac: band.cols(),
            });
        }
    }

    let contrast = resolve_contrast(&params.contrast, bands.len())?;

    if params.independent {
        bands
            .iter()
            .zip(&contrast)
            .map(|(band, &c)| {
                let (min, max) = band
                    .value_range()
                    .ok_or_else(|| Error::Algorithm("band has no valid cells".into()))?;
                if max <= min {
                    return Err(Error::Algorithm("band has no value range".into()));
                }
                map_band(band, |v| ((v - min) / (max - min)).powf(c))
            })
            .collect()
    } else {
        let (min, max) = joint_range(bands)
            .ok_or_else(|| Error::Algorithm("no band has valid cells".into()))?;
        if max <= min {
            return Err(Error::Algorithm("bands have no joint value range".into()));
        }

        let scaled: Vec<Raster<f64>> = bands
            .iter()
            .zip(&contrast)
            .map(|(band, &c)| map_band(band, |v| ((v - min) / (max - min)).powf(c)))
            .collect::<Result<_>>()?;

        // Contrast shifts values inside the joint range, so stretch back
        // to [0, 1] with a second joint pass.
        let (min2, max2) = joint_range(&scaled)
            .ok_or_else(|| Error::Algorithm("no band has valid cells".into()))?;
        if max2 <= min2 {
            return Err(Error::Algorithm("bands have no joint value range".into()));
        }

        scaled
            .iter()
            .map(|band| map_band(band, |v| (v - min2) / (max2 - min2)))
            .collect()
    }
}

fn resolve_contrast(contrast: &[f64], band_count: usize) -> Result<Vec<f64>> {
    if contrast.is_empty() {
        return Ok(vec![1.0; band_count]);
    }
    if contrast.len() != band_count {
        return Err(Error::InvalidParameter {
            name: "contrast",
            value: format!("{} exponents", contrast.len()),
            reason: format!("expected one exponent per band ({band_count})"),
        });
    }
    for &c in contrast {
        if !c.is_finite() || c <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "contrast",
                value: c.to_string(),
                reason: "exponents must be finite and positive".into(),
            });
        }
    }
    Ok(contrast.to_vec())
}

fn joint_range(bands: &[Raster<f64>]) -> Option<(f64, f64)> {
    let mut joint: Option<(f64, f64)> = None;
    for band in bands {
        if let Some((min, max)) = band.value_range() {
            joint = Some(match joint {
                Some((jmin, jmax)) => (jmin.min(min), jmax.max(max)),
                None => (min, max),
            });
        }
    }
    joint
}

fn map_band<F>(band: &Raster<f64>, f: F) -> Result<Raster<f64>>
where
    F: Fn(f64) -> f64 + Sync + Send,
{
    let (rows, cols) = band.shape();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];
            for (col, out) in row_data.iter_mut().enumerate() {
                let v = unsafe { band.get_unchecked(row, col) };
                if v.is_nan() {
                    continue;
                }
                *out = f(v);
            }
            row_data
        })
        .collect();

    let mut output = band.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(f64::NAN));
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;

    Ok(output)
}
