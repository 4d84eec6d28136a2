//! Cell element trait for generic raster values

use num_traits::{NumCast, Zero};
use std::fmt::Debug;

/// Trait for types that can be stored in a raster cell.
///
/// Bounds the types usable as cell values and defines how each type
/// expresses "no data". Floating point types treat NaN as no-data
/// unconditionally; integer types only match an explicit sentinel.
pub trait RasterElement:
    Copy + Clone + Debug + PartialOrd + PartialEq + NumCast + Zero + Send + Sync + 'static
{
    /// Default no-data value for this type
    fn default_nodata() -> Self;

    /// Check if this value represents no-data
    fn is_nodata(&self, nodata: Option<Self>) -> bool;

    /// Whether this type is a floating point type
    fn is_float() -> bool;

    /// Convert self to f64
    fn to_f64(self) -> Option<f64> {
        NumCast::from(self)
    }
}

macro_rules! impl_raster_element_int {
    ($($t:ty),*) => {$(
        impl RasterElement for $t {
            fn default_nodata() -> Self {
                <$t>::MIN
            }

            fn is_nodata(&self, nodata: Option<Self>) -> bool {
                nodata.is_some_and(|nd| *self == nd)
            }

            fn is_float() -> bool {
                false
            }
        }
    )*};
}

macro_rules! impl_raster_element_float {
    ($($t:ty),*) => {$(
        impl RasterElement for $t {
            fn default_nodata() -> Self {
                <$t>::NAN
            }

            fn is_nodata(&self, nodata: Option<Self>) -> bool {
                if self.is_nan() {
                    return true;
                }
                nodata.is_some_and(|nd| (self - nd).abs() < <$t>::EPSILON * 100.0)
            }

            fn is_float() -> bool {
                true
            }
        }
    )*};
}

impl_raster_element_int!(u8, u16, u32, i16, i32, i64);
impl_raster_element_float!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_nan_is_nodata() {
        assert!(f64::NAN.is_nodata(None));
        assert!(!1.5f64.is_nodata(None));
        assert!(1.5f64.is_nodata(Some(1.5)));
    }

    #[test]
    fn test_int_nodata_sentinel_only() {
        assert!(!0u8.is_nodata(None));
        assert!(255u8.is_nodata(Some(255)));
        assert!(!254u8.is_nodata(Some(255)));
    }
}
