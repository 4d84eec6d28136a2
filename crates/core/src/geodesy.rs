//! Spherical-earth distance calculations
//!
//! Distances between latitude/longitude points assuming a simple spheric
//! earth, as used when matching geographic extents against satellite
//! lat/lon grids.

/// Earth radius in meters for the spheric approximation
pub const EARTH_RADIUS_M: f64 = 6_367_442.76;

/// How the distance between two points is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMode {
    /// Great-circle arc across the globe
    #[default]
    Global,
    /// Flat-earth approximation, adequate for small separations
    Local,
}

/// Distance in meters between two lat/lon points on a spheric earth.
///
/// Longitude differences of 180 degrees or more wrap the short way around.
/// Inputs are in decimal degrees.
pub fn spheric_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64, mode: DistanceMode) -> f64 {
    let mut ldiff = (lon2 - lon1).abs();
    if ldiff >= 180.0 {
        ldiff = 360.0 - ldiff;
    }

    match mode {
        DistanceMode::Global => {
            // Colatitudes for the spherical law of cosines
            let phi1 = (90.0 - lat1).to_radians();
            let phi2 = (90.0 - lat2).to_radians();
            let theta1 = lon1.to_radians();
            let theta2 = lon2.to_radians();

            let cos_arc =
                phi1.sin() * phi2.sin() * (theta1 - theta2).cos() + phi1.cos() * phi2.cos();
            // Rounding can push the cosine just past 1 for coincident points
            EARTH_RADIUS_M * cos_arc.clamp(-1.0, 1.0).acos()
        }
        DistanceMode::Local => {
            let lat1 = lat1.to_radians();
            let lat2 = lat2.to_radians();
            let xdist = ldiff.to_radians() * (0.5 * (lat1 + lat2)).cos();
            let ydist = lat2 - lat1;
            EARTH_RADIUS_M * (xdist * xdist + ydist * ydist).sqrt()
        }
    }
}
