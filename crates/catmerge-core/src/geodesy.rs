//! Epicentral distance between two geographic points.
//!
//! The merge only needs "how far apart are these epicenters, in km", so the
//! computation sits behind [`DistanceMeasure`] and can be swapped out.

use serde::{Deserialize, Serialize};

/// WGS84 semi-major axis in meters.
const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// Mean earth radius in km.
const MEAN_EARTH_RADIUS_KM: f64 = 6_371.0;

const VINCENTY_MAX_ITERATIONS: usize = 200;
const VINCENTY_TOLERANCE: f64 = 1e-12;

/// Great-circle style distance between two points given in degrees.
#[cfg_attr(test, mockall::automock)]
pub trait DistanceMeasure: Send + Sync {
    /// Distance in kilometers between (lat1, lon1) and (lat2, lon2).
    fn distance_km(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64;
}

/// Selects a built-in [`DistanceMeasure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistanceMethod {
    /// Ellipsoidal distance on WGS84.
    #[default]
    Wgs84,
    /// Spherical distance on a mean-radius earth.
    Haversine,
}

impl DistanceMethod {
    /// Build the distance measure for this method.
    pub fn measure(self) -> Box<dyn DistanceMeasure> {
        match self {
            DistanceMethod::Wgs84 => Box::new(Wgs84Geodesic),
            DistanceMethod::Haversine => Box::new(Haversine),
        }
    }
}

/// Spherical distance; exact symmetry in its arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct Haversine;

impl DistanceMeasure for Haversine {
    fn distance_km(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        MEAN_EARTH_RADIUS_KM * central_angle(lat1, lon1, lat2, lon2)
    }
}

fn central_angle(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Vincenty inverse solution on the WGS84 ellipsoid.
///
/// Nearly antipodal points where the iteration does not converge fall back to
/// the spherical distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wgs84Geodesic;

impl DistanceMeasure for Wgs84Geodesic {
    fn distance_km(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        match vincenty_inverse_m(lat1, lon1, lat2, lon2) {
            Some(meters) => meters * 1e-3,
            None => {
                tracing::debug!(
                    lat1,
                    lon1,
                    lat2,
                    lon2,
                    "Vincenty did not converge, using haversine"
                );
                Haversine.distance_km(lat1, lon1, lat2, lon2)
            }
        }
    }
}

fn vincenty_inverse_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Option<f64> {
    let a = WGS84_A;
    let f = WGS84_F;
    let b = (1.0 - f) * a;

    let l = (lon2 - lon1).to_radians();
    let u1 = ((1.0 - f) * lat1.to_radians().tan()).atan();
    let u2 = ((1.0 - f) * lat2.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..VINCENTY_MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            return Some(0.0);
        }
        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // Equatorial lines have cos²α = 0.
        let cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };
        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
        let lambda_prev = lambda;
        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

        if (lambda - lambda_prev).abs() < VINCENTY_TOLERANCE {
            let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
            let big_a =
                1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
            let delta_sigma = big_b
                * sin_sigma
                * (cos_2sigma_m
                    + big_b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                            - big_b / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma.powi(2))
                                * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));
            return Some(b * big_a * (sigma - delta_sigma));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wgs84_one_degree_on_equator() {
        let d = Wgs84Geodesic.distance_km(0.0, 0.0, 0.0, 1.0);
        assert!((d - 111.319_49).abs() < 1e-3, "got {}", d);
    }

    #[test]
    fn test_wgs84_meridian_degree() {
        // One degree of latitude around 45°N is about 111.13 km.
        let d = Wgs84Geodesic.distance_km(44.5, 10.0, 45.5, 10.0);
        assert!((d - 111.13).abs() < 0.05, "got {}", d);
    }

    #[test]
    fn test_haversine_one_degree() {
        let d = Haversine.distance_km(0.0, 0.0, 0.0, 1.0);
        assert!((d - 111.195).abs() < 1e-2, "got {}", d);
    }

    #[test]
    fn test_coincident_points() {
        assert_eq!(Wgs84Geodesic.distance_km(10.0, 20.0, 10.0, 20.0), 0.0);
        assert_eq!(Haversine.distance_km(10.0, 20.0, 10.0, 20.0), 0.0);
    }

    #[test]
    fn test_antipodal_falls_back() {
        let d = Wgs84Geodesic.distance_km(0.0, 0.0, 0.5, 179.7);
        assert!(d.is_finite());
        assert!(d > 19_000.0);
    }

    #[test]
    fn test_close_points_are_close() {
        let wgs = Wgs84Geodesic.distance_km(10.0, 20.0, 10.001, 20.001);
        let hav = Haversine.distance_km(10.0, 20.0, 10.001, 20.001);
        assert!(wgs < 0.2 && wgs > 0.1);
        assert!((wgs - hav).abs() < 0.01);
    }

    #[test]
    fn test_method_builds_measure() {
        let measure = DistanceMethod::Haversine.measure();
        assert!((measure.distance_km(0.0, 0.0, 0.0, 1.0) - 111.195).abs() < 1e-2);
        assert_eq!(DistanceMethod::default(), DistanceMethod::Wgs84);
    }
}
