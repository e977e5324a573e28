//! Geo primitives: a validated lat/lng value, great-circle distance,
//! point-to-segment distance and polyline proximity checks.

use geo::{Distance, Haversine};
use geo_types::Point;
use serde::{Deserialize, Serialize};

use crate::config::EARTH_RADIUS_M;
use crate::error::{Error, Result};

/// A validated (latitude, longitude) pair. Latitude in `[-90, 90]`, longitude
/// in `[-180, 180]`, both finite. Value semantics: equality and hashing are
/// by coordinate, matching the reference `Location` dataclass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    /// Validates and constructs a `Location`.
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(Error::Validation("lat and lng must be finite".into()));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(Error::Validation("lat must be in [-90, 90]".into()));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(Error::Validation("lng must be in [-180, 180]".into()));
        }
        Ok(Location { lat, lng })
    }

    fn as_point(&self) -> Point<f64> {
        Point::new(self.lng, self.lat)
    }

    /// Great-circle distance to `other`, in meters, via the haversine formula.
    pub fn distance_to(&self, other: &Location) -> f64 {
        Haversine.distance(self.as_point(), other.as_point())
    }
}

/// Key used to bucket `Location`s for hashing/caching: coordinates rounded
/// to a fixed decimal precision, matching the oracle cache's key rounding.
impl Eq for Location {}

impl std::hash::Hash for Location {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        round_for_hash(self.lat).to_bits().hash(state);
        round_for_hash(self.lng).to_bits().hash(state);
    }
}

fn round_for_hash(v: f64) -> f64 {
    (v * 1e7).round() / 1e7
}

/// Approximate minimum distance in meters from `p` to the segment `a`-`b`,
/// computed in a local equirectangular tangent plane centered on `p`.
pub fn point_to_segment_distance(p: Location, a: Location, b: Location) -> f64 {
    let (px, py) = (0.0_f64, 0.0_f64);
    let (ax, ay) = to_local_xy_m(p, a);
    let (bx, by) = to_local_xy_m(p, b);

    let (abx, aby) = (bx - ax, by - ay);
    let (apx, apy) = (px - ax, py - ay);

    let ab2 = abx * abx + aby * aby;
    if ab2 == 0.0 {
        return ((px - ax).powi(2) + (py - ay).powi(2)).sqrt();
    }

    let t = (apx * abx + apy * aby) / ab2;
    let (cx, cy) = if t < 0.0 {
        (ax, ay)
    } else if t > 1.0 {
        (bx, by)
    } else {
        (ax + t * abx, ay + t * aby)
    };

    let (dx, dy) = (px - cx, py - cy);
    (dx * dx + dy * dy).sqrt()
}

fn to_local_xy_m(reference: Location, p: Location) -> (f64, f64) {
    let ref_lat_rad = reference.lat.to_radians();
    let dlng = (p.lng - reference.lng).to_radians();
    let dlat = (p.lat - reference.lat).to_radians();
    let x = EARTH_RADIUS_M * dlng * ref_lat_rad.cos();
    let y = EARTH_RADIUS_M * dlat;
    (x, y)
}

/// Returns true iff any segment of `polyline` lies within `threshold_m` of
/// `target`. Never panics on an empty or single-point polyline.
pub fn path_approaches_location(polyline: &[Location], target: Location, threshold_m: f64) -> bool {
    match polyline.len() {
        0 => false,
        1 => point_to_segment_distance(target, polyline[0], polyline[0]) <= threshold_m,
        _ => polyline
            .windows(2)
            .any(|w| point_to_segment_distance(target, w[0], w[1]) <= threshold_m),
    }
}

/// The point on the great-circle segment from `a` toward `b`, `distance_m`
/// meters from `a`, clamped to `[a, b]`. Spherical slerp on a sphere of
/// radius [`EARTH_RADIUS_M`]; undefined only when `a == b` and
/// `distance_m > 0`, in which case `a` is returned (clamped endpoint).
pub fn point_along_line(a: Location, b: Location, distance_m: f64) -> Location {
    if distance_m <= 0.0 {
        return a;
    }

    let lat1 = a.lat.to_radians();
    let lng1 = a.lng.to_radians();
    let lat2 = b.lat.to_radians();
    let lng2 = b.lng.to_radians();

    let dlat = lat2 - lat1;
    let dlng = lng2 - lng1;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);
    let delta = 2.0 * h.sqrt().asin();

    if delta.abs() < 1e-15 {
        return a;
    }

    let total_dist = EARTH_RADIUS_M * delta;
    let t = (distance_m / total_dist).clamp(0.0, 1.0);

    let sin_delta = delta.sin();
    let (wa, wb) = if sin_delta.abs() < 1e-15 {
        (1.0 - t, t)
    } else {
        (((1.0 - t) * delta).sin() / sin_delta, (t * delta).sin() / sin_delta)
    };

    let (x1, y1, z1) = ll_to_xyz(lat1, lng1);
    let (x2, y2, z2) = ll_to_xyz(lat2, lng2);
    let x = wa * x1 + wb * x2;
    let y = wa * y1 + wb * y2;
    let z = wa * z1 + wb * z2;

    let r = (x * x + y * y + z * z).sqrt();
    let (x, y, z) = (x / r, y / r, z / r);

    let lat = z.atan2((x * x + y * y).sqrt()).to_degrees();
    let lng = y.atan2(x).to_degrees();
    Location { lat, lng: normalize_lng(lng) }
}

fn ll_to_xyz(lat_rad: f64, lng_rad: f64) -> (f64, f64, f64) {
    let clat = lat_rad.cos();
    (clat * lng_rad.cos(), clat * lng_rad.sin(), lat_rad.sin())
}

fn normalize_lng(lng: f64) -> f64 {
    let wrapped = ((lng + 180.0) % 360.0 + 360.0) % 360.0 - 180.0;
    if (wrapped + 180.0).abs() < 1e-9 {
        180.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_lat() {
        assert!(Location::new(91.0, 0.0).is_err());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(Location::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn distance_between_identical_points_is_zero() {
        let a = Location::new(41.0, 29.0).unwrap();
        assert!(a.distance_to(&a) < 1e-6);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Location::new(41.00948, 28.9772).unwrap();
        let b = Location::new(41.01868, 28.9692).unwrap();
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-6);
    }

    #[test]
    fn path_approaches_location_empty_polyline_is_false() {
        let target = Location::new(0.0, 0.0).unwrap();
        assert!(!path_approaches_location(&[], target, 10.0));
    }

    #[test]
    fn path_approaches_location_detects_nearby_segment() {
        let path = vec![
            Location::new(37.9838, 23.7275).unwrap(),
            Location::new(37.9900, 23.7350).unwrap(),
            Location::new(37.9950, 23.7450).unwrap(),
        ];
        let target = Location::new(37.9890, 23.7360).unwrap();
        assert!(path_approaches_location(&path, target, 150.0));
        assert!(!path_approaches_location(&path, target, 1.0));
    }

    #[test]
    fn point_along_line_clamps_to_b_when_distance_exceeds_total() {
        let a = Location::new(0.0, 0.0).unwrap();
        let b = Location::new(0.0, 1.0).unwrap();
        let total = a.distance_to(&b);
        let p = point_along_line(a, b, total * 10.0);
        assert!((p.distance_to(&b)).abs() < 1.0);
    }

    #[test]
    fn point_along_line_at_zero_returns_a() {
        let a = Location::new(10.0, 10.0).unwrap();
        let b = Location::new(20.0, 20.0).unwrap();
        let p = point_along_line(a, b, 0.0);
        assert!((p.lat - a.lat).abs() < 1e-9 && (p.lng - a.lng).abs() < 1e-9);
    }
}
