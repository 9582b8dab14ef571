//! Spherical-earth geometry.
//!
//! All angles are in degrees, clockwise from true north. Distances are
//! great-circle meters on a sphere of radius [`EARTH_RADIUS_M`].

use crate::constants::EARTH_RADIUS_M;
use crate::types::GeoPosition;

/// Great-circle (haversine) distance between two positions, in meters.
pub fn distance(a: &GeoPosition, b: &GeoPosition) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Initial great-circle bearing from `from` to `to`, in `[0, 360)`.
pub fn bearing(from: &GeoPosition, to: &GeoPosition) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let dlon = (to.lon - from.lon).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    normalize_heading(y.atan2(x).to_degrees())
}

/// Destination point reached by travelling `distance_m` along `heading_deg`.
pub fn translate(from: &GeoPosition, heading_deg: f64, distance_m: f64) -> GeoPosition {
    let delta = distance_m / EARTH_RADIUS_M;
    let theta = heading_deg.to_radians();
    let lat1 = from.lat.to_radians();
    let lon1 = from.lon.to_radians();

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    GeoPosition {
        lat: lat2.to_degrees(),
        lon: lon2.to_degrees(),
    }
}

/// Wrap any angle into `[0, 360)`.
pub fn normalize_heading(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// Signed shortest rotation from `from` to `to`, in `(-180, 180]`.
pub fn shortest_turn(from: f64, to: f64) -> f64 {
    let d = (to - from).rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Absolute angular separation between two headings, in `[0, 180]`.
pub fn angle_between(a: f64, b: f64) -> f64 {
    shortest_turn(a, b).abs()
}
