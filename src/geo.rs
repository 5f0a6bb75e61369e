//! Great-circle distance between two coordinates.
//!
//! Distances are computed with the haversine formula over a spherical Earth
//! of radius 3959 miles. Coordinates outside ±90°/±180° are a contract
//! violation of the caller and are not validated here.
//!
//! Example
//! ```rust
//! use fairway::geo::{haversine_miles, Coordinates};
//!
//! let sf = Coordinates::new(37.7749, -122.4194);
//! let oakland = Coordinates::new(37.8044, -122.2711);
//! let d = haversine_miles(sf, oakland);
//! assert!(d > 8.0 && d < 9.0);
//! ```

use serde::{Deserialize, Serialize};

/// Spherical Earth radius used throughout, in miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// A (latitude, longitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Great-circle distance between `from` and `to`, in miles.
///
/// Symmetric and non-negative for any pair of valid coordinates.
pub fn haversine_miles(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_MILES * c
}
