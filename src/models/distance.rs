use crate::constants::EARTH_RADIUS_KM;
use crate::models::GeoPoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Haversine great-circle distance between two valid points, in kilometers.
pub fn haversine_km(p1: &GeoPoint, p2: &GeoPoint) -> f64 {
    debug_assert!(p1.is_valid() && p2.is_valid(), "haversine on invalid point");

    let phi1 = p1.lat.to_radians();
    let phi2 = p2.lat.to_radians();
    let delta_phi = (p2.lat - p1.lat).to_radians();
    let delta_lambda = (p2.lon - p1.lon).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1 for near-antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance in kilometers
/// Prevents mixing up units in itinerary totals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct DistanceKm(pub f64);

impl DistanceKm {
    pub fn between(p1: &GeoPoint, p2: &GeoPoint) -> Self {
        DistanceKm(haversine_km(p1, p2))
    }

    pub fn as_km(self) -> f64 {
        self.0
    }
}

impl fmt::Display for DistanceKm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}km", self.0)
    }
}

impl Add for DistanceKm {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        DistanceKm(self.0 + other.0)
    }
}

impl Sum for DistanceKm {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(DistanceKm(0.0), Add::add)
    }
}
