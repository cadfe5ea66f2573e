use crate::models::{DistanceKm, GeoPoint};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StopRole {
    Start,
    Waypoint,
    Destination,
}

/// A geocoded address with its place in the route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stop {
    pub role: StopRole,
    pub address: String,
    pub location: GeoPoint,
}

impl Stop {
    pub fn new(role: StopRole, address: impl Into<String>, location: GeoPoint) -> Self {
        Stop {
            role,
            address: address.into(),
            location,
        }
    }
}

/// Ordered route: the start first, the destination (if any) last, and the
/// waypoints in between in the order they were handed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
    pub id: Uuid,
    stops: Vec<Stop>,
}

impl Itinerary {
    pub fn new(start: Stop, waypoints: Vec<Stop>, destination: Option<Stop>) -> Self {
        let mut stops = Vec::with_capacity(waypoints.len() + 2);
        stops.push(Stop {
            role: StopRole::Start,
            ..start
        });
        stops.extend(waypoints.into_iter().map(|s| Stop {
            role: StopRole::Waypoint,
            ..s
        }));
        if let Some(dest) = destination {
            stops.push(Stop {
                role: StopRole::Destination,
                ..dest
            });
        }

        Itinerary {
            id: Uuid::new_v4(),
            stops,
        }
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn start(&self) -> &Stop {
        &self.stops[0]
    }

    pub fn destination(&self) -> Option<&Stop> {
        self.stops
            .last()
            .filter(|s| s.role == StopRole::Destination)
    }

    /// Address strings in visiting order.
    pub fn addresses(&self) -> Vec<String> {
        self.stops.iter().map(|s| s.address.clone()).collect()
    }

    /// `[lat, lon]` pairs aligned with [`addresses`](Self::addresses).
    pub fn coordinates(&self) -> Vec<[f64; 2]> {
        self.stops.iter().map(|s| s.location.to_pair()).collect()
    }

    /// Sum of straight-line leg lengths.
    pub fn total_distance(&self) -> DistanceKm {
        self.stops
            .windows(2)
            .map(|leg| DistanceKm::between(&leg[0].location, &leg[1].location))
            .sum()
    }
}
