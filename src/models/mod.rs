pub mod dataset;
pub mod distance;
pub mod geo_point;
pub mod itinerary;

pub use dataset::Dataset;
pub use distance::{haversine_km, DistanceKm};
pub use geo_point::GeoPoint;
pub use itinerary::{Itinerary, Stop, StopRole};
