pub mod address_normalizer;
pub mod column_detector;
pub mod geocoder;
pub mod nominatim;
pub mod route_builder;
pub mod route_solver;

pub use address_normalizer::AddressNormalizer;
pub use column_detector::{ColumnDetector, SheetColumns};
pub use geocoder::{Geocoder, Resolution};
pub use nominatim::NominatimClient;
pub use route_builder::{ItineraryRequest, RouteBuilder};
pub use route_solver::RouteSolver;
