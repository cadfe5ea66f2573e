// Library exports for testing and reusability

pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};

use services::{ColumnDetector, RouteBuilder};

// App state for sharing across the application
pub struct AppState {
    pub column_detector: ColumnDetector,
    pub route_builder: RouteBuilder,
}
