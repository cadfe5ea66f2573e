//! Stable application-wide constants.
//!
//! Values here are physical constants and default fallbacks for
//! env-var-based configuration. Runtime-tunable values live in
//! [`Config`](crate::config::Config).

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

// --- Geometry ---

/// Mean Earth radius used by the haversine distance.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// --- Geocoding service ---

/// Public Nominatim search endpoint. Overridden by `GEOCODER_BASE_URL`.
pub const DEFAULT_GEOCODER_BASE_URL: &str = "https://nominatim.openstreetmap.org/search";
/// Per-request timeout. Overridden by `GEOCODER_TIMEOUT_SECS`.
pub const DEFAULT_GEOCODER_TIMEOUT_SECONDS: u64 = 10;
/// Retries after the first attempt. Overridden by `GEOCODER_MAX_RETRIES`.
pub const DEFAULT_GEOCODER_MAX_RETRIES: usize = 2;
/// First backoff step; doubles on every retry. Overridden by `GEOCODER_RETRY_BASE_MS`.
pub const DEFAULT_GEOCODER_RETRY_BASE_MS: u64 = 500;
/// Concurrent lookups per build. Overridden by `GEOCODER_CONCURRENCY` (validated 1..=16).
pub const DEFAULT_GEOCODER_CONCURRENCY: usize = 4;
pub const MAX_GEOCODER_CONCURRENCY: usize = 16;
/// Deadline for one lookup including retries. Overridden by `GEOCODER_LOOKUP_DEADLINE_SECS`.
pub const DEFAULT_GEOCODER_LOOKUP_DEADLINE_SECONDS: u64 = 60;

// --- Geocode cache defaults ---

/// Resolved addresses are kept for 24 hours. Overridden by `GEOCODE_CACHE_TTL`.
pub const DEFAULT_GEOCODE_CACHE_TTL_SECONDS: u64 = 86_400;
/// Overridden by `GEOCODE_CACHE_MAX_ENTRIES`.
pub const DEFAULT_GEOCODE_CACHE_MAX_ENTRIES: u64 = 10_000;

// --- Column discovery keywords ---
// Matched case-insensitively as substrings of sheet headers.

pub const DEFAULT_ADDRESS_COLUMN_KEYWORDS: &[&str] = &["כתובת", "address"];
pub const DEFAULT_INSTITUTE_COLUMN_KEYWORDS: &[&str] = &[
    "בית ספר",
    "מוסד חינוך",
    "מוסד",
    "school",
    "institute",
    "institution",
];
