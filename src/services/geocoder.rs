use crate::cache::CacheStats;
use crate::error::UnresolvedReason;
use crate::models::GeoPoint;
use async_trait::async_trait;

/// Outcome of a single address lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(GeoPoint),
    Unresolved(UnresolvedReason),
}

impl Resolution {
    /// Collapse into control flow: the point, or why there is none.
    pub fn into_result(self) -> Result<GeoPoint, UnresolvedReason> {
        match self {
            Resolution::Resolved(p) => Ok(p),
            Resolution::Unresolved(reason) => Err(reason),
        }
    }
}

/// Resolves free-text addresses to coordinates.
///
/// Implementations must be safe to call concurrently and repeatedly for the
/// same address; a lookup has no side effects a second call could observe.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, address: &str) -> Resolution;

    /// Hit/miss counters for geocoders that cache.
    fn cache_stats(&self) -> Option<CacheStats> {
        None
    }
}
