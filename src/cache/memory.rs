use crate::cache::CacheStats;
use crate::models::GeoPoint;
use crate::services::geocoder::{Geocoder, Resolution};
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Geocoder wrapper remembering successful lookups in a moka TTL cache.
/// Failures are never stored, so a later build retries them.
pub struct CachingGeocoder<G> {
    inner: G,
    resolved: Cache<String, GeoPoint>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<G: Geocoder> CachingGeocoder<G> {
    pub fn new(inner: G, ttl_seconds: u64, max_capacity: u64) -> Self {
        let resolved = Cache::builder()
            .time_to_live(Duration::from_secs(ttl_seconds))
            .max_capacity(max_capacity)
            .build();

        CachingGeocoder {
            inner,
            resolved,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats::new(
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
            self.resolved.entry_count(),
        )
    }
}

fn cache_key(address: &str) -> String {
    address.trim().to_string()
}

#[async_trait]
impl<G: Geocoder> Geocoder for CachingGeocoder<G> {
    async fn resolve(&self, address: &str) -> Resolution {
        let key = cache_key(address);

        if let Some(point) = self.resolved.get(&key).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Geocode cache hit: {}", key);
            return Resolution::Resolved(point);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Geocode cache miss: {}", key);

        let resolution = self.inner.resolve(address).await;
        if let Resolution::Resolved(point) = resolution {
            self.resolved.insert(key, point).await;
        }
        resolution
    }

    fn cache_stats(&self) -> Option<CacheStats> {
        Some(self.stats())
    }
}
