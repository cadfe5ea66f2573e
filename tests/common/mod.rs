use async_trait::async_trait;
use fieldroute::config::GeocoderConfig;
use fieldroute::error::UnresolvedReason;
use fieldroute::models::{Dataset, GeoPoint};
use fieldroute::services::{Geocoder, Resolution, RouteBuilder};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Deterministic in-memory geocoder. Unknown addresses have no match.
#[derive(Default)]
pub struct StubGeocoder {
    points: HashMap<String, GeoPoint>,
    failing: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    latency: Option<Duration>,
    calls: Mutex<Vec<String>>,
    completed: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

#[allow(dead_code)]
impl StubGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, address: &str, lat: f64, lon: f64) -> Self {
        self.points
            .insert(address.to_string(), GeoPoint::new(lat, lon).unwrap());
        self
    }

    pub fn failing(mut self, address: &str, error: &str) -> Self {
        self.failing.insert(address.to_string(), error.to_string());
        self
    }

    pub fn slow(mut self, address: &str, delay: Duration) -> Self {
        self.delays.insert(address.to_string(), delay);
        self
    }

    /// Delay applied to every address without its own delay
    pub fn latency(mut self, delay: Duration) -> Self {
        self.latency = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Lookups that ran to completion rather than being dropped
    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn resolve(&self, address: &str) -> Resolution {
        self.calls.lock().unwrap().push(address.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(address).or(self.latency.as_ref()) {
            tokio::time::sleep(*delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.lock().unwrap().push(address.to_string());

        if let Some(error) = self.failing.get(address) {
            return Resolution::Unresolved(UnresolvedReason::ServiceError(error.clone()));
        }
        match self.points.get(address) {
            Some(point) => Resolution::Resolved(*point),
            None => Resolution::Unresolved(UnresolvedReason::NoMatch),
        }
    }
}

/// Two-column sheet of (institute, address) rows
#[allow(dead_code)]
pub fn sheet(rows: &[(&str, &str)]) -> Dataset {
    Dataset::new(
        vec!["Institute".to_string(), "Address".to_string()],
        rows.iter()
            .map(|(i, a)| vec![Some(i.to_string()), Some(a.to_string())])
            .collect(),
    )
}

#[allow(dead_code)]
pub fn builder(geocoder: Arc<StubGeocoder>) -> RouteBuilder {
    RouteBuilder::new(geocoder, &GeocoderConfig::default())
}
