use crate::config::GeocoderConfig;
use crate::error::UnresolvedReason;
use crate::models::GeoPoint;
use crate::services::geocoder::{Geocoder, Resolution};
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Geocoder backed by a Nominatim-compatible `/search` endpoint.
#[derive(Clone)]
pub struct NominatimClient {
    client: Client,
    base_url: String,
    user_agent: String,
    timeout: Duration,
    max_retries: usize,
    retry_base: Duration,
}

impl NominatimClient {
    pub fn new(config: &GeocoderConfig) -> Self {
        NominatimClient {
            client: Client::new(),
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
            timeout: config.timeout,
            max_retries: config.max_retries,
            retry_base: config.retry_base,
        }
    }

    fn backoff(&self, retry_count: usize) -> Duration {
        let factor = 2_u32.saturating_pow(retry_count.saturating_sub(1) as u32);
        self.retry_base.saturating_mul(factor)
    }

    /// Search with retry on transport errors, timeouts, 429 and 5xx.
    /// Other statuses and malformed bodies are final.
    async fn search(&self, address: &str) -> Resolution {
        let mut retry_count = 0;

        loop {
            let response_result = self
                .client
                .get(&self.base_url)
                .query(&[("q", address), ("format", "json"), ("limit", "1")])
                .header(USER_AGENT, &self.user_agent)
                .timeout(self.timeout)
                .send()
                .await;

            let response = match response_result {
                Ok(resp) => resp,
                Err(e) => {
                    let error_msg = if e.is_timeout() {
                        "Request timed out".to_string()
                    } else {
                        format!("Request failed: {}", e)
                    };

                    if retry_count < self.max_retries {
                        retry_count += 1;
                        let backoff = self.backoff(retry_count);
                        tracing::warn!(
                            address = %address,
                            "Geocoding {}, retrying in {}ms (attempt {}/{})",
                            error_msg,
                            backoff.as_millis(),
                            retry_count + 1,
                            self.max_retries + 1
                        );
                        tokio::time::sleep(backoff).await;
                        continue;
                    }

                    return Resolution::Unresolved(UnresolvedReason::ServiceError(format!(
                        "{} after {} attempts",
                        error_msg,
                        self.max_retries + 1
                    )));
                }
            };

            let status = response.status();

            if status.is_success() {
                let places: Vec<NominatimPlace> = match response.json().await {
                    Ok(places) => places,
                    Err(e) => {
                        return Resolution::Unresolved(UnresolvedReason::ServiceError(format!(
                            "Failed to parse response: {}",
                            e
                        )))
                    }
                };

                return match places.into_iter().next() {
                    Some(place) => place.into_resolution(),
                    None => Resolution::Unresolved(UnresolvedReason::NoMatch),
                };
            }

            let is_retryable =
                status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();

            if is_retryable && retry_count < self.max_retries {
                retry_count += 1;
                let backoff = self.backoff(retry_count);
                tracing::warn!(
                    address = %address,
                    "Geocoding returned HTTP {}, retrying in {}ms (attempt {}/{})",
                    status,
                    backoff.as_millis(),
                    retry_count + 1,
                    self.max_retries + 1
                );
                tokio::time::sleep(backoff).await;
                continue;
            }

            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                status = %status,
                address = %address,
                "Geocoding HTTP error {}: {}",
                status,
                error_text
            );
            return Resolution::Unresolved(UnresolvedReason::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn resolve(&self, address: &str) -> Resolution {
        let resolution = self.search(address).await;
        match &resolution {
            Resolution::Resolved(p) => {
                tracing::debug!(address = %address, lat = p.lat, lon = p.lon, "Geocoded address");
            }
            Resolution::Unresolved(UnresolvedReason::NoMatch) => {
                tracing::info!(address = %address, "Geocoder found no match");
            }
            Resolution::Unresolved(UnresolvedReason::ServiceError(e)) => {
                tracing::warn!(address = %address, error = %e, "Geocoder service error");
            }
        }
        resolution
    }
}

// Nominatim API response types

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[allow(dead_code)]
    #[serde(default)]
    display_name: Option<String>,
}

impl NominatimPlace {
    fn into_resolution(self) -> Resolution {
        let parsed = self
            .lat
            .trim()
            .parse::<f64>()
            .and_then(|lat| self.lon.trim().parse::<f64>().map(|lon| (lat, lon)));

        match parsed {
            Ok((lat, lon)) => match GeoPoint::new(lat, lon) {
                Ok(point) => Resolution::Resolved(point),
                Err(e) => Resolution::Unresolved(UnresolvedReason::ServiceError(e)),
            },
            Err(_) => Resolution::Unresolved(UnresolvedReason::ServiceError(format!(
                "Unparseable coordinates: lat='{}', lon='{}'",
                self.lat, self.lon
            ))),
        }
    }
}
