use crate::config::GeocoderConfig;
use crate::error::{AppError, Result, UnresolvedReason};
use crate::models::{Dataset, GeoPoint, Itinerary, Stop, StopRole};
use crate::services::address_normalizer::{has_locality, AddressNormalizer};
use crate::services::column_detector::SheetColumns;
use crate::services::geocoder::Geocoder;
use crate::services::route_solver::RouteSolver;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// What the user picked on the way to a route.
#[derive(Debug, Clone, Deserialize)]
pub struct ItineraryRequest {
    pub institute: String,
    pub start_address: String,
    #[serde(default)]
    pub destination_address: Option<String>,
}

/// Turns the rows of one institute into a geocoded, ordered itinerary.
///
/// Fails as a whole: any address that cannot be resolved aborts the build
/// and is named in the error.
pub struct RouteBuilder {
    geocoder: Arc<dyn Geocoder>,
    solver: RouteSolver,
    concurrency: usize,
    lookup_deadline: Duration,
}

impl RouteBuilder {
    pub fn new(geocoder: Arc<dyn Geocoder>, config: &GeocoderConfig) -> Self {
        RouteBuilder {
            geocoder,
            solver: RouteSolver::new(),
            concurrency: config.concurrency.max(1),
            lookup_deadline: config.lookup_deadline,
        }
    }

    pub fn geocoder(&self) -> &dyn Geocoder {
        self.geocoder.as_ref()
    }

    pub async fn build(
        &self,
        dataset: &Dataset,
        columns: SheetColumns,
        request: &ItineraryRequest,
    ) -> Result<Itinerary> {
        let institute = request.institute.trim();
        if institute.is_empty() {
            return Err(AppError::InvalidRequest(
                "An institute must be selected".to_string(),
            ));
        }
        let start_address = request.start_address.as_str();
        if start_address.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "A start address is required".to_string(),
            ));
        }
        let destination_address = request
            .destination_address
            .as_deref()
            .filter(|d| !d.trim().is_empty());

        let rows = institute_rows(dataset, columns.institute, institute);
        if rows.is_empty() {
            return Err(AppError::EmptyInstituteMatch {
                institute: institute.to_string(),
            });
        }

        let candidates = candidate_addresses(
            dataset,
            columns.address,
            &rows,
            start_address,
            destination_address,
        );

        tracing::info!(
            institute = %institute,
            rows = rows.len(),
            waypoints = candidates.len(),
            has_destination = destination_address.is_some(),
            "Building route for '{}': {} rows, {} waypoints",
            institute,
            rows.len(),
            candidates.len()
        );

        let start_point = self.geocode(start_address).await?;
        let waypoints = self.geocode_all(candidates).await?;

        let mut points = Vec::with_capacity(waypoints.len() + 1);
        points.push(start_point);
        points.extend(waypoints.iter().map(|stop| stop.location));

        let order = self.solver.solve(&points);
        let ordered: Vec<Stop> = order
            .iter()
            .skip(1)
            .map(|&i| waypoints[i - 1].clone())
            .collect();

        let destination = match destination_address {
            Some(address) => {
                let point = self.geocode(address).await?;
                Some(Stop::new(StopRole::Destination, address, point))
            }
            None => None,
        };

        let itinerary = Itinerary::new(
            Stop::new(StopRole::Start, start_address, start_point),
            ordered,
            destination,
        );

        tracing::info!(
            itinerary_id = %itinerary.id,
            stops = itinerary.len(),
            has_destination = itinerary.destination().is_some(),
            distance = %itinerary.total_distance(),
            "Route built: {} stops, {}",
            itinerary.len(),
            itinerary.total_distance()
        );

        Ok(itinerary)
    }

    /// Resolve one address under the lookup deadline.
    async fn geocode(&self, address: &str) -> Result<GeoPoint> {
        let resolution =
            match tokio::time::timeout(self.lookup_deadline, self.geocoder.resolve(address)).await
            {
                Ok(resolution) => resolution,
                Err(_) => {
                    return Err(AppError::unresolved(
                        address,
                        UnresolvedReason::ServiceError(format!(
                            "lookup exceeded {}ms deadline",
                            self.lookup_deadline.as_millis()
                        )),
                    ))
                }
            };

        resolution.into_result().map_err(|reason| {
            tracing::warn!(address = %address, reason = %reason, "Address could not be resolved");
            AppError::unresolved(address, reason)
        })
    }

    /// Resolve waypoints with bounded concurrency, returning them as stops in
    /// input order. The first lookup to fail ends the build and drops every
    /// lookup still in flight.
    async fn geocode_all(&self, addresses: Vec<String>) -> Result<Vec<Stop>> {
        let mut resolved: Vec<(usize, Stop)> =
            stream::iter(addresses.into_iter().enumerate().map(|(idx, address)| async move {
                let point = self.geocode(&address).await?;
                Ok::<_, AppError>((idx, Stop::new(StopRole::Waypoint, address, point)))
            }))
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await?;

        resolved.sort_unstable_by_key(|(idx, _)| *idx);
        Ok(resolved.into_iter().map(|(_, stop)| stop).collect())
    }
}

/// Rows whose institute cell contains `institute`, case-insensitively.
/// Substring matching is deliberate: "Herzl" selects "Herzl High School".
fn institute_rows(dataset: &Dataset, column: usize, institute: &str) -> Vec<usize> {
    let needle = institute.to_lowercase();
    (0..dataset.len())
        .filter(|&row| {
            dataset
                .cell(row, column)
                .is_some_and(|v| v.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Normalized, deduplicated waypoint addresses, minus the start and destination.
fn candidate_addresses(
    dataset: &Dataset,
    column: usize,
    rows: &[usize],
    start: &str,
    destination: Option<&str>,
) -> Vec<String> {
    let raw: Vec<&str> = rows
        .iter()
        .filter_map(|&row| dataset.cell(row, column))
        .collect();

    // The reference is the institute's first address that names a locality,
    // else its first address.
    let Some(reference) = raw.iter().find(|a| has_locality(a)).or(raw.first()) else {
        return Vec::new();
    };
    let normalizer = AddressNormalizer::from_reference(reference);

    let is_endpoint = |text: &str| text == start || Some(text) == destination;
    let mut seen = HashSet::new();

    raw.into_iter()
        .filter(|text| !is_endpoint(*text))
        .map(|text| normalizer.normalize(text))
        .filter(|text| !is_endpoint(text.as_str()))
        .filter(|text| seen.insert(text.clone()))
        .collect()
}
