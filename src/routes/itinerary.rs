use crate::error::{AppError, ColumnKind, Result};
use crate::models::{Dataset, Stop};
use crate::services::ItineraryRequest;
use crate::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct BuildItineraryRequest {
    #[serde(flatten)]
    pub sheet: Dataset,
    #[serde(flatten)]
    pub selection: ItineraryRequest,
    #[serde(default)]
    pub address_column: Option<String>,
    #[serde(default)]
    pub institute_column: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ItineraryResponse {
    pub id: Uuid,
    pub addresses: Vec<String>,
    /// `[lat, lon]` pairs aligned with `addresses`
    pub coordinates: Vec<[f64; 2]>,
    pub stops: Vec<Stop>,
    pub total_distance_km: f64,
}

/// POST /itineraries
/// Order and geocode one institute's addresses from an uploaded sheet
pub async fn create_itinerary(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BuildItineraryRequest>,
) -> Result<Json<ItineraryResponse>> {
    tracing::info!(
        institute = %request.selection.institute,
        rows = request.sheet.len(),
        "Itinerary request: institute '{}', {} rows",
        request.selection.institute,
        request.sheet.len()
    );

    let columns = state.column_detector.resolve(
        &request.sheet,
        request.address_column.as_deref(),
        request.institute_column.as_deref(),
    )?;

    let itinerary = state
        .route_builder
        .build(&request.sheet, columns, &request.selection)
        .await?;

    Ok(Json(ItineraryResponse {
        id: itinerary.id,
        addresses: itinerary.addresses(),
        coordinates: itinerary.coordinates(),
        total_distance_km: itinerary.total_distance().as_km(),
        stops: itinerary.stops().to_vec(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct InstitutesRequest {
    #[serde(flatten)]
    pub sheet: Dataset,
    #[serde(default)]
    pub institute_column: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InstitutesResponse {
    pub column: String,
    pub institutes: Vec<String>,
}

/// POST /institutes
/// Distinct institute names of a sheet, for the selection step
pub async fn list_institutes(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InstitutesRequest>,
) -> Result<Json<InstitutesResponse>> {
    let column = match request.institute_column.as_deref() {
        Some(name) => request
            .sheet
            .column_index(name)
            .ok_or(AppError::MissingColumn {
                kind: ColumnKind::Institute,
            })?,
        None => state
            .column_detector
            .find(&request.sheet, ColumnKind::Institute)?,
    };

    Ok(Json(InstitutesResponse {
        column: request.sheet.columns[column].clone(),
        institutes: request.sheet.distinct_values(column),
    }))
}
