//! Garage endpoints: CRUD, city search, and the daily availability report.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use pitstop_core::validation::{
    validate_capacity, validate_city, validate_garage_name, validate_location,
    validate_search_term,
};
use pitstop_core::{calendar, report, DayOccupancy, Garage};
use pitstop_db::repository::garage::generate_garage_id;

use crate::error::ApiError;
use crate::state::AppState;

use super::required;

// =============================================================================
// Wire Types
// =============================================================================

/// Request body for garage create and update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaragePayload {
    pub name: String,
    pub location: String,
    pub city: String,
    pub capacity: i64,
}

/// Garage as exported by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GarageDto {
    pub id: String,
    pub name: String,
    pub location: String,
    pub city: String,
    pub capacity: i64,
}

impl From<Garage> for GarageDto {
    fn from(garage: Garage) -> Self {
        GarageDto {
            id: garage.id,
            name: garage.name,
            location: garage.location,
            city: garage.city,
            capacity: garage.capacity,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GarageSearchQuery {
    pub city: Option<String>,
}

/// Query string for the daily availability report. All fields are required.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReportQuery {
    pub garage_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn validate_payload(payload: &GaragePayload) -> Result<(), ApiError> {
    validate_garage_name(&payload.name)?;
    validate_location(&payload.location)?;
    validate_city(&payload.city)?;
    validate_capacity(payload.capacity)?;
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /garages/:garage_id`
pub async fn get_garage(
    State(state): State<AppState>,
    Path(garage_id): Path<String>,
) -> Result<Json<GarageDto>, ApiError> {
    let garage = state
        .db
        .garages()
        .get_by_id(&garage_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Garage", &garage_id))?;

    Ok(Json(garage.into()))
}

/// `GET /garages?city=...`
pub async fn search_garages(
    State(state): State<AppState>,
    Query(query): Query<GarageSearchQuery>,
) -> Result<Json<Vec<GarageDto>>, ApiError> {
    let city = required("city", query.city)?;
    let city = validate_search_term(&city)?;

    let garages = state.db.garages().search_by_city(&city).await?;
    Ok(Json(garages.into_iter().map(GarageDto::from).collect()))
}

/// `GET /garages/dailyAvailabilityReport?garageId&startDate&endDate`
///
/// One row per calendar day in `[startDate, endDate]`, zero-booking days
/// included and `availableCapacity` unclamped.
pub async fn daily_availability_report(
    State(state): State<AppState>,
    Query(query): Query<DailyReportQuery>,
) -> Result<Json<Vec<DayOccupancy>>, ApiError> {
    let garage_id = required("garageId", query.garage_id)?;
    let start = calendar::parse_date(&required("startDate", query.start_date)?)?;
    let end = calendar::parse_date(&required("endDate", query.end_date)?)?;

    let garage = state
        .db
        .garages()
        .get_by_id(&garage_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Garage", &garage_id))?;

    // One fetch covers the whole range; the report buckets it per day. The
    // range end is pushed to its day's last counted instant so bookings late
    // on the final day are included.
    let booked = state
        .db
        .maintenance()
        .for_garage_between(&garage.id, start, calendar::end_of_day(end))
        .await?;

    let rows = report::daily_availability_report(&garage, start, end, &booked);
    Ok(Json(rows))
}

/// `POST /garages`
pub async fn create_garage(
    State(state): State<AppState>,
    Json(payload): Json<GaragePayload>,
) -> Result<Json<GarageDto>, ApiError> {
    validate_payload(&payload)?;

    let now = Utc::now();
    let garage = Garage {
        id: generate_garage_id(),
        name: payload.name.trim().to_string(),
        location: payload.location.trim().to_string(),
        city: payload.city.trim().to_string(),
        capacity: payload.capacity,
        created_at: now,
        updated_at: now,
    };

    state.db.garages().insert(&garage).await?;
    info!(id = %garage.id, name = %garage.name, "Garage created");

    Ok(Json(garage.into()))
}

/// `PUT /garages/:garage_id`
pub async fn update_garage(
    State(state): State<AppState>,
    Path(garage_id): Path<String>,
    Json(payload): Json<GaragePayload>,
) -> Result<Json<GarageDto>, ApiError> {
    validate_payload(&payload)?;

    let mut garage = state
        .db
        .garages()
        .get_by_id(&garage_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Garage", &garage_id))?;

    garage.name = payload.name.trim().to_string();
    garage.location = payload.location.trim().to_string();
    garage.city = payload.city.trim().to_string();
    garage.capacity = payload.capacity;

    state.db.garages().update(&garage).await?;
    info!(id = %garage.id, "Garage updated");

    Ok(Json(garage.into()))
}

/// `DELETE /garages/:garage_id`
///
/// Clears the garage's assignment rows as well. Its maintenance history is
/// kept; detail reads for those records report the garage name as absent.
pub async fn delete_garage(
    State(state): State<AppState>,
    Path(garage_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.db.garages().delete(&garage_id).await?;
    let cleared = state.db.assignments().clear_garage(&garage_id).await?;
    info!(id = %garage_id, assignments_cleared = cleared, "Garage deleted");

    Ok(StatusCode::NO_CONTENT)
}
