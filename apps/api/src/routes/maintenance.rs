//! Maintenance endpoints: booking CRUD behind the admission gate, search,
//! and the monthly requests report.
//!
//! Create and update both run the full admission sequence before touching
//! the database; update additionally excludes the record's own id from the
//! day count so it never competes with itself for a slot.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use pitstop_core::validation::validate_service_type;
use pitstop_core::{
    calendar, report, BookingProposal, MaintenanceDetails, MaintenanceRequest, MonthOccupancy,
};
use pitstop_db::repository::maintenance::generate_maintenance_id;

use crate::error::ApiError;
use crate::state::AppState;

use super::required;

// =============================================================================
// Wire Types
// =============================================================================

/// Request body for maintenance create and update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenancePayload {
    pub car_id: String,
    pub garage_id: String,
    pub service_type: String,
    /// The requested day, `yyyy-mm-dd`.
    pub scheduled_date: String,
}

/// Query string for maintenance search. All four filters are required.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceSearchQuery {
    pub car_id: Option<String>,
    pub garage_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Query string for the monthly requests report. All fields are required;
/// months are `yyyy-mm`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReportQuery {
    pub garage_id: Option<String>,
    pub start_month: Option<String>,
    pub end_month: Option<String>,
}

/// Maintenance record as exported by the API, decorated with car and garage
/// display names. The decorations are null when the referenced row is gone.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceResponse {
    pub id: String,
    pub car_id: String,
    pub car_name: Option<String>,
    pub garage_id: String,
    pub garage_name: Option<String>,
    pub service_type: String,
    /// The booked calendar day, `yyyy-mm-dd`.
    pub scheduled_date: String,
}

impl From<MaintenanceDetails> for MaintenanceResponse {
    fn from(details: MaintenanceDetails) -> Self {
        MaintenanceResponse {
            id: details.id,
            car_id: details.car_id,
            car_name: details.car_make,
            garage_id: details.garage_id,
            garage_name: details.garage_name,
            service_type: details.service_type,
            scheduled_date: details.scheduled_date.format("%Y-%m-%d").to_string(),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /maintenance/:maintenance_id`
pub async fn get_maintenance(
    State(state): State<AppState>,
    Path(maintenance_id): Path<String>,
) -> Result<Json<MaintenanceResponse>, ApiError> {
    let details = state
        .db
        .maintenance()
        .get_details(&maintenance_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Maintenance request", &maintenance_id))?;

    Ok(Json(details.into()))
}

/// `GET /maintenance?carId&garageId&startDate&endDate`
pub async fn search_maintenance(
    State(state): State<AppState>,
    Query(query): Query<MaintenanceSearchQuery>,
) -> Result<Json<Vec<MaintenanceResponse>>, ApiError> {
    let car_id = required("carId", query.car_id)?;
    let garage_id = required("garageId", query.garage_id)?;
    let start = calendar::parse_date(&required("startDate", query.start_date)?)?;
    let end = calendar::parse_date(&required("endDate", query.end_date)?)?;

    let rows = state
        .db
        .maintenance()
        .search(&car_id, &garage_id, start, calendar::end_of_day(end))
        .await?;

    Ok(Json(
        rows.into_iter().map(MaintenanceResponse::from).collect(),
    ))
}

/// `GET /maintenance/monthlyRequestsReport?garageId&startMonth&endMonth`
///
/// One row per calendar month in `[startMonth, endMonth]`, zero-count months
/// included.
pub async fn monthly_requests_report(
    State(state): State<AppState>,
    Query(query): Query<MonthlyReportQuery>,
) -> Result<Json<Vec<MonthOccupancy>>, ApiError> {
    let garage_id = required("garageId", query.garage_id)?;
    let start = calendar::parse_month(&required("startMonth", query.start_month)?)?;
    let end = calendar::parse_month(&required("endMonth", query.end_month)?)?;

    if state.db.garages().get_by_id(&garage_id).await?.is_none() {
        return Err(ApiError::not_found("Garage", &garage_id));
    }

    // `end` is the first instant of the last month; the fetch extends it to
    // the month's last counted instant so the whole range is covered once.
    let booked = state
        .db
        .maintenance()
        .for_garage_between(&garage_id, start, calendar::end_of_month(end))
        .await?;

    let rows = report::monthly_requests_report(start, end, &booked);
    Ok(Json(rows))
}

/// `POST /maintenance`
pub async fn create_maintenance(
    State(state): State<AppState>,
    Json(payload): Json<MaintenancePayload>,
) -> Result<Json<MaintenanceResponse>, ApiError> {
    validate_service_type(&payload.service_type)?;

    // With admission serialization on, requests for the same (garage, day)
    // queue here so the capacity check and the insert run back to back. A
    // date that does not parse skips the lock and fails admission below.
    let _slot = match (&state.day_locks, calendar::parse_date(&payload.scheduled_date)) {
        (Some(locks), Ok(at)) => Some(locks.hold(&payload.garage_id, at.date_naive()).await),
        _ => None,
    };

    let admission = state
        .admission
        .admit(&BookingProposal {
            car_id: &payload.car_id,
            garage_id: &payload.garage_id,
            scheduled_date: &payload.scheduled_date,
            exclude_booking: None,
        })
        .await?;

    let now = Utc::now();
    let request = MaintenanceRequest {
        id: generate_maintenance_id(),
        car_id: payload.car_id.clone(),
        garage_id: payload.garage_id.clone(),
        service_type: payload.service_type.trim().to_string(),
        scheduled_date: admission.scheduled_for,
        created_at: now,
        updated_at: now,
    };

    state.db.maintenance().insert(&request).await?;
    info!(
        id = %request.id,
        garage_id = %request.garage_id,
        day = %admission.day,
        open_capacity = admission.open_capacity,
        "Maintenance request booked"
    );

    let details = state
        .db
        .maintenance()
        .get_details(&request.id)
        .await?
        .ok_or_else(ApiError::internal)?;

    Ok(Json(details.into()))
}

/// `PUT /maintenance/:maintenance_id`
///
/// The record must exist; the proposed change then passes admission with its
/// own id excluded from the day count, so re-saving or moving a booking on a
/// full day does not trip over its own slot.
pub async fn update_maintenance(
    State(state): State<AppState>,
    Path(maintenance_id): Path<String>,
    Json(payload): Json<MaintenancePayload>,
) -> Result<Json<MaintenanceResponse>, ApiError> {
    validate_service_type(&payload.service_type)?;

    let mut record = state
        .db
        .maintenance()
        .get_by_id(&maintenance_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Maintenance request", &maintenance_id))?;

    // Lock the day being booked into: for a moved date that is the new day.
    let _slot = match (&state.day_locks, calendar::parse_date(&payload.scheduled_date)) {
        (Some(locks), Ok(at)) => Some(locks.hold(&payload.garage_id, at.date_naive()).await),
        _ => None,
    };

    let admission = state
        .admission
        .admit(&BookingProposal {
            car_id: &payload.car_id,
            garage_id: &payload.garage_id,
            scheduled_date: &payload.scheduled_date,
            exclude_booking: Some(&maintenance_id),
        })
        .await?;

    record.car_id = payload.car_id.clone();
    record.garage_id = payload.garage_id.clone();
    record.service_type = payload.service_type.trim().to_string();
    record.scheduled_date = admission.scheduled_for;

    state.db.maintenance().update(&record).await?;
    info!(id = %record.id, day = %admission.day, "Maintenance request updated");

    let details = state
        .db
        .maintenance()
        .get_details(&record.id)
        .await?
        .ok_or_else(ApiError::internal)?;

    Ok(Json(details.into()))
}

/// `DELETE /maintenance/:maintenance_id`
pub async fn delete_maintenance(
    State(state): State<AppState>,
    Path(maintenance_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.db.maintenance().delete(&maintenance_id).await?;
    info!(id = %maintenance_id, "Maintenance request deleted");

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn details(car_make: Option<&str>, garage_name: Option<&str>) -> MaintenanceDetails {
        MaintenanceDetails {
            id: "m1".to_string(),
            car_id: "car-1".to_string(),
            car_make: car_make.map(String::from),
            garage_id: "garage-1".to_string(),
            garage_name: garage_name.map(String::from),
            service_type: "Oil change".to_string(),
            scheduled_date: NaiveDate::from_ymd_opt(2024, 6, 5)
                .unwrap()
                .and_hms_milli_opt(23, 59, 59, 999)
                .unwrap()
                .and_utc(),
        }
    }

    #[test]
    fn test_response_renders_scheduled_date_as_padded_day() {
        let response = MaintenanceResponse::from(details(Some("Hyundai"), Some("Central Auto")));
        assert_eq!(response.scheduled_date, "2024-06-05");
        assert_eq!(response.car_name.as_deref(), Some("Hyundai"));
        assert_eq!(response.garage_name.as_deref(), Some("Central Auto"));
    }

    #[test]
    fn test_response_serializes_camel_case_with_null_decorations() {
        let json = serde_json::to_value(MaintenanceResponse::from(details(None, None))).unwrap();

        assert_eq!(json["carId"], "car-1");
        assert_eq!(json["carName"], serde_json::Value::Null);
        assert_eq!(json["garageName"], serde_json::Value::Null);
        assert_eq!(json["scheduledDate"], "2024-06-05");
        assert_eq!(json["serviceType"], "Oil change");
    }
}
