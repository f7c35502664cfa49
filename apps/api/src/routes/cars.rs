//! Car endpoints: CRUD plus the filtered search.
//!
//! Car responses embed the assigned garages. List responses share one
//! garage lookup cache per request so a garage referenced by many cars is
//! fetched once (see [`decorate_car`]).

use std::collections::{HashMap, HashSet};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use pitstop_core::validation::{
    validate_license_plate, validate_make, validate_model, validate_production_year,
    validate_search_term,
};
use pitstop_core::{Car, ValidationError};
use pitstop_db::repository::car::generate_car_id;

use crate::error::ApiError;
use crate::state::AppState;

use super::garages::GarageDto;
use super::required;

// =============================================================================
// Wire Types
// =============================================================================

/// Request body for car create and update.
///
/// `garageIds` is the car's full assignment set; on update it replaces the
/// existing set.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarPayload {
    pub make: String,
    pub model: String,
    pub production_year: i64,
    pub license_plate: String,
    pub garage_ids: Vec<String>,
}

/// Query string for car search. All four filters are required.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarSearchQuery {
    pub car_make: Option<String>,
    pub garage_id: Option<String>,
    pub from_year: Option<i64>,
    pub to_year: Option<i64>,
}

/// Car as exported by the API: the record plus its assigned garages.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarResponse {
    pub id: String,
    pub make: String,
    pub model: String,
    pub production_year: i64,
    pub license_plate: String,
    pub garages: Vec<GarageDto>,
}

fn validate_payload(payload: &CarPayload) -> Result<(), ApiError> {
    validate_make(&payload.make)?;
    validate_model(&payload.model)?;
    validate_production_year(payload.production_year)?;
    validate_license_plate(&payload.license_plate)?;
    Ok(())
}

// =============================================================================
// Decoration
// =============================================================================

/// Decorates one car with its assigned garages.
///
/// `cache` memoizes garages already fetched during this request. It lives in
/// the calling handler and dies with it; there is no cross-request reuse.
async fn decorate_car(
    state: &AppState,
    car: Car,
    cache: &mut HashMap<String, GarageDto>,
) -> Result<CarResponse, ApiError> {
    let garage_ids = state.db.assignments().garages_for_car(&car.id).await?;

    let missing: Vec<String> = garage_ids
        .iter()
        .filter(|id| !cache.contains_key(*id))
        .cloned()
        .collect();
    if !missing.is_empty() {
        for garage in state.db.garages().get_by_ids(&missing).await? {
            cache.insert(garage.id.clone(), GarageDto::from(garage));
        }
    }

    // Assignment order, skipping ids whose garage row has vanished.
    let garages = garage_ids
        .iter()
        .filter_map(|id| cache.get(id).cloned())
        .collect();

    Ok(CarResponse {
        id: car.id,
        make: car.make,
        model: car.model,
        production_year: car.production_year,
        license_plate: car.license_plate,
        garages,
    })
}

/// Verifies every referenced garage exists, caching the fetched rows for the
/// response decoration. Duplicate ids in the payload collapse to one.
async fn verify_garages_exist(
    state: &AppState,
    garage_ids: &[String],
    cache: &mut HashMap<String, GarageDto>,
) -> Result<(), ApiError> {
    let mut unique = garage_ids.to_vec();
    unique.sort();
    unique.dedup();

    let garages = state.db.garages().get_by_ids(&unique).await?;
    if garages.len() != unique.len() {
        let found: HashSet<&str> = garages.iter().map(|garage| garage.id.as_str()).collect();
        let missing = unique
            .iter()
            .find(|id| !found.contains(id.as_str()))
            .cloned()
            .unwrap_or_default();
        return Err(ValidationError::InvalidFormat {
            field: "garageIds".to_string(),
            reason: format!("unknown garage id {missing}"),
        }
        .into());
    }

    for garage in garages {
        cache.insert(garage.id.clone(), GarageDto::from(garage));
    }
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /cars/:car_id`
pub async fn get_car(
    State(state): State<AppState>,
    Path(car_id): Path<String>,
) -> Result<Json<CarResponse>, ApiError> {
    let car = state
        .db
        .cars()
        .get_by_id(&car_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Car", &car_id))?;

    let mut cache = HashMap::new();
    Ok(Json(decorate_car(&state, car, &mut cache).await?))
}

/// `GET /cars?carMake&garageId&fromYear&toYear`
pub async fn search_cars(
    State(state): State<AppState>,
    Query(query): Query<CarSearchQuery>,
) -> Result<Json<Vec<CarResponse>>, ApiError> {
    let make = validate_search_term(&required("carMake", query.car_make)?)?;
    let garage_id = required("garageId", query.garage_id)?;
    let from_year = required("fromYear", query.from_year)?;
    let to_year = required("toYear", query.to_year)?;

    let cars = state
        .db
        .cars()
        .search(&make, &garage_id, from_year, to_year)
        .await?;

    let mut cache = HashMap::new();
    let mut decorated = Vec::with_capacity(cars.len());
    for car in cars {
        decorated.push(decorate_car(&state, car, &mut cache).await?);
    }

    Ok(Json(decorated))
}

/// `POST /cars`
pub async fn create_car(
    State(state): State<AppState>,
    Json(payload): Json<CarPayload>,
) -> Result<Json<CarResponse>, ApiError> {
    validate_payload(&payload)?;

    let mut cache = HashMap::new();
    verify_garages_exist(&state, &payload.garage_ids, &mut cache).await?;

    let now = Utc::now();
    let car = Car {
        id: generate_car_id(),
        make: payload.make.trim().to_string(),
        model: payload.model.trim().to_string(),
        production_year: payload.production_year,
        license_plate: payload.license_plate.trim().to_string(),
        created_at: now,
        updated_at: now,
    };

    state.db.cars().insert(&car).await?;
    state
        .db
        .assignments()
        .set_car_garages(&car.id, &payload.garage_ids)
        .await?;
    info!(id = %car.id, garages = payload.garage_ids.len(), "Car created");

    Ok(Json(decorate_car(&state, car, &mut cache).await?))
}

/// `PUT /cars/:car_id`
///
/// Replaces the car's fields and its assignment set.
pub async fn update_car(
    State(state): State<AppState>,
    Path(car_id): Path<String>,
    Json(payload): Json<CarPayload>,
) -> Result<Json<CarResponse>, ApiError> {
    validate_payload(&payload)?;

    let mut car = state
        .db
        .cars()
        .get_by_id(&car_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Car", &car_id))?;

    let mut cache = HashMap::new();
    verify_garages_exist(&state, &payload.garage_ids, &mut cache).await?;

    car.make = payload.make.trim().to_string();
    car.model = payload.model.trim().to_string();
    car.production_year = payload.production_year;
    car.license_plate = payload.license_plate.trim().to_string();

    state.db.cars().update(&car).await?;
    state
        .db
        .assignments()
        .set_car_garages(&car.id, &payload.garage_ids)
        .await?;
    info!(id = %car.id, "Car updated");

    Ok(Json(decorate_car(&state, car, &mut cache).await?))
}

/// `DELETE /cars/:car_id`
///
/// Clears the car's assignment rows as well. Its maintenance history is kept;
/// detail reads for those records report the car make as absent.
pub async fn delete_car(
    State(state): State<AppState>,
    Path(car_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.db.cars().delete(&car_id).await?;
    let cleared = state.db.assignments().clear_car(&car_id).await?;
    info!(id = %car_id, assignments_cleared = cleared, "Car deleted");

    Ok(StatusCode::NO_CONTENT)
}
