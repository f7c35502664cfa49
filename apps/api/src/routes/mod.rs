//! # HTTP Routes
//!
//! The REST surface of the API server.
//!
//! ## Route Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET    /status                                   liveness probe        │
//! │                                                                         │
//! │  GET    /cars?carMake&garageId&fromYear&toYear    search                │
//! │  POST   /cars                                     create                │
//! │  GET    /cars/:car_id                                                   │
//! │  PUT    /cars/:car_id                                                   │
//! │  DELETE /cars/:car_id                                                   │
//! │                                                                         │
//! │  GET    /garages?city                             search                │
//! │  GET    /garages/dailyAvailabilityReport          per-day availability  │
//! │  POST   /garages                                  create                │
//! │  GET    /garages/:garage_id                                             │
//! │  PUT    /garages/:garage_id                                             │
//! │  DELETE /garages/:garage_id                                             │
//! │                                                                         │
//! │  GET    /maintenance?carId&garageId&startDate&endDate     search        │
//! │  GET    /maintenance/monthlyRequestsReport        per-month counts      │
//! │  POST   /maintenance                              create (admission)    │
//! │  GET    /maintenance/:maintenance_id                                    │
//! │  PUT    /maintenance/:maintenance_id              update (admission)    │
//! │  DELETE /maintenance/:maintenance_id                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The report paths are static routes registered next to the `:id` matchers;
//! axum resolves static segments ahead of captures, so
//! `/garages/dailyAvailabilityReport` never reaches `get_garage`.

mod cars;
mod garages;
mod maintenance;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

use pitstop_core::ValidationError;

use crate::error::ApiError;
use crate::state::AppState;

/// Liveness probe.
async fn status() -> &'static str {
    "OK"
}

/// Unwraps a required query parameter, naming the missing field otherwise.
fn required<T>(field: &str, value: Option<T>) -> Result<T, ApiError> {
    value.ok_or_else(|| {
        ValidationError::Required {
            field: field.to_string(),
        }
        .into()
    })
}

/// Builds the application router with middleware attached.
pub fn build_router(state: AppState) -> Router {
    let cars = Router::new()
        .route("/cars", get(cars::search_cars).post(cars::create_car))
        .route(
            "/cars/:car_id",
            get(cars::get_car)
                .put(cars::update_car)
                .delete(cars::delete_car),
        );

    let garages = Router::new()
        .route(
            "/garages",
            get(garages::search_garages).post(garages::create_garage),
        )
        .route(
            "/garages/dailyAvailabilityReport",
            get(garages::daily_availability_report),
        )
        .route(
            "/garages/:garage_id",
            get(garages::get_garage)
                .put(garages::update_garage)
                .delete(garages::delete_garage),
        );

    let maintenance = Router::new()
        .route(
            "/maintenance",
            get(maintenance::search_maintenance).post(maintenance::create_maintenance),
        )
        .route(
            "/maintenance/monthlyRequestsReport",
            get(maintenance::monthly_requests_report),
        )
        .route(
            "/maintenance/:maintenance_id",
            get(maintenance::get_maintenance)
                .put(maintenance::update_maintenance)
                .delete(maintenance::delete_maintenance),
        );

    Router::new()
        .route("/status", get(status))
        .merge(cars)
        .merge(garages)
        .merge(maintenance)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

// =============================================================================
// Unit Tests
// =============================================================================
