//! HTTP route layer for the Hawaii climate API.
//!
//! Maps six read-only `GET` routes onto the query methods of
//! [`hca_db::Database`] and serializes the results as JSON. The database
//! handle is injected as axum state; handlers never reach for globals.

pub mod error;
pub mod handlers;

pub use error::ApiError;

use axum::{routing::get, Router};
use hca_db::Database;

/// Build the API router over an opened database handle.
pub fn router(db: Database) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/v1.0/precipitation", get(handlers::precipitation))
        .route("/api/v1.0/stations", get(handlers::stations))
        .route("/api/v1.0/tobs", get(handlers::tobs))
        .route("/api/v1.0/{start_date}", get(handlers::temperature_from))
        .route(
            "/api/v1.0/{start_date}/{end_date}",
            get(handlers::temperature_between),
        )
        .with_state(db)
}
