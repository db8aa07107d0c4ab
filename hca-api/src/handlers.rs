//! Request handlers for the six API routes.
//!
//! Each handler parses its path parameters, runs one query against the
//! store, and shapes the result as JSON. rusqlite is synchronous, so every
//! query runs on the blocking thread pool with a cloned database handle.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use hca_db::models::{TempStats, TobsReading};
use hca_db::{dates, Database, DbError};

use crate::error::ApiError;

/// Landing page listing the available routes.
pub async fn index() -> &'static str {
    "Available routes:\n\
     /api/v1.0/precipitation\n\
     /api/v1.0/stations\n\
     /api/v1.0/tobs\n\
     /api/v1.0/<start_date>\n\
     /api/v1.0/<start_date>/<end_date>\n\
     \n\
     <start_date> and <end_date> are placeholders for YYYY-MM-DD dates.\n\
     Supply a start date alone for an open-ended temperature summary, or\n\
     both a start and an end date (in that order) for a bounded one.\n"
}

/// Precipitation readings per date for the one-year window ending at the
/// most recent observation.
pub async fn precipitation(
    State(db): State<Database>,
) -> Result<Json<BTreeMap<String, Vec<f64>>>, ApiError> {
    let map = run_query(move || db.precipitation_by_date()).await?;
    Ok(Json(map))
}

/// All station names, one entry per station row.
pub async fn stations(State(db): State<Database>) -> Result<Json<Vec<String>>, ApiError> {
    let names = run_query(move || db.station_names()).await?;
    Ok(Json(names))
}

/// The most-active station's temperature readings for the one-year window.
pub async fn tobs(State(db): State<Database>) -> Result<Json<Vec<TobsReading>>, ApiError> {
    let readings = run_query(move || db.recent_station_temperatures()).await?;
    Ok(Json(readings))
}

/// Temperature summary from a start date onward (open upper bound).
pub async fn temperature_from(
    State(db): State<Database>,
    Path(start_date): Path<String>,
) -> Result<Json<String>, ApiError> {
    let start = parse_param(&start_date)?;
    let stats = run_query(move || db.temperature_stats(&start, None)).await?;
    let (min, max, avg) = require_observations(stats)?;
    Ok(Json(format!(
        "The minimum temperature recorded from {start_date} onward is {min}, \
         the maximum is {max}, and the average is {avg:.2}."
    )))
}

/// Temperature summary for an inclusive start/end date range.
pub async fn temperature_between(
    State(db): State<Database>,
    Path((start_date, end_date)): Path<(String, String)>,
) -> Result<Json<String>, ApiError> {
    let start = parse_param(&start_date)?;
    let end = parse_param(&end_date)?;
    let stats = run_query(move || db.temperature_stats(&start, Some(&end))).await?;
    let (min, max, avg) = require_observations(stats)?;
    Ok(Json(format!(
        "The minimum temperature recorded between {start_date} and {end_date} is {min}, \
         the maximum is {max}, and the average is {avg:.2}."
    )))
}

/// Run a synchronous query on the blocking thread pool.
async fn run_query<T, F>(query: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, DbError> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(query)
        .await
        .map_err(|_| ApiError::TaskFailed)?;
    result.map_err(ApiError::from)
}

fn parse_param(raw: &str) -> Result<NaiveDate, ApiError> {
    dates::parse_date(raw).map_err(|_| ApiError::InvalidDate(raw.to_string()))
}

/// Unpack aggregate statistics, rejecting a range that matched no rows.
fn require_observations(stats: TempStats) -> Result<(f64, f64, f64), ApiError> {
    match (stats.min, stats.max, stats.avg) {
        (Some(min), Some(max), Some(avg)) => Ok((min, max, avg)),
        _ => Err(ApiError::NoObservations),
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use hca_db::Database;
    use http_body_util::BodyExt;
    use rusqlite::{params, Connection};
    use serde_json::Value;
    use tempfile::NamedTempFile;
    use tower::ServiceExt;

    /// Observation row: (station, date, prcp, tobs).
    type Obs = (&'static str, &'static str, Option<f64>, Option<f64>);

    fn fixture_app(stations: &[(&str, &str)], observations: &[Obs]) -> (NamedTempFile, Router) {
        let file = NamedTempFile::new().unwrap();
        let conn = Connection::open(file.path()).unwrap();
        conn.execute_batch(
            "CREATE TABLE measurement (id INTEGER PRIMARY KEY, station TEXT, date TEXT, prcp FLOAT, tobs FLOAT);
             CREATE TABLE station (id INTEGER PRIMARY KEY, station TEXT, name TEXT,
                                   latitude FLOAT, longitude FLOAT, elevation FLOAT);",
        )
        .unwrap();
        for (station_id, name) in stations {
            conn.execute(
                "INSERT INTO station (station, name) VALUES (?1, ?2)",
                params![station_id, name],
            )
            .unwrap();
        }
        for (station_id, date, prcp, tobs) in observations {
            conn.execute(
                "INSERT INTO measurement (station, date, prcp, tobs) VALUES (?1, ?2, ?3, ?4)",
                params![station_id, date, prcp, tobs],
            )
            .unwrap();
        }
        drop(conn);

        let db = Database::open(file.path()).unwrap();
        (file, crate::router(db))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let (status, body) = get(app, uri).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    #[tokio::test]
    async fn index_lists_all_routes() {
        let (_file, app) = fixture_app(&[], &[]);
        let (status, body) = get(app, "/").await;
        assert_eq!(status, StatusCode::OK);
        for route in [
            "/api/v1.0/precipitation",
            "/api/v1.0/stations",
            "/api/v1.0/tobs",
            "/api/v1.0/<start_date>",
            "/api/v1.0/<start_date>/<end_date>",
        ] {
            assert!(body.contains(route), "Index should mention {route}");
        }
        assert!(body.contains("YYYY-MM-DD"), "Placeholder syntax explained");
    }

    #[tokio::test]
    async fn precipitation_maps_dates_to_readings() {
        let (_file, app) = fixture_app(
            &[],
            &[
                ("USC00519281", "2017-08-20", Some(0.5), None),
                ("USC00519281", "2017-08-21", None, None),
                ("USC00513117", "2017-08-21", Some(0.1), None),
            ],
        );
        let (status, json) = get_json(app, "/api/v1.0/precipitation").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            serde_json::json!({ "2017-08-20": [0.5], "2017-08-21": [0.1] })
        );
    }

    #[tokio::test]
    async fn precipitation_empty_dataset_is_empty_object() {
        let (_file, app) = fixture_app(&[], &[]);
        let (status, json) = get_json(app, "/api/v1.0/precipitation").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!({}));
    }

    #[tokio::test]
    async fn stations_returns_every_name() {
        let (_file, app) = fixture_app(
            &[
                ("USC00519281", "WAIHEE 837.5, HI US"),
                ("USC00513117", "KANEOHE 838.1, HI US"),
            ],
            &[],
        );
        let (status, json) = get_json(app, "/api/v1.0/stations").await;
        assert_eq!(status, StatusCode::OK);
        let names = json.as_array().unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(names[0], "WAIHEE 837.5, HI US");
    }

    #[tokio::test]
    async fn tobs_returns_dated_readings_for_most_active_station() {
        let (_file, app) = fixture_app(
            &[],
            &[
                ("USC00519281", "2017-08-20", None, Some(76.0)),
                ("USC00519281", "2017-08-21", None, Some(77.0)),
                ("USC00513117", "2017-08-21", None, Some(80.0)),
            ],
        );
        let (status, json) = get_json(app, "/api/v1.0/tobs").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            serde_json::json!([
                { "date": "2017-08-20", "temperature": 76.0 },
                { "date": "2017-08-21", "temperature": 77.0 },
            ])
        );
    }

    #[tokio::test]
    async fn tobs_empty_dataset_is_empty_array() {
        let (_file, app) = fixture_app(&[], &[]);
        let (status, json) = get_json(app, "/api/v1.0/tobs").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn bounded_range_reports_min_max_avg() {
        let (_file, app) = fixture_app(
            &[],
            &[
                ("USC00519281", "2017-08-20", None, Some(62.0)),
                ("USC00519281", "2017-08-21", None, Some(70.0)),
                ("USC00513117", "2017-08-21", None, Some(58.0)),
            ],
        );
        let (status, json) = get_json(app, "/api/v1.0/2017-08-20/2017-08-21").await;
        assert_eq!(status, StatusCode::OK);
        let sentence = json.as_str().unwrap();
        assert!(sentence.contains("between 2017-08-20 and 2017-08-21"));
        assert!(sentence.contains("is 58"));
        assert!(sentence.contains("maximum is 70"));
        assert!(sentence.contains("average is 63.33"));
    }

    #[tokio::test]
    async fn open_range_reports_from_start_onward() {
        let (_file, app) = fixture_app(
            &[],
            &[
                ("USC00519281", "2017-08-20", None, Some(62.0)),
                ("USC00519281", "2017-08-25", None, Some(90.0)),
            ],
        );
        let (status, json) = get_json(app, "/api/v1.0/2017-08-21").await;
        assert_eq!(status, StatusCode::OK);
        let sentence = json.as_str().unwrap();
        assert!(sentence.contains("from 2017-08-21 onward"));
        assert!(sentence.contains("is 90"));
        assert!(sentence.contains("average is 90.00"));
    }

    #[tokio::test]
    async fn single_day_range_with_one_observation() {
        let (_file, app) = fixture_app(&[], &[("USC00519281", "2017-08-20", None, Some(71.0))]);
        let (status, json) = get_json(app, "/api/v1.0/2017-08-20/2017-08-20").await;
        assert_eq!(status, StatusCode::OK);
        let sentence = json.as_str().unwrap();
        assert!(sentence.contains("is 71"));
        assert!(sentence.contains("maximum is 71"));
        assert!(sentence.contains("average is 71.00"));
    }

    #[tokio::test]
    async fn malformed_start_date_is_bad_request() {
        let (_file, app) = fixture_app(&[], &[("USC00519281", "2017-08-20", None, Some(71.0))]);
        let (status, json) = get_json(app, "/api/v1.0/not-a-date").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("YYYY-MM-DD"));
    }

    #[tokio::test]
    async fn malformed_end_date_is_bad_request() {
        let (_file, app) = fixture_app(&[], &[("USC00519281", "2017-08-20", None, Some(71.0))]);
        let (status, _json) = get_json(app, "/api/v1.0/2017-08-20/2017-02-30").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_range_is_not_found() {
        let (_file, app) = fixture_app(&[], &[("USC00519281", "2017-08-20", None, Some(71.0))]);
        let (status, json) = get_json(app, "/api/v1.0/2020-01-01").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().contains("no temperature"));
    }
}
