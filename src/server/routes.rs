//! Route Handlers
//!
//! Thin translation between HTTP request shapes and the query service.
//! Distances are rendered as strings so the infinite vocabulary-miss
//! sentinel survives JSON encoding as `"inf"`.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::error;

use super::{AppState, HealthReport};
use crate::error::Error;

/// Handler-level error wrapper mapping the crate taxonomy to status codes.
pub(super) struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Input(_) => StatusCode::BAD_REQUEST,
            Error::Connection(_) | Error::Protocol(_) => StatusCode::BAD_GATEWAY,
            Error::DataIntegrity(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("request failed: {}", self.0);
        }
        (
            status,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

fn missing(name: &str) -> ApiError {
    ApiError(Error::Input(format!("missing required parameter {}", name)))
}

fn format_distance(distance: f32) -> String {
    distance.to_string()
}

pub(super) async fn ping() -> &'static str {
    "Pong!"
}

#[derive(Deserialize)]
pub(super) struct DistanceParams {
    origin: Option<String>,
    destination: Option<String>,
}

#[derive(Serialize)]
pub(super) struct DistanceResponse {
    distance: String,
}

/// GET /nlp/distance?origin=dog&destination=cat
pub(super) async fn distance(
    State(state): State<AppState>,
    Query(params): Query<DistanceParams>,
) -> Result<Json<DistanceResponse>, ApiError> {
    let start = Instant::now();
    let origin = params.origin.ok_or_else(|| missing("origin"))?;
    let destination = params.destination.ok_or_else(|| missing("destination"))?;

    let distance = state.query.distance_between(&origin, &destination).await?;
    state.metrics.record_request("distance", start.elapsed());

    Ok(Json(DistanceResponse {
        distance: format_distance(distance),
    }))
}

#[derive(Deserialize)]
pub(super) struct DestinationsParams {
    origin: Option<String>,
    destinations: Option<String>,
    ascending: Option<bool>,
}

#[derive(Serialize)]
pub(super) struct DestinationsResponse {
    origin: String,
    destinations: Vec<String>,
    distances: Vec<String>,
}

/// GET /nlp/destinations?origin=dog&destinations=["cat","bird"]
pub(super) async fn destinations(
    State(state): State<AppState>,
    Query(params): Query<DestinationsParams>,
) -> Result<Json<DestinationsResponse>, ApiError> {
    let start = Instant::now();
    let origin = params.origin.ok_or_else(|| missing("origin"))?;
    let raw = params.destinations.ok_or_else(|| missing("destinations"))?;

    let words: Vec<String> = serde_json::from_str(raw.trim()).map_err(|_| {
        ApiError(Error::Input(
            "destinations must be a JSON array of words".to_string(),
        ))
    })?;

    let ranked = state
        .query
        .ranked_neighbors(&origin, &words, params.ascending.unwrap_or(true))
        .await?;
    state.metrics.record_request("destinations", start.elapsed());

    let (destinations, distances): (Vec<String>, Vec<String>) = ranked
        .into_iter()
        .map(|r| (r.word, format_distance(r.distance)))
        .unzip();

    Ok(Json(DestinationsResponse {
        origin,
        destinations,
        distances,
    }))
}

#[derive(Deserialize)]
pub(super) struct SuggestionsParams {
    word: Option<String>,
    edit_distance_2: Option<bool>,
}

#[derive(Serialize)]
pub(super) struct SuggestionsResponse {
    word: String,
    suggestions: Vec<String>,
}

/// GET /nlp/suggestions?word=dagg&edit_distance_2=false
pub(super) async fn suggestions(
    State(state): State<AppState>,
    Query(params): Query<SuggestionsParams>,
) -> Result<Json<SuggestionsResponse>, ApiError> {
    let start = Instant::now();
    let word = params.word.ok_or_else(|| missing("word"))?;

    let suggestions = state
        .query
        .spelling_suggestions(&word, params.edit_distance_2.unwrap_or(false))
        .await?;
    state.metrics.record_request("suggestions", start.elapsed());

    Ok(Json(SuggestionsResponse { word, suggestions }))
}

/// GET /health
pub(super) async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.health.check(state.query.store()).await)
}

/// GET /metrics
pub(super) async fn metrics(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4")],
        state.metrics.export_prometheus(),
    )
        .into_response()
}

pub(super) async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "not found".to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infinite_distance_renders_as_inf() {
        assert_eq!(format_distance(f32::INFINITY), "inf");
        assert_eq!(format_distance(0.25), "0.25");
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (Error::Input("x".into()), StatusCode::BAD_REQUEST),
            (Error::Connection("x".into()), StatusCode::BAD_GATEWAY),
            (Error::Protocol("x".into()), StatusCode::BAD_GATEWAY),
            (
                Error::DataIntegrity("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let response = ApiError(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_destinations_json_shapes() {
        let words: Vec<String> = serde_json::from_str(r#"["cat","bird"]"#).unwrap();
        assert_eq!(words, vec!["cat".to_string(), "bird".to_string()]);

        assert!(serde_json::from_str::<Vec<String>>("not json").is_err());
        assert!(serde_json::from_str::<Vec<String>>(r#"{"a":1}"#).is_err());
    }
}
