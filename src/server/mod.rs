// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! HTTP endpoints for the airport finder.
//!
//! Handlers only translate between HTTP and [`airport_data`]: path and query
//! parameters go in, record projections or a flight-plan link come out.
//! The store is shared read-only through the router state.

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use airport_data::{AirportRecord, AirportStore, FlightPlanRequest, NearestQuery, DEFAULT_NEAREST_COUNT};
use axum::{
    body::Bytes,
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
};

pub use crate::server::error::{ApiError, Error};
use crate::config::AppConfig;

#[derive(Debug, Clone)]
struct ServerState {
    store: Arc<AirportStore>,
    assets_dir: Arc<PathBuf>,
}

/// Build the API router around a loaded store
pub fn router(store: Arc<AirportStore>, config: &AppConfig) -> Result<Router, Error> {
    let origin = HeaderValue::from_str(&config.server.allowed_origin)
        .map_err(|e| Error::InvalidOrigin(format!("{}: {e}", config.server.allowed_origin)))?;
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let state = ServerState {
        store,
        assets_dir: Arc::new(config.assets_dir.clone()),
    };

    Ok(Router::new()
        .route("/nearestAirports/{lat}/{long}", get(nearest_airports))
        .route("/searchByName/{city_name}", get(search_by_name))
        .route("/searchByIdent/{ident}", get(search_by_ident))
        .route("/flightPlan", post(flight_plan))
        .route("/logo.png", get(plugin_logo))
        .route("/.well-known/ai-plugin.json", get(plugin_manifest))
        .route("/openapi.yaml", get(openapi_spec))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors)
        .with_state(state))
}

/// Bind the configured address and serve until Ctrl-C
pub async fn serve(router: Router, config: &AppConfig) -> Result<(), Error> {
    let address = &config.server.bind_address;
    let listener = TcpListener::bind(address)
        .await
        .map_err(|cause| Error::Io {
            message: format!("failed to listen on {address}"),
            cause,
        })?;

    if let Ok(local_addr) = listener.local_addr() {
        info!("Starting REST server on {local_addr}");
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|cause| Error::Io {
            message: "server terminated".to_string(),
            cause,
        })?;

    info!("REST server has been shut down.");
    Ok(())
}

/// Resolves on Ctrl-C, which starts graceful shutdown of the server
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Starting graceful shutdown for REST server..."),
        Err(e) => log::error!("Failed to listen for shutdown signal: {e}"),
    }
}

fn airports_response(airports: &[&AirportRecord]) -> Response {
    Json(airports).into_response()
}

#[derive(Debug, Deserialize)]
struct NearestParams {
    count: Option<usize>,
    #[serde(rename = "type")]
    airport_type: Option<String>,
}

async fn nearest_airports(
    State(state): State<ServerState>,
    path: Result<Path<(f64, f64)>, PathRejection>,
    params: Result<Query<NearestParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Path((lat, long)) = path.map_err(|e| ApiError::InvalidPath(e.body_text()))?;
    let Query(params) = params.map_err(|e| ApiError::InvalidQuery(e.body_text()))?;
    debug!("nearestAirports lat={lat} long={long} {params:?}");

    let mut query =
        NearestQuery::new(lat, long).with_count(params.count.unwrap_or(DEFAULT_NEAREST_COUNT));
    if let Some(airport_type) = params.airport_type {
        query = query.with_type_filter(airport_type);
    }

    Ok(airports_response(&state.store.nearest(&query)))
}

async fn search_by_name(
    State(state): State<ServerState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(city_name) = path.map_err(|e| ApiError::InvalidPath(e.body_text()))?;
    debug!("searchByName {city_name:?}");

    Ok(airports_response(&state.store.search_by_name(&city_name)))
}

async fn search_by_ident(
    State(state): State<ServerState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(ident) = path.map_err(|e| ApiError::InvalidPath(e.body_text()))?;
    debug!("searchByIdent {ident:?}");

    Ok(airports_response(&state.store.search_by_ident(&ident)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FlightPlanResponse {
    flight_plan_link: String,
}

async fn flight_plan(body: Bytes) -> Result<Json<FlightPlanResponse>, ApiError> {
    let payload: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        debug!("flightPlan body is not JSON: {e}");
        ApiError::InvalidJson
    })?;
    let request = FlightPlanRequest::from_json(&payload)?;
    debug!("flightPlan with {} waypoints", request.coordinates.len());

    Ok(Json(FlightPlanResponse {
        flight_plan_link: request.link(),
    }))
}

/// Serve a file from the assets directory with a fixed content type
async fn asset(state: &ServerState, name: &str, content_type: &'static str) -> Result<Response, ApiError> {
    let path = state.assets_dir.join(name);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ApiError::NotFound(name.to_string())),
        Err(cause) => Err(ApiError::Asset {
            name: name.to_string(),
            cause,
        }),
    }
}

async fn plugin_logo(State(state): State<ServerState>) -> Result<Response, ApiError> {
    asset(&state, "logo.png", "image/png").await
}

async fn plugin_manifest(State(state): State<ServerState>) -> Result<Response, ApiError> {
    asset(&state, ".well-known/ai-plugin.json", "text/json").await
}

async fn openapi_spec(State(state): State<ServerState>) -> Result<Response, ApiError> {
    asset(&state, "openapi.yaml", "text/yaml").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn airport(ident: &str, name: &str, airport_type: Option<&str>, lat: f64, lon: f64) -> AirportRecord {
        AirportRecord {
            name: name.to_string(),
            ident: ident.to_string(),
            airport_type: airport_type.map(str::to_string),
            latitude: lat,
            longitude: lon,
            reference_url: format!("https://en.wikipedia.org/wiki/{ident}"),
        }
    }

    fn test_router(assets_dir: PathBuf) -> Router {
        let store = AirportStore::from_records(vec![
            airport("KJFK", "John F Kennedy International Airport", Some("large_airport"), 40.639447, -73.779317),
            airport("KLGA", "La Guardia Airport", Some("large_airport"), 40.777199, -73.872597),
            airport("KFRG", "Republic Airport", Some("medium_airport"), 40.728802, -73.413399),
            airport("NY01", "Springfield Strip", Some("small_airport"), 40.9, -73.9),
            airport("NY02", "Unlabelled Field", None, 41.0, -74.0),
            airport("AR01", "SPRINGDALE MUNICIPAL", Some("small_airport"), 36.176399, -94.119003),
            airport("KBOS", "Boston Logan International Airport", Some("large_airport"), 42.3643, -71.005203),
        ]);
        let config = AppConfig {
            assets_dir,
            ..AppConfig::default()
        };
        router(Arc::new(store), &config).unwrap()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Bytes) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body)
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        let (status, body) = send(test_router(PathBuf::from("static")), request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn post_flight_plan(body: &'static str) -> (StatusCode, Value) {
        let request = Request::post("/flightPlan")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        let (status, body) = send(test_router(PathBuf::from("static")), request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn idents(value: &Value) -> Vec<&str> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["ident"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_nearest_airports_projection() {
        let (status, body) = get_json("/nearestAirports/40.64/-73.78?count=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([{
                "name": "John F Kennedy International Airport",
                "ident": "KJFK",
                "type": "large_airport",
                "lat": 40.639447,
                "long": -73.779317,
                "url": "https://en.wikipedia.org/wiki/KJFK",
            }])
        );
    }

    #[tokio::test]
    async fn test_nearest_airports_default_count() {
        let (status, body) = get_json("/nearestAirports/40.64/-73.78").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(idents(&body), vec!["KJFK", "KLGA", "NY01", "KFRG", "NY02"]);
    }

    #[tokio::test]
    async fn test_nearest_airports_type_filter() {
        let (status, body) = get_json("/nearestAirports/40.64/-73.78?count=10&type=small").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(idents(&body), vec!["NY01", "NY02", "AR01"]);
    }

    #[tokio::test]
    async fn test_nearest_airports_invalid_latitude() {
        let (status, body) = get_json("/nearestAirports/north/-73.78").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_nearest_airports_invalid_count() {
        let (status, body) = get_json("/nearestAirports/40.64/-73.78?count=-1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_search_by_name() {
        let (status, body) = get_json("/searchByName/spring").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(idents(&body), vec!["NY01", "AR01"]);
    }

    #[tokio::test]
    async fn test_search_by_name_percent_encoded() {
        let (_, body) = get_json("/searchByName/la%20guardia").await;
        assert_eq!(idents(&body), vec!["KLGA"]);
    }

    #[tokio::test]
    async fn test_search_by_ident() {
        let (status, body) = get_json("/searchByIdent/ny0").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(idents(&body), vec!["NY01", "NY02"]);

        let (_, body) = get_json("/searchByIdent/ZZZZ").await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_flight_plan() {
        let (status, body) = post_flight_plan(
            r#"{"coordinates": [{"lat": 40.6413, "long": -73.7781}, {"lat": -33.9461, "long": 151.1772}]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"flightPlanLink": "https://skyvector.com/?fpl=403829N0734641W%20335646S1511038E"})
        );
    }

    #[tokio::test]
    async fn test_flight_plan_empty_coordinates() {
        let (status, body) = post_flight_plan(r#"{"coordinates": []}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"flightPlanLink": "https://skyvector.com/?fpl="}));
    }

    #[tokio::test]
    async fn test_flight_plan_missing_coordinates() {
        let (status, body) = post_flight_plan("{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid input provided. Missing coordinates."}));
    }

    #[tokio::test]
    async fn test_flight_plan_coordinates_not_array() {
        let (status, body) = post_flight_plan(r#"{"coordinates": "40.6,-73.7"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": "Invalid input provided. Coordinates must be an array."})
        );
    }

    #[tokio::test]
    async fn test_flight_plan_malformed_json() {
        let (status, body) = post_flight_plan(r#"{"coordinates": ["#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid JSON input provided."}));
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin_only() {
        let request = Request::get("/searchByIdent/KJFK")
            .header(header::ORIGIN, "https://chat.openai.com")
            .body(Body::empty())
            .unwrap();
        let response = test_router(PathBuf::from("static")).oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://chat.openai.com"
        );

        let request = Request::get("/searchByIdent/KJFK")
            .header(header::ORIGIN, "https://example.com")
            .body(Body::empty())
            .unwrap();
        let response = test_router(PathBuf::from("static")).oneshot(request).await.unwrap();
        assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn test_static_assets() {
        let dir = std::env::temp_dir().join(format!("airport-finder-assets-{}", std::process::id()));
        std::fs::create_dir_all(dir.join(".well-known")).unwrap();
        std::fs::write(dir.join("openapi.yaml"), "openapi: 3.0.1\n").unwrap();
        std::fs::write(dir.join(".well-known/ai-plugin.json"), "{}").unwrap();

        let request = Request::get("/openapi.yaml").body(Body::empty()).unwrap();
        let response = test_router(dir.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "text/yaml");

        let request = Request::get("/.well-known/ai-plugin.json").body(Body::empty()).unwrap();
        let (status, body) = send(test_router(dir.clone()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"{}");

        let request = Request::get("/logo.png").body(Body::empty()).unwrap();
        let (status, _) = send(test_router(dir.clone()), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_invalid_origin_is_rejected() {
        let mut config = AppConfig::default();
        config.server.allowed_origin = "bad\norigin".to_string();
        assert!(matches!(
            router(Arc::new(AirportStore::default()), &config),
            Err(Error::InvalidOrigin(_))
        ));
    }
}
