pub mod classify;
pub mod config;
pub mod directions;
pub mod distance;
pub mod error;
pub mod geocoding;
pub mod gpx_export;
pub mod models;
pub mod overlay;
pub mod points;
pub mod polyline;
pub mod session;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::directions::{DirectionsClient, GoogleDirectionsClient};
use crate::error::{AppError, api_error};
use crate::geocoding::{KakaoPlaceSearch, NaverGeocoder, PlaceSearch};
use crate::models::{
    ApiError, Coordinate, GeoPoint, NearestRequest, NearestResult, PlaceCandidate, PlaceQuery,
    SessionView,
};
use crate::points::PointTable;
use crate::session::SessionStore;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

#[derive(Clone)]
pub struct AppState {
    pub points: Arc<PointTable>,
    pub places: Arc<dyn PlaceSearch>,
    pub geocoder: Arc<dyn PlaceSearch>,
    pub directions: Arc<dyn DirectionsClient>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Load the point table and build the upstream clients.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let points = PointTable::from_file(&config.points_path)?;
        tracing::info!(
            "loaded {} parking points from {}",
            points.len(),
            config.points_path.display()
        );

        Ok(Self {
            points: Arc::new(points),
            places: Arc::new(KakaoPlaceSearch::new(&config.kakao, config.http_timeout_secs)?),
            geocoder: Arc::new(NaverGeocoder::new(&config.naver, config.http_timeout_secs)?),
            directions: Arc::new(GoogleDirectionsClient::new(
                &config.google,
                config.http_timeout_secs,
            )?),
            sessions: Arc::new(SessionStore::new(config.session_capacity)),
        })
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/points", get(points_handler))
        .route("/api/places", get(places_handler))
        .route("/api/geocode", get(geocode_handler))
        .route("/api/nearest", post(nearest_handler))
        .route("/api/sessions/:id", get(session_handler))
        .route("/api/sessions/:id/select", post(select_handler))
        .layer(cors)
        .with_state(state)
}

async fn points_handler(State(state): State<AppState>) -> Json<Vec<GeoPoint>> {
    Json(state.points.points().to_vec())
}

/// GET /api/places?query=... - Kakao keyword search for start places
async fn places_handler(
    State(state): State<AppState>,
    Query(query): Query<PlaceQuery>,
) -> ApiResult<Vec<PlaceCandidate>> {
    state
        .places
        .search(&query.query)
        .await
        .map(Json)
        .map_err(|e| api_error(e.into()))
}

/// GET /api/geocode?query=... - Naver address geocoding
async fn geocode_handler(
    State(state): State<AppState>,
    Query(query): Query<PlaceQuery>,
) -> ApiResult<Vec<PlaceCandidate>> {
    state
        .geocoder
        .search(&query.query)
        .await
        .map(Json)
        .map_err(|e| api_error(e.into()))
}

async fn nearest_handler(
    State(state): State<AppState>,
    Json(req): Json<NearestRequest>,
) -> ApiResult<NearestResult> {
    let origin = Coordinate::new(req.lat, req.lon);
    if !origin.is_valid() {
        return Err(api_error(AppError::InvalidCoordinate {
            lat: req.lat,
            lon: req.lon,
        }));
    }
    state
        .points
        .nearest(origin)
        .map(Json)
        .map_err(|e| api_error(e.into()))
}

async fn session_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<SessionView> {
    Json(state.sessions.get(&id).view(&state.points))
}

/// POST /api/sessions/:id/select - pick a start place and route to its nearest point
async fn select_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(place): Json<PlaceCandidate>,
) -> ApiResult<SessionView> {
    tracing::info!("session {id}: selected {:?}", place.label);

    let mut session = state.sessions.get(&id);
    let result = session
        .select(place, &state.points, state.directions.as_ref())
        .await;
    state.sessions.put(&id, session.clone());

    result.map_err(api_error)?;
    Ok(Json(session.view(&state.points)))
}
