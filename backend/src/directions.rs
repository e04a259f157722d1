//! Transit directions from the Google Directions API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::GoogleConfig;
use crate::models::{Coordinate, RouteStep, TransitDetails, TravelMode};

#[derive(Debug, thiserror::Error)]
pub enum DirectionsError {
    #[error("directions connection failed: {0}")]
    ConnectionFailed(String),
    #[error("directions request failed: HTTP {0}")]
    RequestFailed(u16),
    #[error("directions parse error: {0}")]
    ParseError(String),
    #[error("directions request timed out")]
    Timeout,
    #[error("no transit route found (status {0})")]
    NoRoute(String),
}

/// First leg of the first route returned for a transit query.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitRoute {
    pub steps: Vec<RouteStep>,
    pub distance_meters: u64,
    pub duration_text: String,
}

#[async_trait]
pub trait DirectionsClient: Send + Sync {
    async fn transit_route(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<TransitRoute, DirectionsError>;
}

#[derive(Debug, Clone)]
pub struct GoogleDirectionsClient {
    client: Client,
    config: GoogleConfig,
}

impl GoogleDirectionsClient {
    pub fn new(config: &GoogleConfig, timeout_secs: u64) -> Result<Self, DirectionsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| DirectionsError::ConnectionFailed(e.to_string()))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Parse a raw Directions response body.
    pub fn parse_response(body: &str) -> Result<TransitRoute, DirectionsError> {
        let raw: RawDirections =
            serde_json::from_str(body).map_err(|e| DirectionsError::ParseError(e.to_string()))?;
        Self::convert(raw)
    }

    fn convert(raw: RawDirections) -> Result<TransitRoute, DirectionsError> {
        if raw.status != "OK" {
            return Err(DirectionsError::NoRoute(raw.status));
        }
        let leg = raw
            .routes
            .into_iter()
            .next()
            .and_then(|route| route.legs.into_iter().next())
            .ok_or_else(|| DirectionsError::NoRoute("EMPTY_ROUTE".to_string()))?;

        let distance_meters = leg.distance.map_or(0, |d| d.value);
        if leg.steps.is_empty() || distance_meters == 0 {
            return Err(DirectionsError::NoRoute("EMPTY_LEG".to_string()));
        }

        Ok(TransitRoute {
            steps: leg.steps.into_iter().map(Self::convert_step).collect(),
            distance_meters,
            duration_text: leg.duration.map(|d| d.text).unwrap_or_default(),
        })
    }

    fn convert_step(raw: RawStep) -> RouteStep {
        RouteStep {
            travel_mode: raw.travel_mode,
            encoded_path: raw.polyline.map(|p| p.points).unwrap_or_default(),
            transit_details: raw.transit_details.map(Self::convert_details),
        }
    }

    fn convert_details(raw: RawTransitDetails) -> TransitDetails {
        let line = raw.line.unwrap_or_default();
        TransitDetails {
            vehicle_type: line.vehicle.map(|v| v.vehicle_type).unwrap_or_default(),
            line_name: line.short_name.or(line.name).unwrap_or_default(),
            departure_stop: raw.departure_stop.map(|s| s.name).unwrap_or_default(),
            arrival_stop: raw.arrival_stop.map(|s| s.name).unwrap_or_default(),
            headsign: raw.headsign,
            stop_count: raw.num_stops,
        }
    }
}

#[async_trait]
impl DirectionsClient for GoogleDirectionsClient {
    #[instrument(skip(self), fields(from = %format!("{},{}", from.lat, from.lon), to = %format!("{},{}", to.lat, to.lon)))]
    async fn transit_route(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<TransitRoute, DirectionsError> {
        let url = format!("{}/maps/api/directions/json", self.config.base_url);
        let params = [
            ("origin", format!("{},{}", from.lat, from.lon)),
            ("destination", format!("{},{}", to.lat, to.lon)),
            ("mode", "transit".to_string()),
            ("key", self.config.api_key.clone()),
        ];

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DirectionsError::Timeout
                } else {
                    DirectionsError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectionsError::RequestFailed(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DirectionsError::ParseError(e.to_string()))?;
        let route = Self::parse_response(&body)?;
        debug!(
            steps = route.steps.len(),
            distance_m = route.distance_meters,
            "fetched transit route"
        );
        Ok(route)
    }
}

#[derive(Debug, Deserialize)]
struct RawDirections {
    status: String,
    #[serde(default)]
    routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    #[serde(default)]
    legs: Vec<RawLeg>,
}

#[derive(Debug, Deserialize)]
struct RawLeg {
    distance: Option<RawDistance>,
    duration: Option<RawDuration>,
    #[serde(default)]
    steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
struct RawDistance {
    #[serde(default)]
    value: u64,
}

#[derive(Debug, Deserialize)]
struct RawDuration {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct RawStep {
    travel_mode: TravelMode,
    polyline: Option<RawPolyline>,
    transit_details: Option<RawTransitDetails>,
}

#[derive(Debug, Deserialize)]
struct RawPolyline {
    #[serde(default)]
    points: String,
}

#[derive(Debug, Deserialize)]
struct RawTransitDetails {
    line: Option<RawLine>,
    departure_stop: Option<RawStop>,
    arrival_stop: Option<RawStop>,
    headsign: Option<String>,
    num_stops: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLine {
    short_name: Option<String>,
    name: Option<String>,
    vehicle: Option<RawVehicle>,
}

#[derive(Debug, Deserialize)]
struct RawVehicle {
    #[serde(default, rename = "type")]
    vehicle_type: String,
}

#[derive(Debug, Deserialize)]
struct RawStop {
    #[serde(default)]
    name: String,
}
