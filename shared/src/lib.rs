use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// A parking location from the point table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Road address, when the source table has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl GeoPoint {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestResult {
    pub point: GeoPoint,
    pub distance_meters: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TravelMode {
    #[serde(rename = "WALKING", alias = "WALK")]
    Walk,
    #[serde(rename = "TRANSIT")]
    Transit,
    #[serde(other, rename = "OTHER")]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitDetails {
    pub vehicle_type: String,
    pub line_name: String,
    pub departure_stop: String,
    pub arrival_stop: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headsign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_count: Option<u32>,
}

/// One leg of a directions response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStep {
    pub travel_mode: TravelMode,
    pub encoded_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transit_details: Option<TransitDetails>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderColor {
    Blue,
    Green,
    Purple,
    Orange,
    Gray,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderHint {
    pub color: RenderColor,
    pub label: String,
}

/// Number of stops on a transit leg, or `"-"` when the provider omitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StopCount {
    Count(u32),
    Unknown(String),
}

impl StopCount {
    pub const UNKNOWN: &'static str = "-";

    pub fn unknown() -> Self {
        Self::Unknown(Self::UNKNOWN.to_string())
    }
}

impl From<Option<u32>> for StopCount {
    fn from(value: Option<u32>) -> Self {
        value.map_or_else(Self::unknown, Self::Count)
    }
}

impl fmt::Display for StopCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Unknown(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitSummary {
    pub segment_label: String,
    pub vehicle: String,
    pub line: String,
    pub heading: String,
    pub stop_count: StopCount,
}

/// A geocoding hit the user can pick as the start of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub label: String,
    pub lat: f64,
    pub lon: f64,
}

impl PlaceCandidate {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSegment {
    pub hint: RenderHint,
    pub path: Vec<Coordinate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteOverlay {
    pub destination: GeoPoint,
    pub segments: Vec<RouteSegment>,
    pub transfers: Vec<TransitSummary>,
    pub distance_meters: u64,
    pub duration_text: String,
    pub gpx_base64: String,
}

impl RouteOverlay {
    pub fn distance_km(&self) -> f64 {
        self.distance_meters as f64 / 1000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<PlaceCandidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nearest: Option<NearestResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteOverlay>,
    pub map_view: MapView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestRequest {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceQuery {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn travel_mode_accepts_provider_names() {
        let walk: TravelMode = serde_json::from_str("\"WALKING\"").unwrap();
        let walk_short: TravelMode = serde_json::from_str("\"WALK\"").unwrap();
        let transit: TravelMode = serde_json::from_str("\"TRANSIT\"").unwrap();
        let driving: TravelMode = serde_json::from_str("\"DRIVING\"").unwrap();
        assert_eq!(walk, TravelMode::Walk);
        assert_eq!(walk_short, TravelMode::Walk);
        assert_eq!(transit, TravelMode::Transit);
        assert_eq!(driving, TravelMode::Other);
    }

    #[test]
    fn stop_count_serializes_as_number_or_dash() {
        assert_eq!(serde_json::to_string(&StopCount::Count(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&StopCount::unknown()).unwrap(), "\"-\"");
        assert_eq!(StopCount::from(None).to_string(), "-");
    }

    #[test]
    fn coordinate_range_check() {
        assert!(Coordinate::new(37.5665, 126.978).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.5).is_valid());
    }
}
