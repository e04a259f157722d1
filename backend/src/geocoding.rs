//! Start-place lookup through Kakao keyword search and Naver geocoding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::{KakaoConfig, NaverConfig};
use crate::models::PlaceCandidate;

/// Queries shorter than this are not sent upstream.
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, thiserror::Error)]
pub enum GeocodingError {
    #[error("geocoding connection failed: {0}")]
    ConnectionFailed(String),
    #[error("geocoding request failed: HTTP {0}")]
    RequestFailed(u16),
    #[error("geocoding parse error: {0}")]
    ParseError(String),
    #[error("geocoding request timed out")]
    Timeout,
}

/// Resolve a free-form place name or address into pickable candidates.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, GeocodingError>;
}

fn build_client(timeout_secs: u64) -> Result<Client, GeocodingError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))
}

fn searchable(query: &str) -> Option<&str> {
    let query = query.trim();
    (query.chars().count() >= MIN_QUERY_CHARS).then_some(query)
}

async fn fetch_json<T: for<'de> Deserialize<'de>>(
    request: RequestBuilder,
) -> Result<T, GeocodingError> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            GeocodingError::Timeout
        } else {
            GeocodingError::ConnectionFailed(e.to_string())
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(GeocodingError::RequestFailed(status.as_u16()));
    }

    response
        .json()
        .await
        .map_err(|e| GeocodingError::ParseError(e.to_string()))
}

/// Kakao local keyword search (`/v2/local/search/keyword.json`).
#[derive(Debug, Clone)]
pub struct KakaoPlaceSearch {
    client: Client,
    config: KakaoConfig,
}

impl KakaoPlaceSearch {
    pub fn new(config: &KakaoConfig, timeout_secs: u64) -> Result<Self, GeocodingError> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl PlaceSearch for KakaoPlaceSearch {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, GeocodingError> {
        let Some(query) = searchable(query) else {
            return Ok(Vec::new());
        };

        let url = format!("{}/v2/local/search/keyword.json", self.config.base_url);
        let request = self
            .client
            .get(&url)
            .query(&[("query", query)])
            .header(
                "Authorization",
                format!("KakaoAK {}", self.config.rest_api_key),
            );

        let body: KakaoResponse = fetch_json(request).await?;
        let candidates: Vec<PlaceCandidate> = body
            .documents
            .into_iter()
            .filter_map(KakaoDocument::into_candidate)
            .collect();

        debug!(%query, count = candidates.len(), "Kakao keyword search");
        Ok(candidates)
    }
}

/// Both providers send coordinates as decimal strings; either may be absent.
fn lat_lon(y: Option<&str>, x: Option<&str>) -> Option<(f64, f64)> {
    let lat = y?.trim().parse::<f64>().ok()?;
    let lon = x?.trim().parse::<f64>().ok()?;
    Some((lat, lon))
}

#[derive(Debug, Deserialize)]
struct KakaoResponse {
    #[serde(default)]
    documents: Vec<KakaoDocument>,
}

#[derive(Debug, Deserialize)]
struct KakaoDocument {
    #[serde(default)]
    place_name: String,
    #[serde(default)]
    road_address_name: String,
    #[serde(default)]
    address_name: String,
    #[serde(default)]
    x: Option<String>,
    #[serde(default)]
    y: Option<String>,
}

impl KakaoDocument {
    fn into_candidate(self) -> Option<PlaceCandidate> {
        let Some((lat, lon)) = lat_lon(self.y.as_deref(), self.x.as_deref()) else {
            warn!(place = %self.place_name, "skipping Kakao result with unparseable coordinates");
            return None;
        };
        let address = if self.road_address_name.is_empty() {
            self.address_name
        } else {
            self.road_address_name
        };
        Some(PlaceCandidate {
            label: format!("{} ({})", self.place_name, address),
            lat,
            lon,
        })
    }
}

/// Naver Cloud address geocoding (`/map-geocode/v2/geocode`).
#[derive(Debug, Clone)]
pub struct NaverGeocoder {
    client: Client,
    config: NaverConfig,
}

impl NaverGeocoder {
    pub fn new(config: &NaverConfig, timeout_secs: u64) -> Result<Self, GeocodingError> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl PlaceSearch for NaverGeocoder {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, GeocodingError> {
        let Some(query) = searchable(query) else {
            return Ok(Vec::new());
        };

        let url = format!("{}/map-geocode/v2/geocode", self.config.base_url);
        let request = self
            .client
            .get(&url)
            .query(&[("query", query)])
            .header("X-Naver-Client-Id", &self.config.client_id)
            .header("X-Naver-Client-Secret", &self.config.client_secret);

        let body: NaverResponse = fetch_json(request).await?;
        let candidates: Vec<PlaceCandidate> = body
            .addresses
            .into_iter()
            .filter_map(|address| address.into_candidate(query))
            .collect();

        debug!(%query, count = candidates.len(), "Naver geocode");
        Ok(candidates)
    }
}

#[derive(Debug, Deserialize)]
struct NaverResponse {
    #[serde(default)]
    addresses: Vec<NaverAddress>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NaverAddress {
    #[serde(default)]
    road_address: String,
    #[serde(default)]
    jibun_address: String,
    #[serde(default)]
    x: Option<String>,
    #[serde(default)]
    y: Option<String>,
}

impl NaverAddress {
    fn into_candidate(self, query: &str) -> Option<PlaceCandidate> {
        let Some((lat, lon)) = lat_lon(self.y.as_deref(), self.x.as_deref()) else {
            warn!(%query, "skipping Naver result with unparseable coordinates");
            return None;
        };
        let label = [self.road_address, self.jibun_address]
            .into_iter()
            .find(|s| !s.is_empty())
            .unwrap_or_else(|| query.to_string());
        Some(PlaceCandidate { label, lat, lon })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_queries_are_not_searchable() {
        assert_eq!(searchable(" 역 "), None);
        assert_eq!(searchable("서울역"), Some("서울역"));
        assert_eq!(searchable("  ab "), Some("ab"));
    }

    #[test]
    fn kakao_label_prefers_road_address() {
        let json = r#"{"documents": [
            {"place_name": "서울역", "road_address_name": "서울 용산구 한강대로 405",
             "address_name": "서울 용산구 동자동 43-205", "x": "126.970606", "y": "37.554648"},
            {"place_name": "시청", "road_address_name": "",
             "address_name": "서울 중구 태평로1가 31", "x": "126.9780", "y": "37.5665"}
        ]}"#;
        let body: KakaoResponse = serde_json::from_str(json).unwrap();
        let candidates: Vec<_> = body
            .documents
            .into_iter()
            .filter_map(KakaoDocument::into_candidate)
            .collect();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].label, "서울역 (서울 용산구 한강대로 405)");
        assert!((candidates[0].lat - 37.554648).abs() < 1e-9);
        assert_eq!(candidates[1].label, "시청 (서울 중구 태평로1가 31)");
    }

    #[test]
    fn kakao_skips_bad_coordinates() {
        let json = r#"{"documents": [{"place_name": "x", "x": "east", "y": "37.5"}]}"#;
        let body: KakaoResponse = serde_json::from_str(json).unwrap();
        assert!(body.documents.into_iter().all(|d| d.into_candidate().is_none()));
    }

    #[test]
    fn missing_coordinates_drop_only_that_result() {
        let json = r#"{"documents": [
            {"place_name": "좌표없음", "address_name": "서울 어딘가", "y": "37.5"},
            {"place_name": "널좌표", "x": null, "y": null},
            {"place_name": "서울역", "address_name": "서울 용산구 동자동 43-205",
             "x": "126.970606", "y": "37.554648"}
        ]}"#;
        let body: KakaoResponse = serde_json::from_str(json).unwrap();
        let candidates: Vec<_> = body
            .documents
            .into_iter()
            .filter_map(KakaoDocument::into_candidate)
            .collect();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].label, "서울역 (서울 용산구 동자동 43-205)");

        let json = r#"{"status": "OK", "addresses": [
            {"roadAddress": "서울특별시 중구 세종대로 110"},
            {"jibunAddress": "서울특별시 중구 태평로1가 31", "x": "126.9783882", "y": "37.5666103"}
        ]}"#;
        let body: NaverResponse = serde_json::from_str(json).unwrap();
        let candidates: Vec<_> = body
            .addresses
            .into_iter()
            .filter_map(|a| a.into_candidate("세종대로"))
            .collect();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].label, "서울특별시 중구 태평로1가 31");
    }

    #[test]
    fn naver_label_falls_back_to_query() {
        let address = NaverAddress {
            road_address: String::new(),
            jibun_address: String::new(),
            x: Some("126.9780".to_string()),
            y: Some("37.5665".to_string()),
        };
        let candidate = address.into_candidate("세종대로 110").unwrap();
        assert_eq!(candidate.label, "세종대로 110");
        assert!((candidate.lon - 126.978).abs() < 1e-9);
    }

    #[test]
    fn geocoding_error_display() {
        assert!(GeocodingError::RequestFailed(401).to_string().contains("401"));
        assert!(GeocodingError::Timeout.to_string().contains("timed out"));
    }
}
