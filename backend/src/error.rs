use axum::{Json, http::StatusCode};
use thiserror::Error;

use crate::directions::DirectionsError;
use crate::distance::DistanceError;
use crate::geocoding::GeocodingError;
use crate::models::ApiError;
use crate::points::PointsError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to build GPX document: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
    #[error("nearest point search failed: {0}")]
    Distance(#[from] DistanceError),
    #[error(transparent)]
    Geocoding(#[from] GeocodingError),
    #[error(transparent)]
    Directions(#[from] DirectionsError),
    #[error(transparent)]
    Points(#[from] PointsError),
    #[error("coordinates out of range: ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCoordinate { .. } => StatusCode::BAD_REQUEST,
            Self::Directions(DirectionsError::NoRoute(_)) => StatusCode::NOT_FOUND,
            Self::Geocoding(GeocodingError::Timeout) | Self::Directions(DirectionsError::Timeout) => {
                StatusCode::GATEWAY_TIMEOUT
            }
            Self::Geocoding(_) | Self::Directions(_) => StatusCode::BAD_GATEWAY,
            Self::Gpx(_) | Self::Distance(_) | Self::Points(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Convert an error into the `(status, body)` pair the handlers return.
pub fn api_error(err: AppError) -> (StatusCode, Json<ApiError>) {
    let status = err.status();
    if status.is_server_error() {
        tracing::warn!("request failed with {status}: {err}");
    }
    (
        status,
        Json(ApiError {
            message: err.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_statuses() {
        assert_eq!(
            AppError::InvalidCoordinate { lat: 91.0, lon: 0.0 }.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(DirectionsError::NoRoute("ZERO_RESULTS".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(GeocodingError::RequestFailed(401)).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::from(DirectionsError::Timeout).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            AppError::from(DistanceError::EmptyCandidateSet).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn api_error_carries_message() {
        let (status, Json(body)) = api_error(AppError::from(DirectionsError::NoRoute(
            "ZERO_RESULTS".into(),
        )));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.message.contains("ZERO_RESULTS"));
    }
}
