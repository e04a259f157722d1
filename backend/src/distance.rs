use crate::models::{GeoPoint, NearestResult};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DistanceError {
    #[error("no candidate points to search")]
    EmptyCandidateSet,
}

/// Haversine distance in meters between two coordinates given in degrees.
pub fn great_circle_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let sin_dphi = (dphi / 2.0).sin();
    let sin_dlambda = (dlambda / 2.0).sin();

    let a = sin_dphi * sin_dphi + phi1.cos() * phi2.cos() * sin_dlambda * sin_dlambda;
    // Rounding can push `a` a hair above 1.0 for antipodal inputs.
    2.0 * EARTH_RADIUS_M * a.clamp(0.0, 1.0).sqrt().asin()
}

/// Linear scan for the closest point. Equidistant points resolve to the one
/// that appears first in `points`.
pub fn find_nearest(
    origin_lat: f64,
    origin_lon: f64,
    points: &[GeoPoint],
) -> Result<NearestResult, DistanceError> {
    let mut best: Option<(&GeoPoint, f64)> = None;

    for point in points {
        let distance =
            great_circle_distance(origin_lat, origin_lon, point.latitude, point.longitude);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((point, distance)),
        }
    }

    let (point, distance_meters) = best.ok_or(DistanceError::EmptyCandidateSet)?;
    Ok(NearestResult {
        point: point.clone(),
        distance_meters,
    })
}
