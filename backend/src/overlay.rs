use crate::classify::{classify_step, summarize_transit};
use crate::directions::TransitRoute;
use crate::error::AppError;
use crate::gpx_export::encode_route_as_gpx;
use crate::models::{Coordinate, GeoPoint, RouteOverlay, RouteSegment};
use crate::polyline::decode_path;

/// Turn a fetched transit route into drawable segments plus the transfer table.
///
/// Steps whose polyline fails to decode are dropped; the rest of the route is
/// still drawn.
pub fn build_overlay(destination: &GeoPoint, route: &TransitRoute) -> Result<RouteOverlay, AppError> {
    let mut segments = Vec::with_capacity(route.steps.len());

    for (index, step) in route.steps.iter().enumerate() {
        let path = match decode_path(&step.encoded_path) {
            Ok(coords) => coords
                .into_iter()
                .map(|(lat, lon)| Coordinate::new(lat, lon))
                .collect(),
            Err(err) => {
                tracing::warn!("skipping step {index} of route to {}: {err}", destination.name);
                continue;
            }
        };
        segments.push(RouteSegment {
            hint: classify_step(step),
            path,
        });
    }

    let gpx_base64 = encode_route_as_gpx(&destination.name, &segments)?;

    tracing::debug!(
        "built overlay to {}: {} of {} steps drawable",
        destination.name,
        segments.len(),
        route.steps.len()
    );

    Ok(RouteOverlay {
        destination: destination.clone(),
        segments,
        transfers: summarize_transit(&route.steps).collect(),
        distance_meters: route.distance_meters,
        duration_text: route.duration_text.clone(),
        gpx_base64,
    })
}
