use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use geo_types::Point;
use gpx::{Gpx, GpxVersion, Track, TrackSegment, Waypoint};

use crate::error::AppError;
use crate::models::{Coordinate, RouteSegment};

/// Export a route as a base64 GPX document, one track segment per step.
pub fn encode_route_as_gpx(name: &str, segments: &[RouteSegment]) -> Result<String, AppError> {
    let mut gpx = Gpx {
        version: GpxVersion::Gpx11,
        creator: Some("parking_backend".into()),
        ..Default::default()
    };
    let mut track = Track {
        name: Some(name.to_string()),
        ..Default::default()
    };

    for route_segment in segments {
        let mut segment = TrackSegment::new();
        segment
            .points
            .extend(route_segment.path.iter().map(to_waypoint));
        track.segments.push(segment);
    }
    gpx.tracks.push(track);

    let mut buffer = Vec::new();
    gpx::write(&gpx, &mut buffer)?;
    Ok(BASE64.encode(buffer))
}

fn to_waypoint(coord: &Coordinate) -> Waypoint {
    Waypoint::new(Point::new(coord.lon, coord.lat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RenderColor, RenderHint};

    #[test]
    fn gpx_contains_every_point() {
        let segments = vec![RouteSegment {
            hint: RenderHint {
                color: RenderColor::Blue,
                label: "walking".to_string(),
            },
            path: vec![Coordinate::new(37.5665, 126.978), Coordinate::new(37.5670, 126.979)],
        }];
        let encoded = encode_route_as_gpx("test", &segments).unwrap();
        let xml = String::from_utf8(BASE64.decode(encoded).unwrap()).unwrap();
        assert_eq!(xml.matches("<trkpt").count(), 2);
        assert!(xml.contains("<trkseg>"));
    }
}
