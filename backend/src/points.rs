use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::Path,
};

use crate::{
    distance::{DistanceError, find_nearest},
    models::{Coordinate, GeoPoint, NearestResult},
};

#[derive(Debug, thiserror::Error)]
pub enum PointsError {
    #[error("failed to read point table: {0}")]
    Io(#[from] io::Error),
    #[error("invalid point table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("point table is empty")]
    Empty,
    #[error("point {name:?} has out-of-range coordinates ({lat}, {lon})")]
    InvalidCoordinate { name: String, lat: f64, lon: f64 },
}

/// The fixed candidate set shown on the map, loaded once at startup.
#[derive(Debug, Clone)]
pub struct PointTable {
    points: Vec<GeoPoint>,
}

impl PointTable {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PointsError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, PointsError> {
        let points: Vec<GeoPoint> = serde_json::from_reader(reader)?;
        Self::from_points(points)
    }

    pub fn from_points(points: Vec<GeoPoint>) -> Result<Self, PointsError> {
        if points.is_empty() {
            return Err(PointsError::Empty);
        }
        if let Some(bad) = points.iter().find(|p| !p.coordinate().is_valid()) {
            return Err(PointsError::InvalidCoordinate {
                name: bad.name.clone(),
                lat: bad.latitude,
                lon: bad.longitude,
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Default map center when no start place has been picked.
    pub fn first(&self) -> &GeoPoint {
        &self.points[0]
    }

    pub fn nearest(&self, origin: Coordinate) -> Result<NearestResult, DistanceError> {
        find_nearest(origin.lat, origin.lon, &self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../data/parking_points.json");

    #[test]
    fn loads_sample_table() {
        let table = PointTable::from_reader(SAMPLE.as_bytes()).expect("sample table");
        assert!(table.len() >= 3);
        assert!(table.points().iter().all(|p| p.coordinate().is_valid()));
    }

    #[test]
    fn rejects_empty_table() {
        let err = PointTable::from_reader("[]".as_bytes()).unwrap_err();
        assert!(matches!(err, PointsError::Empty));
    }

    #[test]
    fn rejects_out_of_range_point() {
        let json = r#"[{"name": "bad", "latitude": 137.5, "longitude": 127.0}]"#;
        let err = PointTable::from_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, PointsError::InvalidCoordinate { .. }));
    }

    #[test]
    fn nearest_delegates_to_linear_scan() {
        let table = PointTable::from_reader(SAMPLE.as_bytes()).unwrap();
        let target = table.points()[1].clone();
        let nearest = table.nearest(target.coordinate()).unwrap();
        assert_eq!(nearest.point, target);
        assert_eq!(nearest.distance_meters, 0.0);
    }
}
