pub use shared::{
    ApiError, Coordinate, GeoPoint, MapView, NearestRequest, NearestResult, PlaceCandidate,
    PlaceQuery, RenderColor, RenderHint, RouteOverlay, RouteSegment, RouteStep, SessionView,
    StopCount, TransitDetails, TransitSummary, TravelMode,
};
