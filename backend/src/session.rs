//! Per-user interaction state.
//!
//! A session remembers the picked start place, the nearest point computed for
//! it, and the last route fetched, so refreshing the page does not repeat the
//! distance scan or the directions call.

use std::{
    num::NonZeroUsize,
    sync::{Mutex, PoisonError},
};

use lru::LruCache;

use crate::directions::DirectionsClient;
use crate::distance::DistanceError;
use crate::error::AppError;
use crate::models::{Coordinate, MapView, NearestResult, PlaceCandidate, RouteOverlay, SessionView};
use crate::overlay::build_overlay;
use crate::points::PointTable;

pub const SELECTED_ZOOM: u8 = 16;
pub const OVERVIEW_ZOOM: u8 = 12;

/// Identifies a fetched route: the picked place and the destination it was
/// routed to.
#[derive(Debug, Clone, PartialEq)]
struct RouteKey {
    label: String,
    end: Coordinate,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    selected: Option<PlaceCandidate>,
    nearest_memo: Option<(Coordinate, NearestResult)>,
    route_key: Option<RouteKey>,
    route: Option<RouteOverlay>,
}

impl Session {
    pub fn selected(&self) -> Option<&PlaceCandidate> {
        self.selected.as_ref()
    }

    pub fn route(&self) -> Option<&RouteOverlay> {
        self.route.as_ref()
    }

    /// Nearest point to `origin`, reusing the previous answer when the origin
    /// has not moved.
    pub fn nearest(
        &mut self,
        origin: Coordinate,
        table: &PointTable,
    ) -> Result<NearestResult, DistanceError> {
        if let Some((memo_origin, result)) = &self.nearest_memo {
            if *memo_origin == origin {
                return Ok(result.clone());
            }
        }
        let result = table.nearest(origin)?;
        self.nearest_memo = Some((origin, result.clone()));
        Ok(result)
    }

    /// Pick a start place: find its nearest point and fetch a transit route
    /// there unless the same route is already held.
    ///
    /// A failed fetch clears the stored route and returns the error; the
    /// selection and nearest point are kept.
    pub async fn select(
        &mut self,
        place: PlaceCandidate,
        table: &PointTable,
        directions: &dyn DirectionsClient,
    ) -> Result<(), AppError> {
        let origin = place.coordinate();
        if !origin.is_valid() {
            return Err(AppError::InvalidCoordinate {
                lat: origin.lat,
                lon: origin.lon,
            });
        }

        let nearest = self.nearest(origin, table)?;
        let key = RouteKey {
            label: place.label.clone(),
            end: nearest.point.coordinate(),
        };
        self.selected = Some(place);

        if self.route.is_some() && self.route_key.as_ref() == Some(&key) {
            tracing::debug!("route to {} unchanged, reusing", nearest.point.name);
            return Ok(());
        }

        let fetched = match directions.transit_route(origin, key.end).await {
            Ok(route) => build_overlay(&nearest.point, &route),
            Err(err) => Err(err.into()),
        };

        match fetched {
            Ok(overlay) => {
                tracing::info!(
                    "route to {}: {:.2} km, {}",
                    nearest.point.name,
                    overlay.distance_km(),
                    overlay.duration_text
                );
                self.route = Some(overlay);
                self.route_key = Some(key);
                Ok(())
            }
            Err(err) => {
                self.route = None;
                self.route_key = None;
                Err(err)
            }
        }
    }

    pub fn view(&self, table: &PointTable) -> SessionView {
        let map_view = match &self.selected {
            Some(place) => MapView {
                center: place.coordinate(),
                zoom: SELECTED_ZOOM,
            },
            None => MapView {
                center: table.first().coordinate(),
                zoom: OVERVIEW_ZOOM,
            },
        };
        SessionView {
            selected: self.selected.clone(),
            nearest: self
                .selected
                .as_ref()
                .and(self.nearest_memo.as_ref())
                .map(|(_, result)| result.clone()),
            route: self.route.clone(),
            map_view,
        }
    }
}

/// Sessions keyed by client-chosen id, evicting the least recently used.
///
/// Handlers take a snapshot with [`get`](Self::get), update it without holding
/// the lock across the directions call, and write it back with
/// [`put`](Self::put). Two concurrent selects on the same id each fetch their
/// own route and the last `put` wins.
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<LruCache<String, Session>>,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Snapshot of a session, or a fresh one for an unknown id.
    pub fn get(&self, id: &str) -> Session {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.get(id).cloned().unwrap_or_default()
    }

    pub fn put(&self, id: &str, session: Session) {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.put(id.to_string(), session);
    }

    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
