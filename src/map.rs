//! Map marker data handed to the presentation layer.
//!
//! No drawing happens here: the caller feeds these markers to whatever
//! map widget it uses.

use crate::geo::Coordinate;
use crate::proximity::{NetworkPoint, ProximityResult, EXTENDABLE_MAX_M};
use serde::Serialize;

pub const DEFAULT_ZOOM: u8 = 13;

const USER_COLOR: [f32; 4] = [0.0, 0.0, 250.0, 0.8];
const NETWORK_COLOR: [f32; 4] = [250.0, 0.0, 0.0, 0.2];
const USER_SIZE: f32 = 20.0;
const NETWORK_SIZE: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    User,
    Network,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub kind: MarkerKind,
    pub lat: f64,
    pub lon: f64,
    pub label: String,
    /// RGBA, channels 0-255 and alpha 0-1
    pub color: [f32; 4],
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
}

impl MapView {
    /// User marker, plus every point of the nearest network that lies
    /// within extension range. Out-of-range results show only the user.
    pub fn build(user: &Coordinate, user_label: &str, result: &ProximityResult, networks: &[NetworkPoint]) -> Self {
        let mut markers = vec![MapMarker {
            kind: MarkerKind::User,
            lat: user.latitude,
            lon: user.longitude,
            label: user_label.to_string(),
            color: USER_COLOR,
            size: USER_SIZE,
        }];

        if let Some(name) = result.network_in_range() {
            markers.extend(
                networks
                    .iter()
                    .filter(|p| p.name() == name)
                    .filter(|p| user.distance_to(&p.coordinate()) <= EXTENDABLE_MAX_M)
                    .map(|p| MapMarker {
                        kind: MarkerKind::Network,
                        lat: p.latitude(),
                        lon: p.longitude(),
                        label: p.name().to_string(),
                        color: NETWORK_COLOR,
                        size: NETWORK_SIZE,
                    }),
            );
        }

        Self {
            center: *user,
            zoom: DEFAULT_ZOOM,
            markers,
        }
    }

    pub fn network_markers(&self) -> impl Iterator<Item = &MapMarker> {
        self.markers.iter().filter(|m| m.kind == MarkerKind::Network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::EARTH_RADIUS_M;
    use crate::proximity::classify_coordinate;

    fn north_of(base: &Coordinate, meters: f64) -> (f64, f64) {
        (base.latitude + (meters / EARTH_RADIUS_M).to_degrees(), base.longitude)
    }

    fn network(name: &str, at: (f64, f64)) -> NetworkPoint {
        NetworkPoint::new(name, at.0, at.1).unwrap()
    }

    #[test]
    fn test_only_nearest_network_within_range() {
        let user = Coordinate::new(50.8503, 4.3517).unwrap();
        let networks = vec![
            network("Midi", north_of(&user, 30.0)),
            network("Midi", north_of(&user, 1800.0)),
            network("Midi", north_of(&user, 2600.0)),
            network("Nord", north_of(&user, 400.0)),
        ];
        let result = classify_coordinate(&user, &networks);
        let view = MapView::build(&user, "home", &result, &networks);

        assert_eq!(view.markers[0].kind, MarkerKind::User);
        assert_eq!(view.markers[0].size, 20.0);
        let net: Vec<_> = view.network_markers().collect();
        assert_eq!(net.len(), 2);
        assert!(net.iter().all(|m| m.label == "Midi"));
        assert_eq!(view.zoom, DEFAULT_ZOOM);
        assert_eq!(view.center, user);
    }

    #[test]
    fn test_out_of_range_shows_user_only() {
        let user = Coordinate::new(50.8503, 4.3517).unwrap();
        let networks = vec![network("Loin", north_of(&user, 5000.0))];
        let result = classify_coordinate(&user, &networks);
        let view = MapView::build(&user, "home", &result, &networks);
        assert_eq!(view.markers.len(), 1);
        assert_eq!(view.network_markers().count(), 0);
    }

    #[test]
    fn test_empty_table_shows_user_only() {
        let user = Coordinate::new(0.0, 0.0).unwrap();
        let result = classify_coordinate(&user, &[]);
        let view = MapView::build(&user, "home", &result, &[]);
        assert_eq!(view.markers.len(), 1);
    }
}
