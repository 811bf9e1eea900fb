//! Proximity classifier: nearest network point and distance tier.
//!
//! Everything here is a pure function of its inputs: no I/O, no shared
//! state, one call per query.

use crate::geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Below this distance the network passes directly by the address.
pub const CONNECTABLE_MAX_M: f64 = 50.0;
/// Below this distance the network is being built in the neighborhood.
pub const NEARBY_PLANNED_MAX_M: f64 = 500.0;
/// Up to and including this distance an extension is possible.
pub const EXTENDABLE_MAX_M: f64 = 2000.0;

/// Classification errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProximityError {
    #[error("Invalid coordinates ({latitude}, {longitude}). Lat: -90..90, Lon: -180..180")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
    #[error("Network table is empty: no network points to compare against")]
    EmptyNetworkTable,
}

/// One surveyed point along a heat network. Several points share a name.
///
/// Only built through [`NetworkPoint::new`], so the coordinate is always
/// in range and finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkPoint {
    name: String,
    latitude: f64,
    longitude: f64,
}

impl NetworkPoint {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Result<Self, ProximityError> {
        let c = Coordinate::new(latitude, longitude)?;
        Ok(Self {
            name: name.into(),
            latitude: c.latitude,
            longitude: c.longitude,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Discrete proximity bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProximityTier {
    Connectable,
    NearbyPlanned,
    Extendable,
    None,
}

impl ProximityTier {
    /// Map a distance in meters onto its tier.
    ///
    /// Lower bounds are inclusive: exactly 50 m is `NearbyPlanned`,
    /// exactly 500 m is `Extendable`, exactly 2000 m is still `Extendable`.
    pub fn from_distance(distance_m: f64) -> Self {
        if distance_m < CONNECTABLE_MAX_M {
            Self::Connectable
        } else if distance_m < NEARBY_PLANNED_MAX_M {
            Self::NearbyPlanned
        } else if distance_m <= EXTENDABLE_MAX_M {
            Self::Extendable
        } else {
            Self::None
        }
    }

    /// Whether a network was found within range.
    pub fn in_range(self) -> bool {
        self != Self::None
    }

    pub const ALL: [ProximityTier; 4] = [
        Self::Connectable,
        Self::NearbyPlanned,
        Self::Extendable,
        Self::None,
    ];
}

impl fmt::Display for ProximityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connectable => write!(f, "CONNECTABLE"),
            Self::NearbyPlanned => write!(f, "NEARBY_PLANNED"),
            Self::Extendable => write!(f, "EXTENDABLE"),
            Self::None => write!(f, "NONE"),
        }
    }
}

/// Outcome of one classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityResult {
    /// Closest network point, absent when the table was empty.
    pub nearest: Option<NetworkPoint>,
    /// Distance to `nearest` in meters; present exactly when `nearest` is.
    pub distance_meters: Option<f64>,
    pub tier: ProximityTier,
}

impl ProximityResult {
    fn not_found() -> Self {
        Self {
            nearest: None,
            distance_meters: None,
            tier: ProximityTier::None,
        }
    }

    /// Name of the nearest network, but only when it is within range.
    pub fn network_in_range(&self) -> Option<&str> {
        if self.tier.in_range() {
            self.nearest.as_ref().map(NetworkPoint::name)
        } else {
            None
        }
    }

    /// The nearest point and its distance, or `EmptyNetworkTable`.
    pub fn require_nearest(&self) -> Result<(&NetworkPoint, f64), ProximityError> {
        match (&self.nearest, self.distance_meters) {
            (Some(p), Some(d)) => Ok((p, d)),
            _ => Err(ProximityError::EmptyNetworkTable),
        }
    }
}

/// Find the network point closest to `user`.
///
/// Ties on the exact minimal distance resolve to the point that comes
/// first in `networks`. Returns `None` for an empty slice.
pub fn nearest<'a>(user: &Coordinate, networks: &'a [NetworkPoint]) -> Option<(&'a NetworkPoint, f64)> {
    let mut best: Option<(&NetworkPoint, f64)> = None;
    for point in networks {
        let d = user.distance_to(&point.coordinate());
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((point, d)),
        }
    }
    best
}

/// Classify a user position against the network table.
pub fn classify(user_lat: f64, user_lon: f64, networks: &[NetworkPoint]) -> Result<ProximityResult, ProximityError> {
    let user = Coordinate::new(user_lat, user_lon)?;
    Ok(classify_coordinate(&user, networks))
}

/// Same as [`classify`] for an already validated coordinate.
pub fn classify_coordinate(user: &Coordinate, networks: &[NetworkPoint]) -> ProximityResult {
    match nearest(user, networks) {
        Some((point, distance)) => ProximityResult {
            nearest: Some(point.clone()),
            distance_meters: Some(distance),
            tier: ProximityTier::from_distance(distance),
        },
        None => ProximityResult::not_found(),
    }
}
