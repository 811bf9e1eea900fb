//! Core types for the geocoding collaborator.

use crate::geo::{format_coords, Coordinate};
use crate::proximity::ProximityError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// How an address was turned into coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeocodeSource {
    Nominatim,
    Static,
    Manual,
}

impl fmt::Display for GeocodeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nominatim => write!(f, "Nominatim"),
            Self::Static => write!(f, "Built-in"),
            Self::Manual => write!(f, "Manual"),
        }
    }
}

/// A geocoded address with coordinates and provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedAddress {
    /// What the user typed, or a coordinate label for manual input.
    pub query: String,
    pub latitude: f64,
    pub longitude: f64,
    pub source: GeocodeSource,
    /// Full display name from the provider (e.g. "16, Rue de la Loi, Bruxelles, Belgique")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// ISO 3166-1 alpha-2 country code, uppercase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

impl GeocodedAddress {
    /// A location typed in as raw coordinates; no geocoder involved.
    pub fn manual(latitude: f64, longitude: f64) -> Self {
        Self {
            query: format!("{:.4}, {:.4}", latitude, longitude),
            latitude,
            longitude,
            source: GeocodeSource::Manual,
            display_name: None,
            country_code: None,
        }
    }

    /// Validated coordinate. Providers are not trusted to stay in range.
    pub fn coordinate(&self) -> Result<Coordinate, ProximityError> {
        Coordinate::new(self.latitude, self.longitude)
    }

    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.query)
    }

    pub fn display_line(&self) -> String {
        format!(
            "\u{1F4CD} {}\n  \u{1F4D0} {} ({})",
            self.label(),
            format_coords(self.latitude, self.longitude),
            self.source
        )
    }
}

/// Geocoding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Address not found: '{0}'")]
    NotFound(String),
    #[error("Invalid geocoder response: {0}")]
    InvalidResponse(String),
    #[error("No address specified. Pass an address, or use --lat/--lon")]
    NoInput,
}
