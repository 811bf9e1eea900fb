//! Geocoding collaborator: free-text address to coordinates.
//!
//! The classifier never calls a geocoder itself. Callers inject one of
//! these implementations through the [`Geocoder`] trait.

pub mod providers;
pub mod types;

pub use providers::{Geocoder, NominatimGeocoder, NominatimOptions, StaticGeocoder};
pub use types::{GeocodeError, GeocodeSource, GeocodedAddress};
