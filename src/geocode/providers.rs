//! Geocoder providers: Nominatim over HTTP and an in-memory table.

use super::types::{GeocodeError, GeocodeSource, GeocodedAddress};
use crate::geo::Coordinate;
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Resolves a free-text address to coordinates.
pub trait Geocoder {
    fn resolve(&self, address: &str) -> Result<GeocodedAddress, GeocodeError>;
}

impl<G: Geocoder + ?Sized> Geocoder for Box<G> {
    fn resolve(&self, address: &str) -> Result<GeocodedAddress, GeocodeError> {
        (**self).resolve(address)
    }
}

impl<G: Geocoder + ?Sized> Geocoder for Arc<G> {
    fn resolve(&self, address: &str) -> Result<GeocodedAddress, GeocodeError> {
        (**self).resolve(address)
    }
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn resolve(&self, address: &str) -> Result<GeocodedAddress, GeocodeError> {
        (**self).resolve(address)
    }
}

/// Lowercase and collapse runs of whitespace, so "Rue  de la Loi" and
/// "rue de la loi" hit the same entry.
fn normalize_address(q: &str) -> String {
    q.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

// ─── Static geocoder ────────────────────────────────────────────

/// Address book geocoder for offline use and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    entries: HashMap<String, Coordinate>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, address: &str, coordinate: Coordinate) -> Self {
        self.insert(address, coordinate);
        self
    }

    pub fn insert(&mut self, address: &str, coordinate: Coordinate) {
        self.entries.insert(normalize_address(address), coordinate);
    }
}

impl Geocoder for StaticGeocoder {
    fn resolve(&self, address: &str) -> Result<GeocodedAddress, GeocodeError> {
        let key = normalize_address(address);
        if key.is_empty() {
            return Err(GeocodeError::NoInput);
        }
        let c = self
            .entries
            .get(&key)
            .ok_or_else(|| GeocodeError::NotFound(address.to_string()))?;
        Ok(GeocodedAddress {
            query: address.trim().to_string(),
            latitude: c.latitude,
            longitude: c.longitude,
            source: GeocodeSource::Static,
            display_name: None,
            country_code: None,
        })
    }
}

// ─── Nominatim provider ─────────────────────────────────────────

#[derive(Deserialize, Debug, Clone)]
struct NominatimResult {
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Deserialize, Debug, Clone)]
struct NominatimAddress {
    #[serde(default)]
    country_code: Option<String>,
}

/// Nominatim client settings.
#[derive(Debug, Clone)]
pub struct NominatimOptions {
    /// Search endpoint, e.g. `https://nominatim.openstreetmap.org/search`
    pub endpoint: String,
    /// ISO 3166-1 alpha-2 filter (the original service only covered Belgium)
    pub country: Option<String>,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for NominatimOptions {
    fn default() -> Self {
        Self {
            endpoint: NominatimGeocoder::DEFAULT_ENDPOINT.to_string(),
            country: Some("BE".to_string()),
            timeout: Duration::from_secs(10),
            user_agent: format!("HeatnetFinder/{} (heat-network-proximity)", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Geocoder backed by the OpenStreetMap Nominatim search API.
pub struct NominatimGeocoder {
    agent: ureq::Agent,
    options: NominatimOptions,
}

impl NominatimGeocoder {
    pub const DEFAULT_ENDPOINT: &'static str = "https://nominatim.openstreetmap.org/search";

    pub fn new(options: NominatimOptions) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(options.timeout)
            .user_agent(&options.user_agent)
            .build();
        Self { agent, options }
    }

    /// Up to `limit` candidates, best first (provider ranking).
    pub fn search(&self, address: &str, limit: usize) -> Result<Vec<GeocodedAddress>, GeocodeError> {
        let query = address.trim();
        if query.is_empty() {
            return Err(GeocodeError::NoInput);
        }

        let limit = limit.clamp(1, 10).to_string();
        let mut request = self
            .agent
            .get(&self.options.endpoint)
            .query("q", query)
            .query("format", "json")
            .query("addressdetails", "1")
            .query("limit", &limit);
        if let Some(cc) = &self.options.country {
            request = request.query("countrycodes", &cc.to_lowercase());
        }

        debug!("Nominatim search q='{}' country={:?}", query, self.options.country);

        let response = request.call().map_err(|e| {
            warn!("Nominatim request failed: {}", e);
            GeocodeError::Network(e.to_string())
        })?;

        let results: Vec<NominatimResult> = response
            .into_json()
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        parse_results(query, results)
    }
}

impl Geocoder for NominatimGeocoder {
    fn resolve(&self, address: &str) -> Result<GeocodedAddress, GeocodeError> {
        let mut candidates = self.search(address, 1)?;
        if candidates.is_empty() {
            return Err(GeocodeError::NotFound(address.to_string()));
        }
        Ok(candidates.swap_remove(0))
    }
}

fn parse_results(query: &str, results: Vec<NominatimResult>) -> Result<Vec<GeocodedAddress>, GeocodeError> {
    if results.is_empty() {
        return Err(GeocodeError::NotFound(query.to_string()));
    }

    results
        .into_iter()
        .map(|r| -> Result<GeocodedAddress, GeocodeError> {
            let latitude: f64 = r
                .lat
                .parse()
                .map_err(|_| GeocodeError::InvalidResponse(format!("bad latitude '{}'", r.lat)))?;
            let longitude: f64 = r
                .lon
                .parse()
                .map_err(|_| GeocodeError::InvalidResponse(format!("bad longitude '{}'", r.lon)))?;
            Ok(GeocodedAddress {
                query: query.to_string(),
                latitude,
                longitude,
                source: GeocodeSource::Nominatim,
                display_name: Some(r.display_name),
                country_code: r.address.and_then(|a| a.country_code).map(|cc| cc.to_uppercase()),
            })
        })
        .collect()
}
