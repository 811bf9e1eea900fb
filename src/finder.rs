//! The finder: primary public API.
//!
//! Wires an injected geocoder and network table to the classifier and
//! produces everything a presentation layer needs for one query.

use crate::geocode::{GeocodeError, GeocodedAddress, Geocoder};
use crate::map::MapView;
use crate::network::NetworkTable;
use crate::proximity::{self, ProximityError, ProximityResult};
use crate::recommendation::{Language, Recommendation};
use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FinderError {
    #[error("Geocoding failed: {0}")]
    GeocodingFailed(#[from] GeocodeError),
    #[error(transparent)]
    Proximity(#[from] ProximityError),
}

/// Full answer to "is there a heat network near this address?".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityReport {
    pub location: GeocodedAddress,
    pub result: ProximityResult,
    pub recommendation: Recommendation,
    pub map: MapView,
}

pub struct ProximityFinder<G, T> {
    geocoder: G,
    table: T,
    language: Language,
}

impl<G: Geocoder, T: NetworkTable> ProximityFinder<G, T> {
    pub fn new(geocoder: G, table: T) -> Self {
        if table.is_empty() {
            warn!("Network table is empty: every query will report no network");
        }
        Self {
            geocoder,
            table,
            language: Language::default(),
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    /// Geocode `address`, then classify it.
    pub fn check_address(&self, address: &str) -> Result<ProximityReport, FinderError> {
        self.check_address_in(address, self.language)
    }

    pub fn check_address_in(&self, address: &str, language: Language) -> Result<ProximityReport, FinderError> {
        if address.trim().is_empty() {
            return Err(GeocodeError::NoInput.into());
        }
        let location = self.geocoder.resolve(address)?;
        self.report(location, language)
    }

    /// Classify raw coordinates, bypassing the geocoder.
    pub fn check_coordinates(&self, lat: f64, lon: f64) -> Result<ProximityReport, FinderError> {
        self.check_coordinates_in(lat, lon, self.language)
    }

    pub fn check_coordinates_in(&self, lat: f64, lon: f64, language: Language) -> Result<ProximityReport, FinderError> {
        self.report(GeocodedAddress::manual(lat, lon), language)
    }

    fn report(&self, location: GeocodedAddress, language: Language) -> Result<ProximityReport, FinderError> {
        let user = location.coordinate()?;
        let networks = self.table.points();
        let result = proximity::classify_coordinate(&user, networks);

        match (&result.nearest, result.distance_meters) {
            (Some(p), Some(d)) => info!(
                "'{}' -> nearest '{}' at {:.0} m, tier {}",
                location.query, p.name(), d, result.tier
            ),
            _ => info!("'{}' -> no network points to compare against", location.query),
        }

        let recommendation = Recommendation::for_result(&result, language);
        let map = MapView::build(&user, location.label(), &result, networks);

        Ok(ProximityReport {
            location,
            result,
            recommendation,
            map,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{Coordinate, EARTH_RADIUS_M};
    use crate::geocode::{GeocodeSource, StaticGeocoder};
    use crate::network::StaticNetworkTable;
    use crate::proximity::{NetworkPoint, ProximityTier};
    use crate::recommendation::Severity;

    const RUE_DE_LA_LOI: (f64, f64) = (50.8464, 4.3680);

    fn north(meters: f64) -> f64 {
        RUE_DE_LA_LOI.0 + (meters / EARTH_RADIUS_M).to_degrees()
    }

    fn finder(points: Vec<NetworkPoint>) -> ProximityFinder<StaticGeocoder, StaticNetworkTable> {
        let geocoder = StaticGeocoder::new()
            .with("Rue de la Loi 16, Bruxelles", Coordinate::new(RUE_DE_LA_LOI.0, RUE_DE_LA_LOI.1).unwrap())
            .with("Pôle Nord", Coordinate::new(90.0, 0.0).unwrap());
        ProximityFinder::new(geocoder, StaticNetworkTable::new(points))
    }

    #[test]
    fn test_check_address_connectable() {
        let f = finder(vec![
            NetworkPoint::new("Loi", north(20.0), RUE_DE_LA_LOI.1).unwrap(),
            NetworkPoint::new("Loi", north(900.0), RUE_DE_LA_LOI.1).unwrap(),
            NetworkPoint::new("Midi", north(-3000.0), RUE_DE_LA_LOI.1).unwrap(),
        ]);
        let report = f.check_address("rue de la loi 16, bruxelles").unwrap();

        assert_eq!(report.location.source, GeocodeSource::Static);
        assert_eq!(report.result.tier, ProximityTier::Connectable);
        assert_eq!(report.recommendation.severity, Severity::Success);
        assert_eq!(report.recommendation.network.as_deref(), Some("Loi"));
        // User + both "Loi" points within 2 km.
        assert_eq!(report.map.markers.len(), 3);
    }

    #[test]
    fn test_check_coordinates_nearby_planned() {
        let f = finder(vec![NetworkPoint::new("Loi", north(120.0), RUE_DE_LA_LOI.1).unwrap()])
            .with_language(Language::En);
        let report = f.check_coordinates(RUE_DE_LA_LOI.0, RUE_DE_LA_LOI.1).unwrap();
        assert_eq!(report.location.source, GeocodeSource::Manual);
        assert_eq!(report.result.tier, ProximityTier::NearbyPlanned);
        assert!(report.recommendation.message.starts_with("The Loi"));
    }

    #[test]
    fn test_far_away_reports_none() {
        let f = finder(vec![NetworkPoint::new("Loi", RUE_DE_LA_LOI.0, RUE_DE_LA_LOI.1).unwrap()]);
        let report = f.check_address("Pôle Nord").unwrap();
        assert_eq!(report.result.tier, ProximityTier::None);
        assert!(report.recommendation.network.is_none());
        assert_eq!(report.map.markers.len(), 1);
    }

    #[test]
    fn test_empty_table_is_explicit() {
        let f = finder(vec![]);
        let report = f.check_address("Rue de la Loi 16, Bruxelles").unwrap();
        assert!(report.result.nearest.is_none());
        assert_eq!(report.result.tier, ProximityTier::None);
    }

    #[test]
    fn test_geocoding_failure_propagates() {
        let f = finder(vec![]);
        assert_eq!(
            f.check_address("Atlantis"),
            Err(FinderError::GeocodingFailed(GeocodeError::NotFound("Atlantis".into())))
        );
        assert_eq!(
            f.check_address("   "),
            Err(FinderError::GeocodingFailed(GeocodeError::NoInput))
        );
    }

    #[test]
    fn test_invalid_manual_coordinates() {
        let f = finder(vec![]);
        assert!(matches!(
            f.check_coordinates(123.0, 4.0),
            Err(FinderError::Proximity(ProximityError::InvalidCoordinate { .. }))
        ));
    }

    #[test]
    fn test_report_serializes() {
        let f = finder(vec![NetworkPoint::new("Loi", north(10.0), RUE_DE_LA_LOI.1).unwrap()]);
        let report = f.check_coordinates(RUE_DE_LA_LOI.0, RUE_DE_LA_LOI.1).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["result"]["tier"], "CONNECTABLE");
        assert_eq!(json["result"]["nearest"]["name"], "Loi");
        assert_eq!(json["recommendation"]["severity"], "success");
        assert_eq!(json["location"]["source"], "Manual");
    }
}
