use crate::finder::ProximityFinder;
use crate::geocode::Geocoder;
use crate::network::StaticNetworkTable;

pub type SharedGeocoder = Box<dyn Geocoder + Send + Sync>;

pub struct AppState {
    pub finder: ProximityFinder<SharedGeocoder, StaticNetworkTable>,
}

impl AppState {
    pub fn new(finder: ProximityFinder<SharedGeocoder, StaticNetworkTable>) -> Self {
        Self { finder }
    }
}
