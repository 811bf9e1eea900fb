//! Heatnet Finder: is there a district heat network near my address?
//!
//! Geocode an address, find the nearest known network point by haversine
//! distance, and classify the distance into a proximity tier.

pub mod finder;
pub mod geo;
pub mod geocode;
pub mod map;
pub mod network;
pub mod proximity;
pub mod recommendation;
pub mod server;

pub use finder::{FinderError, ProximityFinder, ProximityReport};
pub use proximity::{classify, NetworkPoint, ProximityError, ProximityResult, ProximityTier};
