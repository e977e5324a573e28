//! A cached adapter to the external directions and snap service, abstracted
//! behind a single [`RoutingOracle`] trait so the evaluator never depends on
//! a concrete provider.

pub mod cache;
pub mod client;
pub mod error;
mod response;
pub mod stub;

pub use cache::CachingOracle;
pub use client::HttpOracle;
pub use error::OracleError;
pub use stub::StubOracle;

use crate::domain::TransportType;
use crate::geo::Location;

/// Directions profile the oracle's directions endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    DrivingCar,
    FootWalking,
    CyclingElectric,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::DrivingCar => "driving-car",
            Profile::FootWalking => "foot-walking",
            Profile::CyclingElectric => "cycling-electric",
        }
    }
}

/// Maps a mode of transport to the oracle's directions profile. `SEA_VESSEL`
/// has no profile — callers must special-case it before calling this (see
/// `RoutingOracle::directions`'s SEA_VESSEL bypass).
pub fn match_profile(mot: TransportType) -> Result<Profile, OracleError> {
    match mot {
        TransportType::Car | TransportType::Bus => Ok(Profile::DrivingCar),
        TransportType::Foot => Ok(Profile::FootWalking),
        TransportType::Scooter => Ok(Profile::CyclingElectric),
        TransportType::SeaVessel => Err(OracleError::UnsupportedMode(mot)),
    }
}

/// Result of a directions query: expected distance, duration, and the
/// polyline the route follows.
#[derive(Debug, Clone)]
pub struct Directions {
    pub distance_m: f64,
    pub duration_s: f64,
    pub polyline: Vec<Location>,
}

/// Exposes the two oracle operations. Implementations should be idempotent
/// and referentially transparent for fixed inputs; [`CachingOracle`] adds
/// memoization on top of any implementation.
pub trait RoutingOracle: Send + Sync {
    /// Snaps one or more raw locations onto the routable network.
    ///
    /// # Arguments
    /// * `locations` - points to snap.
    /// * `profile` - network to snap against; defaults to the driving
    ///   profile at the call site when unspecified.
    /// * `radius_m` - maximum snap radius in meters.
    fn snap(&self, locations: &[Location], profile: Profile, radius_m: f64) -> Result<Vec<Location>, OracleError>;

    /// Returns `(distance_m, duration_s, polyline)` between `from` and `to`
    /// for the given mode. For `SEA_VESSEL` the oracle is never called: the
    /// result is `(haversine distance, distance / AVG_SEA_VESSEL_VELOCITY,
    /// two-point straight line)`.
    fn directions(&self, from: Location, to: Location, mot: TransportType) -> Result<Directions, OracleError>;
}

/// Shared SEA_VESSEL bypass: every `RoutingOracle` implementation computes
/// the same thing for this mode without touching the network.
pub(crate) fn sea_vessel_directions(from: Location, to: Location) -> Directions {
    let distance_m = from.distance_to(&to);
    Directions {
        distance_m,
        duration_s: distance_m / crate::config::AVG_SEA_VESSEL_VELOCITY,
        polyline: vec![from, to],
    }
}
