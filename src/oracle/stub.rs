use crate::config::{AVG_BUS_VELOCITY, AVG_CAR_VELOCITY, AVG_SCOOTER_VELOCITY, AVG_WALK_VELOCITY, FACTOR};
use crate::domain::TransportType;
use crate::geo::Location;

use super::{sea_vessel_directions, Directions, OracleError, Profile, RoutingOracle};

/// Deterministic, in-memory oracle used by tests and the CLI's `--offline`
/// mode. Distance is `haversine · FACTOR`; duration is `distance /
/// mode-speed`, matching the stub contract scenario tests are built on.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubOracle;

fn mode_speed(mot: TransportType) -> f64 {
    match mot {
        TransportType::Foot => AVG_WALK_VELOCITY,
        TransportType::Scooter => AVG_SCOOTER_VELOCITY,
        TransportType::Car => AVG_CAR_VELOCITY,
        TransportType::Bus => AVG_BUS_VELOCITY,
        TransportType::SeaVessel => crate::config::AVG_SEA_VESSEL_VELOCITY,
    }
}

impl RoutingOracle for StubOracle {
    fn snap(&self, locations: &[Location], _profile: Profile, _radius_m: f64) -> Result<Vec<Location>, OracleError> {
        Ok(locations.to_vec())
    }

    fn directions(&self, from: Location, to: Location, mot: TransportType) -> Result<Directions, OracleError> {
        if mot == TransportType::SeaVessel {
            return Ok(sea_vessel_directions(from, to));
        }

        let distance_m = from.distance_to(&to) * FACTOR;
        let duration_s = distance_m / mode_speed(mot);
        Ok(Directions { distance_m, duration_s, polyline: vec![from, to] })
    }
}
