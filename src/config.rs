//! Fixed numeric policy and the handful of caller-overridable engine settings.
//!
//! Values mirror the reference Python service's `config.py` one for one;
//! see DESIGN.md for provenance.

use std::time::Duration;

/// Meters.
pub const MAX_WALK_DISTANCE: f64 = 1000.0;
/// Meters.
pub const MAX_SCOOTER_DISTANCE: f64 = 4000.0;
/// Meters.
pub const MAX_CAR_DISTANCE: f64 = 12000.0;
/// Meters: how close a vehicle must be to a stop to count as co-located.
pub const MAX_DISTANCE_FROM_STOP: f64 = 100.0;

/// Meters/second. Used only by [`crate::oracle::stub::StubOracle`] and
/// tests — real durations otherwise come from the oracle.
pub const AVG_WALK_VELOCITY: f64 = 1.0;
pub const AVG_SCOOTER_VELOCITY: f64 = 5.0;
pub const AVG_CAR_VELOCITY: f64 = 10.0;
pub const AVG_BUS_VELOCITY: f64 = 6.0;
/// Meters/second. Also the divisor `directions` uses for SEA_VESSEL legs,
/// which bypass the oracle entirely.
pub const AVG_SEA_VESSEL_VELOCITY: f64 = 3.0;

/// Seconds added whenever a path boards a car.
pub const AVG_CAR_PARKING_DURATION: f64 = 100.0;
/// Seconds added per high-traffic location a CAR/BUS edge passes near.
pub const AVG_TRAFFIC_JAM_DELAY: f64 = 300.0;

pub const WALK_COST: i64 = 0;
pub const CAR_RENT_COST: i64 = 20;
pub const BUS_TRIP_COST: i64 = 3;
pub const SCOOTER_RENT_COST: i64 = 5;
pub const SEA_VESSEL_TRIP_COST: i64 = 10;

/// Straight-line to real-distance inflation applied at graph-construction time.
pub const FACTOR: f64 = 1.2;

/// Meters; DBSCAN neighborhood radius for the e-scooter reducer.
pub const DBSCAN_RADIUS_M: f64 = 500.0;
/// Mean Earth radius in meters, used to convert [`DBSCAN_RADIUS_M`] to radians.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Maximum number of edges in an enumerated path.
pub const PATH_EDGE_CUTOFF: usize = 6;

/// Meters: how close a CAR/BUS edge's polyline must pass to a high-traffic
/// location for a traffic-jam penalty to apply.
pub const TRAFFIC_PROXIMITY_THRESHOLD_M: f64 = 10.0;

/// The few values a caller may legitimately want to override per deployment.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the external directions/snap oracle.
    pub oracle_base_url: String,
    /// Per-request timeout for the oracle HTTP client.
    pub oracle_timeout: Duration,
    /// Number of (mot, from, to) legs the oracle cache retains.
    pub oracle_cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            oracle_base_url: "http://localhost:8082/ors".to_string(),
            oracle_timeout: Duration::from_secs(5),
            oracle_cache_capacity: 4096,
        }
    }
}

impl EngineConfig {
    /// Builds a config from `MULTIMODAL_ROUTER_*` environment variables,
    /// falling back to [`EngineConfig::default`] for anything unset.
    pub fn from_env() -> Self {
        let mut cfg = EngineConfig::default();
        if let Ok(url) = std::env::var("MULTIMODAL_ROUTER_ORACLE_URL") {
            cfg.oracle_base_url = url;
        }
        if let Ok(secs) = std::env::var("MULTIMODAL_ROUTER_ORACLE_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                cfg.oracle_timeout = Duration::from_secs(secs);
            }
        }
        if let Ok(cap) = std::env::var("MULTIMODAL_ROUTER_ORACLE_CACHE_CAPACITY") {
            if let Ok(cap) = cap.parse::<usize>() {
                cfg.oracle_cache_capacity = cap;
            }
        }
        cfg
    }
}
