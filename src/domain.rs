//! Domain model: transport/stop taxonomies, the POI sum type, weather and
//! traffic context, user preferences, and the request/response envelope
//! presented to the core (§6).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::Location;

/// Mode of transport. Closed variant; each has a single-letter pattern tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportType {
    Foot,
    Scooter,
    Car,
    Bus,
    SeaVessel,
}

impl TransportType {
    /// Prefix used when building a vehicle's uid (`<abbr>-<id>`).
    pub fn abbr(&self) -> &'static str {
        match self {
            TransportType::Foot => "F",
            TransportType::Scooter => "S",
            TransportType::Car => "C",
            TransportType::Bus => "B",
            TransportType::SeaVessel => "SV",
        }
    }

    /// Single-letter tag used inside path patterns.
    pub fn char(&self) -> char {
        match self {
            TransportType::Foot => 'F',
            TransportType::Scooter => 'S',
            TransportType::Car => 'C',
            TransportType::Bus => 'B',
            TransportType::SeaVessel => 'V',
        }
    }
}

/// Kind of stop. Closed variant; each has an abbreviation used in uids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopType {
    ScooterStop,
    CarStop,
    BusStop,
    SeaVesselStop,
}

impl StopType {
    pub fn abbr(&self) -> &'static str {
        match self {
            StopType::ScooterStop => "SS",
            StopType::CarStop => "CS",
            StopType::BusStop => "BS",
            StopType::SeaVesselStop => "SVS",
        }
    }
}

/// The two well-known `Point` names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointName {
    Start,
    End,
}

impl PointName {
    fn as_str(&self) -> &'static str {
        match self {
            PointName::Start => "START",
            PointName::End => "END",
        }
    }
}

/// A node in the multi-modal graph: a `Point`, `Vehicle`, or `Stop`.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Point {
        name: PointName,
        loc: Location,
    },
    Vehicle {
        id: u64,
        kind: TransportType,
        loc: Location,
        available: bool,
    },
    Stop {
        id: u64,
        name: String,
        kind: StopType,
        loc: Location,
    },
}

impl Node {
    /// Stable identifier: the point name, `<transport-abbr>-<id>`, or
    /// `<stop-abbr>-<id>`.
    pub fn uid(&self) -> String {
        match self {
            Node::Point { name, .. } => name.as_str().to_string(),
            Node::Vehicle { id, kind, .. } => format!("{}-{}", kind.abbr(), id),
            Node::Stop { id, kind, .. } => format!("{}-{}", kind.abbr(), id),
        }
    }

    pub fn loc(&self) -> Location {
        match self {
            Node::Point { loc, .. } | Node::Vehicle { loc, .. } | Node::Stop { loc, .. } => *loc,
        }
    }

    pub fn is_point(&self) -> bool {
        matches!(self, Node::Point { .. })
    }

    pub fn is_start_point(&self) -> bool {
        matches!(self, Node::Point { name: PointName::Start, .. })
    }

    pub fn is_end_point(&self) -> bool {
        matches!(self, Node::Point { name: PointName::End, .. })
    }

    pub fn is_vehicle(&self) -> bool {
        matches!(self, Node::Vehicle { .. })
    }

    pub fn is_car(&self) -> bool {
        matches!(self, Node::Vehicle { kind: TransportType::Car, .. })
    }

    pub fn is_bus(&self) -> bool {
        matches!(self, Node::Vehicle { kind: TransportType::Bus, .. })
    }

    pub fn is_scooter(&self) -> bool {
        matches!(self, Node::Vehicle { kind: TransportType::Scooter, .. })
    }

    pub fn is_sea_vessel(&self) -> bool {
        matches!(self, Node::Vehicle { kind: TransportType::SeaVessel, .. })
    }

    pub fn is_stop(&self) -> bool {
        matches!(self, Node::Stop { .. })
    }

    pub fn is_car_stop(&self) -> bool {
        matches!(self, Node::Stop { kind: StopType::CarStop, .. })
    }

    pub fn is_bus_stop(&self) -> bool {
        matches!(self, Node::Stop { kind: StopType::BusStop, .. })
    }

    pub fn is_scooter_stop(&self) -> bool {
        matches!(self, Node::Stop { kind: StopType::ScooterStop, .. })
    }

    pub fn is_sea_vessel_stop(&self) -> bool {
        matches!(self, Node::Stop { kind: StopType::SeaVesselStop, .. })
    }

    /// Allocates a synthetic `SCOOTER_STOP` at `loc` with id `stop_id`,
    /// per the §3 Lifecycle rule (`max(existing_stop_id) + k`).
    pub fn new_scooter_stop(stop_id: u64, loc: Location) -> Node {
        Node::Stop {
            id: stop_id,
            name: "tmp".to_string(),
            kind: StopType::ScooterStop,
            loc,
        }
    }
}

/// `(isRaining, isWindy)`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WeatherConditions {
    #[serde(default)]
    pub is_raining: bool,
    #[serde(default)]
    pub is_windy: bool,
}

/// Ordered sequence of high-traffic locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrafficConditions {
    #[serde(default)]
    pub high_traffic_locations: Vec<Location>,
}

/// Closed vocabulary the ranker's `features` may draw from (§4.8/§4.9).
pub const ALLOWED_FEATURES: &[&str] = &[
    "edges",
    "total_distance",
    "total_duration",
    "total_cost",
    "walk_count",
    "walk_distance",
    "car_count",
    "car_distance",
    "escooter_count",
    "escooter_distance",
    "sea_vessel_count",
    "sea_vessel_distance",
];

/// Closed vocabulary the ranker's `avoids` may draw from.
pub const ALLOWED_MEANS_OF_TRANSPORT: &[&str] = &["walk", "car", "escooter", "sea_vessel"];

/// `(features: ordered ranking keys, avoids: set of means of transport)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPreference {
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub avoids: Vec<String>,
}

impl UserPreference {
    /// Validates `features`/`avoids` against the closed vocabularies;
    /// fails with `Error::Validation` on any unknown key.
    pub fn try_new(features: Vec<String>, avoids: Vec<String>) -> Result<Self> {
        for f in &features {
            if !ALLOWED_FEATURES.contains(&f.as_str()) {
                return Err(Error::Validation(format!("invalid feature: {f}")));
            }
        }
        for a in &avoids {
            if !ALLOWED_MEANS_OF_TRANSPORT.contains(&a.as_str()) {
                return Err(Error::Validation(format!("invalid avoid: {a}")));
            }
        }
        Ok(UserPreference { features, avoids })
    }
}

/// Input: the node set, weather, and three user exclusion flags. Removes
/// SCOOTER vehicles/SCOOTER_STOPs on rain or `exclude_scooters`, CAR
/// vehicles/CAR_STOPs on `exclude_cars`, SEA_VESSEL vehicles/
/// SEA_VESSEL_STOPs on wind or `exclude_sea_vessels`. START/END always pass.
pub fn filter_eligible(
    nodes: &[Node],
    weather: &WeatherConditions,
    exclude_scooters: bool,
    exclude_cars: bool,
    exclude_sea_vessels: bool,
) -> Vec<Node> {
    nodes
        .iter()
        .filter(|n| {
            if n.is_point() {
                return true;
            }
            if (exclude_scooters || weather.is_raining) && (n.is_scooter() || n.is_scooter_stop()) {
                return false;
            }
            if exclude_cars && (n.is_car() || n.is_car_stop()) {
                return false;
            }
            if (exclude_sea_vessels || weather.is_windy) && (n.is_sea_vessel() || n.is_sea_vessel_stop()) {
                return false;
            }
            true
        })
        .cloned()
        .collect()
}

/// Wire shape of a vehicle in the inventory (§6 request contract).
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleDto {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: TransportType,
    pub loc: Location,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Wire shape of a stop in the inventory (§6 request contract).
#[derive(Debug, Clone, Deserialize)]
pub struct StopDto {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: StopType,
    pub loc: Location,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub vehicles: Vec<VehicleDto>,
    #[serde(default)]
    pub stops: Vec<StopDto>,
}

/// The request contract presented to the core (§6).
#[derive(Debug, Clone, Deserialize)]
pub struct RouteRequest {
    pub origin: Location,
    pub destination: Location,
    #[serde(default)]
    pub avoid_cars: bool,
    #[serde(default)]
    pub avoid_scooters: bool,
    #[serde(default)]
    pub avoid_sea_vessels: bool,
    #[serde(default)]
    pub minimizing_value: Option<String>,
    pub inventory: Inventory,
    #[serde(default)]
    pub weather: WeatherConditions,
    #[serde(default)]
    pub traffic: TrafficConditions,
}

impl RouteRequest {
    /// Expands the request into the flat node set `get_possible_routes`
    /// consumes: `START`, `END`, then every vehicle and stop in inventory.
    pub fn into_nodes(&self) -> Vec<Node> {
        let mut nodes = Vec::with_capacity(2 + self.inventory.vehicles.len() + self.inventory.stops.len());
        nodes.push(Node::Point { name: PointName::Start, loc: self.origin });
        nodes.push(Node::Point { name: PointName::End, loc: self.destination });
        for v in &self.inventory.vehicles {
            nodes.push(Node::Vehicle { id: v.id, kind: v.kind, loc: v.loc, available: v.available });
        }
        for s in &self.inventory.stops {
            nodes.push(Node::Stop { id: s.id, name: s.name.clone(), kind: s.kind, loc: s.loc });
        }
        nodes
    }
}

/// One row of the response table (§3 FeasibleRoute row / §6 response).
#[derive(Debug, Clone, Serialize)]
pub struct FeasibleRoute {
    pub path: Vec<String>,
    pub pattern: String,
    pub edges: usize,
    pub total_distance_m: f64,
    pub total_duration_s: f64,
    pub total_cost: i64,
    pub walk_count: u32,
    pub walk_distance_m: f64,
    pub car_count: u32,
    pub car_distance_m: f64,
    pub escooter_count: u32,
    pub escooter_distance_m: f64,
    pub sea_vessel_count: u32,
    pub sea_vessel_distance_m: f64,
    pub expected_intermediate_time_s: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(lat: f64, lng: f64) -> Location {
        Location::new(lat, lng).unwrap()
    }

    #[test]
    fn vehicle_uid_uses_transport_abbr() {
        let n = Node::Vehicle { id: 3, kind: TransportType::Car, loc: loc(0.0, 0.0), available: true };
        assert_eq!(n.uid(), "C-3");
        let n = Node::Vehicle { id: 1, kind: TransportType::SeaVessel, loc: loc(0.0, 0.0), available: true };
        assert_eq!(n.uid(), "SV-1");
    }

    #[test]
    fn pattern_char_differs_from_abbr_for_sea_vessel() {
        assert_eq!(TransportType::SeaVessel.abbr(), "SV");
        assert_eq!(TransportType::SeaVessel.char(), 'V');
    }

    #[test]
    fn stop_uid_uses_stop_abbr() {
        let n = Node::Stop { id: 7, name: "Dock".into(), kind: StopType::ScooterStop, loc: loc(0.0, 0.0) };
        assert_eq!(n.uid(), "SS-7");
    }

    #[test]
    fn filter_eligible_drops_scooters_when_raining() {
        let nodes = vec![
            Node::Point { name: PointName::Start, loc: loc(0.0, 0.0) },
            Node::Vehicle { id: 1, kind: TransportType::Scooter, loc: loc(0.0, 0.0), available: true },
        ];
        let weather = WeatherConditions { is_raining: true, is_windy: false };
        let filtered = filter_eligible(&nodes, &weather, false, false, false);
        assert_eq!(filtered.len(), 1);
        assert!(filtered[0].is_point());
    }

    #[test]
    fn filter_eligible_keeps_start_and_end_unconditionally() {
        let nodes = vec![
            Node::Point { name: PointName::Start, loc: loc(0.0, 0.0) },
            Node::Point { name: PointName::End, loc: loc(1.0, 1.0) },
        ];
        let weather = WeatherConditions::default();
        let filtered = filter_eligible(&nodes, &weather, true, true, true);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn user_preference_rejects_unknown_feature() {
        assert!(UserPreference::try_new(vec!["not_a_feature".into()], vec![]).is_err());
    }

    #[test]
    fn user_preference_rejects_unknown_avoid() {
        assert!(UserPreference::try_new(vec![], vec!["bicycle".into()]).is_err());
    }

    #[test]
    fn user_preference_accepts_closed_vocabulary() {
        assert!(UserPreference::try_new(vec!["total_duration".into()], vec!["car".into()]).is_ok());
    }
}
