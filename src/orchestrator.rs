//! Orchestrator: composes eligibility filtering, scooter clustering, graph
//! construction, path enumeration, and path evaluation into one request
//! pipeline (§2 System Overview, §4.10), plus the §6 request/response
//! envelope and §5 cancellation support.

use std::time::Instant;

use crate::cluster::reduce_scooter_clusters;
use crate::domain::{filter_eligible, FeasibleRoute, Node, RouteRequest, TrafficConditions, UserPreference, WeatherConditions};
use crate::error::{Error, Result};
use crate::eval::evaluate_paths;
use crate::graph::{build_graph, MultiModalGraph};
use crate::oracle::RoutingOracle;
use crate::paths::enumerate_paths;
use crate::rank::filter_order_routes;

/// Full output of one planning request: the unranked feasible rows, the
/// (possibly enlarged) graph, and any synthetic stops the scooter split
/// introduced. Callers that render the graph need the latter two.
pub struct RouteResult {
    pub routes: Vec<FeasibleRoute>,
    pub synthetic_stops: Vec<Node>,
    pub graph: MultiModalGraph,
}

fn max_stop_id(nodes: &[Node]) -> u64 {
    nodes
        .iter()
        .filter_map(|n| match n {
            Node::Stop { id, .. } => Some(*id),
            _ => None,
        })
        .max()
        .unwrap_or(0)
}

fn prepare_graph(
    nodes: &[Node],
    weather: &WeatherConditions,
    escooter_clustering: bool,
    exclude_scooters: bool,
    exclude_cars: bool,
    exclude_sea_vessels: bool,
) -> (MultiModalGraph, u64) {
    let eligible = filter_eligible(nodes, weather, exclude_scooters, exclude_cars, exclude_sea_vessels);
    let reduced = if !exclude_scooters && escooter_clustering {
        reduce_scooter_clusters(&eligible)
    } else {
        eligible
    };
    let next_stop_id = max_stop_id(&reduced);
    (build_graph(&reduced, weather), next_stop_id)
}

/// Runs the full pipeline over a raw node set (§4.2-§4.8), without ranking.
/// `escooter_clustering` toggles the DBSCAN-equivalent reduction (§4.4);
/// disable it for small inventories where the O(n^2) cluster pass buys
/// nothing.
pub fn get_possible_routes(
    nodes: &[Node],
    weather: &WeatherConditions,
    traffic: &TrafficConditions,
    escooter_clustering: bool,
    exclude_scooters: bool,
    exclude_cars: bool,
    exclude_sea_vessels: bool,
    oracle: &dyn RoutingOracle,
) -> RouteResult {
    let (mut graph, mut next_stop_id) =
        prepare_graph(nodes, weather, escooter_clustering, exclude_scooters, exclude_cars, exclude_sea_vessels);

    let paths = enumerate_paths(&graph);
    log::info!("enumerated {} candidate paths", paths.len());

    let outcome = evaluate_paths(&mut graph, &paths, oracle, traffic, &mut next_stop_id);
    RouteResult { routes: outcome.routes, synthetic_stops: outcome.synthetic_stops, graph }
}

/// `get_possible_routes` plus a wall-clock deadline checked before each
/// path's evaluation (§5 Cancellation/deadlines — an ambient concern the
/// distilled spec's Non-goals don't touch). Exceeding `deadline` before all
/// paths are evaluated discards partial rows and returns
/// `Error::DeadlineExceeded`.
pub fn get_possible_routes_with_deadline(
    nodes: &[Node],
    weather: &WeatherConditions,
    traffic: &TrafficConditions,
    escooter_clustering: bool,
    exclude_scooters: bool,
    exclude_cars: bool,
    exclude_sea_vessels: bool,
    oracle: &dyn RoutingOracle,
    deadline: Instant,
) -> Result<RouteResult> {
    let (mut graph, mut next_stop_id) =
        prepare_graph(nodes, weather, escooter_clustering, exclude_scooters, exclude_cars, exclude_sea_vessels);

    let paths = enumerate_paths(&graph);
    let mut routes = Vec::new();
    let mut synthetic_stops = Vec::new();
    for path in &paths {
        if Instant::now() >= deadline {
            log::warn!("deadline exceeded after evaluating {}/{} paths", routes.len(), paths.len());
            return Err(Error::DeadlineExceeded);
        }
        let single = std::slice::from_ref(path);
        let outcome = evaluate_paths(&mut graph, single, oracle, traffic, &mut next_stop_id);
        routes.extend(outcome.routes);
        synthetic_stops.extend(outcome.synthetic_stops);
    }

    Ok(RouteResult { routes, synthetic_stops, graph })
}

/// Builds the implicit `UserPreference` the §6 request contract carries:
/// `avoid_*` booleans become `avoids`, and `minimizing_value` (if present)
/// becomes the sole ranking feature. `None` when the request carries no
/// preference at all, so `filter_order_routes` falls back to
/// `total_duration`.
fn preferences_from_request(request: &RouteRequest) -> Result<Option<UserPreference>> {
    let mut avoids = Vec::new();
    if request.avoid_cars {
        avoids.push("car".to_string());
    }
    if request.avoid_scooters {
        avoids.push("escooter".to_string());
    }
    if request.avoid_sea_vessels {
        avoids.push("sea_vessel".to_string());
    }
    let features = match &request.minimizing_value {
        Some(v) => vec![v.clone()],
        None => Vec::new(),
    };
    if avoids.is_empty() && features.is_empty() {
        return Ok(None);
    }
    Ok(Some(UserPreference::try_new(features, avoids)?))
}

/// Runs the pipeline for a `RouteRequest` envelope (§6) end to end:
/// validates the inventory, plans, and ranks using the request's own
/// `avoid_*`/`minimizing_value` fields.
pub fn plan_route(request: &RouteRequest, oracle: &dyn RoutingOracle) -> Result<Vec<FeasibleRoute>> {
    if request.inventory.vehicles.is_empty() && request.inventory.stops.is_empty() {
        return Err(Error::Validation("inventory has no vehicles or stops".into()));
    }

    let preferences = preferences_from_request(request)?;
    let nodes = request.into_nodes();

    let result = get_possible_routes(
        &nodes,
        &request.weather,
        &request.traffic,
        true,
        request.avoid_scooters,
        request.avoid_cars,
        request.avoid_sea_vessels,
        oracle,
    );

    if result.graph.is_empty() {
        return Err(Error::InfeasibleRequest("no feasible link between origin and destination".into()));
    }
    if result.routes.is_empty() {
        return Err(Error::InfeasibleRequest("no path survived evaluation".into()));
    }

    Ok(filter_order_routes(result.routes, preferences.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Inventory, PointName, StopDto, StopType, VehicleDto};
    use crate::geo::Location;
    use crate::oracle::StubOracle;

    fn loc(lat: f64, lng: f64) -> Location {
        Location::new(lat, lng).unwrap()
    }

    #[test]
    fn plan_route_rejects_empty_inventory() {
        let request = RouteRequest {
            origin: loc(41.0, 29.0),
            destination: loc(41.01, 29.01),
            avoid_cars: false,
            avoid_scooters: false,
            avoid_sea_vessels: false,
            minimizing_value: None,
            inventory: Inventory { vehicles: vec![], stops: vec![] },
            weather: WeatherConditions::default(),
            traffic: TrafficConditions::default(),
        };
        let oracle = StubOracle;
        assert!(matches!(plan_route(&request, &oracle), Err(Error::Validation(_))));
    }

    #[test]
    fn plan_route_finds_a_direct_walk() {
        // The car/car-stop pair must sit within MAX_WALK_DISTANCE of
        // origin/destination for the §4.6 precondition to hold at all; the
        // resulting START->CAR_STOP->END detour renders as "F*F" and is
        // rejected by pattern legality, so the direct walk is the only
        // survivor (see eval.rs's `direct_walk_survives_and_has_one_edge`).
        let origin = loc(41.00948, 28.9772);
        let car_loc = crate::geo::point_along_line(origin, loc(41.5, 29.5), 200.0);
        let request = RouteRequest {
            origin,
            destination: loc(41.00960, 28.9775),
            avoid_cars: false,
            avoid_scooters: false,
            avoid_sea_vessels: false,
            minimizing_value: None,
            inventory: Inventory {
                vehicles: vec![VehicleDto { id: 1, kind: crate::domain::TransportType::Car, loc: car_loc, available: true }],
                stops: vec![StopDto { id: 1, name: "lot".into(), kind: StopType::CarStop, loc: car_loc }],
            },
            weather: WeatherConditions::default(),
            traffic: TrafficConditions::default(),
        };
        let oracle = StubOracle;
        let routes = plan_route(&request, &oracle).expect("a direct walk should be feasible");
        assert!(!routes.is_empty());
        assert_eq!(routes[0].path, vec!["START".to_string(), "END".to_string()]);
    }

    #[test]
    fn plan_route_is_infeasible_when_nothing_links_the_endpoints() {
        let request = RouteRequest {
            origin: loc(0.0, 0.0),
            destination: loc(50.0, 50.0),
            avoid_cars: false,
            avoid_scooters: false,
            avoid_sea_vessels: false,
            minimizing_value: None,
            inventory: Inventory {
                vehicles: vec![VehicleDto { id: 1, kind: crate::domain::TransportType::Car, loc: loc(0.0, 0.0), available: true }],
                stops: vec![StopDto { id: 1, name: "lot".into(), kind: StopType::CarStop, loc: loc(0.0, 0.0) }],
            },
            weather: WeatherConditions::default(),
            traffic: TrafficConditions::default(),
        };
        let oracle = StubOracle;
        assert!(matches!(plan_route(&request, &oracle), Err(Error::InfeasibleRequest(_))));
    }

    #[test]
    fn deadline_in_the_past_is_exceeded_immediately() {
        let nodes = vec![
            Node::Point { name: PointName::Start, loc: loc(41.00948, 28.9772) },
            Node::Point { name: PointName::End, loc: loc(41.00960, 28.9775) },
        ];
        let oracle = StubOracle;
        let result = get_possible_routes_with_deadline(
            &nodes,
            &WeatherConditions::default(),
            &TrafficConditions::default(),
            true,
            false,
            false,
            false,
            &oracle,
            Instant::now() - std::time::Duration::from_secs(1),
        );
        assert!(matches!(result, Err(Error::DeadlineExceeded)));
    }
}
