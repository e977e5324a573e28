//! Directed multi-modal graph construction over the eligible node set.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};

use crate::config::{
    CAR_RENT_COST, FACTOR, MAX_CAR_DISTANCE, MAX_DISTANCE_FROM_STOP, MAX_SCOOTER_DISTANCE, MAX_WALK_DISTANCE,
    SCOOTER_RENT_COST, SEA_VESSEL_TRIP_COST, WALK_COST,
};
use crate::domain::{Node, TransportType, WeatherConditions};

/// Edge weight in the multi-modal graph.
#[derive(Debug, Clone, Copy)]
pub struct EdgeData {
    pub mot: TransportType,
    pub cost: i64,
}

/// The directed multi-modal graph plus a uid → index lookup, so callers
/// (the evaluator's scooter split) can cheaply add nodes/edges by uid.
pub struct MultiModalGraph {
    pub graph: DiGraph<Node, EdgeData>,
    pub index_of: HashMap<String, NodeIndex>,
}

impl MultiModalGraph {
    fn empty() -> Self {
        MultiModalGraph { graph: DiGraph::new(), index_of: HashMap::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn node_index(&self, uid: &str) -> Option<NodeIndex> {
        self.index_of.get(uid).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &Node {
        &self.graph[idx]
    }

    fn get_or_insert(&mut self, node: &Node) -> NodeIndex {
        if let Some(&idx) = self.index_of.get(&node.uid()) {
            idx
        } else {
            let idx = self.graph.add_node(node.clone());
            self.index_of.insert(node.uid(), idx);
            idx
        }
    }

    /// Adds an edge; a directed graph carries at most one edge per
    /// `(from, to)` so a duplicate addition overwrites the existing weight.
    pub fn add_edge(&mut self, a: &Node, b: &Node, mot: TransportType, cost: i64) {
        let ai = self.get_or_insert(a);
        let bi = self.get_or_insert(b);
        if let Some(existing) = self.graph.find_edge(ai, bi) {
            self.graph[existing] = EdgeData { mot, cost };
        } else {
            self.graph.add_edge(ai, bi, EdgeData { mot, cost });
        }
    }
}

fn exists_car(a: &Node, others: &[Node]) -> bool {
    others.iter().any(|o| o.is_car() && a.loc().distance_to(&o.loc()) < MAX_DISTANCE_FROM_STOP)
}

fn exists_sea_vessel(a: &Node, others: &[Node]) -> bool {
    others.iter().any(|o| o.is_sea_vessel() && a.loc().distance_to(&o.loc()) < MAX_DISTANCE_FROM_STOP)
}

fn is_vehicle_to_stop(b: &Node, others: &[Node]) -> bool {
    (b.is_car_stop() && exists_car(b, others)) || (b.is_sea_vessel_stop() && exists_sea_vessel(b, others))
}

fn exists_in_car_stop(car: &Node, car_stops: &[Node]) -> bool {
    car_stops.iter().any(|cp| cp.loc().distance_to(&car.loc()) < MAX_DISTANCE_FROM_STOP)
}

/// Builds the directed multi-modal graph over `nodes`. Returns an empty
/// graph when the §4.6 preconditions fail (missing START/END, or no node
/// close enough to link either endpoint) rather than an error — an empty
/// graph yields an empty result table downstream.
pub fn build_graph(nodes: &[Node], weather: &WeatherConditions) -> MultiModalGraph {
    let start = nodes.iter().find(|n| n.is_start_point());
    let end = nodes.iter().find(|n| n.is_end_point());
    let (start, end) = match (start, end) {
        (Some(s), Some(e)) => (s, e),
        _ => {
            log::warn!("graph build: missing START or END node");
            return MultiModalGraph::empty();
        }
    };

    let mut start_link_feasible = false;
    let mut end_link_feasible = false;
    for o in nodes {
        if o.uid() == start.uid() || o.uid() == end.uid() {
            continue;
        }
        if !start_link_feasible && start.loc().distance_to(&o.loc()) <= MAX_WALK_DISTANCE {
            start_link_feasible = true;
        }
        if !end_link_feasible {
            let d = end.loc().distance_to(&o.loc());
            if o.is_car_stop() && d <= MAX_WALK_DISTANCE {
                end_link_feasible = true;
            }
            if o.is_scooter() && d <= (MAX_SCOOTER_DISTANCE + MAX_WALK_DISTANCE) {
                end_link_feasible = true;
            }
            if o.is_sea_vessel_stop() && d <= MAX_WALK_DISTANCE {
                end_link_feasible = true;
            }
        }
    }
    if !start_link_feasible || !end_link_feasible {
        log::warn!("graph build: no feasible link to START or END");
        return MultiModalGraph::empty();
    }

    let car_stops: Vec<Node> = nodes.iter().filter(|n| n.is_car_stop()).cloned().collect();

    let mut pois: Vec<Node> = Vec::new();
    let mut others: Vec<Node> = Vec::new();
    for n in nodes {
        if n.is_bus() || n.is_sea_vessel() {
            others.push(n.clone());
        } else if n.is_car() && exists_in_car_stop(n, &car_stops) {
            others.push(n.clone());
        } else {
            pois.push(n.clone());
        }
    }

    let mut g = MultiModalGraph::empty();
    let n = pois.len();
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let a = &pois[i];
            let b = &pois[j];
            let line = a.loc().distance_to(&b.loc());
            let inflated = FACTOR * line;

            if (a.is_start_point() || a.is_stop()) && inflated <= MAX_WALK_DISTANCE {
                let can_walk = !(a.is_sea_vessel_stop() && b.is_sea_vessel_stop());
                if can_walk {
                    g.add_edge(a, b, TransportType::Foot, WALK_COST);
                }
            }

            if !weather.is_raining
                && a.is_scooter()
                && (b.is_car() || (b.is_stop() && is_vehicle_to_stop(b, &others)) || b.is_end_point())
                && inflated <= (MAX_SCOOTER_DISTANCE + MAX_WALK_DISTANCE)
            {
                g.add_edge(a, b, TransportType::Scooter, SCOOTER_RENT_COST);
            }

            if a.is_car() && b.is_car_stop() && inflated <= MAX_CAR_DISTANCE {
                g.add_edge(a, b, TransportType::Car, CAR_RENT_COST);
            }

            if a.is_car_stop() && b.is_car_stop() && exists_car(a, &others) {
                g.add_edge(a, b, TransportType::Car, CAR_RENT_COST);
            }

            if !weather.is_windy && a.is_sea_vessel_stop() && b.is_sea_vessel_stop() && exists_sea_vessel(a, &others) {
                g.add_edge(a, b, TransportType::SeaVessel, SEA_VESSEL_TRIP_COST);
            }
        }
    }

    log::debug!(
        "graph build: {} nodes, {} edges ({} pois, {} others)",
        g.graph.node_count(),
        g.graph.edge_count(),
        pois.len(),
        others.len()
    );
    g
}
