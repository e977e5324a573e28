//! E-scooter cluster reducer: DBSCAN in angular haversine space with
//! `min_samples = 1`, which reduces to union-find over pairs within `eps`
//! (see DESIGN.md). Dependency-free by design.

use crate::config::DBSCAN_RADIUS_M;
use crate::domain::Node;
use crate::geo::Location;

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        UnionFind { parent: (0..n).collect() }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

/// Reduces `nodes` by clustering SCOOTER vehicles within [`DBSCAN_RADIUS_M`]
/// of each other (great-circle distance) and replacing each cluster with a
/// single representative: the scooter closest to the cluster's centroid.
/// Non-scooter nodes keep their relative order; selected representatives
/// are appended at the end.
pub fn reduce_scooter_clusters(nodes: &[Node]) -> Vec<Node> {
    let scooters: Vec<&Node> = nodes.iter().filter(|n| n.is_scooter()).collect();
    if scooters.len() <= 1 {
        let mut result: Vec<Node> = nodes.iter().filter(|n| !n.is_scooter()).cloned().collect();
        result.extend(scooters.into_iter().cloned());
        return result;
    }

    let mut uf = UnionFind::new(scooters.len());
    for i in 0..scooters.len() {
        for j in (i + 1)..scooters.len() {
            if scooters[i].loc().distance_to(&scooters[j].loc()) <= DBSCAN_RADIUS_M {
                uf.union(i, j);
            }
        }
    }

    let mut clusters: std::collections::HashMap<usize, Vec<usize>> = std::collections::HashMap::new();
    for i in 0..scooters.len() {
        let root = uf.find(i);
        clusters.entry(root).or_default().push(i);
    }

    let mut representatives = Vec::with_capacity(clusters.len());
    let mut cluster_roots: Vec<usize> = clusters.keys().copied().collect();
    cluster_roots.sort_unstable();
    for root in cluster_roots {
        let members = &clusters[&root];
        let mean_lat = members.iter().map(|&i| scooters[i].loc().lat).sum::<f64>() / members.len() as f64;
        let mean_lng = members.iter().map(|&i| scooters[i].loc().lng).sum::<f64>() / members.len() as f64;
        let centroid = Location::new(mean_lat, mean_lng).expect("mean of valid lat/lng stays in range");

        let closest = members
            .iter()
            .min_by(|&&a, &&b| {
                let da = scooters[a].loc().distance_to(&centroid);
                let db = scooters[b].loc().distance_to(&centroid);
                da.partial_cmp(&db).expect("distances are finite")
            })
            .expect("cluster has at least one member");

        representatives.push(scooters[*closest].clone());
    }

    let mut result: Vec<Node> = nodes.iter().filter(|n| !n.is_scooter()).cloned().collect();
    result.extend(representatives);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PointName, TransportType};

    fn scooter(id: u64, lat: f64, lng: f64) -> Node {
        Node::Vehicle { id, kind: TransportType::Scooter, loc: Location::new(lat, lng).unwrap(), available: true }
    }

    #[test]
    fn merges_scooters_within_radius() {
        let nodes = vec![
            Node::Point { name: PointName::Start, loc: Location::new(41.0, 29.0).unwrap() },
            scooter(1, 41.0010, 29.0010),
            scooter(2, 41.0011, 29.0011),
        ];
        let reduced = reduce_scooter_clusters(&nodes);
        let scooter_count = reduced.iter().filter(|n| n.is_scooter()).count();
        assert_eq!(scooter_count, 1);
    }

    #[test]
    fn keeps_distant_scooters_separate() {
        let nodes = vec![scooter(1, 41.0, 29.0), scooter(2, 42.0, 30.0)];
        let reduced = reduce_scooter_clusters(&nodes);
        assert_eq!(reduced.iter().filter(|n| n.is_scooter()).count(), 2);
    }

    #[test]
    fn preserves_non_scooter_order_and_appends_representatives() {
        let nodes = vec![
            Node::Point { name: PointName::Start, loc: Location::new(0.0, 0.0).unwrap() },
            scooter(1, 41.0, 29.0),
            Node::Point { name: PointName::End, loc: Location::new(1.0, 1.0).unwrap() },
        ];
        let reduced = reduce_scooter_clusters(&nodes);
        assert!(reduced[0].is_start_point());
        assert!(reduced[1].is_end_point());
        assert!(reduced[2].is_scooter());
    }
}
