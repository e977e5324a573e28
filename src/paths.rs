//! Bounded simple-path enumeration over the multi-modal graph.

use petgraph::algo::all_simple_paths;
use petgraph::graph::NodeIndex;

use crate::config::PATH_EDGE_CUTOFF;
use crate::graph::MultiModalGraph;

/// Yields every simple directed path from `START` to `END` with at most
/// [`PATH_EDGE_CUTOFF`] edges. No node is revisited within a path.
/// Enumeration order follows `petgraph`'s DFS order, which is deterministic
/// for a fixed graph representation.
pub fn enumerate_paths(graph: &MultiModalGraph) -> Vec<Vec<NodeIndex>> {
    let (Some(start), Some(end)) = (graph.node_index("START"), graph.node_index("END")) else {
        return Vec::new();
    };

    all_simple_paths::<Vec<NodeIndex>, _>(&graph.graph, start, end, 0, Some(PATH_EDGE_CUTOFF - 1)).collect()
}
