//! Dijkstra shortest-path search over the city graph

use ordered_float::OrderedFloat;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::types::NodeId;

/// An ordered path through the graph and its total cost.
///
/// An empty route means no path exists; a single node route means the start
/// already is the goal.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub nodes: Vec<NodeId>,
    pub cost: f32,
}

impl Route {
    pub fn unreachable() -> Self {
        Self {
            nodes: Vec::new(),
            cost: f32::INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn first(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn last(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }
}

/// Dijkstra with lazy deletion of stale heap entries.
///
/// Returns the node path from `start` to `goal` (inclusive) and its cost, or
/// an empty path and infinite cost when `goal` cannot be reached.
pub fn dijkstra(
    graph: &UnGraph<NodeId, f32>,
    start: NodeIndex,
    goal: NodeIndex,
) -> (Vec<NodeIndex>, f32) {
    let node_count = graph.node_count();
    if start.index() >= node_count || goal.index() >= node_count {
        return (Vec::new(), f32::INFINITY);
    }

    let mut distances = vec![f32::INFINITY; node_count];
    let mut predecessors: Vec<Option<NodeIndex>> = vec![None; node_count];
    let mut queue = BinaryHeap::new();

    distances[start.index()] = 0.0;
    queue.push(Reverse((OrderedFloat(0.0_f32), start)));

    while let Some(Reverse((OrderedFloat(distance), node))) = queue.pop() {
        if node == goal {
            let mut path = vec![goal];
            let mut current = goal;
            while let Some(previous) = predecessors[current.index()] {
                path.push(previous);
                current = previous;
            }
            path.reverse();
            return (path, distances[goal.index()]);
        }

        // Stale entry
        if distance > distances[node.index()] {
            continue;
        }

        for edge in graph.edges(node) {
            let neighbor = if edge.source() == node {
                edge.target()
            } else {
                edge.source()
            };
            let candidate = distance + *edge.weight();
            if candidate < distances[neighbor.index()] {
                distances[neighbor.index()] = candidate;
                predecessors[neighbor.index()] = Some(node);
                queue.push(Reverse((OrderedFloat(candidate), neighbor)));
            }
        }
    }

    (Vec::new(), f32::INFINITY)
}
