//! City road graph (topology only)
//!
//! Nodes are named locations, edges are undirected weighted roads. Node
//! coordinates live in [`super::layout`].

use log::debug;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

use super::error::{SimError, SimResult};
use super::router::{self, Route};
use super::types::{NodeId, SimId};

/// Undirected weighted road graph
#[derive(Debug, Default, Clone)]
pub struct CityGraph {
    /// The underlying petgraph undirected graph
    graph: UnGraph<NodeId, f32>,

    /// Maps node IDs to their indices in the graph
    node_to_index: HashMap<NodeId, NodeIndex>,

    /// Maps node names to node IDs
    names: HashMap<String, NodeId>,

    /// Node names, indexed by node ID
    labels: Vec<String>,
}

impl CityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node by name, returning the existing ID if it is already present
    pub fn add_node(&mut self, name: &str) -> NodeId {
        if let Some(id) = self.names.get(name) {
            return *id;
        }

        let id = NodeId(SimId(self.labels.len()));
        let index = self.graph.add_node(id);
        self.node_to_index.insert(id, index);
        self.names.insert(name.to_string(), id);
        self.labels.push(name.to_string());
        id
    }

    /// Adds an undirected road between two named nodes.
    ///
    /// Missing endpoints are inserted. The weight must be positive and finite.
    pub fn add_edge(&mut self, from: &str, to: &str, weight: f32) -> SimResult<(NodeId, NodeId)> {
        if !(weight.is_finite() && weight > 0.0) {
            return Err(SimError::InvalidWeight {
                from: from.to_string(),
                to: to.to_string(),
                weight,
            });
        }

        let from_id = self.add_node(from);
        let to_id = self.add_node(to);
        let from_index = self.node_to_index[&from_id];
        let to_index = self.node_to_index[&to_id];
        self.graph.add_edge(from_index, to_index, weight);

        debug!("Added road {} <-> {} (weight {})", from, to, weight);
        Ok((from_id, to_id))
    }

    /// Shortest route between two nodes.
    ///
    /// Unknown or unreachable goals yield an empty route with infinite cost.
    pub fn shortest_path(&self, start: NodeId, goal: NodeId) -> Route {
        let (Some(&start_index), Some(&goal_index)) =
            (self.node_to_index.get(&start), self.node_to_index.get(&goal))
        else {
            return Route::unreachable();
        };

        let (path, cost) = router::dijkstra(&self.graph, start_index, goal_index);
        Route {
            nodes: path.into_iter().map(|index| self.graph[index]).collect(),
            cost,
        }
    }

    /// Looks up a node ID by name
    pub fn node(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Looks up a node ID by name, failing with `UnknownNode`
    pub fn require_node(&self, name: &str) -> SimResult<NodeId> {
        self.node(name)
            .ok_or_else(|| SimError::UnknownNode(name.to_string()))
    }

    /// Gets the name of a node
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.labels.get(id.0 .0).map(String::as_str)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node_to_index.contains_key(&id)
    }

    /// All node IDs in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.labels.len()).map(|i| NodeId(SimId(i)))
    }

    /// Neighbours of a node with the connecting edge weight
    pub fn neighbors(&self, id: NodeId) -> Vec<(NodeId, f32)> {
        let Some(&index) = self.node_to_index.get(&id) else {
            return Vec::new();
        };

        self.graph
            .edges(index)
            .map(|edge| {
                let other = if edge.source() == index {
                    edge.target()
                } else {
                    edge.source()
                };
                (self.graph[other], *edge.weight())
            })
            .collect()
    }

    /// Weight of the cheapest edge directly connecting two nodes
    pub fn edge_weight(&self, from: NodeId, to: NodeId) -> Option<f32> {
        self.neighbors(from)
            .into_iter()
            .filter(|(other, _)| *other == to)
            .map(|(_, weight)| weight)
            .min_by(|a, b| a.total_cmp(b))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
