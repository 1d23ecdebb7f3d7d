//! Node coordinates (geometry only)
//!
//! Kept apart from [`super::graph::CityGraph`] so that a node without a
//! coordinate is caught when the simulation is built instead of at render time.

use std::collections::HashMap;

use super::error::{SimError, SimResult};
use super::graph::CityGraph;
use super::types::{NodeId, Position};

#[derive(Debug, Default, Clone)]
pub struct NodeLayout {
    positions: HashMap<NodeId, Position>,
}

impl NodeLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets (or replaces) the coordinate of a node
    pub fn set_position(&mut self, node: NodeId, position: Position) {
        self.positions.insert(node, position);
    }

    pub fn position(&self, node: NodeId) -> Option<Position> {
        self.positions.get(&node).copied()
    }

    pub fn require_position(&self, node: NodeId) -> SimResult<Position> {
        self.position(node).ok_or(SimError::MissingCoordinate(node))
    }

    /// Straight-line distance between two nodes, if both have coordinates
    pub fn distance(&self, from: NodeId, to: NodeId) -> Option<f32> {
        Some(self.position(from)?.distance(&self.position(to)?))
    }

    /// Checks that every node of the graph has a coordinate
    pub fn validate(&self, graph: &CityGraph) -> SimResult<()> {
        match graph.nodes().find(|node| !self.positions.contains_key(node)) {
            Some(missing) => Err(SimError::MissingCoordinate(missing)),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Bounding box of all coordinates as (min, max)
    pub fn bounds(&self) -> Option<(Position, Position)> {
        let mut iter = self.positions.values();
        let first = *iter.next()?;
        Some(iter.fold((first, first), |(min, max), p| {
            (
                Position::new(min.x.min(p.x), min.y.min(p.y)),
                Position::new(max.x.max(p.x), max.y.max(p.y)),
            )
        }))
    }
}
