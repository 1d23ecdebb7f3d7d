//! The demo city: seven locations, six roads and two taxis
//!
//! Coordinates are in screen pixels of an 800x600 view (y grows downward).
//! Road weights are independent of the drawn distances.

use super::config::SimConfig;
use super::error::SimResult;
use super::graph::CityGraph;
use super::layout::NodeLayout;
use super::types::Position;
use super::world::Simulation;

pub const DEMO_LOCATIONS: [(&str, f32, f32); 7] = [
    ("Park", 200.0, 170.0),
    ("School", 555.0, 465.0),
    ("Crossing", 130.0, 460.0),
    ("Street", 200.0, 40.0),
    ("Station", 740.0, 160.0),
    ("Junction", 265.0, 465.0),
    ("Home", 415.0, 165.0),
];

pub const DEMO_ROADS: [(&str, &str, f32); 6] = [
    ("Park", "Junction", 2.0),
    ("Street", "Park", 2.0),
    ("Junction", "Crossing", 3.0),
    ("Junction", "School", 4.0),
    ("Station", "Home", 1.0),
    ("Home", "Park", 6.0),
];

/// (start, home) of each demo taxi
pub const DEMO_TAXIS: [(&str, &str); 2] = [("Street", "Street"), ("Station", "Station")];

/// Locations riders can be picked up at or dropped off at
pub const DEMO_RIDE_NODES: [&str; 4] = ["Home", "School", "Crossing", "Park"];

/// Builds the demo city graph and its layout
pub fn demo_city() -> SimResult<(CityGraph, NodeLayout)> {
    let mut graph = CityGraph::new();
    let mut layout = NodeLayout::new();

    for (name, x, y) in DEMO_LOCATIONS {
        let node = graph.add_node(name);
        layout.set_position(node, Position::new(x, y));
    }

    for (from, to, weight) in DEMO_ROADS {
        graph.add_edge(from, to, weight)?;
    }

    Ok((graph, layout))
}

impl Simulation {
    /// Create the demo city with its two taxis
    pub fn create_demo(config: SimConfig) -> SimResult<Self> {
        let (graph, layout) = demo_city()?;
        let mut sim = Simulation::new(graph, layout, config)?;
        for (start, home) in DEMO_TAXIS {
            sim.add_taxi_by_name(start, home)?;
        }
        Ok(sim)
    }
}
