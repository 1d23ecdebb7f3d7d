//! Standalone taxi dispatch simulation module
//!
//! Routing, the taxi state machine and nearest-taxi dispatch. Nothing in
//! here draws or paces frames; a driver calls `request_ride` and `tick` and
//! reads `snapshot`.

mod config;
mod demo;
mod dispatcher;
mod error;
mod graph;
mod layout;
mod passenger;
mod router;
mod snapshot;
mod stats;
mod taxi;
mod types;
mod world;

pub use config::{DispatchPolicy, SimConfig, DEFAULT_SETTLE_TICKS, DEFAULT_TAXI_SPEED};
pub use demo::{demo_city, DEMO_LOCATIONS, DEMO_RIDE_NODES, DEMO_ROADS, DEMO_TAXIS};
pub use dispatcher::match_idle_taxi;
pub use error::{SimError, SimResult};
pub use graph::CityGraph;
pub use layout::NodeLayout;
pub use passenger::{Passenger, PassengerStatus};
pub use router::{dijkstra, Route};
pub use snapshot::{PassengerView, SimSnapshot, TaxiView};
pub use stats::SimStats;
pub use taxi::{Taxi, TaxiState, TaxiUpdateResult};
pub use types::{NodeId, PassengerId, Position, SimId, TaxiId};
pub use world::{Simulation, TickReport};
