//! Taxi Dispatch Simulation Library
//!
//! A small fleet of taxis serving ride requests on a weighted city graph.
//! The simulation is headless; any presentation layer drives it by ticks.

pub mod simulation;
