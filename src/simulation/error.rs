//! Error type for the taxi simulation
//!
//! None of these are fatal to the simulation: callers reject the request or
//! leave the passenger queued and keep ticking.

use thiserror::Error;

use super::types::{NodeId, TaxiId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("unknown node {0}")]
    UnknownNode(String),

    #[error("edge {from} -> {to} has invalid weight {weight}")]
    InvalidWeight {
        from: String,
        to: String,
        weight: f32,
    },

    #[error("taxi speed {0} must be positive and finite")]
    InvalidSpeed(f32),

    #[error("node {0} has no layout coordinate")]
    MissingCoordinate(NodeId),

    #[error("no route from {from} to {to}")]
    Unreachable { from: NodeId, to: NodeId },

    #[error("pickup and dropoff are both {0}")]
    SameEndpoints(NodeId),

    #[error("{0} is already reserved")]
    TaxiBusy(TaxiId),

    #[error("no idle taxi available")]
    NoIdleTaxi,
}

/// Shorthand result type for the simulation
pub type SimResult<T> = Result<T, SimError>;
