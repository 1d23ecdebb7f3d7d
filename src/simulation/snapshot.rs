//! Read-only view of the simulation for the presentation layer

use super::taxi::TaxiState;
use super::types::{NodeId, PassengerId, Position, TaxiId};

#[derive(Debug, Clone, PartialEq)]
pub struct TaxiView {
    pub id: TaxiId,
    pub node: NodeId,
    pub position: Position,
    pub in_motion: bool,
    pub state: TaxiState,
    pub occupied: bool,
    pub passenger: Option<PassengerId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PassengerView {
    pub id: PassengerId,
    pub pickup: NodeId,
    pub dropoff: NodeId,
    /// Pickup node coordinate
    pub position: Position,
    /// Still waiting for a taxi, i.e. drawn at the pickup node
    pub waiting: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimSnapshot {
    pub tick: u64,
    pub taxis: Vec<TaxiView>,
    pub passengers: Vec<PassengerView>,
}

impl SimSnapshot {
    pub fn taxi(&self, id: TaxiId) -> Option<&TaxiView> {
        self.taxis.iter().find(|taxi| taxi.id == id)
    }

    pub fn passenger(&self, id: PassengerId) -> Option<&PassengerView> {
        self.passengers.iter().find(|passenger| passenger.id == id)
    }

    /// Passengers to draw
    pub fn visible_passengers(&self) -> impl Iterator<Item = &PassengerView> {
        self.passengers.iter().filter(|passenger| passenger.waiting)
    }
}
