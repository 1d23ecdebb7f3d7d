//! Ride requests and their lifecycle

use super::types::{NodeId, PassengerId, TaxiId};

/// Where a passenger is in their ride
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassengerStatus {
    /// Waiting at the pickup node for a taxi to be matched
    Waiting,
    /// A taxi is on its way to the pickup node
    Assigned(TaxiId),
    /// Aboard the taxi
    Riding(TaxiId),
    /// Dropped off
    Delivered,
}

#[derive(Debug, Clone)]
pub struct Passenger {
    pub id: PassengerId,
    pub pickup: NodeId,
    pub dropoff: NodeId,
    pub status: PassengerStatus,
    /// Tick at which the ride was requested
    pub requested_at: u64,
    pub picked_up_at: Option<u64>,
    pub delivered_at: Option<u64>,
}

impl Passenger {
    pub fn new(id: PassengerId, pickup: NodeId, dropoff: NodeId, requested_at: u64) -> Self {
        Self {
            id,
            pickup,
            dropoff,
            status: PassengerStatus::Waiting,
            requested_at,
            picked_up_at: None,
            delivered_at: None,
        }
    }

    /// Still unclaimed; the only state in which the passenger is drawn
    pub fn is_waiting(&self) -> bool {
        self.status == PassengerStatus::Waiting
    }

    pub fn picked_up(&self) -> bool {
        matches!(
            self.status,
            PassengerStatus::Riding(_) | PassengerStatus::Delivered
        )
    }

    pub fn is_delivered(&self) -> bool {
        self.status == PassengerStatus::Delivered
    }

    /// The taxi serving this passenger, if any
    pub fn taxi(&self) -> Option<TaxiId> {
        match self.status {
            PassengerStatus::Assigned(taxi) | PassengerStatus::Riding(taxi) => Some(taxi),
            PassengerStatus::Waiting | PassengerStatus::Delivered => None,
        }
    }
}
