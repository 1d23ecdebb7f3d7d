//! Taxi state machine for the simulation
//!
//! A taxi cycles Idle -> EnRouteToPickup -> EnRouteToDropoff -> Returning ->
//! Idle. Movement happens one tick at a time along the route computed at
//! assignment.

use log::{debug, warn};

use super::error::{SimError, SimResult};
use super::graph::CityGraph;
use super::layout::NodeLayout;
use super::types::{NodeId, PassengerId, Position, TaxiId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxiState {
    /// Parked at a node, available for assignment
    Idle,
    /// Heading to a passenger's pickup node
    EnRouteToPickup,
    /// Carrying a passenger to the drop-off node
    EnRouteToDropoff,
    /// Heading back to the home node
    Returning,
}

/// Result of a taxi update indicating what the simulation should record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxiUpdateResult {
    Idle,                    // Nothing to do
    Settling,                // Standing still after a pickup or drop-off
    Continue,                // Taxi moved along its route
    PickedUp(PassengerId),   // Passenger boarded at the pickup node
    DroppedOff(PassengerId), // Passenger left at the drop-off node
    ReturnedHome,            // Back at home, now idle
}

/// A taxi in the simulation
#[derive(Debug, Clone)]
pub struct Taxi {
    pub id: TaxiId,
    /// Last node reached; authoritative whenever the taxi is not moving
    pub node: NodeId,
    pub home: NodeId,
    pub destination: Option<NodeId>,
    pub route: Vec<NodeId>,
    /// Index into `route` of the node the current segment starts from
    pub route_index: usize,
    /// Distance covered along the current segment
    pub progress: f32,
    pub speed: f32,
    pub moving: bool,
    /// Reserved for or carrying a passenger
    pub occupied: bool,
    pub passenger: Option<PassengerId>,
    pub state: TaxiState,
    /// Drop-off node of the reserved passenger, consumed at pickup
    pending_dropoff: Option<NodeId>,
    settle_ticks: u32,
    settle_remaining: u32,
    /// Total distance driven
    pub odometer: f32,
}

impl Taxi {
    /// Builds a parked taxi. `speed` is not checked here; `Simulation`
    /// rejects non-positive or non-finite speeds before constructing one.
    pub fn new(id: TaxiId, start: NodeId, home: NodeId, speed: f32, settle_ticks: u32) -> Self {
        Self {
            id,
            node: start,
            home,
            destination: None,
            route: Vec::new(),
            route_index: 0,
            progress: 0.0,
            speed,
            moving: false,
            occupied: false,
            passenger: None,
            state: TaxiState::Idle,
            pending_dropoff: None,
            settle_ticks,
            settle_remaining: 0,
            odometer: 0.0,
        }
    }

    /// Eligible for a new passenger
    pub fn is_available(&self) -> bool {
        !self.occupied
    }

    /// Actually travelling this tick, as opposed to parked or settling
    pub fn in_motion(&self) -> bool {
        self.moving && self.settle_remaining == 0
    }

    pub fn is_settling(&self) -> bool {
        self.settle_remaining > 0
    }

    /// Passenger is physically aboard
    pub fn has_passenger_aboard(&self) -> bool {
        self.state == TaxiState::EnRouteToDropoff
    }

    /// Sets a new destination and recomputes the route from the current node.
    ///
    /// `as_pickup` reserves the taxi and heads for a pickup. Otherwise the taxi
    /// heads for a drop-off if a passenger is attached, or home if not. On an
    /// unreachable destination nothing changes.
    pub fn assign(
        &mut self,
        destination: NodeId,
        as_pickup: bool,
        graph: &CityGraph,
    ) -> SimResult<()> {
        let route = graph.shortest_path(self.node, destination);
        if route.is_empty() {
            warn!(
                "{}: no route from {} to {}, assignment rejected",
                self.id, self.node, destination
            );
            return Err(SimError::Unreachable {
                from: self.node,
                to: destination,
            });
        }

        self.state = if as_pickup {
            self.occupied = true;
            TaxiState::EnRouteToPickup
        } else if self.passenger.is_some() {
            TaxiState::EnRouteToDropoff
        } else {
            TaxiState::Returning
        };

        debug!(
            "{}: {:?} to {} via {} nodes (cost {})",
            self.id,
            self.state,
            destination,
            route.len(),
            route.cost
        );

        self.destination = Some(destination);
        self.route = route.nodes;
        self.route_index = 0;
        self.progress = 0.0;
        self.moving = true;
        Ok(())
    }

    /// Reserves the taxi for a passenger and sends it to the pickup node
    pub fn dispatch(
        &mut self,
        passenger: PassengerId,
        pickup: NodeId,
        dropoff: NodeId,
        graph: &CityGraph,
    ) -> SimResult<()> {
        if self.occupied {
            return Err(SimError::TaxiBusy(self.id));
        }

        self.passenger = Some(passenger);
        self.pending_dropoff = Some(dropoff);
        if let Err(err) = self.assign(pickup, true, graph) {
            self.passenger = None;
            self.pending_dropoff = None;
            return Err(err);
        }
        Ok(())
    }

    /// Advance the taxi by one tick
    pub fn advance_one_tick(&mut self, graph: &CityGraph, layout: &NodeLayout) -> TaxiUpdateResult {
        if self.settle_remaining > 0 {
            self.settle_remaining -= 1;
            return TaxiUpdateResult::Settling;
        }

        if !self.moving || self.destination.is_none() || self.route.is_empty() {
            return TaxiUpdateResult::Idle;
        }

        let from = self.route.get(self.route_index).copied();
        let to = self.route.get(self.route_index + 1).copied();
        let (Some(from), Some(to)) = (from, to) else {
            // Single node route, or index past the end
            return self.arrive(graph);
        };

        let length = layout.distance(from, to).unwrap_or(0.0);
        self.progress += self.speed;

        if self.progress >= length {
            self.node = to;
            self.route_index += 1;
            self.progress = 0.0;
            self.odometer += length;

            if self.route_index + 1 >= self.route.len() {
                return self.arrive(graph);
            }
        }

        TaxiUpdateResult::Continue
    }

    /// Render position: interpolated along the current segment while moving,
    /// otherwise the current node.
    pub fn position(&self, layout: &NodeLayout) -> Position {
        let here = layout.position(self.node).unwrap_or_default();
        if !self.moving {
            return here;
        }

        let next = self
            .route
            .get(self.route_index + 1)
            .and_then(|node| layout.position(*node));

        match next {
            Some(next) => {
                let length = here.distance(&next);
                if length > 0.0 {
                    here.lerp(&next, (self.progress / length).min(1.0))
                } else {
                    here
                }
            }
            None => here,
        }
    }

    fn clear_route(&mut self) {
        if let Some(last) = self.route.last() {
            self.node = *last;
        }
        self.route.clear();
        self.route_index = 0;
        self.progress = 0.0;
        self.destination = None;
        self.moving = false;
    }

    fn arrive(&mut self, graph: &CityGraph) -> TaxiUpdateResult {
        self.clear_route();

        match self.state {
            TaxiState::EnRouteToPickup => {
                let (Some(passenger), Some(dropoff)) = (self.passenger, self.pending_dropoff.take())
                else {
                    warn!("{}: reached pickup with no passenger reserved", self.id);
                    self.occupied = false;
                    self.passenger = None;
                    self.state = TaxiState::Idle;
                    return TaxiUpdateResult::Idle;
                };

                debug!("{}: picked up {} at {}", self.id, passenger, self.node);
                self.settle_remaining = self.settle_ticks;

                if self.assign(dropoff, false, graph).is_err() {
                    // Let the passenger out where they got in
                    warn!("{}: {} cannot reach {}, ride aborted", self.id, passenger, dropoff);
                    return self.finish_ride(passenger, graph);
                }
                TaxiUpdateResult::PickedUp(passenger)
            }
            TaxiState::EnRouteToDropoff => {
                let Some(passenger) = self.passenger else {
                    self.occupied = false;
                    self.state = TaxiState::Idle;
                    return TaxiUpdateResult::Idle;
                };
                debug!("{}: dropped off {} at {}", self.id, passenger, self.node);
                self.settle_remaining = self.settle_ticks;
                self.finish_ride(passenger, graph)
            }
            TaxiState::Returning => {
                debug!("{}: back home at {}", self.id, self.node);
                self.state = TaxiState::Idle;
                TaxiUpdateResult::ReturnedHome
            }
            TaxiState::Idle => TaxiUpdateResult::Idle,
        }
    }

    fn finish_ride(&mut self, passenger: PassengerId, graph: &CityGraph) -> TaxiUpdateResult {
        self.passenger = None;
        self.occupied = false;

        if self.assign(self.home, false, graph).is_err() {
            warn!("{}: cannot return home, parking at {}", self.id, self.node);
            self.state = TaxiState::Idle;
        }
        TaxiUpdateResult::DroppedOff(passenger)
    }
}
