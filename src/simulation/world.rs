//! Main simulation world that ties everything together
//!
//! `Simulation` owns the city, the fleet and every ride request. All state
//! changes go through `request_ride` and `tick`.

use log::{debug, info, warn};

use super::config::{DispatchPolicy, SimConfig};
use super::dispatcher;
use super::error::{SimError, SimResult};
use super::graph::CityGraph;
use super::layout::NodeLayout;
use super::passenger::{Passenger, PassengerStatus};
use super::snapshot::{PassengerView, SimSnapshot, TaxiView};
use super::stats::SimStats;
use super::taxi::{Taxi, TaxiUpdateResult};
use super::types::{NodeId, PassengerId, SimId, TaxiId};

/// What happened during one call to [`Simulation::tick`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub matched: Vec<(PassengerId, TaxiId)>,
    pub picked_up: Vec<PassengerId>,
    pub delivered: Vec<PassengerId>,
    pub returned_home: Vec<TaxiId>,
}

/// A taxi that never covers distance would stay reserved forever
fn check_speed(speed: f32) -> SimResult<()> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidSpeed(speed))
    }
}

/// The main simulation world
pub struct Simulation {
    graph: CityGraph,
    layout: NodeLayout,
    config: SimConfig,

    /// The fleet, in dispatch priority order
    taxis: Vec<Taxi>,

    /// Waiting and in-flight passengers, in request order
    passengers: Vec<Passenger>,

    /// Delivered passengers
    completed: Vec<Passenger>,

    /// Next ID to assign
    next_id: usize,

    /// Number of ticks run so far
    tick: u64,

    stats: SimStats,
}

impl Simulation {
    /// Builds a simulation, checking that every node can be placed on screen
    pub fn new(graph: CityGraph, layout: NodeLayout, config: SimConfig) -> SimResult<Self> {
        layout.validate(&graph)?;
        check_speed(config.taxi_speed)?;

        Ok(Self {
            graph,
            layout,
            config,
            taxis: Vec::new(),
            passengers: Vec::new(),
            completed: Vec::new(),
            next_id: 0,
            tick: 0,
            stats: SimStats::default(),
        })
    }

    fn next_sim_id(&mut self) -> SimId {
        let id = SimId(self.next_id);
        self.next_id += 1;
        id
    }

    fn check_node(&self, node: NodeId) -> SimResult<()> {
        if self.graph.contains(node) {
            Ok(())
        } else {
            Err(SimError::UnknownNode(node.to_string()))
        }
    }

    /// Adds a taxi moving at the configured speed
    pub fn add_taxi(&mut self, start: NodeId, home: NodeId) -> SimResult<TaxiId> {
        self.add_taxi_with_speed(start, home, self.config.taxi_speed)
    }

    pub fn add_taxi_with_speed(
        &mut self,
        start: NodeId,
        home: NodeId,
        speed: f32,
    ) -> SimResult<TaxiId> {
        self.check_node(start)?;
        self.check_node(home)?;
        check_speed(speed)?;

        let id = TaxiId(self.next_sim_id());
        self.taxis
            .push(Taxi::new(id, start, home, speed, self.config.settle_ticks));
        debug!("Added {} at {} (home {})", id, start, home);
        Ok(id)
    }

    /// Adds a taxi by node names
    pub fn add_taxi_by_name(&mut self, start: &str, home: &str) -> SimResult<TaxiId> {
        let start = self.graph.require_node(start)?;
        let home = self.graph.require_node(home)?;
        self.add_taxi(start, home)
    }

    /// Queues a ride request.
    ///
    /// Unknown nodes, identical endpoints and a drop-off that cannot be reached
    /// from the pickup are rejected here so the taxi never has to handle them.
    pub fn request_ride(&mut self, pickup: NodeId, dropoff: NodeId) -> SimResult<PassengerId> {
        self.stats.rides_requested += 1;

        if let Err(err) = self.validate_ride(pickup, dropoff) {
            self.stats.rides_rejected += 1;
            warn!("Rejected ride {} -> {}: {}", pickup, dropoff, err);
            return Err(err);
        }

        let id = PassengerId(self.next_sim_id());
        self.passengers
            .push(Passenger::new(id, pickup, dropoff, self.tick));
        info!(
            "Ride requested: {} from {} to {}",
            id,
            self.node_name(pickup),
            self.node_name(dropoff)
        );
        Ok(id)
    }

    /// Queues a ride request by node names
    pub fn request_ride_by_name(&mut self, pickup: &str, dropoff: &str) -> SimResult<PassengerId> {
        let lookup = self
            .graph
            .require_node(pickup)
            .and_then(|pickup| Ok((pickup, self.graph.require_node(dropoff)?)));

        match lookup {
            Ok((pickup, dropoff)) => self.request_ride(pickup, dropoff),
            Err(err) => {
                self.stats.rides_requested += 1;
                self.stats.rides_rejected += 1;
                warn!("Rejected ride {} -> {}: {}", pickup, dropoff, err);
                Err(err)
            }
        }
    }

    fn validate_ride(&self, pickup: NodeId, dropoff: NodeId) -> SimResult<()> {
        self.check_node(pickup)?;
        self.check_node(dropoff)?;
        if pickup == dropoff {
            return Err(SimError::SameEndpoints(pickup));
        }
        if self.graph.shortest_path(pickup, dropoff).is_empty() {
            return Err(SimError::Unreachable {
                from: pickup,
                to: dropoff,
            });
        }
        Ok(())
    }

    /// Main simulation tick: dispatch, then move every taxi
    pub fn tick(&mut self) -> TickReport {
        self.tick += 1;

        let mut report = TickReport {
            tick: self.tick,
            matched: self.dispatch_waiting(),
            ..TickReport::default()
        };

        // Collect results first, passengers are updated afterwards
        let results: Vec<(TaxiId, TaxiUpdateResult)> = self
            .taxis
            .iter_mut()
            .map(|taxi| (taxi.id, taxi.advance_one_tick(&self.graph, &self.layout)))
            .collect();

        for (taxi_id, result) in results {
            match result {
                TaxiUpdateResult::PickedUp(passenger_id) => {
                    self.on_picked_up(passenger_id, taxi_id);
                    report.picked_up.push(passenger_id);
                }
                TaxiUpdateResult::DroppedOff(passenger_id) => {
                    self.on_dropped_off(passenger_id, taxi_id);
                    report.delivered.push(passenger_id);
                }
                TaxiUpdateResult::ReturnedHome => {
                    self.stats.returns_home += 1;
                    report.returned_home.push(taxi_id);
                }
                TaxiUpdateResult::Continue
                | TaxiUpdateResult::Settling
                | TaxiUpdateResult::Idle => {}
            }
        }

        self.archive_delivered();
        report
    }

    /// Matches waiting passengers in request order.
    ///
    /// With `OnePerTick` at most one match is made per call.
    fn dispatch_waiting(&mut self) -> Vec<(PassengerId, TaxiId)> {
        let mut matched = Vec::new();

        for index in 0..self.passengers.len() {
            if !self.passengers[index].is_waiting() {
                continue;
            }

            match self.dispatch_passenger(index) {
                Ok(taxi_id) => {
                    matched.push((self.passengers[index].id, taxi_id));
                    if self.config.dispatch_policy == DispatchPolicy::OnePerTick {
                        break;
                    }
                }
                // Nobody else can be served either
                Err(SimError::NoIdleTaxi) => break,
                Err(err) => {
                    self.stats.assignment_failures += 1;
                    debug!("{} stays waiting: {}", self.passengers[index].id, err);
                }
            }
        }

        matched
    }

    fn dispatch_passenger(&mut self, index: usize) -> SimResult<TaxiId> {
        let passenger = &self.passengers[index];
        let (passenger_id, pickup, dropoff) = (passenger.id, passenger.pickup, passenger.dropoff);

        let taxi_id = dispatcher::match_idle_taxi(pickup, &self.taxis, &self.layout)
            .ok_or(SimError::NoIdleTaxi)?;
        let taxi = self
            .taxis
            .iter_mut()
            .find(|taxi| taxi.id == taxi_id)
            .ok_or(SimError::NoIdleTaxi)?;

        taxi.dispatch(passenger_id, pickup, dropoff, &self.graph)?;

        self.passengers[index].status = PassengerStatus::Assigned(taxi_id);
        self.stats.rides_matched += 1;
        info!(
            "Dispatched {} to {} at {}",
            taxi_id,
            passenger_id,
            self.node_name(pickup)
        );
        Ok(taxi_id)
    }

    fn on_picked_up(&mut self, passenger_id: PassengerId, taxi_id: TaxiId) {
        let tick = self.tick;
        let Some(passenger) = self.passengers.iter_mut().find(|p| p.id == passenger_id) else {
            warn!("{} picked up unknown {}", taxi_id, passenger_id);
            return;
        };

        passenger.status = PassengerStatus::Riding(taxi_id);
        passenger.picked_up_at = Some(tick);
        self.stats.pickups += 1;
        self.stats.total_wait_ticks += tick.saturating_sub(passenger.requested_at);
    }

    fn on_dropped_off(&mut self, passenger_id: PassengerId, taxi_id: TaxiId) {
        let tick = self.tick;
        let Some(passenger) = self.passengers.iter_mut().find(|p| p.id == passenger_id) else {
            warn!("{} dropped off unknown {}", taxi_id, passenger_id);
            return;
        };

        passenger.status = PassengerStatus::Delivered;
        passenger.delivered_at = Some(tick);
        self.stats.rides_completed += 1;
        info!("{} delivered {} at tick {}", taxi_id, passenger_id, tick);
    }

    fn archive_delivered(&mut self) {
        if !self.passengers.iter().any(Passenger::is_delivered) {
            return;
        }
        let (delivered, active): (Vec<_>, Vec<_>) = self
            .passengers
            .drain(..)
            .partition(Passenger::is_delivered);
        self.passengers = active;
        self.completed.extend(delivered);
    }

    /// Render state of every taxi and active passenger
    pub fn snapshot(&self) -> SimSnapshot {
        let taxis = self
            .taxis
            .iter()
            .map(|taxi| TaxiView {
                id: taxi.id,
                node: taxi.node,
                position: taxi.position(&self.layout),
                in_motion: taxi.in_motion(),
                state: taxi.state,
                occupied: taxi.occupied,
                passenger: taxi.passenger,
            })
            .collect();

        let passengers = self
            .passengers
            .iter()
            .map(|passenger| PassengerView {
                id: passenger.id,
                pickup: passenger.pickup,
                dropoff: passenger.dropoff,
                position: self.layout.position(passenger.pickup).unwrap_or_default(),
                waiting: passenger.is_waiting(),
            })
            .collect();

        SimSnapshot {
            tick: self.tick,
            taxis,
            passengers,
        }
    }

    /// Node name for log output, falling back to the ID
    pub fn node_name(&self, node: NodeId) -> String {
        self.graph
            .name(node)
            .map(str::to_string)
            .unwrap_or_else(|| node.to_string())
    }

    pub fn graph(&self) -> &CityGraph {
        &self.graph
    }

    pub fn layout(&self) -> &NodeLayout {
        &self.layout
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn taxis(&self) -> &[Taxi] {
        &self.taxis
    }

    pub fn taxi(&self, id: TaxiId) -> Option<&Taxi> {
        self.taxis.iter().find(|taxi| taxi.id == id)
    }

    /// Waiting and in-flight passengers
    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    /// Active or delivered passenger by ID
    pub fn passenger(&self, id: PassengerId) -> Option<&Passenger> {
        self.passengers
            .iter()
            .chain(self.completed.iter())
            .find(|passenger| passenger.id == id)
    }

    pub fn completed(&self) -> &[Passenger] {
        &self.completed
    }

    pub fn waiting_count(&self) -> usize {
        self.passengers.iter().filter(|p| p.is_waiting()).count()
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Log a summary of the world state
    pub fn log_summary(&self) {
        info!("=== Taxi Simulation Summary ===");
        info!("Tick: {}", self.tick);
        info!(
            "Nodes: {}, Roads: {}",
            self.graph.node_count(),
            self.graph.edge_count()
        );
        info!("Taxis: {}", self.taxis.len());
        for taxi in &self.taxis {
            let position = taxi.position(&self.layout);
            info!(
                "  {}: {:?} at {} ({:.1}, {:.1}), occupied={}, odometer={:.1}",
                taxi.id,
                taxi.state,
                self.node_name(taxi.node),
                position.x,
                position.y,
                taxi.occupied,
                taxi.odometer
            );
        }
        info!("Waiting passengers: {}", self.waiting_count());
        info!("Rides requested: {}", self.stats.rides_requested);
        info!("Rides completed: {}", self.stats.rides_completed);
        if let Some(wait) = self.stats.average_wait_ticks() {
            info!("Average wait: {:.1} ticks", wait);
        }
        info!("Completion rate: {:.1}%", self.stats.completion_rate());
    }

    /// Draw a map of the city in the terminal
    pub fn render_map(&self, width: usize) -> String {
        let Some((min, max)) = self.layout.bounds() else {
            return String::new();
        };

        let width = width.max(8);
        let span_x = (max.x - min.x).max(1.0);
        let span_y = (max.y - min.y).max(1.0);
        // Terminal cells are roughly twice as tall as wide
        let max_height = width * 2;
        let scale = ((width - 1) as f32 / span_x).min(2.0 * (max_height - 1) as f32 / span_y);
        let height = (((span_y * scale) / 2.0) as usize + 1).min(max_height);

        let to_grid = |x: f32, y: f32| -> (usize, usize) {
            let col = ((x - min.x) * scale) as usize;
            let row = ((y - min.y) * scale / 2.0) as usize;
            (row.min(height - 1), col.min(width - 1))
        };

        let mut grid = vec![vec![' '; width]; height];

        // Roads
        for node in self.graph.nodes() {
            let Some(start) = self.layout.position(node) else {
                continue;
            };
            for (other, _) in self.graph.neighbors(node) {
                let Some(end) = self.layout.position(other) else {
                    continue;
                };
                let steps = (start.distance(&end) * scale) as usize + 1;
                for step in 0..=steps {
                    let point = start.lerp(&end, step as f32 / steps as f32);
                    let (row, col) = to_grid(point.x, point.y);
                    if grid[row][col] == ' ' {
                        grid[row][col] = '.';
                    }
                }
            }
        }

        for node in self.graph.nodes() {
            if let Some(position) = self.layout.position(node) {
                let (row, col) = to_grid(position.x, position.y);
                grid[row][col] = '+';
            }
        }

        for passenger in self.passengers.iter().filter(|p| p.is_waiting()) {
            if let Some(position) = self.layout.position(passenger.pickup) {
                let (row, col) = to_grid(position.x, position.y);
                grid[row][col] = 'P';
            }
        }

        for taxi in &self.taxis {
            let position = taxi.position(&self.layout);
            let (row, col) = to_grid(position.x, position.y);
            grid[row][col] = if taxi.occupied { 'T' } else { 't' };
        }

        let mut out = String::from("Legend: +=Node, .=Road, P=Waiting passenger, t=Free taxi, T=Busy taxi\n");
        for row in &grid {
            out.extend(row.iter());
            out.push('\n');
        }
        out
    }
}
