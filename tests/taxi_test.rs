//! Taxi state machine tests

use taxi_sim::simulation::{
    CityGraph, NodeId, NodeLayout, PassengerId, Position, SimError, SimId, Taxi, TaxiId,
    TaxiState, TaxiUpdateResult,
};

/// Builds a city from (name, x, y) nodes and (from, to, weight) roads
fn city(nodes: &[(&str, f32, f32)], roads: &[(&str, &str, f32)]) -> (CityGraph, NodeLayout) {
    let mut graph = CityGraph::new();
    let mut layout = NodeLayout::new();
    for (name, x, y) in nodes {
        let id = graph.add_node(name);
        layout.set_position(id, Position::new(*x, *y));
    }
    for (from, to, weight) in roads {
        graph.add_edge(from, to, *weight).unwrap();
    }
    (graph, layout)
}

fn line_city() -> (CityGraph, NodeLayout) {
    city(
        &[("A", 0.0, 0.0), ("B", 10.0, 0.0), ("C", 20.0, 0.0)],
        &[("A", "B", 10.0), ("B", "C", 10.0)],
    )
}

fn node(graph: &CityGraph, name: &str) -> NodeId {
    graph.node(name).unwrap()
}

fn taxi_at(start: NodeId, speed: f32, settle_ticks: u32) -> Taxi {
    Taxi::new(TaxiId(SimId(0)), start, start, speed, settle_ticks)
}

/// Ticks until the taxi reports anything other than plain movement
fn ticks_until_arrival(taxi: &mut Taxi, graph: &CityGraph, layout: &NodeLayout) -> (u32, TaxiUpdateResult) {
    for tick in 1..=1000 {
        let result = taxi.advance_one_tick(graph, layout);
        if result != TaxiUpdateResult::Continue {
            return (tick, result);
        }
    }
    panic!("taxi never arrived");
}

#[test]
fn test_new_taxi_is_idle() {
    let (graph, layout) = line_city();
    let mut taxi = taxi_at(node(&graph, "A"), 5.0, 0);

    assert_eq!(taxi.state, TaxiState::Idle);
    assert!(taxi.is_available());
    assert!(!taxi.in_motion());
    assert_eq!(taxi.advance_one_tick(&graph, &layout), TaxiUpdateResult::Idle);
    assert_eq!(taxi.position(&layout), Position::new(0.0, 0.0));
}

#[test]
fn test_single_segment_takes_ceil_length_over_speed_ticks() {
    let (graph, layout) = line_city();

    for (speed, expected_ticks) in [(5.0, 2), (3.0, 4), (10.0, 1), (20.0, 1), (0.5, 20)] {
        let mut taxi = taxi_at(node(&graph, "A"), speed, 0);
        taxi.assign(node(&graph, "B"), false, &graph).unwrap();

        let (ticks, result) = ticks_until_arrival(&mut taxi, &graph, &layout);
        assert_eq!(ticks, expected_ticks, "speed {}", speed);
        assert_eq!(result, TaxiUpdateResult::ReturnedHome);
        assert_eq!(taxi.node, node(&graph, "B"));
    }
}

#[test]
fn test_overshoot_is_not_carried_over() {
    // Segments of 10 and 4 at speed 3: ceil(10/3) + ceil(4/3) ticks
    let (graph, layout) = city(
        &[("A", 0.0, 0.0), ("B", 10.0, 0.0), ("C", 10.0, 4.0)],
        &[("A", "B", 1.0), ("B", "C", 1.0)],
    );
    let mut taxi = taxi_at(node(&graph, "A"), 3.0, 0);
    taxi.assign(node(&graph, "C"), false, &graph).unwrap();

    let (ticks, _) = ticks_until_arrival(&mut taxi, &graph, &layout);
    assert_eq!(ticks, 4 + 2);
    assert_eq!(taxi.node, node(&graph, "C"));
}

#[test]
fn test_progress_is_monotonic_and_interpolated() {
    let (graph, layout) = line_city();
    let a = node(&graph, "A");
    let b = node(&graph, "B");
    let mut taxi = taxi_at(a, 3.0, 0);
    taxi.assign(b, false, &graph).unwrap();

    let mut last_progress = 0.0;
    for _ in 0..3 {
        assert_eq!(taxi.advance_one_tick(&graph, &layout), TaxiUpdateResult::Continue);
        assert!(taxi.progress > last_progress);
        assert!(taxi.progress <= 10.0);
        assert_eq!(taxi.node, a);

        let position = taxi.position(&layout);
        assert!((position.x - taxi.progress).abs() < 1e-5);
        assert_eq!(position.y, 0.0);
        last_progress = taxi.progress;
    }

    taxi.advance_one_tick(&graph, &layout);
    assert_eq!(taxi.node, b);
    assert_eq!(taxi.progress, 0.0);
    assert!(!taxi.moving);
    assert!(taxi.route.is_empty());
    assert_eq!(taxi.destination, None);
    assert_eq!(taxi.position(&layout), Position::new(10.0, 0.0));
}

#[test]
fn test_ride_cycle_pickup_dropoff_return() {
    let (graph, layout) = line_city();
    let a = node(&graph, "A");
    let b = node(&graph, "B");
    let c = node(&graph, "C");
    let passenger = PassengerId(SimId(7));
    let mut taxi = taxi_at(a, 5.0, 0);

    taxi.dispatch(passenger, b, c, &graph).unwrap();
    assert_eq!(taxi.state, TaxiState::EnRouteToPickup);
    assert!(taxi.occupied);
    assert!(!taxi.is_available());

    assert_eq!(taxi.advance_one_tick(&graph, &layout), TaxiUpdateResult::Continue);
    assert_eq!(
        taxi.advance_one_tick(&graph, &layout),
        TaxiUpdateResult::PickedUp(passenger)
    );
    assert_eq!(taxi.node, b);
    assert_eq!(taxi.state, TaxiState::EnRouteToDropoff);
    assert_eq!(taxi.destination, Some(c));
    assert_eq!(taxi.passenger, Some(passenger));
    assert!(taxi.has_passenger_aboard());
    assert!(taxi.occupied);

    assert_eq!(taxi.advance_one_tick(&graph, &layout), TaxiUpdateResult::Continue);
    assert!(taxi.occupied);
    assert_eq!(
        taxi.advance_one_tick(&graph, &layout),
        TaxiUpdateResult::DroppedOff(passenger)
    );
    assert_eq!(taxi.node, c);
    assert!(!taxi.occupied);
    assert_eq!(taxi.passenger, None);
    assert_eq!(taxi.state, TaxiState::Returning);
    assert_eq!(taxi.destination, Some(a));
    assert!(taxi.is_available());

    let (ticks, result) = ticks_until_arrival(&mut taxi, &graph, &layout);
    assert_eq!(ticks, 4);
    assert_eq!(result, TaxiUpdateResult::ReturnedHome);
    assert_eq!(taxi.state, TaxiState::Idle);
    assert_eq!(taxi.node, a);
    assert_eq!(taxi.odometer, 40.0);
}

#[test]
fn test_settling_holds_taxi_in_place() {
    let (graph, layout) = line_city();
    let a = node(&graph, "A");
    let b = node(&graph, "B");
    let c = node(&graph, "C");
    let passenger = PassengerId(SimId(1));
    let mut taxi = taxi_at(a, 5.0, 2);

    taxi.dispatch(passenger, b, c, &graph).unwrap();
    taxi.advance_one_tick(&graph, &layout);
    assert_eq!(
        taxi.advance_one_tick(&graph, &layout),
        TaxiUpdateResult::PickedUp(passenger)
    );

    for _ in 0..2 {
        assert!(taxi.is_settling());
        assert!(!taxi.in_motion());
        assert_eq!(taxi.advance_one_tick(&graph, &layout), TaxiUpdateResult::Settling);
        assert_eq!(taxi.position(&layout), Position::new(10.0, 0.0));
    }

    assert_eq!(taxi.advance_one_tick(&graph, &layout), TaxiUpdateResult::Continue);
    assert!(taxi.in_motion());
    assert_eq!(taxi.position(&layout), Position::new(15.0, 0.0));
}

#[test]
fn test_pickup_at_current_node_is_immediate() {
    let (graph, layout) = line_city();
    let a = node(&graph, "A");
    let b = node(&graph, "B");
    let passenger = PassengerId(SimId(3));
    let mut taxi = taxi_at(a, 5.0, 0);

    taxi.dispatch(passenger, a, b, &graph).unwrap();
    assert_eq!(taxi.route, vec![a]);
    assert_eq!(
        taxi.advance_one_tick(&graph, &layout),
        TaxiUpdateResult::PickedUp(passenger)
    );
    assert_eq!(taxi.destination, Some(b));
    assert_eq!(taxi.route, vec![a, b]);
}

#[test]
fn test_unreachable_assignment_keeps_taxi_idle() {
    let (graph, _layout) = city(
        &[("A", 0.0, 0.0), ("B", 10.0, 0.0), ("Z", 50.0, 50.0)],
        &[("A", "B", 10.0)],
    );
    let a = node(&graph, "A");
    let z = node(&graph, "Z");
    let mut taxi = taxi_at(a, 5.0, 0);

    let err = taxi.assign(z, true, &graph).unwrap_err();
    assert_eq!(err, SimError::Unreachable { from: a, to: z });
    assert_eq!(taxi.state, TaxiState::Idle);
    assert_eq!(taxi.destination, None);
    assert!(!taxi.occupied);
    assert!(!taxi.moving);

    let err = taxi
        .dispatch(PassengerId(SimId(9)), z, a, &graph)
        .unwrap_err();
    assert!(matches!(err, SimError::Unreachable { .. }));
    assert_eq!(taxi.passenger, None);
    assert!(taxi.is_available());
}

#[test]
fn test_reserved_taxi_refuses_second_dispatch() {
    let (graph, _layout) = line_city();
    let mut taxi = taxi_at(node(&graph, "A"), 5.0, 0);

    taxi.dispatch(PassengerId(SimId(1)), node(&graph, "B"), node(&graph, "C"), &graph)
        .unwrap();
    let err = taxi
        .dispatch(PassengerId(SimId(2)), node(&graph, "C"), node(&graph, "A"), &graph)
        .unwrap_err();

    assert_eq!(err, SimError::TaxiBusy(taxi.id));
    assert_eq!(taxi.passenger, Some(PassengerId(SimId(1))));
}
