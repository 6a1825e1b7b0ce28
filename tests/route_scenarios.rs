//! End-to-end route scenarios, one per example in the specification this
//! crate implements: a linear chain, a gas-driven tie-break, a hop-cap
//! pruning case, an unreachable target, parallel-edge reconstruction, and a
//! degenerate zero-rate edge. Each scenario is checked against both solvers
//! where their contracts agree (they may diverge on hop cap, since PSB does
//! not enforce one).

use route_engine::{classic_dijkstra, psb_dijkstra, RouteGraphBuilder, RouteError};

#[test]
fn linear_three_hop_chain() {
    let graph = RouteGraphBuilder::new()
        .add_swap("A", "B", 2.0, 0.0)
        .add_swap("B", "C", 3.0, 0.0)
        .add_swap("C", "D", 5.0, 0.0)
        .build();

    let (route, _) = classic_dijkstra(&graph, &"A".into(), &"D".into(), Some(4)).unwrap();
    assert_eq!(
        route.path,
        vec!["A".into(), "B".into(), "C".into(), "D".into()]
    );
    assert!((route.total_weight - (-30.0f64.ln())).abs() < 1e-4);
    assert!((route.estimated_output - 30.0).abs() < 1e-3);

    let (psb_route, _) = psb_dijkstra(&graph, &"A".into(), &"D".into(), None).unwrap();
    assert!((psb_route.total_weight - route.total_weight).abs() <= 1e-9);
}

#[test]
fn two_path_tie_break_by_gas() {
    let graph = RouteGraphBuilder::new()
        .add_swap("A", "B", 2.0, 0.1)
        .add_swap("A", "C", 2.0, 0.2)
        .add_swap("B", "D", 1.0, 0.0)
        .add_swap("C", "D", 1.0, 0.0)
        .build();

    let (route, _) = classic_dijkstra(&graph, &"A".into(), &"D".into(), Some(4)).unwrap();
    assert_eq!(route.path, vec!["A".into(), "B".into(), "D".into()]);
    assert!((route.total_weight - (-(2.0f64.ln()) + 0.1)).abs() < 1e-9);
}

#[test]
fn hop_cap_prunes_otherwise_optimal_route() {
    let graph = RouteGraphBuilder::new()
        .add_swap("A", "B", 10.0, 0.0)
        .add_swap("B", "C", 10.0, 0.0)
        .add_swap("C", "D", 10.0, 0.0)
        .add_swap("D", "E", 10.0, 0.0)
        .add_swap("A", "E", 100.0, 0.0)
        .build();

    let (capped, _) = classic_dijkstra(&graph, &"A".into(), &"E".into(), Some(2)).unwrap();
    assert_eq!(capped.path, vec!["A".into(), "E".into()]);
    assert!((capped.total_weight - (-100.0f64.ln())).abs() < 1e-9);

    let (uncapped, _) = classic_dijkstra(&graph, &"A".into(), &"E".into(), Some(4)).unwrap();
    assert_eq!(
        uncapped.path,
        vec!["A".into(), "B".into(), "C".into(), "D".into(), "E".into()]
    );
    assert!((uncapped.total_weight - (-10000.0f64.ln())).abs() < 1e-9);
}

#[test]
fn unreachable_target_across_disjoint_components() {
    let graph = RouteGraphBuilder::new()
        .add_swap("A", "B", 2.0, 0.0)
        .add_swap("X", "Y", 2.0, 0.0)
        .build();

    let classical_err = classic_dijkstra(&graph, &"A".into(), &"Y".into(), Some(4)).unwrap_err();
    assert_eq!(classical_err, RouteError::no_route("A", "Y"));

    let psb_err = psb_dijkstra(&graph, &"A".into(), &"Y".into(), None).unwrap_err();
    assert_eq!(psb_err, RouteError::no_route("A", "Y"));
}

#[test]
fn parallel_edges_select_first_adjacency_match() {
    let graph = RouteGraphBuilder::new()
        .add_swap("A", "B", 2.0, 0.0)
        .add_swap("A", "B", 3.0, 0.0)
        .build();

    let (route, _) = classic_dijkstra(&graph, &"A".into(), &"B".into(), Some(4)).unwrap();
    assert_eq!(route.steps.len(), 1);
    assert_eq!(route.steps[0].details.rate, Some(2.0));
}

#[test]
fn degenerate_zero_rate_is_dominated_by_clamp() {
    let graph = RouteGraphBuilder::new()
        .add_swap("A", "B", 0.0, 0.0)
        .add_swap("A", "C", 1.5, 0.0)
        .add_swap("B", "D", 1000.0, 0.0)
        .add_swap("C", "D", 1.0, 0.0)
        .build();

    let (route, _) = classic_dijkstra(&graph, &"A".into(), &"D".into(), Some(4)).unwrap();
    assert_eq!(route.path, vec!["A".into(), "C".into(), "D".into()]);

    let (psb_route, _) = psb_dijkstra(&graph, &"A".into(), &"D".into(), None).unwrap();
    assert_eq!(psb_route.path, vec!["A".into(), "C".into(), "D".into()]);
}

#[test]
fn trivial_route_when_source_equals_target() {
    let graph = RouteGraphBuilder::new().add_swap("A", "B", 2.0, 0.0).build();

    for solve in [
        classic_dijkstra(&graph, &"A".into(), &"A".into(), Some(4)),
        psb_dijkstra(&graph, &"A".into(), &"A".into(), None),
    ] {
        let (route, _) = solve.unwrap();
        assert_eq!(route.path, vec!["A".into()]);
        assert_eq!(route.total_weight, 0.0);
        assert_eq!(route.estimated_output, 1.0);
        assert!(route.steps.is_empty());
    }
}

#[test]
fn empty_adjacency_at_source_not_target_fails() {
    use route_engine::RouteGraph;

    let mut graph = RouteGraph::new();
    graph.ensure_vertex("A");
    graph.ensure_vertex("B");

    let err = classic_dijkstra(&graph, &"A".into(), &"B".into(), Some(4)).unwrap_err();
    assert_eq!(err, RouteError::no_route("A", "B"));
}

#[test]
fn invalid_input_when_endpoint_missing_from_graph() {
    let graph = RouteGraphBuilder::new().add_swap("A", "B", 2.0, 0.0).build();

    let err = classic_dijkstra(&graph, &"A".into(), &"Z".into(), Some(4)).unwrap_err();
    assert!(matches!(err, RouteError::InvalidInput(_)));

    let err = psb_dijkstra(&graph, &"Z".into(), &"B".into(), None).unwrap_err();
    assert!(matches!(err, RouteError::InvalidInput(_)));
}

#[test]
fn single_vertex_graph_source_equals_target() {
    let mut graph = route_engine::RouteGraph::new();
    graph.ensure_vertex("A");

    let (route, _) = classic_dijkstra(&graph, &"A".into(), &"A".into(), Some(4)).unwrap();
    assert_eq!(route.path, vec!["A".into()]);
    assert_eq!(route.total_weight, 0.0);
}

#[test]
fn all_nonpositive_rates_saturate_to_unreachable() {
    let graph = RouteGraphBuilder::new()
        .add_swap("A", "B", 0.0, 0.0)
        .add_swap("B", "C", -1.0, 0.0)
        .build();

    // Both edges clamp to MAX_FINITE/2; C is technically "reachable" in the
    // graph-theoretic sense but at an astronomically large weight, which is
    // the documented, acceptable outcome rather than an error.
    let (route, _) = classic_dijkstra(&graph, &"A".into(), &"C".into(), Some(4)).unwrap();
    assert_eq!(route.path, vec!["A".into(), "B".into(), "C".into()]);
    assert!(route.total_weight > 1.0e17);
}
