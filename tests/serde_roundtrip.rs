//! Round-trips the public output types through `serde_json`, confirming the
//! derived `Serialize`/`Deserialize` impls survive the JSON boundary a real
//! caller (the external request handler) sends results across.

use route_engine::{classic_dijkstra, psb_dijkstra, Edge, EdgeKind, RouteGraphBuilder, TokenKey};

#[test]
fn route_result_round_trips_through_json() {
    let graph = RouteGraphBuilder::new()
        .add_swap("A", "B", 2.0, 0.1)
        .add_swap("B", "C", 3.0, 0.0)
        .build();

    let (route, _) = classic_dijkstra(&graph, &"A".into(), &"C".into(), Some(4)).unwrap();

    let json_str = serde_json::to_string(&route).unwrap();
    let restored = serde_json::from_str(&json_str).unwrap();
    assert_eq!(route, restored);
}

#[test]
fn psb_route_result_round_trips_through_json() {
    let graph = RouteGraphBuilder::new()
        .add_swap("A", "B", 2.0, 0.1)
        .add_swap("B", "C", 3.0, 0.0)
        .build();

    let (route, _) = psb_dijkstra(&graph, &"A".into(), &"C".into(), None).unwrap();

    let json_str = serde_json::to_string(&route).unwrap();
    let restored = serde_json::from_str(&json_str).unwrap();
    assert_eq!(route, restored);
}

#[test]
fn route_step_round_trips_with_bridge_provenance() {
    let graph = RouteGraphBuilder::new()
        .add_edge(
            "A",
            Edge {
                target: TokenKey::from("B"),
                kind: EdgeKind::Bridge,
                rate: Some(1.0),
                gas: 0.02,
                bridge_fee: Some(0.001),
                dex: None,
                pool_address: Some("0xpool".to_string()),
            },
        )
        .build();

    let (route, _) = classic_dijkstra(&graph, &"A".into(), &"B".into(), Some(4)).unwrap();
    let json_str = serde_json::to_string(&route.steps[0]).unwrap();
    let restored = serde_json::from_str(&json_str).unwrap();
    assert_eq!(route.steps[0], restored);
}

#[test]
fn token_key_serializes_as_a_plain_json_string() {
    let key = TokenKey::from("USDC.arbitrum");
    let json_str = serde_json::to_string(&key).unwrap();
    assert_eq!(json_str, "\"USDC.arbitrum\"");

    let restored: TokenKey = serde_json::from_str(&json_str).unwrap();
    assert_eq!(key, restored);
}
