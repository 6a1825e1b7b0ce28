/*!
# Test/Bench Graph Generator

A small random-graph generator used only by this crate's own tests and
benchmarks, grounded on the random-graph generators this codebase otherwise
ships (e.g. an Erdos-Renyi generator over a seeded `StdRng`). Graph
generation is an explicit non-goal of the production API (the caller is
expected to supply a fully-materialized graph built from live rates), so
this generator is never part of the public surface.
*/

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::graph::{Edge, RouteGraph, TokenKey};

/// Builds a random directed token graph with `n` vertices named `"v<i>.chain"`
/// and, independently for each ordered pair, an edge with probability `p`.
/// Rates are drawn uniformly from `(0.1, 5.0)` and gas from `[0.0, 0.05)`, so
/// almost every edge is usable but the occasional near-zero rate still
/// exercises the weight clamp.
pub fn random_route_graph(n: usize, p: f64, seed: u64) -> RouteGraph {
    assert!(n > 0, "graph must have at least one vertex");
    assert!((0.0..=1.0).contains(&p), "edge probability must be in [0, 1]");

    let mut graph = RouteGraph::new();
    let vertices: Vec<TokenKey> = (0..n).map(|i| TokenKey::from(format!("v{i}.chain"))).collect();
    for v in &vertices {
        graph.ensure_vertex(v.clone());
    }

    let mut rng = StdRng::seed_from_u64(seed);
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            if rng.random_bool(p) {
                let rate = rng.random_range(0.1..5.0);
                let gas = rng.random_range(0.0..0.05);
                graph.add_edge(vertices[i].clone(), Edge::swap(vertices[j].clone(), rate, gas));
            }
        }
    }
    graph
}
