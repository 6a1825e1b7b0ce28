/*!
# Classical Dijkstra Solver (C3)

Single-source shortest path with a hard hop-count cap, implemented over the
[`IndexedHeap`](crate::core::heap::IndexedHeap) from `core::heap`. This is the
baseline solver both for correctness (P6 optimality is checked against it)
and as the fallback referenced in the PSB solver's open question on hop caps.
*/

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

use crate::core::error::{Result, RouteError};
use crate::core::graph::{RouteGraph, TokenKey};
use crate::core::heap::IndexedHeap;
use crate::core::route::{build_result, RouteResult};

/// Default hop cap applied when a caller does not specify one, per the
/// external contract in spec §6.
pub const DEFAULT_MAX_HOPS: u32 = 4;

/// Metrics reported alongside a classical Dijkstra route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassicMetrics {
    pub execution_time_ms: f64,
    pub gas_estimate: f64,
    pub visited_nodes: usize,
    pub path_length: usize,
    pub heap_operations: u64,
}

/// Computes the best (max product-of-rate, i.e. min weight) path from
/// `source` to `target` using classical Dijkstra, under a hop cap.
///
/// `max_hops` defaults to [`DEFAULT_MAX_HOPS`] when `None`.
#[instrument(skip(graph), fields(%source, %target, max_hops))]
pub fn classic_dijkstra(
    graph: &RouteGraph,
    source: &TokenKey,
    target: &TokenKey,
    max_hops: Option<u32>,
) -> Result<(RouteResult, ClassicMetrics)> {
    let max_hops = max_hops.unwrap_or(DEFAULT_MAX_HOPS);

    if !graph.contains_vertex(source) {
        return Err(RouteError::invalid_input(format!(
            "source {source} is not a key in the graph"
        )));
    }
    if !graph.contains_vertex(target) {
        return Err(RouteError::invalid_input(format!(
            "target {target} is not a key in the graph"
        )));
    }

    let start = Instant::now();

    if source == target {
        let metrics = ClassicMetrics {
            execution_time_ms: elapsed_ms(start),
            gas_estimate: 0.0,
            visited_nodes: 0,
            path_length: 0,
            heap_operations: 0,
        };
        return Ok((RouteResult::trivial(source.clone()), metrics));
    }

    let mut dist: HashMap<TokenKey, f64> = HashMap::new();
    let mut hops: HashMap<TokenKey, u32> = HashMap::new();
    let mut prev: HashMap<TokenKey, TokenKey> = HashMap::new();
    let mut visited: HashSet<TokenKey> = HashSet::new();
    let mut heap = IndexedHeap::new();

    dist.insert(source.clone(), 0.0);
    hops.insert(source.clone(), 0);
    heap.insert(source.clone(), 0.0);

    let mut visited_count = 0usize;

    while let Some((u, du)) = heap.extract_min() {
        if visited.contains(&u) {
            continue; // stale heap entry
        }
        if u == *target {
            break;
        }
        let u_hops = hops.get(&u).copied().unwrap_or(u32::MAX);
        visited.insert(u.clone());
        visited_count += 1;

        if u_hops >= max_hops {
            continue;
        }

        for edge in graph.outgoing_edges(&u) {
            let v = &edge.target;
            let w = edge.weight();
            let candidate = du + w;
            let candidate_hops = u_hops + 1;
            let better = match dist.get(v) {
                Some(&current) => candidate < current,
                None => true,
            };
            if better && candidate_hops <= max_hops {
                dist.insert(v.clone(), candidate);
                hops.insert(v.clone(), candidate_hops);
                prev.insert(v.clone(), u.clone());
                heap.decrease_key(v.clone(), candidate);
                trace!(%u, %v, weight = w, candidate, "relaxed edge");
            }
        }
    }

    let Some(&total_weight) = dist.get(target) else {
        return Err(RouteError::no_route(source.clone(), target.clone()));
    };

    let path = reverse_walk(source, target, &prev);
    let result = build_result(graph, path, total_weight);
    let gas_estimate: f64 = result.steps.iter().map(|s| s.details.gas).sum();

    let metrics = ClassicMetrics {
        execution_time_ms: elapsed_ms(start),
        gas_estimate,
        visited_nodes: visited_count,
        path_length: result.steps.len(),
        heap_operations: heap.operations,
    };

    Ok((result, metrics))
}

fn reverse_walk(
    source: &TokenKey,
    target: &TokenKey,
    prev: &HashMap<TokenKey, TokenKey>,
) -> Vec<TokenKey> {
    let mut path = vec![target.clone()];
    let mut cur = target.clone();
    while cur != *source {
        let p = prev
            .get(&cur)
            .unwrap_or_else(|| panic!("no predecessor recorded for {cur} during reconstruction"));
        path.push(p.clone());
        cur = p.clone();
    }
    path.reverse();
    path
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
