/*!
# Post-Sorting-Barrier (PSB) Dijkstra Solver (C4)

Implements the bounded multi-source shortest path (BMSSP) recursion of Duan
et al., with an embedded `FindPivots` pivot-selection subroutine. This
reduces the working frontier from the classical solver's `Θ(n)` to roughly
`|U| / log^Ω(1)(n)` per call, at the cost of a more elaborate recursive
structure than the single binary heap C3 needs.

The recursion depth is bounded by `max_level = ceil(log2(n) / t)`, which per
the design notes this crate inherited from its specification stays under ~20
even for `n` in the millions, so this module uses native recursion rather
than an explicit stack.

**Open question, resolved:** the classical solver enforces `max_hops` as a
hard constraint during relaxation; BMSSP's structure does not admit a
per-vertex hop counter without breaking the pivot-size argument that the
frontier-reduction bound relies on. This implementation takes option (a)
from the specification: it does not enforce a hop cap and documents the
discrepancy rather than post-filtering, matching the behavior of the system
this was modeled on. Callers that need a hard hop guarantee should use
[`crate::core::classic::classic_dijkstra`] instead.

A vertex is only ever marked into `completed` alongside a relaxation of its
own outgoing edges, whether that happens in the base case (for members of
`S`) or in the recursive case (for the wider `W` set `FindPivots` returns).
Skipping the latter leaves any vertex discovered on `FindPivots`'s last
Bellman-Ford layer (and everything beyond it) permanently unrelaxed, since
no later step ever revisits a non-pivot `W` member.
*/

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

use crate::core::error::{Result, RouteError};
use crate::core::graph::{RouteGraph, TokenKey};
use crate::core::route::{build_result, RouteResult};

/// Numeric tolerance used when matching `dist[v]` against
/// `dist[prev[v]] + weight(edge)` while building the pivot-selection forest.
const FOREST_TOLERANCE: f64 = 1e-10;

/// Metrics reported alongside a PSB Dijkstra route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PSBMetrics {
    pub execution_time_ms: f64,
    pub gas_estimate: f64,
    pub visited_nodes: usize,
    pub path_length: usize,
    pub barrier_count: u64,
    pub pivots_found: u64,
    pub frontier_reductions: u64,
    pub level_count: u32,
}

/// Computes the best path from `source` to `target` using the PSB/BMSSP
/// recursion. `max_hops` is accepted for API parity with
/// [`crate::core::classic::classic_dijkstra`] but is not enforced; see the
/// module documentation.
#[instrument(skip(graph), fields(%source, %target))]
pub fn psb_dijkstra(
    graph: &RouteGraph,
    source: &TokenKey,
    target: &TokenKey,
    _max_hops: Option<u32>,
) -> Result<(RouteResult, PSBMetrics)> {
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
        let metrics = PSBMetrics {
            execution_time_ms: elapsed_ms(start),
            gas_estimate: 0.0,
            visited_nodes: 0,
            path_length: 0,
            barrier_count: 0,
            pivots_found: 0,
            frontier_reductions: 0,
            level_count: 0,
        };
        return Ok((RouteResult::trivial(source.clone()), metrics));
    }

    let n = vertex_count(graph);
    let k = bmssp_k(n);
    let t = bmssp_t(n);
    let max_level = bmssp_max_level(n, t);

    let mut state = PsbState {
        graph,
        target,
        k,
        t,
        dist: HashMap::new(),
        prev: HashMap::new(),
        completed: HashSet::new(),
        barrier_count: 0,
        pivots_found: 0,
        frontier_reductions: 0,
        level_count: 0,
    };

    state.dist.insert(source.clone(), 0.0);
    let mut s0 = HashSet::new();
    s0.insert(source.clone());
    state.bmssp(max_level, f64::INFINITY, s0);

    let Some(&total_weight) = state.dist.get(target) else {
        return Err(RouteError::no_route(source.clone(), target.clone()));
    };

    let path = reverse_walk(source, target, &state.prev);
    let result = build_result(graph, path, total_weight);
    let gas_estimate: f64 = result.steps.iter().map(|s| s.details.gas).sum();

    let metrics = PSBMetrics {
        execution_time_ms: elapsed_ms(start),
        gas_estimate,
        visited_nodes: state.completed.len(),
        path_length: result.steps.len(),
        barrier_count: state.barrier_count,
        pivots_found: state.pivots_found,
        frontier_reductions: state.frontier_reductions,
        level_count: state.level_count,
    };

    Ok((result, metrics))
}

fn vertex_count(graph: &RouteGraph) -> usize {
    let mut vertices: HashSet<&TokenKey> = HashSet::new();
    for key in graph.keys() {
        vertices.insert(key);
        for edge in graph.outgoing_edges(key) {
            vertices.insert(&edge.target);
        }
    }
    vertices.len().max(1)
}

/// `k = max(2, floor(log2(n)^(1/3)))`, the Bellman-Ford relaxation depth
/// used by `FindPivots`.
fn bmssp_k(n: usize) -> u32 {
    let log2n = (n.max(2) as f64).log2();
    let k = log2n.powf(1.0 / 3.0).floor() as i64;
    k.max(2) as u32
}

/// `t = max(2, floor(log2(n)^(2/3)))`, the recursion branching exponent.
fn bmssp_t(n: usize) -> u32 {
    let log2n = (n.max(2) as f64).log2();
    let t = log2n.powf(2.0 / 3.0).floor() as i64;
    t.max(2) as u32
}

/// `max_level = ceil(log2(n) / t)`.
fn bmssp_max_level(n: usize, t: u32) -> u32 {
    let log2n = (n.max(2) as f64).log2();
    (log2n / t as f64).ceil().max(1.0) as u32
}

/// Saturating `2^exp`, so an unrealistically deep recursion never panics on
/// integer overflow; it simply stops acting as a meaningful bound.
fn pow2_sat(exp: u32) -> u64 {
    if exp >= 63 {
        u64::MAX
    } else {
        1u64 << exp
    }
}

struct PsbState<'g> {
    graph: &'g RouteGraph,
    target: &'g TokenKey,
    k: u32,
    t: u32,
    dist: HashMap<TokenKey, f64>,
    prev: HashMap<TokenKey, TokenKey>,
    completed: HashSet<TokenKey>,
    barrier_count: u64,
    pivots_found: u64,
    frontier_reductions: u64,
    level_count: u32,
}

impl<'g> PsbState<'g> {
    /// `FindPivots(B, S) -> (P, W)`, per spec §4.4.1.
    fn find_pivots(&mut self, bound: f64, s: &HashSet<TokenKey>) -> (HashSet<TokenKey>, HashSet<TokenKey>) {
        let mut w: HashSet<TokenKey> = s.clone();
        let mut frontier: HashSet<TokenKey> = s.clone();

        for _ in 0..self.k {
            let mut next_frontier: HashSet<TokenKey> = HashSet::new();
            for u in &frontier {
                let du = match self.dist.get(u) {
                    Some(&d) => d,
                    None => continue,
                };
                for edge in self.graph.outgoing_edges(u) {
                    let v = edge.target.clone();
                    let candidate = du + edge.weight();
                    let improves = match self.dist.get(&v) {
                        Some(&current) => candidate <= current,
                        None => true,
                    };
                    if improves && candidate < bound {
                        self.dist.insert(v.clone(), candidate);
                        self.prev.insert(v.clone(), u.clone());
                        next_frontier.insert(v.clone());
                        w.insert(v);
                    }
                }
            }
            // Checked once per completed layer rather than after every
            // single edge relaxation; still bails out the first layer that
            // overshoots, so the bound is reached at most one layer late.
            if w.len() > (self.k as usize) * s.len().max(1) {
                return (s.clone(), w);
            }
            if next_frontier.is_empty() {
                break;
            }
            frontier = next_frontier;
        }

        let children = self.build_forest(&w);
        let mut memo: HashMap<TokenKey, usize> = HashMap::new();
        let mut pivots = HashSet::new();
        for u in s {
            let size = subtree_size(u, &children, &mut memo);
            if size as u32 >= self.k {
                pivots.insert(u.clone());
            }
        }
        self.pivots_found += pivots.len() as u64;
        (pivots, w)
    }

    /// Builds the predecessor forest restricted to `w`: an edge
    /// `(prev[v], v)` is included iff `prev[v] in w` and
    /// `dist[v] ≈ dist[prev[v]] + weight(edge)` within [`FOREST_TOLERANCE`].
    fn build_forest(&self, w: &HashSet<TokenKey>) -> HashMap<TokenKey, Vec<TokenKey>> {
        let mut children: HashMap<TokenKey, Vec<TokenKey>> = HashMap::new();
        for v in w {
            let Some(p) = self.prev.get(v) else {
                continue;
            };
            if !w.contains(p) {
                continue;
            }
            let (Some(&dv), Some(&dp)) = (self.dist.get(v), self.dist.get(p)) else {
                continue;
            };
            let consistent = self
                .graph
                .outgoing_edges(p)
                .iter()
                .any(|e| &e.target == v && (dv - (dp + e.weight())).abs() <= FOREST_TOLERANCE);
            if consistent {
                children.entry(p.clone()).or_default().push(v.clone());
            }
        }
        children
    }

    /// `BMSSP(level, B, S) -> (B', U)`, per spec §4.4.2.
    fn bmssp(&mut self, level: u32, bound: f64, s: HashSet<TokenKey>) -> (f64, HashSet<TokenKey>) {
        self.level_count = self.level_count.max(level);

        if level == 0 || s.is_empty() {
            let mut completed_here = HashSet::new();
            for v in &s {
                let Some(&dv) = self.dist.get(v) else {
                    continue;
                };
                if dv < bound && !self.completed.contains(v) {
                    self.completed.insert(v.clone());
                    completed_here.insert(v.clone());
                    for edge in self.graph.outgoing_edges(v) {
                        let target = edge.target.clone();
                        let candidate = dv + edge.weight();
                        if candidate < bound {
                            let improves = match self.dist.get(&target) {
                                Some(&current) => candidate < current,
                                None => true,
                            };
                            if improves {
                                self.dist.insert(target.clone(), candidate);
                                self.prev.insert(target, v.clone());
                            }
                        }
                    }
                }
            }
            return (bound, completed_here);
        }

        let (mut pivots, w) = self.find_pivots(bound, &s);
        self.barrier_count += 1;
        self.frontier_reductions += 1;

        // Marking a vertex completed must coincide with relaxing its own
        // outgoing edges, exactly as the base case does for S-members:
        // FindPivots's bounded Bellman-Ford only relaxes a W-member's edges
        // if another round remains, so the last layer discovered can have
        // edges nothing else will ever relax. Without this, a vertex whose
        // true shortest distance is already finalized here could still
        // strand its successors as unreachable.
        let mut u: HashSet<TokenKey> = HashSet::new();
        for v in &w {
            if let Some(&dv) = self.dist.get(v) {
                if dv < bound && !self.completed.contains(v) {
                    self.completed.insert(v.clone());
                    for edge in self.graph.outgoing_edges(v) {
                        let target = edge.target.clone();
                        let candidate = dv + edge.weight();
                        if candidate < bound {
                            let improves = match self.dist.get(&target) {
                                Some(&current) => candidate < current,
                                None => true,
                            };
                            if improves {
                                self.dist.insert(target.clone(), candidate);
                                self.prev.insert(target, v.clone());
                            }
                        }
                    }
                }
            }
            u.insert(v.clone());
        }

        let mut b_i = bound;
        let mut i = 0u64;
        let i_max = pow2_sat(self.t);
        let u_target = (self.k as u64).saturating_mul(pow2_sat(level * self.t));
        let pull_size = pow2_sat((level - 1) * self.t).max(1) as usize;

        while (u.len() as u64) < u_target && !pivots.is_empty() && i < i_max {
            let s_i: HashSet<TokenKey> = pivots.iter().take(pull_size).cloned().collect();
            for v in &s_i {
                pivots.remove(v);
            }

            let (b_prime, u_i) = self.bmssp(level - 1, b_i, s_i);

            for v in &u_i {
                u.insert(v.clone());
                self.completed.insert(v.clone());
            }
            for v in &u_i {
                let Some(&dv) = self.dist.get(v) else {
                    continue;
                };
                for edge in self.graph.outgoing_edges(v) {
                    let target = edge.target.clone();
                    let candidate = dv + edge.weight();
                    let improves = match self.dist.get(&target) {
                        Some(&current) => candidate < current,
                        None => true,
                    };
                    if improves {
                        self.dist.insert(target.clone(), candidate);
                        self.prev.insert(target, v.clone());
                    }
                }
            }

            b_i = b_i.min(b_prime);
            trace!(level, b_i, u_len = u.len(), "bmssp iteration");

            if let Some(&dt) = self.dist.get(self.target) {
                if dt < b_i {
                    break;
                }
            }
            i += 1;
        }

        (b_i, u)
    }
}

fn subtree_size(
    node: &TokenKey,
    children: &HashMap<TokenKey, Vec<TokenKey>>,
    memo: &mut HashMap<TokenKey, usize>,
) -> usize {
    if let Some(&size) = memo.get(node) {
        return size;
    }
    let mut size = 1;
    if let Some(kids) = children.get(node) {
        for child in kids {
            size += subtree_size(child, children, memo);
        }
    }
    memo.insert(node.clone(), size);
    size
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
