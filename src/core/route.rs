/*!
# Route Result Types

`RouteStep` and `RouteResult` are the shared output contract both solvers
(C3, C4) produce. `reconstruct_steps` implements the "common output
contract" of §4.5: one hop's edge is selected deterministically as the first
adjacency entry matching the chosen `(from, to)` pair, even when parallel
edges exist.
*/

use serde::{Deserialize, Serialize};

use crate::core::graph::{Edge, EdgeKind, RouteGraph, TokenKey};

/// One hop of a [`RouteResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub from: TokenKey,
    pub to: TokenKey,
    pub weight: f64,
    pub kind: EdgeKind,
    /// Provenance carried through from the selected edge, for display
    /// purposes only; never consulted by a solver.
    pub details: StepDetails,
}

/// Provenance fields carried through to the output but not used by either
/// solver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepDetails {
    pub rate: Option<f64>,
    pub gas: f64,
    pub bridge_fee: Option<f64>,
    pub dex: Option<String>,
    pub pool_address: Option<String>,
}

impl From<&Edge> for StepDetails {
    fn from(edge: &Edge) -> Self {
        StepDetails {
            rate: edge.rate,
            gas: edge.gas,
            bridge_fee: edge.bridge_fee,
            dex: edge.dex.clone(),
            pool_address: edge.pool_address.clone(),
        }
    }
}

/// The decomposed best path between a source and a target.
///
/// # Invariants
/// 1. `path[0] == source`, `path.last() == target`.
/// 2. `steps.len() == path.len() - 1`.
/// 3. `sum(steps[i].weight) == total_weight` within `1e-9` relative
///    tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub path: Vec<TokenKey>,
    pub total_weight: f64,
    pub estimated_output: f64,
    pub steps: Vec<RouteStep>,
}

impl RouteResult {
    /// The trivial route returned when `source == target`: a single-vertex
    /// path with zero weight, unit output, and no steps.
    pub fn trivial(vertex: TokenKey) -> Self {
        RouteResult {
            path: vec![vertex],
            total_weight: 0.0,
            estimated_output: 1.0,
            steps: Vec::new(),
        }
    }
}

/// Walks `path` pairwise and, for each `(path[i], path[i+1])`, selects the
/// first edge in `graph.outgoing_edges(path[i])` whose target matches
/// `path[i+1]`. Deterministic given the graph's adjacency ordering.
///
/// # Panics
/// Panics if some consecutive pair has no matching edge in the graph; this
/// would indicate a solver bug (a path was reconstructed with a hop the
/// graph does not actually offer), not a reachable user-facing condition.
pub fn reconstruct_steps(graph: &RouteGraph, path: &[TokenKey]) -> Vec<RouteStep> {
    let mut steps = Vec::with_capacity(path.len().saturating_sub(1));
    for pair in path.windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        let edge = graph
            .outgoing_edges(from)
            .iter()
            .find(|e| &e.target == to)
            .unwrap_or_else(|| panic!("no edge from {from} to {to} in reconstructed path"));
        steps.push(RouteStep {
            from: from.clone(),
            to: to.clone(),
            weight: edge.weight(),
            kind: edge.kind,
            details: StepDetails::from(edge),
        });
    }
    steps
}

/// Builds the final [`RouteResult`] from a reconstructed path and its total
/// weight, deriving `estimated_output = exp(-total_weight)` per §3.
pub fn build_result(graph: &RouteGraph, path: Vec<TokenKey>, total_weight: f64) -> RouteResult {
    let steps = reconstruct_steps(graph, &path);
    RouteResult {
        path,
        estimated_output: (-total_weight).exp(),
        total_weight,
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::RouteGraphBuilder;

    #[test]
    fn trivial_route_has_no_steps() {
        let r = RouteResult::trivial("A.eth".into());
        assert_eq!(r.path, vec![TokenKey::from("A.eth")]);
        assert_eq!(r.total_weight, 0.0);
        assert_eq!(r.estimated_output, 1.0);
        assert!(r.steps.is_empty());
    }

    #[test]
    fn reconstruct_picks_first_parallel_edge() {
        let graph = RouteGraphBuilder::new()
            .add_swap("A", "B", 2.0, 0.0)
            .add_swap("A", "B", 3.0, 0.0)
            .build();

        let steps = reconstruct_steps(&graph, &["A".into(), "B".into()]);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].details.rate, Some(2.0));
    }

    #[test]
    fn build_result_matches_weight_sum() {
        let graph = RouteGraphBuilder::new()
            .add_swap("A", "B", 2.0, 0.0)
            .add_swap("B", "C", 3.0, 0.0)
            .build();

        let path = vec![TokenKey::from("A"), TokenKey::from("B"), TokenKey::from("C")];
        let total = -(6.0f64.ln());
        let result = build_result(&graph, path, total);

        let sum: f64 = result.steps.iter().map(|s| s.weight).sum();
        assert!((sum - result.total_weight).abs() <= 1e-9 * result.total_weight.abs().max(1.0));
        assert!((result.estimated_output - (-total).exp()).abs() <= 1e-12);
    }
}
