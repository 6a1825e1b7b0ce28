/*!
# Token Graph

This module defines the data types for the route engine's graph model: an
opaque vertex identifier (`TokenKey`), a directed arc between two vertices
(`Edge`), and the adjacency map that holds them (`RouteGraph`).

The graph is deliberately a plain `HashMap<TokenKey, Vec<Edge>>` rather than a
general-purpose graph structure: vertex identity here is a `(symbol, chain)`
pair with no need for index-stable mutation, and every solver in this crate
only ever needs an `outgoing_edges` lookup.
*/

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Clamp applied to edges whose rate is absent or non-positive, so a single
/// bad quote degrades a path's score without corrupting arithmetic with an
/// infinite or NaN weight.
pub const MAX_FINITE: f64 = 1.0e18;

/// An opaque vertex identifier, canonically `"<symbol>.<chain>"`. Equality is
/// string equality; implementations are free to intern it internally, but
/// the external contract stays string-valued.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenKey(pub String);

impl TokenKey {
    /// Builds a key from a symbol and a chain, e.g. `TokenKey::new("USDC", "arbitrum")`.
    pub fn new(symbol: impl AsRef<str>, chain: impl AsRef<str>) -> Self {
        TokenKey(format!("{}.{}", symbol.as_ref(), chain.as_ref()))
    }
}

impl fmt::Display for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TokenKey {
    fn from(s: &str) -> Self {
        TokenKey(s.to_string())
    }
}

impl From<String> for TokenKey {
    fn from(s: String) -> Self {
        TokenKey(s)
    }
}

impl From<&TokenKey> for TokenKey {
    fn from(k: &TokenKey) -> Self {
        k.clone()
    }
}

/// Informational classification of an edge; affects cost modeling in callers
/// but not in the solver itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    Swap,
    Bridge,
}

/// A directed arc from an implicit source (the adjacency-map key it lives
/// under) to `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub target: TokenKey,
    pub kind: EdgeKind,
    /// Positive multiplicative exchange rate. `None` or `<= 0` is treated as
    /// an effectively infinite weight, never as `-infinity`.
    pub rate: Option<f64>,
    /// Nonnegative additive penalty in the same units as `-ln(rate)`.
    pub gas: f64,
    pub bridge_fee: Option<f64>,
    pub dex: Option<String>,
    pub pool_address: Option<String>,
}

impl Edge {
    /// Builds a swap edge with no provenance fields set.
    pub fn swap(target: impl Into<TokenKey>, rate: f64, gas: f64) -> Self {
        Edge {
            target: target.into(),
            kind: EdgeKind::Swap,
            rate: Some(rate),
            gas,
            bridge_fee: None,
            dex: None,
            pool_address: None,
        }
    }

    /// Builds a bridge edge with no provenance fields set.
    pub fn bridge(target: impl Into<TokenKey>, rate: f64, gas: f64) -> Self {
        Edge {
            target: target.into(),
            kind: EdgeKind::Bridge,
            rate: Some(rate),
            gas,
            bridge_fee: None,
            dex: None,
            pool_address: None,
        }
    }

    /// The scalar minimized by both solvers: `-ln(rate) + gas` for a usable
    /// rate, or `MAX_FINITE / 2` when the rate is absent or non-positive.
    pub fn weight(&self) -> f64 {
        match self.rate {
            Some(rate) if rate > 0.0 => -rate.ln() + self.gas,
            _ => MAX_FINITE / 2.0,
        }
    }
}

/// A mapping from `TokenKey` to its ordered outgoing edges.
///
/// Adjacency lists may contain parallel edges; path reconstruction always
/// selects the first edge matching the desired target (see
/// [`crate::core::route::reconstruct_steps`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteGraph {
    adjacency: HashMap<TokenKey, Vec<Edge>>,
}

impl RouteGraph {
    pub fn new() -> Self {
        RouteGraph {
            adjacency: HashMap::new(),
        }
    }

    /// Returns the outgoing edges for `key`, or an empty slice if `key` is an
    /// isolated sink with no adjacency entry.
    pub fn outgoing_edges(&self, key: &TokenKey) -> &[Edge] {
        self.adjacency.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true iff `key` appears as a key in the adjacency map. A vertex
    /// that is only ever an edge target is not considered "in" the graph by
    /// this check; callers that need to treat implicit sinks as valid
    /// vertices should check `contains_vertex` instead.
    pub fn contains_key(&self, key: &TokenKey) -> bool {
        self.adjacency.contains_key(key)
    }

    /// Returns true iff `key` appears either as an adjacency-map key or as
    /// the target of some edge (an implicit sink).
    pub fn contains_vertex(&self, key: &TokenKey) -> bool {
        if self.adjacency.contains_key(key) {
            return true;
        }
        self.adjacency
            .values()
            .any(|edges| edges.iter().any(|e| &e.target == key))
    }

    /// Number of adjacency-map entries (does not count implicit sinks that
    /// never appear as a key).
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Appends `edge` to the outgoing list of `from`, creating the entry if
    /// absent.
    pub fn add_edge(&mut self, from: impl Into<TokenKey>, edge: Edge) {
        self.adjacency.entry(from.into()).or_default().push(edge);
    }

    /// Ensures `key` has an adjacency entry (possibly empty), so it is
    /// counted as a graph vertex even before any outgoing edge is added.
    pub fn ensure_vertex(&mut self, key: impl Into<TokenKey>) {
        self.adjacency.entry(key.into()).or_default();
    }

    pub fn keys(&self) -> impl Iterator<Item = &TokenKey> {
        self.adjacency.keys()
    }
}

/// Ergonomic fluent builder on top of [`RouteGraph`], grounded on the
/// convenience-builder pattern used elsewhere in this codebase for
/// assembling graphs outside of hand-written adjacency maps.
#[derive(Debug, Default)]
pub struct RouteGraphBuilder {
    graph: RouteGraph,
}

impl RouteGraphBuilder {
    pub fn new() -> Self {
        RouteGraphBuilder {
            graph: RouteGraph::new(),
        }
    }

    pub fn add_swap(
        mut self,
        from: impl Into<TokenKey>,
        to: impl Into<TokenKey>,
        rate: f64,
        gas: f64,
    ) -> Self {
        self.graph.add_edge(from, Edge::swap(to, rate, gas));
        self
    }

    pub fn add_bridge(
        mut self,
        from: impl Into<TokenKey>,
        to: impl Into<TokenKey>,
        rate: f64,
        gas: f64,
    ) -> Self {
        self.graph.add_edge(from, Edge::bridge(to, rate, gas));
        self
    }

    pub fn add_edge(mut self, from: impl Into<TokenKey>, edge: Edge) -> Self {
        self.graph.add_edge(from, edge);
        self
    }

    pub fn build(self) -> RouteGraph {
        self.graph
    }
}
