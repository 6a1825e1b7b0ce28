/*!
# Route Engine

Computes optimal multi-hop swap/bridge routes over a directed, weighted
token graph whose vertices are `(symbol, chain)` pairs. Two interchangeable
solvers share one graph abstraction and output contract:

- [`core::classic::classic_dijkstra`]: classical Dijkstra with a hop cap,
  backed by an indexed min-heap.
- [`core::psb::psb_dijkstra`]: the Post-Sorting-Barrier (PSB) recursion of
  Duan et al., which reduces the working frontier via pivot selection.

Both take a [`core::graph::RouteGraph`], a source and target
[`core::graph::TokenKey`], and an optional hop cap, and return a
[`core::route::RouteResult`] plus solver-specific metrics.
*/

pub mod core;

pub use core::classic::{classic_dijkstra, ClassicMetrics, DEFAULT_MAX_HOPS};
pub use core::error::{Result, RouteError};
pub use core::graph::{Edge, EdgeKind, RouteGraph, RouteGraphBuilder, TokenKey};
pub use core::psb::{psb_dijkstra, PSBMetrics};
pub use core::route::{RouteResult, RouteStep, StepDetails};
