/*!
# Route Error Type

This module provides a unified error enum for the route engine. There are only
two recoverable failure modes for a solver call: a malformed request
(`InvalidInput`) and a request that is well-formed but has no answer
(`NoRouteFound`). Everything else (degenerate rates, self-loops, empty
adjacency) is handled silently by clamping or by the absence of a relaxation,
never by raising an error.
*/

use std::error::Error;
use std::fmt;

use crate::core::graph::TokenKey;

/// Unified error type for route-engine operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// `target` is unreachable from `source`, within the hop cap for the
    /// classical solver or at all for the PSB solver.
    NoRouteFound { source: TokenKey, target: TokenKey },

    /// `source` or `target` is not a key in the graph. Raised before any
    /// solve work, distinct from `NoRouteFound` because it reflects a
    /// malformed request rather than graph topology.
    InvalidInput(String),
}

impl RouteError {
    /// Creates a `NoRouteFound` error for the given endpoints.
    pub fn no_route(source: impl Into<TokenKey>, target: impl Into<TokenKey>) -> Self {
        RouteError::NoRouteFound {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Creates an `InvalidInput` error with the given message.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        RouteError::InvalidInput(message.into())
    }
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RouteError::NoRouteFound { source, target } => {
                write!(f, "no route found from {} to {}", source, target)
            }
            RouteError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
        }
    }
}

impl Error for RouteError {}

/// Convenience alias used across solver modules.
pub type Result<T> = std::result::Result<T, RouteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_route_display() {
        let err = RouteError::no_route("ETH.eth", "USDC.arb");
        assert_eq!(format!("{}", err), "no route found from ETH.eth to USDC.arb");
    }

    #[test]
    fn invalid_input_display() {
        let err = RouteError::invalid_input("source key not in graph");
        assert_eq!(format!("{}", err), "invalid input: source key not in graph");
    }
}
