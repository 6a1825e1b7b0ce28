pub mod classic;
pub mod error;
pub mod graph;
pub mod heap;
pub mod psb;
pub mod route;

#[cfg(any(test, feature = "bench-support"))]
pub mod testutil;
