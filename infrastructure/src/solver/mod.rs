//! Solver service adapters.

#[cfg(feature = "http")]
mod http;
mod unavailable;

#[cfg(feature = "http")]
pub use http::HttpSolverClient;
pub use unavailable::UnconfiguredSolver;
