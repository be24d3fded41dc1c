//! Core solver for a capacitated vehicle routing problem whose objective is
//! min-max route duration: minimize the service time of the slowest vehicle,
//! subject to per-vehicle capacity, with every customer visited exactly once
//! from a shared depot.
//!
//! The crate is organized leaves-first:
//! - [`domain`] — the graph/distance layer, routes with their cached
//!   cumulatives, vehicles, and the solution aggregate.
//! - [`moves`] — typed move descriptions and the O(1) delta-cost evaluator.
//! - [`solver`] — the neighborhood enumerator plus the constructive and
//!   meta-heuristic controllers.
//! - [`config`] and [`instance`] — the ambient configuration and
//!   deterministic instance generator.
//! - [`report`] — the stable textual solution format.
//! - [`error`] — the error and verification-mode types.

pub mod config;
pub mod domain;
pub mod error;
pub mod instance;
pub mod moves;
pub mod report;
pub mod solver;

pub use config::Config;
pub use domain::{Graph, Node, Route, Solution, Vehicle};
pub use error::SolverError;
