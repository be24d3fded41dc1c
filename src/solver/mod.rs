//! Meta-heuristic controllers: everything that turns a scored move
//! from the neighborhood enumerator into state mutation.

pub mod constructor;
pub mod gls;
pub mod neighborhood;
pub mod tabu;
pub mod vnd;

pub use constructor::{build_solution, build_solution_rcl};
pub use neighborhood::Neighborhood;
pub use tabu::TabuVariant;
