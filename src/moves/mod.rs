pub mod evaluator;
pub mod types;

pub use types::{DistanceMode, InsertionMove, Move, MoveKind, TIME_WEIGHT};
