/// Weight applied to the time component of a move's composite score.
/// A strict reduction in solution time always outweighs a distance saving.
pub const TIME_WEIGHT: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Swap,
    Relocate,
    TwoOpt,
}

/// Which pair of matrices (real vs. guided-local-search-inflated) a move was
/// scored against. Only affects scoring; applying a move always mutates the
/// real route state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMode {
    Normal,
    Penalized,
}

/// A fully scored candidate move over the Swap/Relocate/2-Opt neighborhoods.
#[derive(Debug, Clone, Copy)]
pub struct Move {
    pub kind: MoveKind,
    pub vehicle1: usize,
    pub vehicle2: usize,
    pub i: usize,
    pub j: usize,
    pub distance_cost: f64,
    pub time_cost: f64,
}

impl Move {
    pub fn score(&self) -> f64 {
        TIME_WEIGHT * self.time_cost + self.distance_cost
    }

    /// Identity used by tabu move-memory: ignores score so the same
    /// structural move is recognized even if re-evaluated under penalized
    /// distances.
    pub fn key(&self) -> (MoveKind, usize, usize, usize, usize) {
        (self.kind, self.i, self.j, self.vehicle1, self.vehicle2)
    }
}

/// A candidate node insertion during the constructive phase.
#[derive(Debug, Clone, Copy)]
pub struct InsertionMove {
    pub vehicle: usize,
    /// Insert immediately after this position.
    pub after_position: usize,
    pub node: usize,
    pub distance_cost: f64,
    pub time_cost: f64,
}

impl InsertionMove {
    pub fn score(&self) -> f64 {
        TIME_WEIGHT * self.time_cost + self.distance_cost
    }
}
