use std::collections::VecDeque;

use tracing::{debug, info, span, Level};

use crate::domain::{Graph, Solution};
use crate::moves::{DistanceMode, Move, MoveKind};

use super::neighborhood::{apply, deterministic_sort, enumerate, Neighborhood};

/// Fingerprint a move ignores its score, matching the tabu-equality rule:
/// `(family, i, j, vehicle1, vehicle2)`.
type MoveKey = (MoveKind, usize, usize, usize, usize);

/// Which tabu bookkeeping strategy drives admissibility.
pub enum TabuVariant {
    /// Each node touched by an accepted move is forbidden until
    /// `current_iter + tenure`.
    NodeTenure { tenure: usize },
    /// A bounded FIFO of recently applied move fingerprints; a move is tabu
    /// iff it matches one still in the queue.
    MoveMemory { memory_limit: usize },
}

/// Node-tenure state, keyed by node id (not the `Node`'s identity: nodes are
/// immutable value types, so the tenure clock lives in the controller).
struct NodeTenureState {
    tabu_until: Vec<usize>,
    tenure: usize,
}

impl NodeTenureState {
    fn new(node_count: usize, tenure: usize) -> Self {
        NodeTenureState { tabu_until: vec![0; node_count], tenure }
    }

    fn is_tabu(&self, node: usize, current_iter: usize) -> bool {
        self.tabu_until[node] > current_iter
    }

    fn mark(&mut self, node: usize, current_iter: usize) {
        self.tabu_until[node] = current_iter + self.tenure;
    }
}

/// Run a fixed-iteration tabu search: at each iteration, scan every given
/// neighborhood, drop tabu candidates unless aspiration admits them, and
/// apply the cheapest survivor (even if its score is non-negative — tabu
/// search accepts worsening moves to escape local optima).
///
/// Returns the best true `solution_time` observed.
pub fn run(solution: &mut Solution, graph: &Graph, neighborhoods: &[Neighborhood], variant: TabuVariant, limit: usize) -> f64 {
    let span = span!(Level::INFO, "tabu", limit);
    let _guard = span.enter();

    let mut node_state = match &variant {
        TabuVariant::NodeTenure { tenure } => Some(NodeTenureState::new(graph.len(), *tenure)),
        TabuVariant::MoveMemory { .. } => None,
    };
    let mut move_memory: VecDeque<MoveKey> = VecDeque::new();
    let memory_limit = match &variant {
        TabuVariant::MoveMemory { memory_limit } => *memory_limit,
        TabuVariant::NodeTenure { .. } => 0,
    };

    let mut best_solution_time = solution.solution_time();
    let mut applied = 0usize;

    for current_iter in 1..=limit {
        let mut candidates: Vec<Move> = Vec::new();
        for &nb in neighborhoods {
            candidates.extend(enumerate(nb, solution, graph, DistanceMode::Normal));
        }
        let candidates = deterministic_sort(candidates);

        let current_solution_time = solution.solution_time();
        let chosen = candidates.into_iter().find(|mv| {
            let hypothetical_time = current_solution_time + mv.time_cost;
            let aspires = hypothetical_time < best_solution_time;
            let is_tabu = match &node_state {
                Some(state) => {
                    let node1 = solution.vehicles[mv.vehicle1].route.nodes[mv.i];
                    let node2 = solution.vehicles[mv.vehicle2].route.nodes[mv.j];
                    state.is_tabu(node1, current_iter) || state.is_tabu(node2, current_iter)
                }
                None => move_memory.contains(&mv.key()),
            };
            !is_tabu || aspires
        });

        let Some(chosen) = chosen else {
            continue;
        };

        let node1 = solution.vehicles[chosen.vehicle1].route.nodes[chosen.i];
        let node2 = solution.vehicles[chosen.vehicle2].route.nodes[chosen.j];
        let key = chosen.key();

        apply(&chosen, solution, graph);
        applied += 1;

        if let Some(state) = &mut node_state {
            state.mark(node1, current_iter);
            state.mark(node2, current_iter);
        } else {
            move_memory.push_back(key);
            if move_memory.len() > memory_limit {
                move_memory.pop_front();
            }
        }

        let new_time = solution.solution_time();
        if new_time < best_solution_time {
            best_solution_time = new_time;
        }
        debug!(iter = current_iter, score = chosen.score(), solution_time = new_time, "tabu move applied");
    }

    info!(applied, best_solution_time, "tabu search finished");
    best_solution_time
}
