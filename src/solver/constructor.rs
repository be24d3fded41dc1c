use rand::Rng;
use tracing::{debug, info, span, Level};

use crate::domain::{Graph, Solution, Vehicle};
use crate::error::SolverError;
use crate::moves::evaluator::eval_insertion;
use crate::moves::{DistanceMode, InsertionMove};

/// Builds a feasible initial solution by repeatedly committing the cheapest
/// (node, vehicle, position) insertion, in the manner of Minimum-Insertion
/// construction heuristics.
///
/// Every vehicle must already own a route containing only the depot (as
/// returned by [`Vehicle::new`]); this function mutates those routes in
/// place and returns the aggregate `Solution`.
pub fn build_solution(graph: &Graph, vehicles: Vec<Vehicle>) -> Result<Solution, SolverError> {
    let span = span!(Level::INFO, "minimum_insertion");
    let _guard = span.enter();

    let mut solution = Solution::new(vehicles);
    let mut unvisited: Vec<usize> = (1..graph.len()).collect();
    let total_nodes = unvisited.len();

    while !unvisited.is_empty() {
        let vehicle_times = solution.vehicle_times();
        let best = find_best_insertion(graph, &solution, &vehicle_times, &unvisited);
        let Some(best) = best else {
            return Err(infeasible(graph, &solution, &unvisited));
        };
        commit(&mut solution, graph, &best);
        unvisited.retain(|&n| n != best.node);
        debug!(
            node = best.node,
            vehicle = best.vehicle,
            remaining = unvisited.len(),
            "committed insertion"
        );
    }

    info!(
        customers = total_nodes,
        vehicles = solution.vehicles.len(),
        solution_time = solution.solution_time(),
        "constructive phase complete"
    );
    Ok(solution)
}

/// Restricted-candidate-list variant: keeps the `k+1` cheapest insertions at
/// each step and commits one chosen uniformly at random from an explicit,
/// seeded RNG (never a process-global source, per the determinism
/// requirement).
pub fn build_solution_rcl<R: Rng>(
    graph: &Graph,
    vehicles: Vec<Vehicle>,
    k: usize,
    rng: &mut R,
) -> Result<Solution, SolverError> {
    let span = span!(Level::INFO, "minimum_insertion_rcl", k);
    let _guard = span.enter();

    let mut solution = Solution::new(vehicles);
    let mut unvisited: Vec<usize> = (1..graph.len()).collect();

    while !unvisited.is_empty() {
        let vehicle_times = solution.vehicle_times();
        let mut candidates = find_all_insertions(graph, &solution, &vehicle_times, &unvisited);
        if candidates.is_empty() {
            return Err(infeasible(graph, &solution, &unvisited));
        }
        candidates.sort_by(|a, b| a.score().total_cmp(&b.score()));
        candidates.truncate(k + 1);
        let chosen = rng.gen_range(0..candidates.len());
        let best = candidates[chosen];
        commit(&mut solution, graph, &best);
        unvisited.retain(|&n| n != best.node);
    }

    Ok(solution)
}

fn find_best_insertion(
    graph: &Graph,
    solution: &Solution,
    vehicle_times: &[f64],
    unvisited: &[usize],
) -> Option<InsertionMove> {
    let mut best: Option<InsertionMove> = None;
    for &(node, vehicle_idx, after) in &candidate_triples(graph, solution, unvisited) {
        let vehicle = &solution.vehicles[vehicle_idx];
        let Some(mv) = eval_insertion(graph, vehicle, vehicle_idx, vehicle_times, node, after, DistanceMode::Normal)
        else {
            continue;
        };
        let improves = match &best {
            Some(b) => mv.score() < b.score(),
            None => true,
        };
        if improves {
            best = Some(mv);
        }
    }
    best
}

fn find_all_insertions(
    graph: &Graph,
    solution: &Solution,
    vehicle_times: &[f64],
    unvisited: &[usize],
) -> Vec<InsertionMove> {
    candidate_triples(graph, solution, unvisited)
        .into_iter()
        .filter_map(|(node, vehicle_idx, after)| {
            let vehicle = &solution.vehicles[vehicle_idx];
            eval_insertion(graph, vehicle, vehicle_idx, vehicle_times, node, after, DistanceMode::Normal)
        })
        .collect()
}

/// Every (unvisited node, vehicle, insertion position) triple worth scoring.
/// Capacity is filtered inside `eval_insertion`; this only avoids scoring a
/// vehicle whose route hasn't grown since the last position was scored.
fn candidate_triples(graph: &Graph, solution: &Solution, unvisited: &[usize]) -> Vec<(usize, usize, usize)> {
    let mut triples = Vec::new();
    for &node in unvisited {
        for (vehicle_idx, vehicle) in solution.vehicles.iter().enumerate() {
            if !vehicle.has_capacity(graph.node(node).demand as i64) {
                continue;
            }
            for after in 0..vehicle.route.len() {
                triples.push((node, vehicle_idx, after));
            }
        }
    }
    triples
}

fn commit(solution: &mut Solution, graph: &Graph, mv: &InsertionMove) {
    let vehicle = &mut solution.vehicles[mv.vehicle];
    vehicle.route.insert(mv.after_position + 1, mv.node);
    vehicle.refresh_caches(graph);
}

fn infeasible(graph: &Graph, solution: &Solution, unvisited: &[usize]) -> SolverError {
    let total_demand: u64 = unvisited.iter().map(|&n| graph.node(n).demand).sum();
    let remaining_capacity: i64 = solution
        .vehicles
        .iter()
        .map(|v| v.capacity as i64 - v.route.total_demand() as i64)
        .sum();
    SolverError::InfeasibleInstance(format!(
        "{} node(s) left unplaced: total remaining demand {} exceeds remaining fleet capacity {}",
        unvisited.len(),
        total_demand,
        remaining_capacity
    ))
}
