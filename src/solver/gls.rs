use rand::Rng;
use tracing::{debug, info, span, Level};

use crate::domain::{Graph, Solution};
use crate::moves::DistanceMode;

use super::neighborhood::{apply, enumerate, Neighborhood};

/// Best-so-far trajectory plus the final best value, in the shape the
/// teacher's `main.rs` logs as `best_so_far_updates` — here returned instead
/// of printed, so a caller can persist it (e.g. via [`crate::report::write_trace_csv`]).
pub struct GlsOutcome {
    pub best_solution_time: f64,
    /// `(iteration, new_best_solution_time)` pairs, one per improvement.
    pub trace: Vec<(usize, f64)>,
}

/// Guided Local Search: invoke a uniformly-random neighborhood under the
/// penalized matrices; apply any beneficial move, otherwise inflate the most
/// "utilized" arc (`distance / (1 + penalty)`, ties broken by scan order) so
/// the next attempt is steered away from it.
///
/// The solution left in `solution` is whatever state the last iteration
/// produced, which may be worse than the best seen — callers that want the
/// best solution itself should snapshot it whenever `GlsOutcome::best_solution_time`
/// improves.
pub fn run<R: Rng>(
    solution: &mut Solution,
    graph: &mut Graph,
    neighborhoods: &[Neighborhood],
    rng: &mut R,
    limit: usize,
    lambda: f64,
) -> GlsOutcome {
    let span = span!(Level::INFO, "gls", limit, lambda);
    let _guard = span.enter();

    let mut best_solution_time = solution.solution_time();
    let mut trace = Vec::new();
    let mut penalizations = 0usize;
    let mut applied = 0usize;

    for iteration in 1..=limit {
        let choice = neighborhoods[rng.gen_range(0..neighborhoods.len())];
        let candidates = enumerate(choice, solution, graph, DistanceMode::Penalized);
        match candidates.first() {
            Some(best) if best.score() < 0.0 => {
                apply(best, solution, graph);
                applied += 1;
                let current = solution.solution_time();
                if current < best_solution_time {
                    best_solution_time = current;
                    trace.push((iteration, best_solution_time));
                }
            }
            _ => {
                penalize_worst_arc(graph, &mut solution.vehicles, lambda);
                penalizations += 1;
            }
        }
    }

    info!(applied, penalizations, best_solution_time, "gls finished");
    GlsOutcome { best_solution_time, trace }
}

/// Find the route edge `(u,v)` with the highest `distance / (1 + penalty)`
/// across every vehicle's route, bump its penalty count by one, and refresh
/// both the graph's and the owning vehicle's penalized matrices for just
/// that arc.
fn penalize_worst_arc(graph: &mut Graph, vehicles: &mut [crate::domain::Vehicle], lambda: f64) {
    let mut worst: Option<(f64, usize, usize, usize)> = None;
    for (vehicle_idx, vehicle) in vehicles.iter().enumerate() {
        for window in vehicle.route.nodes.windows(2) {
            let (u, v) = (window[0], window[1]);
            let utility = graph.distance[u][v] / (1.0 + graph.penalty[u][v] as f64);
            let better = match worst {
                Some((best_utility, ..)) => utility > best_utility,
                None => true,
            };
            if better {
                worst = Some((utility, vehicle_idx, u, v));
            }
        }
    }

    if let Some((_, vehicle_idx, u, v)) = worst {
        graph.penalize_arc(u, v, lambda);
        vehicles[vehicle_idx].resync_penalized_time_arc(graph, u, v);
        debug!(u, v, penalty = graph.penalty[u][v], "penalized arc");
    }
}
