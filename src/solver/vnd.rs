use tracing::{debug, info, warn, span, Level};

use crate::domain::{Graph, Solution};
use crate::error::{SolverError, VerifyMode};
use crate::moves::DistanceMode;

use super::neighborhood::{apply, enumerate, Neighborhood};

/// Tolerance for the optional [`SolverError::NumericDesync`] check (spec §7/§8 P6).
const DESYNC_EPS: f64 = 1e-2;

/// Variable Neighborhood Descent: sweep the neighborhoods in order, apply the
/// best move of whichever one currently yields an improvement, and restart
/// from the first neighborhood. Terminates once every neighborhood in turn
/// has nothing left to offer.
pub fn run(solution: &mut Solution, graph: &Graph, neighborhoods: &[Neighborhood]) {
    run_verified(solution, graph, neighborhoods, None).expect("unverified run never raises NumericDesync")
}

/// Same descent as [`run`], but after every apply recomputes `solution_time`
/// from scratch and compares it against what the move's `time_cost` predicted.
/// `verify` is `None` to skip the check entirely, or `Some(mode)` to either
/// fail fast or log-and-continue on a disagreement larger than `DESYNC_EPS`.
pub fn run_verified(
    solution: &mut Solution,
    graph: &Graph,
    neighborhoods: &[Neighborhood],
    verify: Option<VerifyMode>,
) -> Result<(), SolverError> {
    let span = span!(Level::INFO, "vnd", neighborhoods = neighborhoods.len());
    let _guard = span.enter();

    let mut index = 0;
    let mut applied = 0usize;
    while index < neighborhoods.len() {
        let current = neighborhoods[index];
        let candidates = enumerate(current, solution, graph, DistanceMode::Normal);
        match candidates.first() {
            Some(best) if best.score() < 0.0 => {
                debug!(?current, score = best.score(), "applying improving move");
                let predicted = solution.solution_time() + best.time_cost;
                apply(best, solution, graph);
                applied += 1;

                if let Some(mode) = verify {
                    let actual = solution.solution_time();
                    if (actual - predicted).abs() > DESYNC_EPS {
                        let err = SolverError::NumericDesync { expected: predicted, actual, eps: DESYNC_EPS };
                        match mode {
                            VerifyMode::FailFast => return Err(err),
                            VerifyMode::LogAndRepair => {
                                warn!(%err, "numeric desync after vnd apply, caches already fresh from apply_move");
                            }
                        }
                    }
                }
                index = 0;
            }
            _ => index += 1,
        }
    }

    info!(applied, solution_time = solution.solution_time(), "vnd converged");
    Ok(())
}
