use rayon::prelude::*;

use crate::domain::{Graph, Solution};
use crate::moves::evaluator::{eval_relocate, eval_swap, eval_two_opt};
use crate::moves::{DistanceMode, Move};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Neighborhood {
    Swap,
    Relocate,
    TwoOpt,
}

impl Neighborhood {
    /// The canonical pipeline order used by Variable Neighborhood Descent.
    pub const VND_ORDER: [Neighborhood; 3] = [Neighborhood::Swap, Neighborhood::Relocate, Neighborhood::TwoOpt];
}

/// Every vehicle pair this neighborhood needs to examine, plus whether the
/// pair order matters (Relocate is directional: moving node i of v1 into v2
/// differs from moving a node of v2 into v1; Swap and 2-Opt are not — each
/// unordered pair is visited once with the lower-indexed vehicle in the
/// `vehicle1` role, mirroring the original's `itertools.combinations`).
fn vehicle_pairs(n: usize, directional: bool) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(n * n);
    for v1 in 0..n {
        pairs.push((v1, v1));
        for v2 in 0..n {
            if v2 == v1 {
                continue;
            }
            if !directional && v2 < v1 {
                continue;
            }
            pairs.push((v1, v2));
        }
    }
    pairs
}

/// Sorted ascending by score, then by the move's fingerprint. Exposed so the
/// meta-heuristic controllers can merge candidates from several neighborhoods
/// and still pick a deterministic minimum (P7).
pub fn deterministic_sort(mut candidates: Vec<Move>) -> Vec<Move> {
    candidates.sort_by(|a, b| {
        a.score()
            .total_cmp(&b.score())
            .then(a.i.cmp(&b.i))
            .then(a.j.cmp(&b.j))
            .then(a.vehicle1.cmp(&b.vehicle1))
            .then(a.vehicle2.cmp(&b.vehicle2))
    });
    candidates
}

/// Enumerate every feasible, scored candidate move in one neighborhood.
/// Per-pair evaluation is data-parallel (rayon); the final ordering is a
/// deterministic sort so repeated calls over the same state always agree,
/// regardless of how the parallel sweep interleaved.
pub fn enumerate(neighborhood: Neighborhood, solution: &Solution, graph: &Graph, mode: DistanceMode) -> Vec<Move> {
    let n = solution.vehicles.len();
    let vehicle_times = solution.vehicle_times();

    match neighborhood {
        Neighborhood::Swap => {
            let pairs = vehicle_pairs(n, false);
            let candidates: Vec<(usize, usize, usize, usize)> = pairs
                .into_iter()
                .flat_map(|(v1, v2)| {
                    let len1 = solution.vehicles[v1].route.len();
                    let len2 = solution.vehicles[v2].route.len();
                    (1..len1).flat_map(move |i| (1..len2).map(move |j| (v1, v2, i, j)))
                })
                .filter(|&(v1, v2, i, j)| v1 != v2 || i < j)
                .collect();

            let found: Vec<Move> = candidates
                .par_iter()
                .filter_map(|&(v1, v2, i, j)| {
                    eval_swap(graph, &solution.vehicles[v1], &solution.vehicles[v2], v1, v2, i, j, &vehicle_times, mode)
                })
                .collect();
            deterministic_sort(found)
        }
        Neighborhood::Relocate => {
            let pairs = vehicle_pairs(n, true);
            let candidates: Vec<(usize, usize, usize, usize)> = pairs
                .into_iter()
                .flat_map(|(v1, v2)| {
                    let len1 = solution.vehicles[v1].route.len();
                    let len2 = solution.vehicles[v2].route.len();
                    (1..len1).flat_map(move |i| (0..len2).map(move |j| (v1, v2, i, j)))
                })
                .collect();

            let found: Vec<Move> = candidates
                .par_iter()
                .filter_map(|&(v1, v2, i, j)| {
                    eval_relocate(graph, &solution.vehicles[v1], &solution.vehicles[v2], v1, v2, i, j, &vehicle_times, mode)
                })
                .collect();
            deterministic_sort(found)
        }
        Neighborhood::TwoOpt => {
            let pairs = vehicle_pairs(n, false);
            let candidates: Vec<(usize, usize, usize, usize)> = pairs
                .into_iter()
                .flat_map(|(v1, v2)| {
                    let len1 = solution.vehicles[v1].route.len();
                    let len2 = solution.vehicles[v2].route.len();
                    (0..len1).flat_map(move |i| (0..len2).map(move |j| (v1, v2, i, j)))
                })
                .collect();

            let found: Vec<Move> = candidates
                .par_iter()
                .filter_map(|&(v1, v2, i, j)| {
                    eval_two_opt(graph, &solution.vehicles[v1], &solution.vehicles[v2], v1, v2, i, j, &vehicle_times, mode)
                })
                .collect();
            deterministic_sort(found)
        }
    }
}

/// Apply a previously scored move to the solution, then refresh the caches
/// of every vehicle it touched.
pub fn apply(mv: &Move, solution: &mut Solution, graph: &Graph) {
    match mv.kind {
        MoveKindAlias::Swap => apply_swap(mv, solution, graph),
        MoveKindAlias::Relocate => apply_relocate(mv, solution, graph),
        MoveKindAlias::TwoOpt => apply_two_opt(mv, solution, graph),
    }
}

use crate::moves::MoveKind as MoveKindAlias;

fn apply_swap(mv: &Move, solution: &mut Solution, graph: &Graph) {
    if mv.vehicle1 == mv.vehicle2 {
        let v = &mut solution.vehicles[mv.vehicle1];
        v.route.nodes.swap(mv.i, mv.j);
        v.refresh_caches(graph);
    } else {
        let (lo, hi) = (mv.vehicle1.min(mv.vehicle2), mv.vehicle1.max(mv.vehicle2));
        let (left, right) = solution.vehicles.split_at_mut(hi);
        let (v1, v2) = (&mut left[lo], &mut right[0]);
        let (x, y) = if mv.vehicle1 < mv.vehicle2 {
            (v1.route.nodes[mv.i], v2.route.nodes[mv.j])
        } else {
            (v2.route.nodes[mv.j], v1.route.nodes[mv.i])
        };
        let (va, pos_a, vb, pos_b) = if mv.vehicle1 < mv.vehicle2 {
            (v1, mv.i, v2, mv.j)
        } else {
            (v2, mv.j, v1, mv.i)
        };
        va.route.nodes[pos_a] = y;
        vb.route.nodes[pos_b] = x;
        va.refresh_caches(graph);
        vb.refresh_caches(graph);
    }
}

fn apply_relocate(mv: &Move, solution: &mut Solution, graph: &Graph) {
    if mv.vehicle1 == mv.vehicle2 {
        let v = &mut solution.vehicles[mv.vehicle1];
        let x = v.route.remove(mv.i);
        let insert_at = if mv.i < mv.j { mv.j } else { mv.j + 1 };
        v.route.insert(insert_at, x);
        v.refresh_caches(graph);
    } else {
        let (lo, hi) = (mv.vehicle1.min(mv.vehicle2), mv.vehicle1.max(mv.vehicle2));
        let (left, right) = solution.vehicles.split_at_mut(hi);
        let (v_lo, v_hi) = (&mut left[lo], &mut right[0]);
        let (from, at, to) = if mv.vehicle1 < mv.vehicle2 {
            (v_lo, mv.i, v_hi)
        } else {
            (v_hi, mv.i, v_lo)
        };
        let x = from.route.remove(at);
        to.route.insert(mv.j + 1, x);
        from.refresh_caches(graph);
        to.refresh_caches(graph);
    }
}

fn apply_two_opt(mv: &Move, solution: &mut Solution, graph: &Graph) {
    if mv.vehicle1 == mv.vehicle2 {
        let v = &mut solution.vehicles[mv.vehicle1];
        v.route.nodes[(mv.i + 1)..=mv.j].reverse();
        v.refresh_caches(graph);
    } else {
        let (lo, hi) = (mv.vehicle1.min(mv.vehicle2), mv.vehicle1.max(mv.vehicle2));
        let (left, right) = solution.vehicles.split_at_mut(hi);
        let (v_lo, v_hi) = (&mut left[lo], &mut right[0]);
        let (v1, v2) = if mv.vehicle1 < mv.vehicle2 { (v_lo, v_hi) } else { (v_hi, v_lo) };

        let v1_tail = v1.route.nodes.split_off(mv.i + 1);
        let v2_tail = v2.route.nodes.split_off(mv.j);
        v1.route.nodes.extend(v2_tail);
        v2.route.nodes.extend(v1_tail);

        v1.refresh_caches(graph);
        v2.refresh_caches(graph);
    }
}
