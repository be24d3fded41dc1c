use std::collections::HashSet;

use crate::error::SolverError;

use super::graph::Graph;
use super::vehicle::Vehicle;

/// The full fleet state: every vehicle with its own route. The objective,
/// "solution time", is the service time of the slowest vehicle.
pub struct Solution {
    pub vehicles: Vec<Vehicle>,
}

impl Solution {
    pub fn new(vehicles: Vec<Vehicle>) -> Self {
        Solution { vehicles }
    }

    pub fn vehicle_times(&self) -> Vec<f64> {
        self.vehicles.iter().map(|v| v.route.service_time()).collect()
    }

    /// Index of the vehicle with the largest service time (first in case of
    /// ties, matching the reference `max(vehicle_times, key=...)`, which
    /// keeps the first maximal element rather than the last).
    pub fn slowest_vehicle(&self) -> usize {
        let times = self.vehicle_times();
        let mut best = 0;
        for (i, &t) in times.iter().enumerate().skip(1) {
            if t > times[best] {
                best = i;
            }
        }
        best
    }

    pub fn solution_time(&self) -> f64 {
        self.vehicle_times().iter().cloned().fold(0.0, f64::max)
    }

    /// What `solution_time` would become if the listed vehicles' times were
    /// replaced with the given values, without mutating anything.
    pub fn hypothetical_solution_time(&self, overrides: &[(usize, f64)]) -> f64 {
        let mut times = self.vehicle_times();
        for &(idx, t) in overrides {
            times[idx] = t;
        }
        times.iter().cloned().fold(0.0, f64::max)
    }

    pub fn total_distance(&self, graph: &Graph) -> f64 {
        self.vehicles
            .iter()
            .map(|v| {
                v.route
                    .nodes
                    .windows(2)
                    .map(|w| graph.distance[w[0]][w[1]])
                    .sum::<f64>()
            })
            .sum()
    }

    /// Validate P1-P3: every non-depot node visited exactly once, every
    /// route starts at the depot, and no route exceeds its vehicle's capacity.
    pub fn run_checks(&self, graph: &Graph) -> Result<(), SolverError> {
        let mut seen = HashSet::new();
        for vehicle in &self.vehicles {
            let Some(&first) = vehicle.route.nodes.first() else {
                return Err(SolverError::InvariantViolation(format!(
                    "vehicle {} has an empty route",
                    vehicle.id
                )));
            };
            if first != 0 {
                return Err(SolverError::InvariantViolation(format!(
                    "vehicle {} route does not start at the depot",
                    vehicle.id
                )));
            }
            if vehicle.route.total_demand() > vehicle.capacity {
                return Err(SolverError::InvariantViolation(format!(
                    "vehicle {} route demand {} exceeds capacity {}",
                    vehicle.id,
                    vehicle.route.total_demand(),
                    vehicle.capacity
                )));
            }
            for &id in vehicle.route.nodes.iter().filter(|&&id| id != 0) {
                if !seen.insert(id) {
                    return Err(SolverError::InvariantViolation(format!(
                        "node {id} appears more than once across routes"
                    )));
                }
            }
        }
        let expected: HashSet<usize> = (1..graph.len()).collect();
        if seen != expected {
            let missing: Vec<_> = expected.difference(&seen).collect();
            return Err(SolverError::InvariantViolation(format!(
                "nodes missing from every route: {missing:?}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::node::Node;

    fn two_vehicle_graph() -> Graph {
        Graph::new(vec![
            Node::depot(50.0, 50.0),
            Node { id: 1, x: 0.0, y: 0.0, demand: 100, unloading_time: 0.0 },
            Node { id: 2, x: 100.0, y: 100.0, demand: 100, unloading_time: 0.0 },
        ])
    }

    #[test]
    fn run_checks_passes_on_a_well_formed_solution() {
        let graph = two_vehicle_graph();
        let mut v0 = Vehicle::new(0, 60.0, 1000, 0.0, 0, &graph);
        v0.route.insert(1, 1);
        v0.refresh_caches(&graph);
        let mut v1 = Vehicle::new(1, 60.0, 1000, 0.0, 0, &graph);
        v1.route.insert(1, 2);
        v1.refresh_caches(&graph);
        let sol = Solution::new(vec![v0, v1]);
        assert!(sol.run_checks(&graph).is_ok());
    }

    #[test]
    fn run_checks_flags_missing_node() {
        let graph = two_vehicle_graph();
        let mut v0 = Vehicle::new(0, 60.0, 1000, 0.0, 0, &graph);
        v0.route.insert(1, 1);
        v0.refresh_caches(&graph);
        let v1 = Vehicle::new(1, 60.0, 1000, 0.0, 0, &graph);
        let sol = Solution::new(vec![v0, v1]);
        assert!(matches!(sol.run_checks(&graph), Err(SolverError::InvariantViolation(_))));
    }
}
