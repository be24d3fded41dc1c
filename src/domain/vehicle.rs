use super::graph::Graph;
use super::route::Route;

/// A truck with its own route and its own derived time matrix
/// (`time[u][v] = distance(u,v)/speed*60 + unloading_time(v)`).
///
/// `penalized_time` starts as a copy of `time` and is only ever mutated by
/// the guided-local-search controller.
pub struct Vehicle {
    pub id: usize,
    pub speed: f64,
    pub capacity: u64,
    pub unloading_time: f64,
    pub time: Vec<Vec<f64>>,
    pub penalized_time: Vec<Vec<f64>>,
    pub route: Route,
}

impl Vehicle {
    pub fn new(id: usize, speed: f64, capacity: u64, unloading_time: f64, depot_id: usize, graph: &Graph) -> Self {
        let time = build_time_matrix(graph, speed);
        let penalized_time = time.clone();
        Vehicle { id, speed, capacity, unloading_time, time, penalized_time, route: Route::new(depot_id) }
    }

    pub fn has_capacity(&self, extra_demand: i64) -> bool {
        self.route.total_demand() as i64 + extra_demand <= self.capacity as i64
    }

    pub fn refresh_caches(&mut self, graph: &Graph) {
        self.route.refresh_demand(graph);
        self.route.refresh_time(&self.time);
    }

    /// Re-derive just the `(u,v)`/`(v,u)` entries of `penalized_time` from the
    /// graph's freshly-inflated `penalized_distance`. Used by GLS, which only
    /// ever touches one arc per iteration; rebuilding the whole matrix would
    /// be O(n^2) for a single-arc update.
    pub fn resync_penalized_time_arc(&mut self, graph: &Graph, u: usize, v: usize) {
        self.penalized_time[u][v] = graph.penalized_distance[u][v] / self.speed * 60.0 + graph.node(v).unloading_time;
        self.penalized_time[v][u] = graph.penalized_distance[v][u] / self.speed * 60.0 + graph.node(u).unloading_time;
    }
}

fn build_time_matrix(graph: &Graph, speed: f64) -> Vec<Vec<f64>> {
    let n = graph.len();
    let mut time = vec![vec![0.0; n]; n];
    for u in 0..n {
        for v in 0..n {
            time[u][v] = graph.distance[u][v] / speed * 60.0 + graph.node(v).unloading_time;
        }
    }
    time
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::node::Node;

    #[test]
    fn time_matrix_includes_unloading_time_of_destination() {
        let graph = Graph::new(vec![
            Node::depot(0.0, 0.0),
            Node { id: 1, x: 60.0, y: 0.0, demand: 100, unloading_time: 7.0 },
        ]);
        let v = Vehicle::new(0, 60.0, 1000, 0.0, 0, &graph);
        // distance 60 at speed 60 => 1 minute travel, plus 7 minutes unloading.
        assert!((v.time[0][1] - 8.0).abs() < 1e-9);
    }
}
