use super::graph::Graph;

/// One vehicle's ordered itinerary. Position 0 is always the depot; there is
/// no closing leg back to the depot.
#[derive(Debug, Clone)]
pub struct Route {
    pub nodes: Vec<usize>,
    /// `cumul_demand[i]` = sum of demand over positions `0..=i`.
    pub cumul_demand: Vec<u64>,
    /// `cumul_time[i]` = accumulated travel+unloading time to reach position `i`; `cumul_time[0] == 0`.
    pub cumul_time: Vec<f64>,
}

impl Route {
    pub fn new(depot_id: usize) -> Self {
        Route { nodes: vec![depot_id], cumul_demand: vec![0], cumul_time: vec![0.0] }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn total_demand(&self) -> u64 {
        self.cumul_demand.last().copied().unwrap_or(0)
    }

    pub fn service_time(&self) -> f64 {
        self.cumul_time.last().copied().unwrap_or(0.0)
    }

    /// `(prev, self, next_or_self)` node ids at position `i`, matching the
    /// convention the evaluator documents: at the last position the
    /// "trailing" slot reports `self` rather than a real neighbor.
    pub fn adjacent(&self, i: usize) -> (usize, usize, usize) {
        let prev = self.nodes[i.saturating_sub(1)];
        let here = self.nodes[i];
        let next = if i >= self.last_index() { here } else { self.nodes[i + 1] };
        (prev, here, next)
    }

    /// `(prev, self, next)` with `None` in place of a missing neighbor.
    /// Use this one in delta formulas: a trailing edge has no real distance
    /// or time cost, and `None` makes that explicit instead of relying on
    /// `D`/`T` self-lookups (which are not both zero — travel distance to
    /// oneself is zero, but travel *time* includes the destination's
    /// unloading time, so a self-lookup would silently overcount).
    pub fn neighbors(&self, i: usize) -> (Option<usize>, usize, Option<usize>) {
        let prev = if i == 0 { None } else { Some(self.nodes[i - 1]) };
        let here = self.nodes[i];
        let next = if i >= self.last_index() { None } else { Some(self.nodes[i + 1]) };
        (prev, here, next)
    }

    pub fn insert(&mut self, position: usize, node_id: usize) {
        self.nodes.insert(position, node_id);
    }

    pub fn remove(&mut self, position: usize) -> usize {
        self.nodes.remove(position)
    }

    /// Recompute `cumul_demand` from scratch against the graph's node table.
    pub fn refresh_demand(&mut self, graph: &Graph) {
        self.cumul_demand = Vec::with_capacity(self.nodes.len());
        let mut running = 0u64;
        for &id in &self.nodes {
            running += graph.node(id).demand;
            self.cumul_demand.push(running);
        }
    }

    /// Recompute `cumul_time` from scratch against a vehicle's time matrix.
    pub fn refresh_time(&mut self, time_matrix: &[Vec<f64>]) {
        self.cumul_time = Vec::with_capacity(self.nodes.len());
        let mut running = 0.0;
        self.cumul_time.push(running);
        for w in self.nodes.windows(2) {
            running += time_matrix[w[0]][w[1]];
            self.cumul_time.push(running);
        }
    }
}
