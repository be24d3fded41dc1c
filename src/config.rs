use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Runtime knobs for instance generation and the meta-heuristic controllers.
///
/// Deserializable so a surrounding collaborator can load it from a config
/// file; the core never reads the filesystem itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub random_seed: u64,
    pub customer_count: usize,
    pub unloading_time: f64,
    pub vehicle_speed: f64,
    pub number_of_vehicles: usize,
    pub vehicle_capacity: u64,
    /// `k` for the restricted-candidate-list insertion variant.
    pub rcl_size: usize,
    /// Arc-penalty inflation factor used by guided local search.
    pub gls_lambda: f64,
    /// Tenure, in iterations, applied to both nodes touched by an accepted tabu move.
    pub tabu_tenure: usize,
    /// Bound on the FIFO move-memory queue used by the move-memory tabu variant.
    pub tabu_memory_limit: usize,
}

pub mod constant {
    pub(crate) const DEFAULT_SEED: u64 = 5;
    pub(crate) const DEFAULT_CUSTOMER_COUNT: usize = 40;
    pub(crate) const DEFAULT_UNLOADING_TIME: f64 = 10.0;
    pub(crate) const DEFAULT_VEHICLE_SPEED: f64 = 60.0;
    pub(crate) const DEFAULT_NUMBER_OF_VEHICLES: usize = 5;
    pub(crate) const DEFAULT_VEHICLE_CAPACITY: u64 = 1000;
    pub(crate) const DEFAULT_RCL_SIZE: usize = 3;
    pub(crate) const DEFAULT_GLS_LAMBDA: f64 = 0.15;
    pub(crate) const DEFAULT_TABU_TENURE: usize = 10;
    pub(crate) const DEFAULT_TABU_MEMORY_LIMIT: usize = 20;
}

impl Default for Config {
    fn default() -> Self {
        use constant::*;
        Config {
            random_seed: DEFAULT_SEED,
            customer_count: DEFAULT_CUSTOMER_COUNT,
            unloading_time: DEFAULT_UNLOADING_TIME,
            vehicle_speed: DEFAULT_VEHICLE_SPEED,
            number_of_vehicles: DEFAULT_NUMBER_OF_VEHICLES,
            vehicle_capacity: DEFAULT_VEHICLE_CAPACITY,
            rcl_size: DEFAULT_RCL_SIZE,
            gls_lambda: DEFAULT_GLS_LAMBDA,
            tabu_tenure: DEFAULT_TABU_TENURE,
            tabu_memory_limit: DEFAULT_TABU_MEMORY_LIMIT,
        }
    }
}

impl Config {
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.customer_count == 0 {
            return Err(ConfigError::InvalidField("customer_count", "must be > 0".into()));
        }
        if self.number_of_vehicles == 0 {
            return Err(ConfigError::InvalidField("number_of_vehicles", "must be > 0".into()));
        }
        if self.vehicle_capacity == 0 {
            return Err(ConfigError::InvalidField("vehicle_capacity", "must be > 0".into()));
        }
        if self.vehicle_speed <= 0.0 {
            return Err(ConfigError::InvalidField("vehicle_speed", "must be > 0".into()));
        }
        Ok(self)
    }
}
