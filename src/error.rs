use std::fmt;

/// Fatal or semi-fatal conditions raised by the core solver.
///
/// `MoveRejected` is deliberately absent: "no improving move" is ordinary
/// control flow in every controller and is represented with `Option`/empty
/// `Vec`, never as an error variant.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// A structural guarantee (coverage, depot-first, capacity) no longer holds.
    InvariantViolation(String),
    /// The constructive phase could not place every node under any vehicle.
    InfeasibleInstance(String),
    /// A predicted delta disagreed with a from-scratch recomputation by more than `eps`.
    NumericDesync { expected: f64, actual: f64, eps: f64 },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::InvariantViolation(msg) => write!(f, "invariant violation: {msg}"),
            SolverError::InfeasibleInstance(msg) => write!(f, "infeasible instance: {msg}"),
            SolverError::NumericDesync { expected, actual, eps } => write!(
                f,
                "numeric desync: expected {expected:.6}, got {actual:.6} (eps {eps:.6})"
            ),
        }
    }
}

impl std::error::Error for SolverError {}

/// How a controller should react when a [`SolverError::NumericDesync`] is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyMode {
    /// Return the error immediately.
    FailFast,
    /// Log a warning and recompute the cache from scratch, then continue.
    LogAndRepair,
}

/// Configuration-level errors, distinct from [`SolverError`] since an invalid
/// config is a caller mistake rather than an instance that failed to solve.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidField(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidField(field, reason) => write!(f, "invalid {field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}
