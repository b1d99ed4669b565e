use thiserror::Error;

/// Errors surfaced by the solver and the particle store.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SolverError {
    /// Appending a particle would exceed the configured capacity.
    #[error("particle capacity ({capacity}) exceeded")]
    Capacity { capacity: usize },

    /// A construction parameter failed validation.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
}
