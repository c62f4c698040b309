//! Error types for the Branch-and-Bound engine.

use thiserror::Error;

/// Errors returned by [`BnbSolver::solve`](crate::bnb::BnbSolver::solve)
/// and by problem constructors.
///
/// The search loop itself never fails: uncertifiable bounds are reported
/// as `-inf` lower bounds. Errors only come from setup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BnbError {
    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A strategy refused to initialize against the given problem.
    #[error("Failed to initialize {component}: {reason}")]
    Initialization {
        /// Which strategy failed (e.g. `"lower bounding method"`).
        component: &'static str,
        /// Why it failed.
        reason: String,
    },

    /// Problem data is malformed.
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),
}

/// Result type for Branch-and-Bound operations.
pub type Result<T> = std::result::Result<T, BnbError>;
