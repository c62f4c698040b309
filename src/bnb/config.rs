//! Branch-and-Bound configuration.

use crate::error::{BnbError, Result};

/// Configuration for the Branch-and-Bound solver.
///
/// Component choices (region, bounding methods, branching and searching
/// rules) are not part of this struct; they are set on
/// [`BnbSolver`](super::BnbSolver) directly.
///
/// # Examples
///
/// ```
/// use u_bnb::bnb::BnbConfig;
///
/// let config = BnbConfig::default()
///     .with_time_limit(10.0)
///     .with_node_limit(5_000)
///     .with_rel_gap_tol(1e-4)
///     .with_keep_trace(true);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.node_limit, 5_000);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BnbConfig {
    /// Log a progress table at `info` level.
    pub verbose: bool,

    /// Record one [`TraceRecord`](super::TraceRecord) per iteration.
    pub keep_trace: bool,

    /// Time limit in seconds. Checked between iterations only.
    pub time_limit: f64,

    /// Maximum number of processed nodes.
    pub node_limit: u64,

    /// Maximum number of queued nodes.
    pub queue_limit: usize,

    /// Feasibility tolerance passed to [`Problem::is_feasible`](super::Problem::is_feasible).
    pub feas_tol: f64,

    /// Absolute gap tolerance on the optimal value.
    pub abs_gap_tol: f64,

    /// Relative gap tolerance on the optimal value.
    pub rel_gap_tol: f64,
}

impl Default for BnbConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            keep_trace: false,
            time_limit: f64::INFINITY,
            node_limit: u64::MAX,
            queue_limit: usize::MAX,
            feas_tol: 1e-8,
            abs_gap_tol: 1e-8,
            rel_gap_tol: 1e-8,
        }
    }
}

impl BnbConfig {
    /// Enables the progress table on the `info` log level.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Records a [`TraceRecord`](super::TraceRecord) per iteration.
    pub fn with_keep_trace(mut self, keep_trace: bool) -> Self {
        self.keep_trace = keep_trace;
        self
    }

    /// Sets the time limit in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = seconds;
        self
    }

    /// Sets the maximum number of processed nodes.
    pub fn with_node_limit(mut self, n: u64) -> Self {
        self.node_limit = n;
        self
    }

    /// Sets the queue length that stops the search. Zero stops it after
    /// the first iteration that leaves any node queued.
    pub fn with_queue_limit(mut self, n: usize) -> Self {
        self.queue_limit = n;
        self
    }

    /// Sets the tolerance passed to [`Problem::is_feasible`](super::Problem::is_feasible).
    pub fn with_feas_tol(mut self, tol: f64) -> Self {
        self.feas_tol = tol;
        self
    }

    /// Sets the absolute gap that counts as converged.
    pub fn with_abs_gap_tol(mut self, tol: f64) -> Self {
        self.abs_gap_tol = tol;
        self
    }

    /// Sets the relative gap that counts as converged.
    pub fn with_rel_gap_tol(mut self, tol: f64) -> Self {
        self.rel_gap_tol = tol;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.time_limit.is_nan() || self.time_limit < 0.0 {
            return Err(BnbError::InvalidConfig(format!(
                "time_limit must be non-negative, got {}",
                self.time_limit
            )));
        }
        for (name, tol) in [
            ("feas_tol", self.feas_tol),
            ("abs_gap_tol", self.abs_gap_tol),
            ("rel_gap_tol", self.rel_gap_tol),
        ] {
            if tol.is_nan() || tol < 0.0 {
                return Err(BnbError::InvalidConfig(format!(
                    "{name} must be non-negative, got {tol}"
                )));
            }
        }
        Ok(())
    }
}
