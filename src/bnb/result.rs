//! Solve outcome: status, incumbent, trace and statistics.

use super::node::NodeTrace;
use std::fmt;
use std::time::Duration;

/// Solver status.
///
/// The search loop only ends in [`Optimal`](Status::Optimal),
/// [`RelativeOptimal`](Status::RelativeOptimal),
/// [`TimeLimit`](Status::TimeLimit), [`IterLimit`](Status::IterLimit) or
/// [`MemoryLimit`](Status::MemoryLimit). The remaining variants belong to
/// the shared result vocabulary and are never produced by the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// Search in progress.
    Running,
    /// The queue was exhausted.
    Optimal,
    /// The absolute or relative gap closed within tolerance.
    RelativeOptimal,
    /// No feasible point exists.
    Infeasible,
    /// The objective is unbounded below.
    Unbounded,
    /// Time limit reached.
    TimeLimit,
    /// Node limit reached.
    IterLimit,
    /// Queue limit reached.
    MemoryLimit,
    /// A collaborator failed.
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Running => "running",
            Status::Optimal => "optimal",
            Status::RelativeOptimal => "relative_optimal",
            Status::Infeasible => "infeasible",
            Status::Unbounded => "unbounded",
            Status::TimeLimit => "time_limit",
            Status::IterLimit => "iter_limit",
            Status::MemoryLimit => "memory_limit",
            Status::Error => "error",
        }
    }

    /// Whether the solve finished with a proof of (tolerance-) optimality.
    pub fn is_optimal(&self) -> bool {
        matches!(self, Status::Optimal | Status::RelativeOptimal)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot taken after each iteration when tracing is enabled.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceRecord {
    /// Iteration number, starting at 1.
    pub iteration: u64,
    /// Time since the solve started.
    pub elapsed_time: Duration,
    /// Queue length after the iteration.
    pub queue_size: usize,
    /// Incumbent value.
    pub best_ub: f64,
    /// Global lower bound.
    pub best_lb: f64,
    /// Diagnostics left on the processed node by the strategies.
    pub node_trace: NodeTrace,
}

/// Counters collected during a solve. They never influence the search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStatistics {
    /// Nodes pruned right after bounding.
    pub nodes_pruned: u64,
    /// Queued nodes discarded when the incumbent improved.
    pub nodes_filtered: u64,
    /// Number of incumbent improvements.
    pub incumbent_updates: u64,
    /// Nodes handed to the branching rule.
    pub nodes_branched: u64,
    /// Children returned by the branching rule.
    pub children_generated: u64,
    /// Deepest level visited.
    pub max_depth: usize,
    /// Largest queue length observed after an iteration.
    pub peak_queue_size: usize,
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Search statistics")?;
        writeln!(f, "  pruned    : {}", self.nodes_pruned)?;
        writeln!(f, "  filtered  : {}", self.nodes_filtered)?;
        writeln!(f, "  incumbents: {}", self.incumbent_updates)?;
        writeln!(f, "  branched  : {}", self.nodes_branched)?;
        writeln!(f, "  children  : {}", self.children_generated)?;
        writeln!(f, "  max depth : {}", self.max_depth)?;
        write!(f, "  peak queue: {}", self.peak_queue_size)
    }
}

/// Result of a Branch-and-Bound solve.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BnbResult<X> {
    /// Terminal status.
    pub status: Status,

    /// Best point found, if any.
    pub solution: Option<X>,

    /// Objective value of `solution`, `+inf` if none was found.
    pub objective_value: f64,

    /// Wall-clock time of the solve.
    pub solve_time: Duration,

    /// Number of processed nodes.
    pub iterations: u64,

    /// Per-iteration trace. Empty unless `keep_trace` was set.
    pub trace: Vec<TraceRecord>,

    /// Search counters.
    pub statistics: SearchStatistics,
}

impl<X> BnbResult<X> {
    /// Whether a feasible point was found.
    pub fn has_solution(&self) -> bool {
        self.solution.is_some()
    }
}

impl<X> fmt::Display for BnbResult<X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Result")?;
        writeln!(f, "  status: {}", self.status)?;
        writeln!(f, "  value : {}", self.objective_value)?;
        writeln!(f, "  time  : {:.6}", self.solve_time.as_secs_f64())?;
        write!(f, "  iter  : {}", self.iterations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(Status::RelativeOptimal.to_string(), "relative_optimal");
        assert_eq!(Status::IterLimit.as_str(), "iter_limit");
        assert!(Status::Optimal.is_optimal());
        assert!(Status::RelativeOptimal.is_optimal());
        assert!(!Status::TimeLimit.is_optimal());
    }

    #[test]
    fn test_result_display() {
        let result: BnbResult<f64> = BnbResult {
            status: Status::Optimal,
            solution: Some(0.0),
            objective_value: -3.5,
            solve_time: Duration::from_millis(1500),
            iterations: 7,
            trace: Vec::new(),
            statistics: SearchStatistics::default(),
        };
        let text = result.to_string();
        assert!(text.contains("status: optimal"));
        assert!(text.contains("value : -3.5"));
        assert!(text.contains("time  : 1.500000"));
        assert!(text.contains("iter  : 7"));
        assert!(result.has_solution());
    }
}
