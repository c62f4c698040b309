//! Branch-and-Bound solve loop.

use super::config::BnbConfig;
use super::node::{Node, NodeStatus};
use super::result::{BnbResult, SearchStatistics, Status, TraceRecord};
use super::search::SearchingRule;
use super::types::{
    BnbDefaults, BranchingRule, LowerBoundingMethod, NodeOf, Problem, Region,
    UpperBoundingMethod,
};
use crate::error::Result;
use std::time::{Duration, Instant};

/// Smallest denominator used by [`rel_gap`].
pub const REL_GAP_FLOOR: f64 = 1e-16;

/// Absolute gap `ub - lb`.
pub fn abs_gap(ub: f64, lb: f64) -> f64 {
    ub - lb
}

/// Relative gap `(ub - lb) / max(min(|ub|, |lb|), 1e-16)`.
pub fn rel_gap(ub: f64, lb: f64) -> f64 {
    (ub - lb) / ub.abs().min(lb.abs()).max(REL_GAP_FLOOR)
}

/// Mutable bookkeeping for one call to [`BnbSolver::solve`].
///
/// Built fresh for every solve so a solver can be reused and nothing
/// leaks between runs.
struct SolveState<X, R> {
    queue: Vec<Node<X, R>>,
    best_x: Option<X>,
    best_ub: f64,
    best_lb: f64,
    abs_gap: f64,
    rel_gap: f64,
    node_count: u64,
    start: Instant,
    elapsed: Duration,
    trace: Vec<TraceRecord>,
    statistics: SearchStatistics,
    status: Status,
}

impl<X, R> SolveState<X, R> {
    fn new() -> Self {
        Self {
            queue: Vec::new(),
            best_x: None,
            best_ub: f64::INFINITY,
            best_lb: f64::NEG_INFINITY,
            abs_gap: f64::INFINITY,
            rel_gap: f64::INFINITY,
            node_count: 0,
            start: Instant::now(),
            elapsed: Duration::ZERO,
            trace: Vec::new(),
            statistics: SearchStatistics::default(),
            status: Status::Running,
        }
    }

    /// Drops every queued node whose bound exceeds the incumbent.
    fn filter_queue(&mut self) -> usize {
        let before = self.queue.len();
        let best_ub = self.best_ub;
        self.queue.retain(|q| q.lb <= best_ub);
        before - self.queue.len()
    }

    /// Global lower bound, or the incumbent once the queue is exhausted.
    fn queue_lower_bound(&self) -> f64 {
        if self.queue.is_empty() {
            self.best_ub
        } else {
            self.queue
                .iter()
                .map(|q| q.lb)
                .fold(f64::INFINITY, f64::min)
        }
    }
}

/// Termination status after one iteration.
///
/// Every condition is checked in turn and a later match overwrites an
/// earlier one: queue exhaustion beats the gap tests, which beat the
/// queue, node and time limits, in that order.
fn check_termination(
    config: &BnbConfig,
    elapsed: Duration,
    node_count: u64,
    queue_size: usize,
    abs_gap: f64,
    rel_gap: f64,
) -> Status {
    let mut status = Status::Running;
    if elapsed.as_secs_f64() >= config.time_limit {
        status = Status::TimeLimit;
    }
    if node_count >= config.node_limit {
        status = Status::IterLimit;
    }
    if queue_size >= config.queue_limit {
        status = Status::MemoryLimit;
    }
    if abs_gap <= config.abs_gap_tol {
        status = Status::RelativeOptimal;
    }
    if rel_gap <= config.rel_gap_tol {
        status = Status::RelativeOptimal;
    }
    if queue_size == 0 {
        status = Status::Optimal;
    }
    status
}

fn display_header() {
    log::info!("{}", "-".repeat(80));
    log::info!(
        "{:>6} | {:>6} | {:>6} | {:>9} | {:>8} | {:>8} | {:>8} | {:>8}",
        "timer",
        "tree",
        "queue",
        "node",
        "ub",
        "lb",
        "agap",
        "rgap"
    );
    log::info!("{}", "-".repeat(80));
}

fn display_inner<X, R>(state: &SolveState<X, R>, node_status: NodeStatus) {
    log::info!(
        "{:>6.2} | {:>6} | {:>6} | {:>9} | {:>8.4} | {:>8.4} | {:>8.2e} | {:>8.2e}",
        state.elapsed.as_secs_f64(),
        state.node_count,
        state.queue.len(),
        node_status.as_str(),
        state.best_ub,
        state.best_lb,
        state.abs_gap,
        state.rel_gap
    );
}

fn display_footer() {
    log::info!("{}", "-".repeat(80));
}

/// Problem-agnostic Branch-and-Bound solver.
///
/// Holds a configuration and the four pluggable components. The region
/// type `R` is fixed by the components; the root region is built with
/// [`Region::root_region`] at the start of every solve.
///
/// # Examples
///
/// ```
/// use u_bnb::bnb::{BnbConfig, BnbSolver, DepthFirst};
/// use u_bnb::instances::knapsack::{Knapsack, KnapsackBnb};
///
/// let problem = Knapsack::new(vec![10.0, 7.0, 4.0], vec![5.0, 4.0, 3.0], 8.0).unwrap();
/// let mut solver = BnbSolver::from_defaults::<KnapsackBnb>(BnbConfig::default())
///     .with_searching_rule(DepthFirst);
///
/// let result = solver.solve(&problem).unwrap();
/// assert!(result.status.is_optimal());
/// assert_eq!(result.objective_value, -14.0);
/// ```
pub struct BnbSolver<P: Problem, R> {
    config: BnbConfig,
    lb_method: Box<dyn LowerBoundingMethod<P, R>>,
    ub_method: Box<dyn UpperBoundingMethod<P, R>>,
    branching_rule: Box<dyn BranchingRule<P, R>>,
    searching_rule: Box<dyn SearchingRule<P::Point, R>>,
}

impl<P, R> BnbSolver<P, R>
where
    P: Problem,
    R: Region<P>,
{
    /// Builds a solver from explicit components.
    pub fn new(
        config: BnbConfig,
        lb_method: impl LowerBoundingMethod<P, R> + 'static,
        ub_method: impl UpperBoundingMethod<P, R> + 'static,
        branching_rule: impl BranchingRule<P, R> + 'static,
        searching_rule: impl SearchingRule<P::Point, R> + 'static,
    ) -> Self {
        Self::from_parts(
            config,
            Box::new(lb_method),
            Box::new(ub_method),
            Box::new(branching_rule),
            Box::new(searching_rule),
        )
    }

    /// Builds a solver from already boxed components.
    pub fn from_parts(
        config: BnbConfig,
        lb_method: Box<dyn LowerBoundingMethod<P, R>>,
        ub_method: Box<dyn UpperBoundingMethod<P, R>>,
        branching_rule: Box<dyn BranchingRule<P, R>>,
        searching_rule: Box<dyn SearchingRule<P::Point, R>>,
    ) -> Self {
        Self {
            config,
            lb_method,
            ub_method,
            branching_rule,
            searching_rule,
        }
    }

    /// Builds a solver from a problem family's default components.
    pub fn from_defaults<F>(config: BnbConfig) -> Self
    where
        F: BnbDefaults<P, Region = R>,
    {
        Self::from_parts(
            config,
            F::default_lower_bounding_method(),
            F::default_upper_bounding_method(),
            F::default_branching_rule(),
            F::default_searching_rule(),
        )
    }

    pub fn with_config(mut self, config: BnbConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_lower_bounding_method(
        mut self,
        method: impl LowerBoundingMethod<P, R> + 'static,
    ) -> Self {
        self.lb_method = Box::new(method);
        self
    }

    pub fn with_upper_bounding_method(
        mut self,
        method: impl UpperBoundingMethod<P, R> + 'static,
    ) -> Self {
        self.ub_method = Box::new(method);
        self
    }

    pub fn with_branching_rule(mut self, rule: impl BranchingRule<P, R> + 'static) -> Self {
        self.branching_rule = Box::new(rule);
        self
    }

    pub fn with_searching_rule(mut self, rule: impl SearchingRule<P::Point, R> + 'static) -> Self {
        self.searching_rule = Box::new(rule);
        self
    }

    pub fn config(&self) -> &BnbConfig {
        &self.config
    }

    /// Solves `problem`.
    ///
    /// Fails only if the configuration is invalid or a component refuses
    /// to initialize. Limits are checked between iterations, so a slow
    /// bounding call can run past `time_limit`.
    pub fn solve(&mut self, problem: &P) -> Result<BnbResult<P::Point>> {
        self.config.validate()?;
        self.lb_method.initialize(problem)?;
        self.ub_method.initialize(problem)?;
        self.branching_rule.initialize(problem)?;

        let mut state = SolveState::new();
        let root = Node::root(R::root_region(problem));
        self.searching_rule.add(&mut state.queue, root);

        if self.config.verbose {
            log::info!("branch-and-bound with {} search", self.searching_rule.name());
            display_header();
        }

        while state.status == Status::Running {
            let Some(mut node) = self.searching_rule.get_next(&mut state.queue) else {
                log::warn!(
                    "{} search returned no node from a queue of {}",
                    self.searching_rule.name(),
                    state.queue.len()
                );
                state.status = Status::Error;
                break;
            };

            self.process_node(problem, &mut state, &mut node);

            state.best_lb = state.queue_lower_bound();
            state.node_count += 1;
            state.abs_gap = abs_gap(state.best_ub, state.best_lb);
            state.rel_gap = rel_gap(state.best_ub, state.best_lb);
            state.elapsed = state.start.elapsed();
            state.statistics.peak_queue_size =
                state.statistics.peak_queue_size.max(state.queue.len());

            if self.config.verbose {
                display_inner(&state, node.status);
            }

            if self.config.keep_trace {
                state.trace.push(TraceRecord {
                    iteration: state.node_count,
                    elapsed_time: state.elapsed,
                    queue_size: state.queue.len(),
                    best_ub: state.best_ub,
                    best_lb: state.best_lb,
                    node_trace: std::mem::take(&mut node.trace),
                });
            }

            state.status = check_termination(
                &self.config,
                state.elapsed,
                state.node_count,
                state.queue.len(),
                state.abs_gap,
                state.rel_gap,
            );
        }

        if self.config.verbose {
            display_footer();
            log::info!(
                "status {} after {} nodes in {:.3}s, best value {}",
                state.status,
                state.node_count,
                state.elapsed.as_secs_f64(),
                state.best_ub
            );
        }

        Ok(BnbResult {
            status: state.status,
            solution: state.best_x,
            objective_value: state.best_ub,
            solve_time: state.elapsed,
            iterations: state.node_count,
            trace: state.trace,
            statistics: state.statistics,
        })
    }

    /// Bounds one node, then prunes it or updates the incumbent and
    /// branches.
    fn process_node(
        &mut self,
        problem: &P,
        state: &mut SolveState<P::Point, R>,
        node: &mut NodeOf<P, R>,
    ) {
        self.lb_method.bound(problem, node);
        state.statistics.max_depth = state.statistics.max_depth.max(node.level);

        if node.lb > state.best_ub {
            node.status = NodeStatus::Pruned;
            state.statistics.nodes_pruned += 1;
            return;
        }
        node.status = NodeStatus::Processed;

        let feas_tol = self.config.feas_tol;
        let candidate = match node.x.as_ref() {
            Some(x) if problem.is_feasible(x, feas_tol) => Some((x.clone(), node.lb)),
            _ => {
                let x = self.ub_method.bound(problem, node);
                if problem.is_feasible(&x, feas_tol) {
                    let value = problem.value(&x);
                    Some((x, value))
                } else {
                    None
                }
            }
        };

        if let Some((x, ub)) = candidate {
            if ub < state.best_ub {
                node.status = NodeStatus::Feasible;
                state.best_x = Some(x);
                state.best_ub = ub;
                state.statistics.incumbent_updates += 1;
                let filtered = state.filter_queue();
                state.statistics.nodes_filtered += filtered as u64;
                log::debug!(
                    "new incumbent {:.6e} at level {}, filtered {} queued nodes",
                    ub,
                    node.level,
                    filtered
                );
            }
        }

        if abs_gap(state.best_ub, node.lb) > self.config.abs_gap_tol
            && rel_gap(state.best_ub, node.lb) > self.config.rel_gap_tol
        {
            let children = self.branching_rule.branch(problem, node);
            state.statistics.nodes_branched += 1;
            state.statistics.children_generated += children.len() as u64;
            for child in children {
                self.searching_rule.add(&mut state.queue, child);
            }
        }
    }
}
