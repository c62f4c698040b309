//! 0-1 knapsack as a Branch-and-Bound problem family.
//!
//! Maximizing the packed value is expressed as minimizing its negation:
//!
//! ```text
//! min  -sum(v_i x_i)
//! s.t.  sum(w_i x_i) <= C
//!       x_i in {0, 1}
//! ```
//!
//! The lower bound is the Dantzig LP relaxation, which has a closed form:
//! free items are packed by decreasing value/weight ratio and the first
//! item that does not fit is taken fractionally.
//!
//! # References
//!
//! - Dantzig (1957), "Discrete-Variable Extremum Problems"
//! - Martello & Toth (1990), "Knapsack Problems: Algorithms and Computer
//!   Implementations", Chapter 2

use super::binary::{BinaryProblem, BinaryRegion, MostFractionalBranching};
use crate::bnb::{
    BnbDefaults, BranchingRule, LowerBoundingMethod, Node, Problem, UpperBoundingMethod,
};
use crate::error::{BnbError, Result};

/// Slack used when reading a relaxed entry as "already 1".
const ROUND_TOL: f64 = 1e-9;

/// A 0-1 knapsack instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Knapsack {
    values: Vec<f64>,
    weights: Vec<f64>,
    capacity: f64,
    items: Vec<usize>,
}

impl Knapsack {
    /// Creates an instance.
    ///
    /// # Errors
    ///
    /// [`BnbError::InvalidProblem`] if `values` and `weights` differ in
    /// length, or if any value, weight or the capacity is negative or not
    /// finite.
    pub fn new(values: Vec<f64>, weights: Vec<f64>, capacity: f64) -> Result<Self> {
        if values.len() != weights.len() {
            return Err(BnbError::InvalidProblem(format!(
                "{} values but {} weights",
                values.len(),
                weights.len()
            )));
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite() || *v < 0.0) {
            return Err(BnbError::InvalidProblem(format!(
                "value of item {i} must be finite and non-negative, got {}",
                values[i]
            )));
        }
        if let Some(i) = weights.iter().position(|w| !w.is_finite() || *w < 0.0) {
            return Err(BnbError::InvalidProblem(format!(
                "weight of item {i} must be finite and non-negative, got {}",
                weights[i]
            )));
        }
        if !capacity.is_finite() || capacity < 0.0 {
            return Err(BnbError::InvalidProblem(format!(
                "capacity must be finite and non-negative, got {capacity}"
            )));
        }

        let items = (0..values.len()).collect();
        Ok(Self {
            values,
            weights,
            capacity,
            items,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Total value packed by `x`.
    pub fn total_value(&self, x: &[f64]) -> f64 {
        self.values.iter().zip(x).map(|(v, xi)| v * xi).sum()
    }

    /// Total weight packed by `x`.
    pub fn total_weight(&self, x: &[f64]) -> f64 {
        self.weights.iter().zip(x).map(|(w, xi)| w * xi).sum()
    }

    /// Item indices by decreasing value/weight ratio, ties by index.
    ///
    /// Zero-weight items come first.
    pub fn ratio_order(&self) -> Vec<usize> {
        let ratio = |i: usize| {
            if self.weights[i] == 0.0 {
                f64::INFINITY
            } else {
                self.values[i] / self.weights[i]
            }
        };
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| ratio(b).total_cmp(&ratio(a)));
        order
    }
}

impl Problem for Knapsack {
    type Point = Vec<f64>;

    fn value(&self, x: &Vec<f64>) -> f64 {
        -self.total_value(x)
    }

    fn is_feasible(&self, x: &Vec<f64>, feas_tol: f64) -> bool {
        x.len() == self.len()
            && x.iter()
                .all(|v| v.abs() <= feas_tol || (v - 1.0).abs() <= feas_tol)
            && self.total_weight(x) <= self.capacity + feas_tol
    }
}

impl BinaryProblem for Knapsack {
    fn dimension(&self) -> usize {
        self.len()
    }

    fn binary_indices(&self) -> &[usize] {
        &self.items
    }
}

/// What the relaxation reports for a region whose fixed items alone
/// overflow the capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InfeasibleRegion {
    /// Report `lb = +inf`. The region is empty, so the node is pruned as
    /// soon as an incumbent exists and is never branched.
    #[default]
    Prune,

    /// Report `lb = -inf`, treating the region as unbounded. The node is
    /// never pruned and its whole subtree is enumerated down to the
    /// leaves. This mirrors relaxations that only signal "no certified
    /// bound".
    KeepOpen,
}

/// Dantzig LP relaxation with the region's fixings applied.
///
/// Writes `relaxation` (`"optimal"` or `"infeasible"`) to the node trace,
/// plus `fractional_item` when one item is taken partially.
#[derive(Debug, Clone, Default)]
pub struct DantzigRelaxation {
    infeasible: InfeasibleRegion,
    order: Vec<usize>,
}

impl DantzigRelaxation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_infeasible_region(mut self, infeasible: InfeasibleRegion) -> Self {
        self.infeasible = infeasible;
        self
    }
}

impl LowerBoundingMethod<Knapsack, BinaryRegion> for DantzigRelaxation {
    fn initialize(&mut self, problem: &Knapsack) -> Result<()> {
        self.order = problem.ratio_order();
        Ok(())
    }

    fn bound(&mut self, problem: &Knapsack, node: &mut Node<Vec<f64>, BinaryRegion>) {
        if self.order.len() != problem.len() {
            self.order = problem.ratio_order();
        }

        let mut x = vec![0.0; problem.len()];
        node.region.apply(&mut x);
        let mut remaining = problem.capacity() - problem.total_weight(&x);

        if remaining < 0.0 {
            node.lb = match self.infeasible {
                InfeasibleRegion::Prune => f64::INFINITY,
                InfeasibleRegion::KeepOpen => f64::NEG_INFINITY,
            };
            node.x = Some(x);
            node.trace.insert("relaxation", "infeasible");
            return;
        }

        for &i in &self.order {
            if node.region.is_fixed(i) {
                continue;
            }
            let w = problem.weights()[i];
            if w <= remaining {
                x[i] = 1.0;
                remaining -= w;
            } else {
                x[i] = remaining / w;
                node.trace.insert("fractional_item", i);
                break;
            }
        }

        node.lb = problem.value(&x);
        node.x = Some(x);
        node.trace.insert("relaxation", "optimal");
    }
}

/// Repairs a relaxed point into a packing.
///
/// Keeps the items fixed to 1 and every item already at 1, drops
/// fractional ones, then adds free items by decreasing ratio while they
/// fit. The result is infeasible only when the fixed items overflow.
#[derive(Debug, Clone, Default)]
pub struct GreedyRepair {
    order: Vec<usize>,
}

impl GreedyRepair {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UpperBoundingMethod<Knapsack, BinaryRegion> for GreedyRepair {
    fn initialize(&mut self, problem: &Knapsack) -> Result<()> {
        self.order = problem.ratio_order();
        Ok(())
    }

    fn bound(&mut self, problem: &Knapsack, node: &Node<Vec<f64>, BinaryRegion>) -> Vec<f64> {
        if self.order.len() != problem.len() {
            self.order = problem.ratio_order();
        }

        let mut x: Vec<f64> = match node.x.as_ref() {
            Some(relaxed) if relaxed.len() == problem.len() => relaxed
                .iter()
                .map(|&v| if v >= 1.0 - ROUND_TOL { 1.0 } else { 0.0 })
                .collect(),
            _ => vec![0.0; problem.len()],
        };
        node.region.apply(&mut x);

        let mut remaining = problem.capacity() - problem.total_weight(&x);
        if remaining < 0.0 {
            return x;
        }
        for &i in &self.order {
            if x[i] == 1.0 || node.region.is_fixed(i) {
                continue;
            }
            let w = problem.weights()[i];
            if w <= remaining {
                x[i] = 1.0;
                remaining -= w;
            }
        }
        x
    }
}

/// Default components for [`Knapsack`]: Dantzig relaxation, greedy
/// repair, most-fractional branching and best-first search.
#[derive(Debug, Clone, Copy, Default)]
pub struct KnapsackBnb;

impl BnbDefaults<Knapsack> for KnapsackBnb {
    type Region = BinaryRegion;

    fn default_lower_bounding_method() -> Box<dyn LowerBoundingMethod<Knapsack, BinaryRegion>> {
        Box::new(DantzigRelaxation::new())
    }

    fn default_upper_bounding_method() -> Box<dyn UpperBoundingMethod<Knapsack, BinaryRegion>> {
        Box::new(GreedyRepair::new())
    }

    fn default_branching_rule() -> Box<dyn BranchingRule<Knapsack, BinaryRegion>> {
        Box::new(MostFractionalBranching)
    }
}
