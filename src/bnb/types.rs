//! Core traits for Branch-and-Bound.
//!
//! The solver only sees a problem through [`Problem`] and a search space
//! through [`Region`]. Everything problem-specific lives behind the three
//! strategy traits, [`LowerBoundingMethod`], [`UpperBoundingMethod`] and
//! [`BranchingRule`]. Node ordering is covered separately by
//! [`SearchingRule`](super::SearchingRule).

use super::node::Node;
use super::search::SearchingRule;
use crate::error::Result;

/// Shorthand for a node of problem `P` over regions `R`.
pub type NodeOf<P, R> = Node<<P as Problem>::Point, R>;

/// A minimization problem.
///
/// # Examples
///
/// ```
/// use u_bnb::bnb::Problem;
///
/// /// Minimize x over {0, 1}.
/// struct Identity;
///
/// impl Problem for Identity {
///     type Point = f64;
///
///     fn value(&self, x: &f64) -> f64 {
///         *x
///     }
///
///     fn is_feasible(&self, x: &f64, feas_tol: f64) -> bool {
///         x.abs() <= feas_tol || (x - 1.0).abs() <= feas_tol
///     }
/// }
///
/// assert!(Identity.is_feasible(&1.0, 1e-8));
/// assert!(!Identity.is_feasible(&0.5, 1e-8));
/// ```
pub trait Problem {
    /// Point representation. Cloned when it becomes the incumbent.
    type Point: Clone;

    /// Objective value at a feasible point. Lower is better.
    fn value(&self, x: &Self::Point) -> f64;

    /// Whether `x` satisfies every constraint within `feas_tol`.
    fn is_feasible(&self, x: &Self::Point, feas_tol: f64) -> bool;
}

/// A subregion of a problem's search space.
///
/// Regions are plain values: branching builds new ones for the children
/// instead of editing the parent's.
pub trait Region<P: Problem>: Sized {
    /// The region covering the whole search space of `problem`.
    fn root_region(problem: &P) -> Self;
}

/// Computes a lower bound for a node.
///
/// Implementations write `node.lb` and `node.x` in place. When no bound
/// can be certified (for instance an infeasible relaxation), set
/// `node.lb = f64::NEG_INFINITY`: the node then stays eligible for
/// exploration instead of being pruned.
pub trait LowerBoundingMethod<P: Problem, R> {
    /// Prepares the method for `problem`. Called once per solve.
    fn initialize(&mut self, _problem: &P) -> Result<()> {
        Ok(())
    }

    /// Bounds `node` in place.
    fn bound(&mut self, problem: &P, node: &mut NodeOf<P, R>);
}

/// Builds a candidate solution for the full problem from a bounded node.
pub trait UpperBoundingMethod<P: Problem, R> {
    /// Prepares the method for `problem`. Called once per solve.
    fn initialize(&mut self, _problem: &P) -> Result<()> {
        Ok(())
    }

    /// Returns a candidate point, typically by repairing or rounding
    /// `node.x`. The node is not modified.
    fn bound(&mut self, problem: &P, node: &NodeOf<P, R>) -> P::Point;
}

/// Splits a node's region into child nodes.
///
/// Children must sit at `node.level + 1` and cover strictly smaller
/// regions so that the recursion ends. An empty vector marks a leaf.
pub trait BranchingRule<P: Problem, R> {
    /// Prepares the rule for `problem`. Called once per solve.
    fn initialize(&mut self, _problem: &P) -> Result<()> {
        Ok(())
    }

    /// Produces the children of `node`.
    ///
    /// The node is borrowed mutably so the rule can record diagnostics in
    /// `node.trace`; its region, level, bound and point are left alone.
    fn branch(&mut self, problem: &P, node: &mut NodeOf<P, R>) -> Vec<NodeOf<P, R>>;
}

/// Default components for one problem family.
///
/// A family bundles a region type with the strategies that suit it, so a
/// solver can be built with
/// [`BnbSolver::from_defaults`](super::BnbSolver::from_defaults) and then
/// selectively overridden.
pub trait BnbDefaults<P: Problem> {
    /// Region type used by this family.
    type Region: Region<P> + 'static;

    fn default_lower_bounding_method() -> Box<dyn LowerBoundingMethod<P, Self::Region>>;

    fn default_upper_bounding_method() -> Box<dyn UpperBoundingMethod<P, Self::Region>>;

    fn default_branching_rule() -> Box<dyn BranchingRule<P, Self::Region>>;

    /// Best-first unless the family says otherwise.
    fn default_searching_rule() -> Box<dyn SearchingRule<P::Point, Self::Region>> {
        Box::new(super::search::BestFirst)
    }
}
