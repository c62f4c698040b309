//! Branch-and-Bound (BnB).
//!
//! Implicit enumeration over a tree of subregions. Each iteration takes
//! one node from the queue, bounds it from below, and then either prunes
//! it against the incumbent or tries to improve the incumbent and splits
//! the node's region into children.
//!
//! The engine knows nothing about the problem beyond [`Problem`]. Bound
//! quality and branching policy come entirely from the plugged-in
//! [`LowerBoundingMethod`], [`UpperBoundingMethod`] and [`BranchingRule`];
//! exploration order comes from the [`SearchingRule`].
//!
//! # Termination
//!
//! After every iteration the limits and tolerances are checked in a fixed
//! order, a later match overriding an earlier one:
//! time limit, node limit, queue limit, absolute gap, relative gap,
//! queue exhausted.
//!
//! # References
//!
//! - Land & Doig (1960), "An Automatic Method of Solving Discrete
//!   Programming Problems"
//! - Morrison, Jacobson, Sauppe & Sewell (2016), "Branch-and-bound
//!   algorithms: A survey of recent advances in searching, branching, and
//!   pruning"

mod config;
mod node;
mod result;
mod runner;
mod search;
mod types;

pub use config::BnbConfig;
pub use node::{Node, NodeStatus, NodeTrace, TraceValue};
pub use result::{BnbResult, SearchStatistics, Status, TraceRecord};
pub use runner::{abs_gap, rel_gap, BnbSolver, REL_GAP_FLOOR};
pub use search::{BestFirst, BreadthFirst, DepthFirst, RandomSearch, SearchingRule, WorstFirst};
pub use types::{
    BnbDefaults, BranchingRule, LowerBoundingMethod, NodeOf, Problem, Region, UpperBoundingMethod,
};
