//! Problem-agnostic Branch-and-Bound.
//!
//! The [`bnb`] module holds the search engine. A problem supplies an
//! objective and a feasibility test through [`bnb::Problem`]; four
//! pluggable strategies decide how nodes are bounded from below, how
//! feasible points are recovered, how regions are split, and in which
//! order the open nodes are explored.
//!
//! [`instances`] ships reference problem families that plug into the
//! engine, and [`error`] the crate-wide error type.
//!
//! # Architecture
//!
//! The engine contains no domain-specific concepts. Regions, relaxations
//! and branching policies are all defined by consumers, either by hand or
//! by bundling them as a [`bnb::BnbDefaults`] family.

pub mod bnb;
pub mod error;
pub mod instances;
