//! Ready-made problem families built on the [`bnb`](crate::bnb) engine.
//!
//! - [`binary`]: regions and strategies for problems with 0-1 variables.
//! - [`knapsack`]: the 0-1 knapsack with a closed-form LP relaxation.

pub mod binary;
pub mod knapsack;
