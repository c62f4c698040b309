//! Regions and strategies shared by problems with binary variables.
//!
//! A [`BinaryRegion`] fixes some binary entries to 0 and others to 1.
//! [`MostFractionalBranching`] splits on the free entry whose relaxed value
//! is closest to 0.5, and [`RoundingUpperBound`] rounds a relaxed point
//! back onto the binaries.

use crate::bnb::{BranchingRule, Node, Problem, Region, UpperBoundingMethod};

/// A problem over `Vec<f64>` points where some entries must be 0 or 1.
pub trait BinaryProblem: Problem<Point = Vec<f64>> {
    /// Number of entries in a point.
    fn dimension(&self) -> usize;

    /// Indices of the entries restricted to {0, 1}.
    fn binary_indices(&self) -> &[usize];
}

/// Binary entries fixed to 0 or to 1. Everything else is free.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinaryRegion {
    pub fixed_to_zero: Vec<usize>,
    pub fixed_to_one: Vec<usize>,
}

impl BinaryRegion {
    /// The region with nothing fixed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value entry `i` is fixed to, if any.
    pub fn fixed_value(&self, i: usize) -> Option<f64> {
        if self.fixed_to_one.contains(&i) {
            Some(1.0)
        } else if self.fixed_to_zero.contains(&i) {
            Some(0.0)
        } else {
            None
        }
    }

    pub fn is_fixed(&self, i: usize) -> bool {
        self.fixed_value(i).is_some()
    }

    pub fn num_fixed(&self) -> usize {
        self.fixed_to_zero.len() + self.fixed_to_one.len()
    }

    /// A copy of this region with entry `i` additionally fixed.
    pub fn fix(&self, i: usize, one: bool) -> Self {
        let mut region = self.clone();
        if one {
            region.fixed_to_one.push(i);
        } else {
            region.fixed_to_zero.push(i);
        }
        region
    }

    /// Overwrites the fixed entries of `x` with their fixed values.
    pub fn apply(&self, x: &mut [f64]) {
        for &i in &self.fixed_to_zero {
            if let Some(v) = x.get_mut(i) {
                *v = 0.0;
            }
        }
        for &i in &self.fixed_to_one {
            if let Some(v) = x.get_mut(i) {
                *v = 1.0;
            }
        }
    }
}

impl<P: BinaryProblem> Region<P> for BinaryRegion {
    fn root_region(_problem: &P) -> Self {
        Self::new()
    }
}

/// Branches on the free binary whose relaxed value is closest to 0.5.
///
/// Ties go to the index listed first by
/// [`BinaryProblem::binary_indices`]. The down child (entry fixed to 0)
/// comes before the up child. Both children inherit the parent's bound
/// and a copy of its point with the branched entry set to the fixed value.
/// The chosen index is recorded as `branch_index` in the parent's trace.
#[derive(Debug, Clone, Copy, Default)]
pub struct MostFractionalBranching;

impl MostFractionalBranching {
    fn select<P: BinaryProblem>(problem: &P, node: &Node<Vec<f64>, BinaryRegion>) -> Option<usize> {
        let fractionality = |i: usize| {
            let xi = node
                .x
                .as_ref()
                .and_then(|x| x.get(i).copied())
                .unwrap_or(0.5);
            (xi - 0.5).abs()
        };

        let mut best: Option<(usize, f64)> = None;
        for &i in problem.binary_indices() {
            if node.region.is_fixed(i) {
                continue;
            }
            let score = fractionality(i);
            if best.is_none_or(|(_, s)| score < s) {
                best = Some((i, score));
            }
        }
        best.map(|(i, _)| i)
    }
}

impl<P: BinaryProblem> BranchingRule<P, BinaryRegion> for MostFractionalBranching {
    fn branch(
        &mut self,
        problem: &P,
        node: &mut Node<Vec<f64>, BinaryRegion>,
    ) -> Vec<Node<Vec<f64>, BinaryRegion>> {
        let Some(i) = Self::select(problem, node) else {
            return Vec::new();
        };
        node.trace.insert("branch_index", i);

        [false, true]
            .into_iter()
            .map(|one| {
                let mut child = node.child(node.region.fix(i, one));
                if let Some(v) = child.x.as_mut().and_then(|x| x.get_mut(i)) {
                    *v = if one { 1.0 } else { 0.0 };
                }
                child
            })
            .collect()
    }
}

/// Clips every binary entry of the relaxed point to [0, 1] and rounds it.
///
/// Fixed entries take their fixed value. Without a relaxed point the
/// candidate starts from all zeros.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundingUpperBound;

impl<P: BinaryProblem> UpperBoundingMethod<P, BinaryRegion> for RoundingUpperBound {
    fn bound(&mut self, problem: &P, node: &Node<Vec<f64>, BinaryRegion>) -> Vec<f64> {
        let mut x = node
            .x
            .clone()
            .unwrap_or_else(|| vec![0.0; problem.dimension()]);
        for &i in problem.binary_indices() {
            if let Some(v) = x.get_mut(i) {
                *v = v.clamp(0.0, 1.0).round();
            }
        }
        node.region.apply(&mut x);
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bnb::{BnbConfig, BnbSolver, BreadthFirst, LowerBoundingMethod, TraceValue};

    /// Minimize `c.x` over {0, 1}^n.
    struct Linear {
        costs: Vec<f64>,
        binaries: Vec<usize>,
    }

    impl Problem for Linear {
        type Point = Vec<f64>;

        fn value(&self, x: &Vec<f64>) -> f64 {
            self.costs.iter().zip(x).map(|(c, v)| c * v).sum()
        }

        fn is_feasible(&self, x: &Vec<f64>, feas_tol: f64) -> bool {
            x.len() == self.costs.len()
                && x.iter()
                    .all(|v| v.abs() <= feas_tol || (v - 1.0).abs() <= feas_tol)
        }
    }

    impl BinaryProblem for Linear {
        fn dimension(&self) -> usize {
            self.costs.len()
        }

        fn binary_indices(&self) -> &[usize] {
            &self.binaries
        }
    }

    /// Box relaxation: free entries at 0.5, bound is the exact minimum.
    struct BoxRelaxation;

    impl LowerBoundingMethod<Linear, BinaryRegion> for BoxRelaxation {
        fn bound(&mut self, problem: &Linear, node: &mut Node<Vec<f64>, BinaryRegion>) {
            let mut x = vec![0.5; problem.dimension()];
            node.region.apply(&mut x);
            node.lb = problem
                .costs
                .iter()
                .zip(&x)
                .map(|(&c, &v)| if v == 0.5 { c.min(0.0) } else { c * v })
                .sum();
            node.x = Some(x);
        }
    }

    fn linear(costs: Vec<f64>) -> Linear {
        let binaries = (0..costs.len()).collect();
        Linear { costs, binaries }
    }

    #[test]
    fn test_region_fix_and_apply() {
        let root = BinaryRegion::new();
        let region = root.fix(2, true).fix(0, false);
        assert!(root.fixed_to_one.is_empty());
        assert_eq!(region.fixed_value(2), Some(1.0));
        assert_eq!(region.fixed_value(0), Some(0.0));
        assert_eq!(region.fixed_value(1), None);
        assert_eq!(region.num_fixed(), 2);

        let mut x = vec![0.3, 0.4, 0.5];
        region.apply(&mut x);
        assert_eq!(x, vec![0.0, 0.4, 1.0]);
    }

    #[test]
    fn test_most_fractional_selection() {
        let problem = linear(vec![1.0, 1.0, 1.0, 1.0]);
        let mut node = Node::root(BinaryRegion::new()).with_x(vec![0.9, 0.4, 0.6, 0.0]);
        node.lb = -2.0;
        node.level = 3;

        let children = MostFractionalBranching.branch(&problem, &mut node);
        assert_eq!(children.len(), 2);
        // 0.4 and 0.6 tie; the earlier index wins.
        assert_eq!(node.trace.get("branch_index"), Some(&TraceValue::Int(1)));

        let (down, up) = (&children[0], &children[1]);
        assert_eq!(down.region.fixed_to_zero, vec![1]);
        assert_eq!(up.region.fixed_to_one, vec![1]);
        assert_eq!(down.x.as_ref().unwrap()[1], 0.0);
        assert_eq!(up.x.as_ref().unwrap()[1], 1.0);
        assert_eq!(up.x.as_ref().unwrap()[0], 0.9);
        assert!(children.iter().all(|c| c.level == 4 && c.lb == -2.0));
    }

    #[test]
    fn test_branch_skips_fixed_and_non_binary() {
        let problem = Linear {
            costs: vec![1.0, 1.0, 1.0],
            binaries: vec![0, 2],
        };
        let region = BinaryRegion::new().fix(2, false);
        let mut node = Node::root(region).with_x(vec![1.0, 0.5, 0.5]);

        let children = MostFractionalBranching.branch(&problem, &mut node);
        assert_eq!(node.trace.get("branch_index"), Some(&TraceValue::Int(0)));
        assert_eq!(children[1].region.fixed_to_one, vec![0]);
        assert_eq!(children[1].region.fixed_to_zero, vec![2]);
    }

    #[test]
    fn test_branch_leaf_returns_empty() {
        let problem = linear(vec![1.0, 1.0]);
        let region = BinaryRegion::new().fix(0, true).fix(1, false);
        let mut node = Node::root(region).with_x(vec![1.0, 0.0]);

        assert!(MostFractionalBranching.branch(&problem, &mut node).is_empty());
        assert!(node.trace.is_empty());
    }

    #[test]
    fn test_rounding_clips_and_respects_fixings() {
        let problem = linear(vec![1.0, 1.0, 1.0, 1.0]);
        let region = BinaryRegion::new().fix(3, true);
        let node = Node::root(region).with_x(vec![1.7, -0.2, 0.4, 0.1]);

        let x = RoundingUpperBound.bound(&problem, &node);
        assert_eq!(x, vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_rounding_without_point() {
        let problem = linear(vec![1.0, 1.0]);
        let node = Node::root(BinaryRegion::new().fix(1, true));
        let x = RoundingUpperBound.bound(&problem, &node);
        assert_eq!(x, vec![0.0, 1.0]);
    }

    #[test]
    fn test_linear_binary_end_to_end() {
        let problem = linear(vec![2.0, -1.0, 3.0, -4.0]);
        let mut solver = BnbSolver::new(
            BnbConfig::default(),
            BoxRelaxation,
            RoundingUpperBound,
            MostFractionalBranching,
            BreadthFirst,
        );

        let result = solver.solve(&problem).unwrap();
        assert!(result.status.is_optimal());
        assert_eq!(result.objective_value, -5.0);
        assert_eq!(result.solution, Some(vec![0.0, 1.0, 0.0, 1.0]));
    }
}
