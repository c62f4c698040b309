//! Node selection rules.
//!
//! Every rule appends on [`add`](SearchingRule::add); they only differ in
//! which node [`get_next`](SearchingRule::get_next) removes. Best- and
//! worst-first scan the queue linearly so that, among nodes with equal
//! bounds, the one inserted first is always returned.

use super::node::Node;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Queue-management policy over open nodes.
pub trait SearchingRule<X, R> {
    /// Inserts an open node.
    fn add(&mut self, queue: &mut Vec<Node<X, R>>, node: Node<X, R>) {
        queue.push(node);
    }

    /// Removes and returns the next node to explore, or `None` if the
    /// queue is empty.
    fn get_next(&mut self, queue: &mut Vec<Node<X, R>>) -> Option<Node<X, R>>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// Index of the first node whose bound wins against every earlier one.
///
/// `better(a, b)` must be a strict comparison so that ties keep the
/// earlier index.
fn first_extreme<X, R>(queue: &[Node<X, R>], better: impl Fn(f64, f64) -> bool) -> Option<usize> {
    let mut iter = queue.iter().enumerate();
    let (mut best_idx, first) = iter.next()?;
    let mut best_lb = first.lb;
    for (i, node) in iter {
        if better(node.lb, best_lb) {
            best_idx = i;
            best_lb = node.lb;
        }
    }
    Some(best_idx)
}

/// Explores the node with the smallest lower bound first.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestFirst;

impl<X, R> SearchingRule<X, R> for BestFirst {
    fn get_next(&mut self, queue: &mut Vec<Node<X, R>>) -> Option<Node<X, R>> {
        let idx = first_extreme(queue, |a, b| a < b)?;
        Some(queue.remove(idx))
    }

    fn name(&self) -> &str {
        "best-first"
    }
}

/// Explores the node with the largest lower bound first.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorstFirst;

impl<X, R> SearchingRule<X, R> for WorstFirst {
    fn get_next(&mut self, queue: &mut Vec<Node<X, R>>) -> Option<Node<X, R>> {
        let idx = first_extreme(queue, |a, b| a > b)?;
        Some(queue.remove(idx))
    }

    fn name(&self) -> &str {
        "worst-first"
    }
}

/// First in, first out.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreadthFirst;

impl<X, R> SearchingRule<X, R> for BreadthFirst {
    fn get_next(&mut self, queue: &mut Vec<Node<X, R>>) -> Option<Node<X, R>> {
        if queue.is_empty() {
            None
        } else {
            Some(queue.remove(0))
        }
    }

    fn name(&self) -> &str {
        "breadth-first"
    }
}

/// Last in, first out.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthFirst;

impl<X, R> SearchingRule<X, R> for DepthFirst {
    fn get_next(&mut self, queue: &mut Vec<Node<X, R>>) -> Option<Node<X, R>> {
        queue.pop()
    }

    fn name(&self) -> &str {
        "depth-first"
    }
}

/// Picks a queued node uniformly at random.
///
/// Runs are only reproducible when built with [`RandomSearch::with_seed`].
#[derive(Debug, Clone)]
pub struct RandomSearch {
    rng: StdRng,
}

impl RandomSearch {
    /// Seeds from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl<X, R> SearchingRule<X, R> for RandomSearch {
    fn get_next(&mut self, queue: &mut Vec<Node<X, R>>) -> Option<Node<X, R>> {
        if queue.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..queue.len());
        Some(queue.remove(idx))
    }

    fn name(&self) -> &str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Nodes tagged by their region so tests can check identity.
    fn node(tag: usize, lb: f64) -> Node<(), usize> {
        Node::root(tag).with_lb(lb)
    }

    fn drain<S: SearchingRule<(), usize>>(rule: &mut S, nodes: Vec<Node<(), usize>>) -> Vec<usize> {
        let mut queue = Vec::new();
        for n in nodes {
            rule.add(&mut queue, n);
        }
        let mut order = Vec::new();
        while let Some(n) = rule.get_next(&mut queue) {
            order.push(n.region);
        }
        order
    }

    #[test]
    fn test_breadth_first_fifo() {
        let order = drain(&mut BreadthFirst, vec![node(0, 0.0), node(1, 0.0), node(2, 0.0)]);
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_depth_first_lifo() {
        let order = drain(&mut DepthFirst, vec![node(0, 0.0), node(1, 0.0), node(2, 0.0)]);
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn test_best_first_min_lb() {
        let mut queue = vec![node(0, 5.0), node(1, 2.0), node(2, 8.0)];
        let first = BestFirst.get_next(&mut queue).unwrap();
        assert_eq!(first.region, 1);
        assert_eq!(first.lb, 2.0);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_best_first_ties_earliest() {
        let order = drain(
            &mut BestFirst,
            vec![node(0, 3.0), node(1, 1.0), node(2, 1.0), node(3, 3.0)],
        );
        assert_eq!(order, vec![1, 2, 0, 3]);
    }

    #[test]
    fn test_worst_first_max_lb() {
        let order = drain(
            &mut WorstFirst,
            vec![node(0, 5.0), node(1, 2.0), node(2, 8.0), node(3, 8.0)],
        );
        assert_eq!(order, vec![2, 3, 0, 1]);
    }

    #[test]
    fn test_best_first_neg_infinity_first() {
        let order = drain(
            &mut BestFirst,
            vec![node(0, 1.0), node(1, f64::NEG_INFINITY), node(2, -5.0)],
        );
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_empty_queue_returns_none() {
        let mut queue: Vec<Node<(), usize>> = Vec::new();
        assert!(BestFirst.get_next(&mut queue).is_none());
        assert!(WorstFirst.get_next(&mut queue).is_none());
        assert!(BreadthFirst.get_next(&mut queue).is_none());
        assert!(DepthFirst.get_next(&mut queue).is_none());
        assert!(RandomSearch::with_seed(1).get_next(&mut queue).is_none());
    }

    #[test]
    fn test_random_visits_every_node_once() {
        let nodes = (0..20).map(|i| node(i, 0.0)).collect();
        let mut order = drain(&mut RandomSearch::with_seed(7), nodes);
        order.sort_unstable();
        assert_eq!(order, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_random_seed_reproducible() {
        let a = drain(
            &mut RandomSearch::with_seed(42),
            (0..10).map(|i| node(i, 0.0)).collect(),
        );
        let b = drain(
            &mut RandomSearch::with_seed(42),
            (0..10).map(|i| node(i, 0.0)).collect(),
        );
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_best_first_matches_linear_scan(lbs in prop::collection::vec(-3i32..3, 1..30)) {
            let mut queue: Vec<Node<(), usize>> = lbs
                .iter()
                .enumerate()
                .map(|(i, &lb)| node(i, lb as f64))
                .collect();
            let min = *lbs.iter().min().unwrap();
            let expected = lbs.iter().position(|&lb| lb == min).unwrap();

            let picked = BestFirst.get_next(&mut queue).unwrap();
            prop_assert_eq!(picked.region, expected);
            prop_assert_eq!(queue.len(), lbs.len() - 1);
        }

        #[test]
        fn prop_worst_first_matches_linear_scan(lbs in prop::collection::vec(-3i32..3, 1..30)) {
            let mut queue: Vec<Node<(), usize>> = lbs
                .iter()
                .enumerate()
                .map(|(i, &lb)| node(i, lb as f64))
                .collect();
            let max = *lbs.iter().max().unwrap();
            let expected = lbs.iter().position(|&lb| lb == max).unwrap();

            let picked = WorstFirst.get_next(&mut queue).unwrap();
            prop_assert_eq!(picked.region, expected);
        }
    }
}
