//! Search-tree nodes and their diagnostic trace payload.

use std::collections::BTreeMap;
use std::fmt;

/// Processing status of a [`Node`].
///
/// Every node starts [`Open`](NodeStatus::Open). The solver sets exactly one
/// of the other three values when it visits the node, and the node is
/// finished after that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeStatus {
    /// Waiting in the queue.
    Open,
    /// Discarded because its lower bound exceeds the incumbent.
    Pruned,
    /// Produced a new incumbent.
    Feasible,
    /// Bounded (and possibly branched) without improving the incumbent.
    Processed,
}

impl NodeStatus {
    /// Lowercase label used in progress output.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Open => "open",
            NodeStatus::Pruned => "pruned",
            NodeStatus::Feasible => "feasible",
            NodeStatus::Processed => "processed",
        }
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar value stored in a [`NodeTrace`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TraceValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<bool> for TraceValue {
    fn from(v: bool) -> Self {
        TraceValue::Bool(v)
    }
}

impl From<i64> for TraceValue {
    fn from(v: i64) -> Self {
        TraceValue::Int(v)
    }
}

impl From<usize> for TraceValue {
    fn from(v: usize) -> Self {
        TraceValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f64> for TraceValue {
    fn from(v: f64) -> Self {
        TraceValue::Float(v)
    }
}

impl From<&str> for TraceValue {
    fn from(v: &str) -> Self {
        TraceValue::Text(v.to_owned())
    }
}

impl From<String> for TraceValue {
    fn from(v: String) -> Self {
        TraceValue::Text(v)
    }
}

/// Strategy-owned diagnostics attached to a node.
///
/// Bounding and branching strategies write whatever keys they like; the
/// solver only moves the payload into the per-iteration
/// [`TraceRecord`](super::TraceRecord). Keys are kept sorted so traces
/// compare and print deterministically.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeTrace {
    entries: BTreeMap<String, TraceValue>,
}

impl NodeTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<TraceValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&TraceValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TraceValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A vertex of the Branch-and-Bound tree.
///
/// `X` is the problem's point type and `R` the region type. A node owns
/// its region by value; children receive fresh regions from the
/// [`BranchingRule`](super::BranchingRule) and never share the parent's.
///
/// `lb` is `-inf` until the node's single lower-bounding call, unless the
/// branching rule seeded it with the parent's bound as an estimate.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node<X, R> {
    /// Processing status.
    pub status: NodeStatus,

    /// Subregion of the search space covered by this node.
    pub region: R,

    /// Depth in the tree. The root is at level 0.
    pub level: usize,

    /// Candidate point. A warm start on creation, then the lower-bounding
    /// solution once bounded.
    pub x: Option<X>,

    /// Lower bound on the objective over `region`.
    pub lb: f64,

    /// Strategy diagnostics, forwarded verbatim to the solver trace.
    pub trace: NodeTrace,
}

impl<X, R> Node<X, R> {
    /// Creates an open node with no candidate and an unknown bound.
    pub fn new(region: R, level: usize) -> Self {
        Self {
            status: NodeStatus::Open,
            region,
            level,
            x: None,
            lb: f64::NEG_INFINITY,
            trace: NodeTrace::new(),
        }
    }

    /// Creates the level-0 node for a root region.
    pub fn root(region: R) -> Self {
        Self::new(region, 0)
    }

    /// Creates a child one level below `self`, warm-started from the
    /// parent's candidate point and lower bound.
    pub fn child(&self, region: R) -> Self
    where
        X: Clone,
    {
        Self {
            status: NodeStatus::Open,
            region,
            level: self.level + 1,
            x: self.x.clone(),
            lb: self.lb,
            trace: NodeTrace::new(),
        }
    }

    /// Sets the warm-start point.
    pub fn with_x(mut self, x: X) -> Self {
        self.x = Some(x);
        self
    }

    /// Sets the initial lower-bound estimate.
    pub fn with_lb(mut self, lb: f64) -> Self {
        self.lb = lb;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_node() {
        let root: Node<f64, ()> = Node::root(());
        assert_eq!(root.status, NodeStatus::Open);
        assert_eq!(root.level, 0);
        assert!(root.x.is_none());
        assert_eq!(root.lb, f64::NEG_INFINITY);
        assert!(root.trace.is_empty());
    }

    #[test]
    fn test_child_inherits_warm_start() {
        let mut parent: Node<Vec<f64>, u8> = Node::root(0).with_x(vec![0.5, 1.0]);
        parent.lb = 3.0;
        parent.status = NodeStatus::Processed;
        parent.trace.insert("parent_only", true);

        let child = parent.child(1);
        assert_eq!(child.level, 1);
        assert_eq!(child.region, 1);
        assert_eq!(child.x, Some(vec![0.5, 1.0]));
        assert_eq!(child.lb, 3.0);
        assert_eq!(child.status, NodeStatus::Open);
        assert!(child.trace.is_empty());
    }

    #[test]
    fn test_trace_insert_overwrites() {
        let mut trace = NodeTrace::new();
        trace.insert("relaxation", "optimal");
        trace.insert("branch_index", 3usize);
        trace.insert("relaxation", "infeasible");

        assert_eq!(trace.len(), 2);
        assert_eq!(
            trace.get("relaxation"),
            Some(&TraceValue::Text("infeasible".into()))
        );
        assert_eq!(trace.get("branch_index"), Some(&TraceValue::Int(3)));

        let keys: Vec<&str> = trace.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["branch_index", "relaxation"]);
    }

    #[test]
    fn test_node_status_labels() {
        assert_eq!(NodeStatus::Pruned.to_string(), "pruned");
        assert_eq!(NodeStatus::Feasible.as_str(), "feasible");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_node_derives_serde() {
        fn assert_serde<T: serde::Serialize + serde::de::DeserializeOwned>() {}
        assert_serde::<Node<Vec<f64>, Vec<usize>>>();
        assert_serde::<NodeTrace>();
    }
}
