//! FILENAME: core/pivot-table/src/node.rs
//! Pivot Axis - the row or column group tree.
//!
//! Nodes live in an arena owned by `PivotAxis` and are addressed by `NodeId`.
//! A parent owns the ids of its children; the `parent` link is a plain id
//! back-reference used for paths, sibling index and ancestor aggregation.
//!
//! Each node represents one distinct key of one grouping field at one level
//! of nesting and carries its own `Aggregator`. The root has no key.
//!
//! Mutation goes through `PivotAxis`; reading goes through the `NodeRef`
//! handle returned by `PivotAxis::root` / `PivotAxis::node`.

use std::cmp::Ordering;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::aggregator::{AggregationType, Aggregator};
use crate::error::{PivotError, PivotResult};
use crate::field::SortOrder;
use crate::value::compare_keys;

// ============================================================================
// NODE ID / NODE
// ============================================================================

/// Handle of a node within its axis. Ids grow in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One distinct grouping value at one level of the tree.
#[derive(Debug, Clone)]
pub struct PivotNode {
    key: Option<String>,
    title: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    aggregator: Aggregator,
    /// Order applied to this node's children.
    sort_order: SortOrder,
}

impl PivotNode {
    fn new(key: Option<String>, title: String, aggregation: AggregationType, sort_order: SortOrder) -> Self {
        PivotNode {
            key,
            title,
            parent: None,
            children: Vec::new(),
            aggregator: Aggregator::new(aggregation),
            sort_order,
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

// ============================================================================
// PIVOT AXIS
// ============================================================================

/// Arena of the nodes of one dimension (rows or columns).
#[derive(Debug, Clone)]
pub struct PivotAxis {
    nodes: Vec<PivotNode>,
    /// (parent, key) -> child, for O(1) keyed lookup.
    child_index: FxHashMap<(NodeId, String), NodeId>,
    aggregation: AggregationType,
}

impl PivotAxis {
    /// Creates an axis holding only its root node.
    pub fn new(title: impl Into<String>, aggregation: AggregationType) -> Self {
        PivotAxis {
            nodes: vec![PivotNode::new(None, title.into(), aggregation, SortOrder::Ascending)],
            child_index: FxHashMap::default(),
            aggregation,
        }
    }

    /// Order for the root's children. Set before any child is added.
    pub fn with_root_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.nodes[NodeId::ROOT.index()].sort_order = sort_order;
        self
    }

    pub fn aggregation(&self) -> AggregationType {
        self.aggregation
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root exists from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            axis: self,
            id: NodeId::ROOT,
        }
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.nodes.get(id.index()).map(|_| NodeRef { axis: self, id })
    }

    pub fn get(&self, id: NodeId) -> Option<&PivotNode> {
        self.nodes.get(id.index())
    }

    fn checked(&self, id: NodeId) -> PivotResult<&PivotNode> {
        self.get(id)
            .ok_or_else(|| PivotError::InvalidArgument(format!("unknown node id {}", id.0)))
    }

    /// Direct child of `parent` with `key`.
    pub fn child_by_key(&self, parent: NodeId, key: &str) -> Option<NodeId> {
        self.child_index.get(&(parent, key.to_string())).copied()
    }

    /// Creates a detached node with a fresh aggregator of the axis type.
    pub fn create_node(&mut self, key: impl Into<String>, title: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(PivotNode::new(
            Some(key.into()),
            title.into(),
            self.aggregation,
            SortOrder::Ascending,
        ));
        id
    }

    /// Attaches `child` under `parent`, detaching it from any previous parent.
    /// The child is placed according to the parent's sort order.
    pub fn add_node(&mut self, parent: NodeId, child: NodeId) -> PivotResult<NodeId> {
        if parent == child {
            return Err(PivotError::InvalidArgument(
                "a node cannot be its own parent".to_string(),
            ));
        }
        if child == NodeId::ROOT {
            return Err(PivotError::InvalidArgument(
                "the root node cannot be attached to a parent".to_string(),
            ));
        }
        self.checked(parent)?;
        let key = self
            .checked(child)?
            .key
            .clone()
            .unwrap_or_default();

        let mut ancestor = self.nodes[parent.index()].parent;
        while let Some(id) = ancestor {
            if id == child {
                return Err(PivotError::InvalidArgument(
                    "a node cannot be attached below its own descendant".to_string(),
                ));
            }
            ancestor = self.nodes[id.index()].parent;
        }

        if self.nodes[child.index()].parent == Some(parent) {
            return Ok(child);
        }
        if self.child_index.contains_key(&(parent, key.clone())) {
            return Err(PivotError::DuplicateKey { key });
        }

        if let Some(old_parent) = self.nodes[child.index()].parent.take() {
            self.nodes[old_parent.index()].children.retain(|&c| c != child);
            self.child_index.remove(&(old_parent, key.clone()));
        }

        let position = self.insert_position(parent, &key);
        self.nodes[parent.index()].children.insert(position, child);
        self.nodes[child.index()].parent = Some(parent);
        self.child_index.insert((parent, key), child);
        Ok(child)
    }

    /// Creates a node and appends it under `parent`. The new node inherits
    /// the parent's sort order for its own children.
    pub fn add(
        &mut self,
        parent: NodeId,
        key: impl Into<String>,
        title: impl Into<String>,
    ) -> PivotResult<NodeId> {
        let inherited = self.checked(parent)?.sort_order;
        let child = self.create_node(key, title);
        self.nodes[child.index()].sort_order = inherited;
        match self.add_node(parent, child) {
            Ok(id) => Ok(id),
            Err(err) => {
                // The node was never attached; drop it again.
                self.nodes.pop();
                Err(err)
            }
        }
    }

    /// Existing child of `parent` with `key`, or a new one.
    pub fn find_or_add(
        &mut self,
        parent: NodeId,
        key: &str,
        title: &str,
    ) -> PivotResult<NodeId> {
        match self.child_by_key(parent, key) {
            Some(id) => Ok(id),
            None => self.add(parent, key, title),
        }
    }

    /// Feeds `value` into the node and every ancestor up to the root.
    pub fn add_value(&mut self, id: NodeId, value: f64) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            match self.nodes.get_mut(node_id.index()) {
                Some(node) => {
                    node.aggregator.add(value);
                    current = node.parent;
                }
                None => break,
            }
        }
    }

    /// Changes the order of `id`'s children and re-sorts them. A no-op when
    /// the order is unchanged, since insertion keeps children sorted.
    /// `DataSourceOrder` restores creation order.
    pub fn set_sort_order(&mut self, id: NodeId, sort_order: SortOrder) -> PivotResult<()> {
        if self.checked(id)?.sort_order == sort_order {
            return Ok(());
        }
        let mut children = std::mem::take(&mut self.nodes[id.index()].children);
        match sort_order {
            SortOrder::Ascending => children.sort_by(|&a, &b| self.compare_nodes(a, b)),
            SortOrder::Descending => children.sort_by(|&a, &b| self.compare_nodes(b, a)),
            SortOrder::DataSourceOrder => children.sort(),
        }
        let node = &mut self.nodes[id.index()];
        node.children = children;
        node.sort_order = sort_order;
        Ok(())
    }

    fn compare_nodes(&self, a: NodeId, b: NodeId) -> Ordering {
        let ka = self.nodes[a.index()].key.as_deref().unwrap_or("");
        let kb = self.nodes[b.index()].key.as_deref().unwrap_or("");
        compare_keys(ka, kb)
    }

    fn insert_position(&self, parent: NodeId, key: &str) -> usize {
        let node = &self.nodes[parent.index()];
        let key_of = |c: &NodeId| self.nodes[c.index()].key.as_deref().unwrap_or("");
        match node.sort_order {
            SortOrder::Ascending => node
                .children
                .partition_point(|c| compare_keys(key_of(c), key) != Ordering::Greater),
            SortOrder::Descending => node
                .children
                .partition_point(|c| compare_keys(key_of(c), key) != Ordering::Less),
            SortOrder::DataSourceOrder => node.children.len(),
        }
    }
}

// ============================================================================
// NODE REF
// ============================================================================

/// Read-only view of one node together with its axis.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    axis: &'a PivotAxis,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    fn node(&self) -> &'a PivotNode {
        &self.axis.nodes[self.id.index()]
    }

    fn wrap(&self, id: NodeId) -> NodeRef<'a> {
        NodeRef { axis: self.axis, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn key(&self) -> Option<&'a str> {
        self.node().key.as_deref()
    }

    pub fn title(&self) -> &'a str {
        &self.node().title
    }

    pub fn aggregator(&self) -> &'a Aggregator {
        &self.node().aggregator
    }

    pub fn result(&self) -> f64 {
        self.node().aggregator.result()
    }

    pub fn count(&self) -> u64 {
        self.node().aggregator.count()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.node().sort_order
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node().parent.map(|id| self.wrap(id))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let axis = self.axis;
        self.node()
            .children
            .iter()
            .map(move |&id| NodeRef { axis, id })
    }

    pub fn child_count(&self) -> usize {
        self.node().children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    pub fn is_root(&self) -> bool {
        self.id == NodeId::ROOT
    }

    /// Distance from the top of the tree (root = 0).
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.node().parent;
        while let Some(id) = current {
            depth += 1;
            current = self.axis.nodes[id.index()].parent;
        }
        depth
    }

    /// Direct child with `key`.
    pub fn find(&self, key: &str) -> Option<NodeRef<'a>> {
        self.axis.child_by_key(self.id, key).map(|id| self.wrap(id))
    }

    /// Depth-first search for a descendant with `key`.
    pub fn find_recursive(&self, key: &str) -> Option<NodeRef<'a>> {
        for child in self.children() {
            if child.key() == Some(key) {
                return Some(child);
            }
            if let Some(found) = child.find_recursive(key) {
                return Some(found);
            }
        }
        None
    }

    /// Follows `keys` level by level from this node.
    pub fn find_by_keys<S: AsRef<str>>(&self, keys: &[S]) -> Option<NodeRef<'a>> {
        keys.iter()
            .try_fold(*self, |node, key| node.find(key.as_ref()))
    }

    /// Descendants exactly `level` levels below this node (0 = the node itself).
    pub fn children_at_level(&self, level: usize) -> Vec<NodeRef<'a>> {
        let mut current = vec![*self];
        for _ in 0..level {
            current = current.iter().flat_map(|n| n.children()).collect();
            if current.is_empty() {
                break;
            }
        }
        current
    }

    /// Leaves reachable from this node, left to right. A leaf returns itself.
    pub fn last_children(&self) -> Vec<NodeRef<'a>> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves(&self, out: &mut Vec<NodeRef<'a>>) {
        if self.is_leaf() {
            out.push(*self);
            return;
        }
        for child in self.children() {
            child.collect_leaves(out);
        }
    }

    /// Length of the longest path down to a leaf (0 for a leaf).
    pub fn max_level(&self) -> usize {
        self.children()
            .map(|child| child.max_level() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Keys from the top of the tree down to this node. The root contributes nothing.
    pub fn path_keys(&self) -> SmallVec<[&'a str; 8]> {
        let mut keys: SmallVec<[&'a str; 8]> = SmallVec::new();
        let mut current = Some(*self);
        while let Some(node) = current {
            if let Some(key) = node.key() {
                keys.push(key);
            }
            current = node.parent();
        }
        keys.reverse();
        keys
    }

    pub fn path(&self, separator: &str) -> String {
        self.path_keys().join(separator)
    }

    /// Position among the parent's children, -1 for the root or a detached node.
    pub fn index(&self) -> isize {
        self.node()
            .parent
            .and_then(|parent| {
                self.axis.nodes[parent.index()]
                    .children
                    .iter()
                    .position(|&c| c == self.id)
            })
            .map_or(-1, |i| i as isize)
    }
}
