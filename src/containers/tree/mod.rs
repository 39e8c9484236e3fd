//! Red-black tree shared by [`OrderedMap`] and [`OrderedSet`].
//!
//! Nodes live in an arena addressed by [`NodeId`]; each node carries
//! `left`/`right`/`parent` links, so a rotation is three link-pair updates on
//! plain indices. There is no per-key deletion: `clear` is the only way
//! nodes leave.

mod map;
mod set;

use std::cmp::Ordering;

pub use map::OrderedMap;
use serde::Serialize;
pub use set::OrderedSet;

use crate::entity::AnimatedEntity;
use crate::error::VizError;
use crate::layout;
use crate::options::LayoutOptions;
use crate::value::Value;

/// Node colour bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// Freshly inserted nodes start red.
    Red,
    /// The root and every nil leaf are black.
    Black,
}

/// Arena index of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

#[derive(Debug)]
struct TreeNode {
    entity: AnimatedEntity,
    color: Color,
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,
}

/// What an insert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Insertion {
    /// A new red node was linked and the tree rebalanced.
    Linked(NodeId),
    /// A node with an equal key already exists; nothing was restructured.
    Existing(NodeId),
}

#[derive(Debug)]
pub(crate) struct RbTree {
    nodes: Vec<TreeNode>,
    root: Option<NodeId>,
    rotation_count: u64,
    layout: LayoutOptions,
}

impl RbTree {
    pub(crate) fn new(layout: LayoutOptions) -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            rotation_count: 0,
            layout,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn rotation_count(&self) -> u64 {
        self.rotation_count
    }

    pub(crate) fn entity(&self, id: NodeId) -> &AnimatedEntity {
        &self.nodes[id.0].entity
    }

    pub(crate) fn entity_mut(&mut self, id: NodeId) -> &mut AnimatedEntity {
        &mut self.nodes[id.0].entity
    }

    pub(crate) fn color(&self, id: Option<NodeId>) -> Color {
        id.map_or(Color::Black, |n| self.nodes[n.0].color)
    }

    pub(crate) fn root(&self) -> Option<NodeId> {
        self.root
    }

    fn left(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].left
    }

    fn right(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].right
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    fn set_color(&mut self, id: Option<NodeId>, color: Color) {
        if let Some(n) = id {
            self.nodes[n.0].color = color;
        }
    }

    /// Binary-search descent for `key`.
    pub(crate) fn find(&self, key: &Value) -> Result<Option<NodeId>, VizError> {
        let mut cursor = self.root;
        while let Some(id) = cursor {
            cursor = match key.try_cmp(&self.entity(id).value)? {
                Ordering::Less => self.left(id),
                Ordering::Greater => self.right(id),
                Ordering::Equal => return Ok(Some(id)),
            };
        }
        Ok(None)
    }

    /// Insert `entity` by its value, or report the existing equal node.
    pub(crate) fn insert(&mut self, entity: AnimatedEntity) -> Result<Insertion, VizError> {
        let mut parent = None;
        let mut went_left = false;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            parent = Some(id);
            match entity.value.try_cmp(&self.entity(id).value)? {
                Ordering::Less => {
                    went_left = true;
                    cursor = self.left(id);
                }
                Ordering::Greater => {
                    went_left = false;
                    cursor = self.right(id);
                }
                Ordering::Equal => return Ok(Insertion::Existing(id)),
            }
        }

        let spawn = parent.map_or_else(
            || layout::tree(0, 0, &self.layout),
            |p| self.entity(p).position,
        );
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            entity: entity.spawned_at(spawn),
            color: Color::Red,
            left: None,
            right: None,
            parent,
        });
        match parent {
            None => self.root = Some(id),
            Some(p) if went_left => self.nodes[p.0].left = Some(id),
            Some(p) => self.nodes[p.0].right = Some(id),
        }

        let before = self.rotation_count;
        self.fix_after_insert(id);
        if self.rotation_count > before {
            log::debug!(
                "insert rebalanced with {} rotation(s)",
                self.rotation_count - before
            );
        }
        self.relayout();
        debug_assert!(
            self.check_invariants().is_ok(),
            "red-black invariants broken after insert"
        );
        Ok(Insertion::Linked(id))
    }

    fn fix_after_insert(&mut self, inserted: NodeId) {
        let mut x = inserted;
        while Some(x) != self.root {
            let Some(p) = self.parent(x) else { break };
            if self.color(Some(p)) != Color::Red {
                break;
            }
            let Some(g) = self.parent(p) else { break };

            if self.left(g) == Some(p) {
                let uncle = self.right(g);
                if self.color(uncle) == Color::Red {
                    self.set_color(Some(p), Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(Some(g), Color::Red);
                    x = g;
                } else {
                    if self.right(p) == Some(x) {
                        x = p;
                        self.rotate_left(x);
                    }
                    let p = self.parent(x);
                    let g = p.and_then(|p| self.parent(p));
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    if let Some(g) = g {
                        self.rotate_right(g);
                    }
                }
            } else {
                let uncle = self.left(g);
                if self.color(uncle) == Color::Red {
                    self.set_color(Some(p), Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(Some(g), Color::Red);
                    x = g;
                } else {
                    if self.left(p) == Some(x) {
                        x = p;
                        self.rotate_right(x);
                    }
                    let p = self.parent(x);
                    let g = p.and_then(|p| self.parent(p));
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    if let Some(g) = g {
                        self.rotate_left(g);
                    }
                }
            }
        }
        self.set_color(self.root, Color::Black);
    }

    /// Replace the link from `x`'s parent (or the root) with `y`.
    fn transplant(&mut self, x: NodeId, y: NodeId) {
        let parent = self.parent(x);
        self.nodes[y.0].parent = parent;
        match parent {
            None => self.root = Some(y),
            Some(p) if self.left(p) == Some(x) => self.nodes[p.0].left = Some(y),
            Some(p) => self.nodes[p.0].right = Some(y),
        }
    }

    fn rotate_left(&mut self, x: NodeId) {
        let Some(y) = self.right(x) else { return };
        let inner = self.left(y);
        self.nodes[x.0].right = inner;
        if let Some(b) = inner {
            self.nodes[b.0].parent = Some(x);
        }
        self.transplant(x, y);
        self.nodes[y.0].left = Some(x);
        self.nodes[x.0].parent = Some(y);
        self.rotation_count += 1;
    }

    fn rotate_right(&mut self, x: NodeId) {
        let Some(y) = self.left(x) else { return };
        let inner = self.right(y);
        self.nodes[x.0].left = inner;
        if let Some(b) = inner {
            self.nodes[b.0].parent = Some(x);
        }
        self.transplant(x, y);
        self.nodes[y.0].right = Some(x);
        self.nodes[x.0].parent = Some(y);
        self.rotation_count += 1;
    }

    /// Leftmost node.
    pub(crate) fn first(&self) -> Option<NodeId> {
        let mut id = self.root?;
        while let Some(l) = self.left(id) {
            id = l;
        }
        Some(id)
    }

    /// Rightmost node.
    pub(crate) fn last(&self) -> Option<NodeId> {
        let mut id = self.root?;
        while let Some(r) = self.right(id) {
            id = r;
        }
        Some(id)
    }

    /// Node ids in key order, each with its depth.
    fn in_order_with_depth(&self) -> Vec<(NodeId, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        let mut cursor = self.root.map(|r| (r, 0));
        loop {
            while let Some((id, depth)) = cursor {
                stack.push((id, depth));
                cursor = self.left(id).map(|l| (l, depth + 1));
            }
            let Some((id, depth)) = stack.pop() else { break };
            out.push((id, depth));
            cursor = self.right(id).map(|r| (r, depth + 1));
        }
        out
    }

    pub(crate) fn in_order(&self) -> impl Iterator<Item = &AnimatedEntity> {
        self.in_order_with_depth()
            .into_iter()
            .map(|(id, _)| self.entity(id))
    }

    pub(crate) fn in_order_colored(&self) -> Vec<(&AnimatedEntity, Color)> {
        self.in_order_with_depth()
            .into_iter()
            .map(|(id, _)| (self.entity(id), self.nodes[id.0].color))
            .collect()
    }

    pub(crate) fn entities_mut(&mut self) -> impl Iterator<Item = &mut AnimatedEntity> {
        self.nodes.iter_mut().map(|n| &mut n.entity)
    }

    /// Edges on the longest root-to-leaf path; zero when empty.
    pub(crate) fn height(&self) -> usize {
        self.in_order_with_depth()
            .into_iter()
            .map(|(_, d)| d)
            .max()
            .unwrap_or(0)
    }

    /// Black nodes on any root-to-nil path.
    pub(crate) fn black_height(&self) -> usize {
        let mut count = 0;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            if self.nodes[id.0].color == Color::Black {
                count += 1;
            }
            cursor = self.left(id);
        }
        count
    }

    /// Walk the whole tree checking links, order and colour rules. Returns
    /// the black height.
    pub(crate) fn check_invariants(&self) -> Result<usize, VizError> {
        let Some(root) = self.root else {
            return Ok(0);
        };
        if self.parent(root).is_some() {
            return Err(VizError::Invariant("root has a parent".to_owned()));
        }
        if self.color(Some(root)) != Color::Black {
            return Err(VizError::Invariant("root is red".to_owned()));
        }
        let black = self.check_subtree(root)?;

        let ordered = self.in_order_with_depth();
        if ordered.len() != self.nodes.len() {
            return Err(VizError::Invariant(format!(
                "{} nodes reachable of {}",
                ordered.len(),
                self.nodes.len()
            )));
        }
        for pair in ordered.windows(2) {
            let (a, b) = (self.entity(pair[0].0), self.entity(pair[1].0));
            if a.value.try_cmp(&b.value)? != Ordering::Less {
                return Err(VizError::Invariant(format!(
                    "in-order keys {} and {} out of order",
                    a.value, b.value
                )));
            }
        }
        Ok(black)
    }

    fn check_subtree(&self, id: NodeId) -> Result<usize, VizError> {
        let node = &self.nodes[id.0];
        for child in [node.left, node.right].into_iter().flatten() {
            if self.parent(child) != Some(id) {
                return Err(VizError::Invariant(format!(
                    "child of {} has a stale parent link",
                    node.entity.value
                )));
            }
            if node.color == Color::Red && self.color(Some(child)) == Color::Red {
                return Err(VizError::Invariant(format!(
                    "red node {} has a red child",
                    node.entity.value
                )));
            }
        }
        let left = node.left.map_or(Ok(0), |l| self.check_subtree(l))?;
        let right = node.right.map_or(Ok(0), |r| self.check_subtree(r))?;
        if left != right {
            return Err(VizError::Invariant(format!(
                "black heights differ under {} ({left} vs {right})",
                node.entity.value
            )));
        }
        Ok(left + usize::from(node.color == Color::Black))
    }

    /// Detach every node in pre-order and forget the root.
    pub(crate) fn drain_pre_order(&mut self) -> Vec<AnimatedEntity> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.right(id));
            stack.extend(self.left(id));
        }
        let mut slots: Vec<Option<TreeNode>> =
            std::mem::take(&mut self.nodes).into_iter().map(Some).collect();
        self.root = None;
        order
            .into_iter()
            .filter_map(|id| slots[id.0].take().map(|n| n.entity))
            .collect()
    }

    fn relayout(&mut self) {
        for (rank, (id, depth)) in self.in_order_with_depth().into_iter().enumerate() {
            let target = layout::tree(rank, depth, &self.layout);
            self.nodes[id.0].entity.retarget(rank, target);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    use super::*;

    fn tree_of(keys: &[i64]) -> RbTree {
        let mut tree = RbTree::new(LayoutOptions::default());
        for &k in keys {
            let _ = tree.insert(AnimatedEntity::new(Value::from(k))).unwrap();
        }
        tree
    }

    fn keys(tree: &RbTree) -> Vec<Value> {
        tree.in_order().map(|e| e.value.clone()).collect()
    }

    #[test]
    fn recolour_only_scenario() {
        let tree = tree_of(&[10, 20, 5, 15]);
        let root = tree.root().unwrap();
        assert_eq!(tree.entity(root).value, Value::from(10));
        assert_eq!(tree.color(Some(root)), Color::Black);
        assert_eq!(tree.height(), 2);
        assert_eq!(keys(&tree), [5, 10, 15, 20].map(Value::from).to_vec());
        assert_eq!(tree.rotation_count(), 0);
        assert_eq!(tree.check_invariants().unwrap(), 2);
    }

    #[test]
    fn ascending_run_rotates_left() {
        let tree = tree_of(&[1, 2, 3]);
        let root = tree.root().unwrap();
        assert_eq!(tree.entity(root).value, Value::from(2));
        assert_eq!(tree.rotation_count(), 1);
        assert_eq!(tree.height(), 1);
    }

    #[test]
    fn zig_zag_takes_two_rotations() {
        let tree = tree_of(&[30, 10, 20]);
        let root = tree.root().unwrap();
        assert_eq!(tree.entity(root).value, Value::from(20));
        assert_eq!(tree.rotation_count(), 2);
        let colored = tree.in_order_colored();
        assert_eq!(colored[0].1, Color::Red);
        assert_eq!(colored[1].1, Color::Black);
        assert_eq!(colored[2].1, Color::Red);
    }

    #[test]
    fn random_insertions_keep_invariants() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut values: Vec<i64> = (0..300).collect();
        values.shuffle(&mut rng);
        let mut tree = RbTree::new(LayoutOptions::default());
        for &v in &values {
            let _ = tree.insert(AnimatedEntity::new(Value::from(v))).unwrap();
            let black = tree.check_invariants().unwrap();
            assert_eq!(black, tree.black_height());
        }
        let expected: Vec<Value> = (0..300).map(Value::from).collect();
        assert_eq!(keys(&tree), expected);
        // red-black height bound: h <= 2 log2(n + 1)
        assert!(tree.height() < 2 * 9);
    }

    #[test]
    fn equal_key_reports_existing_node() {
        let mut tree = tree_of(&[1, 2]);
        let result = tree.insert(AnimatedEntity::new(Value::from(2))).unwrap();
        assert!(matches!(result, Insertion::Existing(_)));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn mixed_kinds_are_incomparable() {
        let mut tree = tree_of(&[1]);
        let err = tree.insert(AnimatedEntity::new(Value::from("one")));
        assert!(matches!(err, Err(VizError::Incomparable { .. })));
        assert!(tree.find(&Value::from(1.5)).is_err());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn spines_and_pre_order_drain() {
        let mut tree = tree_of(&[10, 20, 5, 15]);
        assert_eq!(tree.entity(tree.first().unwrap()).value, Value::from(5));
        assert_eq!(tree.entity(tree.last().unwrap()).value, Value::from(20));
        let drained: Vec<Value> = tree.drain_pre_order().into_iter().map(|e| e.value).collect();
        assert_eq!(drained, [10, 5, 20, 15].map(Value::from).to_vec());
        assert!(tree.root().is_none());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn layout_slots_follow_rank() {
        let tree = tree_of(&[3, 1, 2]);
        let slots: Vec<usize> = tree.in_order().map(|e| e.slot).collect();
        assert_eq!(slots, vec![0, 1, 2]);
    }
}
