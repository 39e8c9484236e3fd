//! Doubly linked list, shown as a row of nodes.

use glam::Vec2;

use super::{advance_all, Container, ContainerKind, OperationLog};
use crate::entity::{AnimatedEntity, DepartureQueue};
use crate::layout;
use crate::options::{AnimationOptions, LayoutOptions, Options};
use crate::value::Value;

/// Linked sequence supporting insertion and removal at either end.
///
/// Node order is all that is tracked; after every mutation the surviving
/// nodes are re-indexed `0..n` for display.
#[derive(Debug)]
pub struct LinkedSequence {
    nodes: Vec<AnimatedEntity>,
    departures: DepartureQueue,
    log: OperationLog,
    layout: LayoutOptions,
    motion: AnimationOptions,
}

impl LinkedSequence {
    /// Empty list with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::from_options(&Options::default())
    }

    /// Empty list laid out from `options`.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        Self {
            nodes: Vec::new(),
            departures: DepartureQueue::new(),
            log: OperationLog::default(),
            layout: options.layout.clone(),
            motion: options.animation.clone(),
        }
    }

    /// Values from head to tail.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.nodes.iter().map(|e| &e.value)
    }

    /// Link a new head node.
    pub fn add_first(&mut self, value: Value) {
        self.log.record(format!("addFirst({value})"));
        let at = layout::row(0, &self.layout) - Vec2::new(self.layout.pitch(), 0.0);
        self.nodes.insert(0, AnimatedEntity::new(value).spawned_at(at));
        self.reindex();
    }

    /// Link a new tail node.
    pub fn add_last(&mut self, value: Value) {
        self.log.record(format!("addLast({value})"));
        let at = layout::row(self.nodes.len(), &self.layout)
            + Vec2::new(self.layout.pitch(), 0.0);
        self.nodes.push(AnimatedEntity::new(value).spawned_at(at));
        self.reindex();
    }

    /// Unlink the head node.
    pub fn remove_first(&mut self) -> Option<Value> {
        if self.nodes.is_empty() {
            self.log.record("removeFirst on empty list");
            return None;
        }
        self.log.record("removeFirst");
        Some(self.unlink(0))
    }

    /// Unlink the tail node.
    pub fn remove_last(&mut self) -> Option<Value> {
        if self.nodes.is_empty() {
            self.log.record("removeLast on empty list");
            return None;
        }
        self.log.record("removeLast");
        Some(self.unlink(self.nodes.len() - 1))
    }

    /// Head value.
    pub fn peek_first(&mut self) -> Option<&Value> {
        self.log.record("peekFirst");
        let node = self.nodes.first_mut()?;
        node.flash();
        Some(&node.value)
    }

    /// Tail value.
    pub fn peek_last(&mut self) -> Option<&Value> {
        self.log.record("peekLast");
        let node = self.nodes.last_mut()?;
        node.flash();
        Some(&node.value)
    }

    /// Unlink every node.
    pub fn clear(&mut self) {
        self.departures.extend(self.nodes.drain(..));
        self.log.record("clear");
    }

    fn unlink(&mut self, index: usize) -> Value {
        let node = self.nodes.remove(index);
        let value = node.value.clone();
        self.departures.push(node);
        self.reindex();
        value
    }

    fn reindex(&mut self) {
        for (i, node) in self.nodes.iter_mut().enumerate() {
            node.retarget(i, layout::row(i, &self.layout));
        }
    }
}

impl Default for LinkedSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl Container for LinkedSequence {
    fn kind(&self) -> ContainerKind {
        ContainerKind::LinkedSequence
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn capacity(&self) -> usize {
        self.nodes.len()
    }

    fn log(&self) -> &OperationLog {
        &self.log
    }

    fn live_entities(&self) -> Vec<&AnimatedEntity> {
        self.nodes.iter().collect()
    }

    fn departures(&self) -> &DepartureQueue {
        &self.departures
    }

    fn tick(&mut self, dt: f32) -> usize {
        advance_all(self.nodes.iter_mut(), &mut self.departures, dt, &self.motion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_ends_behave_like_a_deque() {
        let mut list = LinkedSequence::new();
        list.add_last(Value::from(2));
        list.add_first(Value::from(1));
        list.add_last(Value::from(3));
        assert_eq!(
            list.values().cloned().collect::<Vec<_>>(),
            vec![Value::from(1), Value::from(2), Value::from(3)]
        );
        assert_eq!(list.peek_first(), Some(&Value::from(1)));
        assert_eq!(list.peek_last(), Some(&Value::from(3)));
        assert_eq!(list.remove_first(), Some(Value::from(1)));
        assert_eq!(list.remove_last(), Some(Value::from(3)));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn survivors_are_reindexed_after_removal() {
        let mut list = LinkedSequence::new();
        for v in 0..5 {
            list.add_last(Value::from(v));
        }
        let _ = list.remove_first();
        let _ = list.remove_first();
        let slots: Vec<usize> = list.live_entities().iter().map(|e| e.slot).collect();
        assert_eq!(slots, vec![0, 1, 2]);
    }

    #[test]
    fn empty_removals_return_none() {
        let mut list = LinkedSequence::new();
        assert_eq!(list.remove_first(), None);
        assert_eq!(list.remove_last(), None);
        assert_eq!(list.peek_first(), None);
        assert_eq!(list.log().count(), 3);
    }

    #[test]
    fn clear_fades_everything() {
        let mut list = LinkedSequence::new();
        list.add_last(Value::from('a'));
        list.add_last(Value::from('b'));
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.entities().len(), 2);
        for _ in 0..30 {
            let _ = list.tick(0.1);
        }
        assert!(list.entities().is_empty());
    }
}
