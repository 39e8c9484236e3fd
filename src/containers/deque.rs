//! Circular-buffer double-ended queue.

use glam::Vec2;

use super::{advance_all, Container, ContainerKind, OperationLog};
use crate::entity::{AnimatedEntity, DepartureQueue};
use crate::layout;
use crate::options::{AnimationOptions, LayoutOptions, Options};
use crate::value::Value;

/// Ring-backed deque. `head` is the slot of the first element and `tail`
/// the slot the next `add_last` writes to, both modulo capacity. Capacity
/// doubles as soon as the ring fills up, so `head == tail` only when empty.
#[derive(Debug)]
pub struct RingDeque {
    slots: Vec<Option<AnimatedEntity>>,
    head: usize,
    tail: usize,
    len: usize,
    departures: DepartureQueue,
    log: OperationLog,
    layout: LayoutOptions,
    motion: AnimationOptions,
}

impl RingDeque {
    /// Empty deque with the default capacity of 16.
    #[must_use]
    pub fn new() -> Self {
        Self::from_options(&Options::default())
    }

    /// Empty deque with an explicit initial capacity (at least 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut options = Options::default();
        options.containers.deque_capacity = capacity;
        Self::from_options(&options)
    }

    /// Empty deque sized and laid out from `options`.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        let capacity = options.containers.deque_capacity.max(1);
        Self {
            slots: std::iter::repeat_with(|| None).take(capacity).collect(),
            head: 0,
            tail: 0,
            len: 0,
            departures: DepartureQueue::new(),
            log: OperationLog::default(),
            layout: options.layout.clone(),
            motion: options.animation.clone(),
        }
    }

    /// Slot of the first element.
    #[must_use]
    pub fn head(&self) -> usize {
        self.head
    }

    /// Slot the next `add_last` writes to.
    #[must_use]
    pub fn tail(&self) -> usize {
        self.tail
    }

    /// Values from front to back.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.ordered().map(|e| &e.value)
    }

    /// Push onto the front. Null is rejected.
    pub fn add_first(&mut self, value: Value) -> bool {
        if value.is_null() {
            self.log.record("addFirst(null) rejected");
            return false;
        }
        self.log.record(format!("addFirst({value})"));
        let cap = self.slots.len();
        self.head = (self.head + cap - 1) % cap;
        let at = layout::grid(self.head, &self.layout) - Vec2::new(0.0, self.layout.pitch());
        self.slots[self.head] = Some(AnimatedEntity::new(value).spawned_at(at));
        self.after_insert();
        true
    }

    /// Push onto the back. Null is rejected.
    pub fn add_last(&mut self, value: Value) -> bool {
        if value.is_null() {
            self.log.record("addLast(null) rejected");
            return false;
        }
        self.log.record(format!("addLast({value})"));
        let at = layout::grid(self.tail, &self.layout) - Vec2::new(0.0, self.layout.pitch());
        self.slots[self.tail] = Some(AnimatedEntity::new(value).spawned_at(at));
        self.tail = (self.tail + 1) % self.slots.len();
        self.after_insert();
        true
    }

    /// Pop from the front.
    pub fn remove_first(&mut self) -> Option<Value> {
        if self.len == 0 {
            self.log.record("removeFirst on empty deque");
            return None;
        }
        self.log.record("removeFirst");
        let entity = self.slots[self.head].take()?;
        self.head = (self.head + 1) % self.slots.len();
        Some(self.retire(entity))
    }

    /// Pop from the back.
    pub fn remove_last(&mut self) -> Option<Value> {
        if self.len == 0 {
            self.log.record("removeLast on empty deque");
            return None;
        }
        self.log.record("removeLast");
        let cap = self.slots.len();
        self.tail = (self.tail + cap - 1) % cap;
        let entity = self.slots[self.tail].take()?;
        Some(self.retire(entity))
    }

    /// Front value.
    pub fn peek_first(&mut self) -> Option<&Value> {
        self.log.record("peekFirst");
        if self.len == 0 {
            return None;
        }
        let entity = self.slots[self.head].as_mut()?;
        entity.flash();
        Some(&entity.value)
    }

    /// Back value.
    pub fn peek_last(&mut self) -> Option<&Value> {
        self.log.record("peekLast");
        if self.len == 0 {
            return None;
        }
        let cap = self.slots.len();
        let entity = self.slots[(self.tail + cap - 1) % cap].as_mut()?;
        entity.flash();
        Some(&entity.value)
    }

    /// Linear scan from front to back.
    pub fn contains(&mut self, value: &Value) -> bool {
        let found = self.ordered().any(|e| &e.value == value);
        self.log.record(format!("contains({value}) -> {found}"));
        found
    }

    /// Remove every element and reset the ring indices.
    pub fn clear(&mut self) {
        self.departures
            .extend(self.slots.iter_mut().filter_map(Option::take));
        self.head = 0;
        self.tail = 0;
        self.len = 0;
        self.log.record("clear");
    }

    fn ordered(&self) -> impl Iterator<Item = &AnimatedEntity> {
        let cap = self.slots.len();
        (0..self.len).filter_map(move |i| self.slots[(self.head + i) % cap].as_ref())
    }

    fn retire(&mut self, entity: AnimatedEntity) -> Value {
        self.len -= 1;
        let value = entity.value.clone();
        self.departures.push(entity);
        self.relayout();
        value
    }

    fn after_insert(&mut self) {
        self.len += 1;
        if self.len == self.slots.len() {
            self.double_capacity();
        }
        self.relayout();
    }

    fn double_capacity(&mut self) {
        let old = self.slots.len();
        let mut grown: Vec<Option<AnimatedEntity>> =
            std::iter::repeat_with(|| None).take(old * 2).collect();
        for (i, slot) in grown.iter_mut().take(self.len).enumerate() {
            *slot = self.slots[(self.head + i) % old].take();
        }
        self.slots = grown;
        self.head = 0;
        self.tail = self.len;
        log::debug!("deque doubled {old} -> {}", old * 2);
    }

    fn relayout(&mut self) {
        for slot in 0..self.slots.len() {
            let target = layout::grid(slot, &self.layout);
            if let Some(entity) = self.slots[slot].as_mut() {
                entity.retarget(slot, target);
            }
        }
    }
}

impl Default for RingDeque {
    fn default() -> Self {
        Self::new()
    }
}

impl Container for RingDeque {
    fn kind(&self) -> ContainerKind {
        ContainerKind::RingDeque
    }

    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn log(&self) -> &OperationLog {
        &self.log
    }

    fn live_entities(&self) -> Vec<&AnimatedEntity> {
        self.ordered().collect()
    }

    fn departures(&self) -> &DepartureQueue {
        &self.departures
    }

    fn tick(&mut self, dt: f32) -> usize {
        advance_all(
            self.slots.iter_mut().flatten(),
            &mut self.departures,
            dt,
            &self.motion,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    #[test]
    fn add_first_wraps_head_to_end() {
        let mut d = RingDeque::with_capacity(8);
        assert!(d.add_first(Value::from(1)));
        assert_eq!(d.head(), 7);
        assert_eq!(d.tail(), 0);
        assert!(d.add_last(Value::from(2)));
        assert_eq!(d.tail(), 1);
        let slots: Vec<usize> = d.live_entities().iter().map(|e| e.slot).collect();
        assert_eq!(slots, vec![7, 0]);
    }

    #[test]
    fn capacity_doubles_when_ring_fills() {
        let mut d = RingDeque::with_capacity(4);
        for v in 0..3 {
            let _ = d.add_last(Value::from(v));
        }
        assert_eq!(d.capacity(), 4);
        let _ = d.add_first(Value::from(-1));
        assert_eq!(d.capacity(), 8);
        assert_eq!(d.head(), 0);
        assert_eq!(d.tail(), 4);
        assert_eq!(
            d.values().cloned().collect::<Vec<_>>(),
            [-1, 0, 1, 2].map(Value::from).to_vec()
        );
    }

    #[test]
    fn null_is_rejected() {
        let mut d = RingDeque::new();
        assert!(!d.add_last(Value::Null));
        assert!(!d.add_first(Value::Null));
        assert!(d.is_empty());
    }

    #[test]
    fn empty_removals_return_none() {
        let mut d = RingDeque::new();
        assert_eq!(d.remove_first(), None);
        assert_eq!(d.remove_last(), None);
        assert_eq!(d.peek_first(), None);
        assert_eq!(d.peek_last(), None);
    }

    #[test]
    fn interleaved_operations_match_reference() {
        let mut rng = StdRng::seed_from_u64(0x00de_c0de);
        let mut d = RingDeque::with_capacity(4);
        let mut reference: VecDeque<i64> = VecDeque::new();

        for step in 0..400 {
            let v = i64::from(step);
            match rng.random_range(0..4) {
                0 => {
                    let _ = d.add_first(Value::from(v));
                    reference.push_front(v);
                }
                1 => {
                    let _ = d.add_last(Value::from(v));
                    reference.push_back(v);
                }
                2 => assert_eq!(d.remove_first(), reference.pop_front().map(Value::from)),
                _ => assert_eq!(d.remove_last(), reference.pop_back().map(Value::from)),
            }
            assert!(d.head() < d.capacity());
            assert!(d.tail() < d.capacity());
            assert!(d.len() < d.capacity());
            assert_eq!(d.len(), reference.len());
            let front = reference.front().copied().map(Value::from);
            let back = reference.back().copied().map(Value::from);
            assert_eq!(d.peek_first().cloned(), front);
            assert_eq!(d.peek_last().cloned(), back);
        }
    }

    #[test]
    fn contains_scans_live_elements() {
        let mut d = RingDeque::new();
        let _ = d.add_last(Value::from("a"));
        let _ = d.add_last(Value::from("b"));
        let _ = d.remove_first();
        assert!(!d.contains(&Value::from("a")));
        assert!(d.contains(&Value::from("b")));
    }

    #[test]
    fn clear_resets_indices() {
        let mut d = RingDeque::with_capacity(4);
        let _ = d.add_first(Value::from(1));
        let _ = d.add_first(Value::from(2));
        d.clear();
        assert_eq!((d.head(), d.tail(), d.len()), (0, 0, 0));
        assert_eq!(d.departures().len(), 2);
    }
}
