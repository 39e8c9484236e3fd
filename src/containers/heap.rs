//! Array-backed binary min-heap.

use std::cmp::Ordering;

use glam::Vec2;

use super::{advance_all, Container, ContainerKind, OperationLog};
use crate::entity::{AnimatedEntity, DepartureQueue};
use crate::error::VizError;
use crate::layout;
use crate::options::{AnimationOptions, LayoutOptions, Options};
use crate::value::Value;

/// Priority queue whose slot `i` has children `2i + 1` and `2i + 2`, each
/// no smaller than `i` under natural order.
///
/// Every sift records the slot indices it visited; [`PriorityHeap::last_path`]
/// exposes them for highlighting.
#[derive(Debug)]
pub struct PriorityHeap {
    slots: Vec<AnimatedEntity>,
    capacity: usize,
    last_path: Vec<usize>,
    departures: DepartureQueue,
    log: OperationLog,
    layout: LayoutOptions,
    motion: AnimationOptions,
}

impl PriorityHeap {
    /// Empty heap with the default capacity of 11.
    #[must_use]
    pub fn new() -> Self {
        Self::from_options(&Options::default())
    }

    /// Empty heap with an explicit initial capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut options = Options::default();
        options.containers.heap_capacity = capacity;
        Self::from_options(&options)
    }

    /// Empty heap sized and laid out from `options`.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        let capacity = options.containers.heap_capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            last_path: Vec::new(),
            departures: DepartureQueue::new(),
            log: OperationLog::default(),
            layout: options.layout.clone(),
            motion: options.animation.clone(),
        }
    }

    /// Slots visited by the most recent sift(s).
    #[must_use]
    pub fn last_path(&self) -> &[usize] {
        &self.last_path
    }

    /// Values in slot order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.slots.iter().map(|e| &e.value)
    }

    /// Append `value` and sift it up. Null is rejected with `Ok(false)`.
    pub fn offer(&mut self, value: Value) -> Result<bool, VizError> {
        if value.is_null() {
            self.log.record("offer(null) rejected");
            return Ok(false);
        }
        if let Some(root) = self.slots.first() {
            let _ = value.try_cmp(&root.value)?;
        }
        if self.slots.len() == self.capacity {
            self.grow();
        }
        self.last_path.clear();
        let index = self.slots.len();
        let at = layout::heap(index, index + 1, &self.layout) + Vec2::new(0.0, self.layout.level_height);
        self.log.record(format!("offer({value})"));
        self.slots.push(AnimatedEntity::new(value).spawned_at(at));
        let _ = self.sift_up(index)?;
        self.after_mutation();
        Ok(true)
    }

    /// Remove and return the minimum.
    pub fn poll(&mut self) -> Result<Option<Value>, VizError> {
        self.last_path.clear();
        if self.slots.is_empty() {
            self.log.record("poll on empty heap");
            return Ok(None);
        }
        let root = self.slots.swap_remove(0);
        self.log.record(format!("poll -> {}", root.value));
        let value = root.value.clone();
        self.departures.push(root);
        if !self.slots.is_empty() {
            let _ = self.sift_down(0)?;
        }
        self.after_mutation();
        Ok(Some(value))
    }

    /// The minimum, without removing it.
    pub fn peek(&mut self) -> Option<&Value> {
        self.log.record("peek");
        let root = self.slots.first_mut()?;
        root.flash();
        Some(&root.value)
    }

    /// Remove the first slot structurally equal to `value`. The last element
    /// fills the hole and sifts down, or up if it could not move down.
    pub fn remove(&mut self, value: &Value) -> Result<bool, VizError> {
        self.last_path.clear();
        let Some(index) = self.slots.iter().position(|e| &e.value == value) else {
            self.log.record(format!("remove({value}): absent"));
            return Ok(false);
        };
        self.log.record(format!("remove({value}) at slot {index}"));
        let removed = self.slots.swap_remove(index);
        self.departures.push(removed);
        if index < self.slots.len() && self.sift_down(index)? == index {
            let _ = self.sift_up(index)?;
        }
        self.after_mutation();
        Ok(true)
    }

    /// Linear scan for `value`.
    pub fn contains(&mut self, value: &Value) -> bool {
        let found = match self.slots.iter_mut().find(|e| &e.value == value) {
            Some(entity) => {
                entity.flash();
                true
            }
            None => false,
        };
        self.log.record(format!("contains({value}) -> {found}"));
        found
    }

    /// Remove everything. Capacity is kept.
    pub fn clear(&mut self) {
        self.departures.extend(self.slots.drain(..));
        self.last_path.clear();
        self.log.record("clear");
    }

    /// Values in poll order, without touching the heap.
    #[must_use]
    pub fn to_sorted_vec(&self) -> Vec<Value> {
        let mut values: Vec<Value> = self.values().cloned().collect();
        // stored values are mutually comparable: offer checks against the root
        values.sort_by(|a, b| a.try_cmp(b).unwrap_or(Ordering::Equal));
        values
    }

    /// Check `value[parent(i)] <= value[i]` for every slot.
    pub fn check_invariants(&self) -> Result<(), VizError> {
        for i in 1..self.slots.len() {
            let parent = (i - 1) / 2;
            if self.less(i, parent)? {
                return Err(VizError::Invariant(format!(
                    "slot {i} ({}) is smaller than its parent {parent} ({})",
                    self.slots[i].value, self.slots[parent].value
                )));
            }
        }
        Ok(())
    }

    fn less(&self, a: usize, b: usize) -> Result<bool, VizError> {
        Ok(self.slots[a].value.try_cmp(&self.slots[b].value)? == Ordering::Less)
    }

    fn sift_up(&mut self, mut index: usize) -> Result<usize, VizError> {
        self.last_path.push(index);
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.less(index, parent)? {
                break;
            }
            self.slots.swap(index, parent);
            index = parent;
            self.last_path.push(index);
        }
        Ok(index)
    }

    fn sift_down(&mut self, mut index: usize) -> Result<usize, VizError> {
        self.last_path.push(index);
        loop {
            let left = 2 * index + 1;
            if left >= self.slots.len() {
                break;
            }
            let right = left + 1;
            let smaller = if right < self.slots.len() && self.less(right, left)? {
                right
            } else {
                left
            };
            if !self.less(smaller, index)? {
                break;
            }
            self.slots.swap(index, smaller);
            index = smaller;
            self.last_path.push(index);
        }
        Ok(index)
    }

    fn grow(&mut self) {
        let old = self.capacity;
        self.capacity = if old < 64 { old * 2 + 2 } else { old + old / 2 };
        self.slots.reserve(self.capacity - self.slots.len());
        log::debug!("heap grew {old} -> {}", self.capacity);
    }

    fn after_mutation(&mut self) {
        let len = self.slots.len();
        for (i, entity) in self.slots.iter_mut().enumerate() {
            entity.retarget(i, layout::heap(i, len, &self.layout));
        }
        for &i in &self.last_path {
            if let Some(entity) = self.slots.get_mut(i) {
                entity.flash();
            }
        }
        debug_assert!(self.check_invariants().is_ok(), "heap order broken");
    }
}

impl Default for PriorityHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl Container for PriorityHeap {
    fn kind(&self) -> ContainerKind {
        ContainerKind::PriorityHeap
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn log(&self) -> &OperationLog {
        &self.log
    }

    fn live_entities(&self) -> Vec<&AnimatedEntity> {
        self.slots.iter().collect()
    }

    fn departures(&self) -> &DepartureQueue {
        &self.departures
    }

    fn tick(&mut self, dt: f32) -> usize {
        advance_all(self.slots.iter_mut(), &mut self.departures, dt, &self.motion)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn heap_of(values: &[i64]) -> PriorityHeap {
        let mut heap = PriorityHeap::new();
        for &v in values {
            assert!(heap.offer(Value::from(v)).unwrap());
        }
        heap
    }

    #[test]
    fn poll_returns_ascending_order() {
        let mut heap = heap_of(&[5, 3, 8, 1, 9, 2]);
        let mut polled = Vec::new();
        while let Some(v) = heap.poll().unwrap() {
            polled.push(v);
        }
        assert_eq!(polled, [1, 2, 3, 5, 8, 9].map(Value::from).to_vec());
        assert_eq!(heap.poll().unwrap(), None);
    }

    #[test]
    fn offer_records_sift_up_path() {
        let mut heap = heap_of(&[1, 4, 2, 7, 5]);
        let _ = heap.offer(Value::from(0)).unwrap();
        assert_eq!(heap.last_path(), &[5, 2, 0]);
        assert_eq!(heap.peek(), Some(&Value::from(0)));
    }

    #[test]
    fn growth_follows_small_then_large_rule() {
        let mut heap = PriorityHeap::with_capacity(11);
        for v in 0..12 {
            let _ = heap.offer(Value::from(v)).unwrap();
        }
        assert_eq!(heap.capacity(), 24);
        let mut big = PriorityHeap::with_capacity(64);
        for v in 0..65 {
            let _ = big.offer(Value::from(v)).unwrap();
        }
        assert_eq!(big.capacity(), 96);
    }

    #[test]
    fn remove_moves_last_then_sifts_up_when_needed() {
        // slots: [1, 10, 2, 11, 12, 3, 4]
        let mut heap = heap_of(&[1, 10, 2, 11, 12, 3, 4]);
        assert!(heap.remove(&Value::from(11)).unwrap());
        // 4 fills slot 3, cannot go down, rises above 10
        assert_eq!(heap.values().nth(1), Some(&Value::from(4)));
        assert_eq!(heap.last_path(), &[3, 3, 1]);
        heap.check_invariants().unwrap();
        assert!(!heap.remove(&Value::from(11)).unwrap());
    }

    #[test]
    fn remove_of_last_slot_just_shrinks() {
        let mut heap = heap_of(&[1, 2, 3]);
        assert!(heap.remove(&Value::from(3)).unwrap());
        assert_eq!(heap.len(), 2);
        assert!(heap.last_path().is_empty());
    }

    #[test]
    fn random_operations_preserve_heap_order() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut heap = PriorityHeap::new();
        let mut reference: Vec<i64> = Vec::new();
        for _ in 0..800 {
            match rng.random_range(0..4) {
                0 | 1 => {
                    let v = rng.random_range(-50..50);
                    let _ = heap.offer(Value::from(v)).unwrap();
                    reference.push(v);
                }
                2 => {
                    let polled = heap.poll().unwrap();
                    reference.sort_unstable();
                    let expected = if reference.is_empty() {
                        None
                    } else {
                        Some(Value::from(reference.remove(0)))
                    };
                    assert_eq!(polled, expected);
                }
                _ if reference.is_empty() => {
                    assert!(!heap.remove(&Value::from(0)).unwrap());
                }
                _ => {
                    let at = rng.random_range(0..reference.len());
                    let v = reference.swap_remove(at);
                    assert!(heap.remove(&Value::from(v)).unwrap());
                }
            }
            heap.check_invariants().unwrap();
            let mut expected = reference.clone();
            expected.sort_unstable();
            let expected: Vec<Value> = expected.into_iter().map(Value::from).collect();
            assert_eq!(heap.to_sorted_vec(), expected);
        }
    }

    #[test]
    fn to_sorted_vec_leaves_heap_alone() {
        let heap = heap_of(&[3, 1, 2]);
        let before: Vec<Value> = heap.values().cloned().collect();
        assert_eq!(heap.to_sorted_vec(), [1, 2, 3].map(Value::from).to_vec());
        assert_eq!(heap.values().cloned().collect::<Vec<_>>(), before);
    }

    #[test]
    fn mismatched_kinds_and_null() {
        let mut heap = heap_of(&[1]);
        assert!(heap.offer(Value::from("x")).is_err());
        assert!(!heap.offer(Value::Null).unwrap());
        assert_eq!(heap.len(), 1);
    }
}
