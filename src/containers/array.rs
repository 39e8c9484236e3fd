//! Growable array with amortised ×1.5 growth.

use glam::Vec2;

use super::{advance_all, Container, ContainerKind, OperationLog};
use crate::entity::{AnimatedEntity, DepartureQueue};
use crate::layout;
use crate::options::{AnimationOptions, LayoutOptions, Options};
use crate::value::Value;

/// Dynamic array whose capacity grows by half when full.
///
/// Out-of-range indices and invalid ranges are no-ops reported through the
/// return value (`None`/`false`) and the operation log.
#[derive(Debug)]
pub struct DynamicArray {
    slots: Vec<AnimatedEntity>,
    capacity: usize,
    grow_count: u64,
    departures: DepartureQueue,
    log: OperationLog,
    layout: LayoutOptions,
    motion: AnimationOptions,
}

impl DynamicArray {
    /// Empty array with the default capacity of 10.
    #[must_use]
    pub fn new() -> Self {
        Self::from_options(&Options::default())
    }

    /// Empty array with an explicit initial capacity (at least 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut array = Self::new();
        array.capacity = capacity.max(1);
        array
    }

    /// Empty array sized and laid out from `options`.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        Self {
            slots: Vec::new(),
            capacity: options.containers.array_capacity.max(1),
            grow_count: 0,
            departures: DepartureQueue::new(),
            log: OperationLog::default(),
            layout: options.layout.clone(),
            motion: options.animation.clone(),
        }
    }

    /// Number of times the backing capacity grew.
    #[must_use]
    pub fn grow_count(&self) -> u64 {
        self.grow_count
    }

    /// Live values in index order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.slots.iter().map(|e| &e.value)
    }

    /// Value at `index`.
    pub fn get(&mut self, index: usize) -> Option<&Value> {
        if index >= self.slots.len() {
            self.log.record(format!("get({index}) out of range"));
            return None;
        }
        self.slots[index].flash();
        self.log.record(format!("get({index})"));
        Some(&self.slots[index].value)
    }

    /// Append at the end, growing if full.
    pub fn append(&mut self, value: Value) -> bool {
        let index = self.slots.len();
        self.log.record(format!("append({value})"));
        self.insert_unchecked(index, value);
        true
    }

    /// Insert at `index` (0..=len), shifting later elements right.
    pub fn insert_at(&mut self, index: usize, value: Value) -> bool {
        if index > self.slots.len() {
            self.log
                .record(format!("insert({index}, {value}) out of range"));
            return false;
        }
        self.log.record(format!("insert({index}, {value})"));
        self.insert_unchecked(index, value);
        true
    }

    /// Replace the value at `index`, returning the previous one.
    pub fn set(&mut self, index: usize, value: Value) -> Option<Value> {
        if index >= self.slots.len() {
            self.log.record(format!("set({index}, {value}) out of range"));
            return None;
        }
        self.log.record(format!("set({index}, {value})"));
        let at = self.slots[index].position;
        let old = std::mem::replace(
            &mut self.slots[index],
            AnimatedEntity::new(value).spawned_at(at),
        );
        let previous = old.value.clone();
        self.departures.push(old);
        self.relayout();
        Some(previous)
    }

    /// Remove and return the value at `index`, shifting later elements left.
    pub fn remove_at(&mut self, index: usize) -> Option<Value> {
        if index >= self.slots.len() {
            self.log.record(format!("remove({index}) out of range"));
            return None;
        }
        self.log.record(format!("remove({index})"));
        Some(self.remove_unchecked(index))
    }

    /// Remove the first element.
    pub fn remove_first(&mut self) -> Option<Value> {
        if self.slots.is_empty() {
            self.log.record("removeFirst on empty array");
            return None;
        }
        self.log.record("removeFirst");
        Some(self.remove_unchecked(0))
    }

    /// Remove the last element.
    pub fn remove_last(&mut self) -> Option<Value> {
        if self.slots.is_empty() {
            self.log.record("removeLast on empty array");
            return None;
        }
        self.log.record("removeLast");
        Some(self.remove_unchecked(self.slots.len() - 1))
    }

    /// Remove the first element equal to `value`.
    pub fn remove_value(&mut self, value: &Value) -> bool {
        match self.scan(value, false) {
            Some(index) => {
                self.log.record(format!("remove({value}) at {index}"));
                let _ = self.remove_unchecked(index);
                true
            }
            None => {
                self.log.record(format!("remove({value}) not found"));
                false
            }
        }
    }

    /// Index of the first element equal to `value`.
    pub fn index_of(&mut self, value: &Value) -> Option<usize> {
        let found = self.scan(value, false);
        self.record_search("indexOf", value, found);
        found
    }

    /// Index of the last element equal to `value`.
    pub fn last_index_of(&mut self, value: &Value) -> Option<usize> {
        let found = self.scan(value, true);
        self.record_search("lastIndexOf", value, found);
        found
    }

    /// Whether some element equals `value`.
    pub fn contains(&mut self, value: &Value) -> bool {
        let found = self.scan(value, false);
        self.record_search("contains", value, found);
        found.is_some()
    }

    /// Shrink capacity to the live count (minimum 1).
    pub fn trim_to_size(&mut self) {
        let trimmed = self.slots.len().max(1);
        log::debug!("array trimmed {} -> {trimmed}", self.capacity);
        self.capacity = trimmed;
        self.log.record(format!("trimToSize -> {trimmed}"));
        self.relayout();
    }

    /// Grow capacity so at least `min` elements fit.
    pub fn ensure_capacity(&mut self, min: usize) {
        self.grow_to_fit(min);
        self.log
            .record(format!("ensureCapacity({min}) -> {}", self.capacity));
    }

    /// Append every value. Returns false if `values` was empty.
    pub fn add_all(&mut self, values: impl IntoIterator<Item = Value>) -> bool {
        let index = self.slots.len();
        self.add_all_at(index, values)
    }

    /// Insert every value starting at `index`, preserving their order.
    pub fn add_all_at(
        &mut self,
        index: usize,
        values: impl IntoIterator<Item = Value>,
    ) -> bool {
        if index > self.slots.len() {
            self.log.record(format!("addAll({index}) out of range"));
            return false;
        }
        let incoming: Vec<Value> = values.into_iter().collect();
        if incoming.is_empty() {
            self.log.record(format!("addAll({index}) with nothing to add"));
            return false;
        }
        self.grow_to_fit(self.slots.len() + incoming.len());
        let count = incoming.len();
        let spawned: Vec<AnimatedEntity> = incoming
            .into_iter()
            .enumerate()
            .map(|(i, v)| AnimatedEntity::new(v).spawned_at(self.spawn_point(index + i)))
            .collect();
        let _ = self.slots.splice(index..index, spawned);
        self.log.record(format!("addAll({index}, {count} values)"));
        self.relayout();
        true
    }

    /// Remove indices `from..to`. Returns the number removed.
    pub fn remove_range(&mut self, from: usize, to: usize) -> usize {
        if from > to || to > self.slots.len() {
            self.log.record(format!("removeRange({from}, {to}) invalid"));
            return 0;
        }
        self.departures.extend(self.slots.drain(from..to));
        self.log.record(format!("removeRange({from}, {to})"));
        self.relayout();
        to - from
    }

    /// Read-only view of `from..to` aliasing this array's storage.
    pub fn sub_list(&mut self, from: usize, to: usize) -> Option<SubList<'_>> {
        if from > to || to > self.slots.len() {
            self.log.record(format!("subList({from}, {to}) invalid"));
            return None;
        }
        self.log.record(format!("subList({from}, {to})"));
        Some(SubList {
            items: &self.slots[from..to],
            offset: from,
        })
    }

    /// Writable view of `from..to`; writes go straight to this array.
    pub fn sub_list_mut(
        &mut self,
        from: usize,
        to: usize,
    ) -> Option<SubListMut<'_>> {
        if from > to || to > self.slots.len() {
            self.log.record(format!("subList({from}, {to}) invalid"));
            return None;
        }
        self.log.record(format!("subList({from}, {to})"));
        Some(SubListMut {
            array: self,
            from,
            to,
        })
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.departures.extend(self.slots.drain(..));
        self.log.record("clear");
    }

    fn scan(&self, value: &Value, from_back: bool) -> Option<usize> {
        if from_back {
            self.slots.iter().rposition(|e| &e.value == value)
        } else {
            self.slots.iter().position(|e| &e.value == value)
        }
    }

    fn record_search(&mut self, op: &str, value: &Value, found: Option<usize>) {
        match found {
            Some(i) => {
                self.slots[i].flash();
                self.log.record(format!("{op}({value}) -> {i}"));
            }
            None => self.log.record(format!("{op}({value}) -> not found")),
        }
    }

    fn insert_unchecked(&mut self, index: usize, value: Value) {
        self.grow_to_fit(self.slots.len() + 1);
        let entity = AnimatedEntity::new(value).spawned_at(self.spawn_point(index));
        self.slots.insert(index, entity);
        self.relayout();
    }

    fn remove_unchecked(&mut self, index: usize) -> Value {
        let entity = self.slots.remove(index);
        let value = entity.value.clone();
        self.departures.push(entity);
        self.relayout();
        value
    }

    fn grow_to_fit(&mut self, min: usize) {
        if min <= self.capacity {
            return;
        }
        let old = self.capacity;
        while self.capacity < min {
            self.capacity += (self.capacity / 2).max(1);
        }
        self.grow_count += 1;
        log::debug!("array grew {old} -> {}", self.capacity);
    }

    fn spawn_point(&self, index: usize) -> Vec2 {
        layout::grid(index, &self.layout) - Vec2::new(0.0, self.layout.pitch())
    }

    fn relayout(&mut self) {
        for (i, entity) in self.slots.iter_mut().enumerate() {
            entity.retarget(i, layout::grid(i, &self.layout));
        }
    }
}

impl Default for DynamicArray {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DynamicArray {
    /// Deep copy of the live elements only; fading entities stay behind.
    fn clone(&self) -> Self {
        let mut log = OperationLog::default();
        log.record(format!("clone of {} elements", self.slots.len()));
        Self {
            slots: self.slots.iter().map(AnimatedEntity::fresh_copy).collect(),
            capacity: self.capacity,
            grow_count: 0,
            departures: DepartureQueue::new(),
            log,
            layout: self.layout.clone(),
            motion: self.motion.clone(),
        }
    }
}

impl Container for DynamicArray {
    fn kind(&self) -> ContainerKind {
        ContainerKind::DynamicArray
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

/// Borrowed read-only window onto part of a [`DynamicArray`].
#[derive(Debug, Clone, Copy)]
pub struct SubList<'a> {
    items: &'a [AnimatedEntity],
    offset: usize,
}

impl<'a> SubList<'a> {
    /// Number of elements in the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the window is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index in the parent array of the window's first element.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Value at window-relative `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'a Value> {
        self.items.get(index).map(|e| &e.value)
    }

    /// Window-relative index of the first element equal to `value`.
    #[must_use]
    pub fn index_of(&self, value: &Value) -> Option<usize> {
        self.items.iter().position(|e| &e.value == value)
    }

    /// Values in the window.
    pub fn values(&self) -> impl Iterator<Item = &'a Value> {
        self.items.iter().map(|e| &e.value)
    }
}

/// Borrowed writable window onto part of a [`DynamicArray`].
#[derive(Debug)]
pub struct SubListMut<'a> {
    array: &'a mut DynamicArray,
    from: usize,
    to: usize,
}

impl SubListMut<'_> {
    /// Number of elements in the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.to - self.from
    }

    /// Whether the window is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to == self.from
    }

    /// Value at window-relative `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        if index >= self.len() {
            return None;
        }
        self.array.slots.get(self.from + index).map(|e| &e.value)
    }

    /// Replace the value at window-relative `index` in the parent array.
    pub fn set(&mut self, index: usize, value: Value) -> Option<Value> {
        if index >= self.len() {
            self.array
                .log
                .record(format!("subList.set({index}) out of range"));
            return None;
        }
        self.array.set(self.from + index, value)
    }
}
