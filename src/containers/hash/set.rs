use super::{HashFlavor, HashTable};
use crate::containers::{advance_all, Container, ContainerKind, OperationLog};
use crate::entity::{AnimatedEntity, DepartureQueue};
use crate::options::{AnimationOptions, Options};
use crate::value::Value;

/// Hash set with separate chaining.
#[derive(Debug)]
pub struct ChainedSet {
    table: HashTable,
    departures: DepartureQueue,
    log: OperationLog,
    motion: AnimationOptions,
}

impl ChainedSet {
    /// Empty set with 16 buckets and load factor 0.75.
    #[must_use]
    pub fn new() -> Self {
        Self::from_options(&Options::default(), HashFlavor::Standard)
    }

    /// Empty set with an explicit bucket count and load factor.
    #[must_use]
    pub fn with_capacity(capacity: usize, load_factor: f32) -> Self {
        let options = Options::default();
        Self {
            table: HashTable::new(
                HashFlavor::Standard,
                capacity,
                load_factor,
                options.layout,
            ),
            departures: DepartureQueue::new(),
            log: OperationLog::default(),
            motion: options.animation,
        }
    }

    /// Empty set of the given flavor built from `options`.
    #[must_use]
    pub fn from_options(options: &Options, flavor: HashFlavor) -> Self {
        Self {
            table: HashTable::from_options(flavor, &options.containers, &options.layout),
            departures: DepartureQueue::new(),
            log: OperationLog::default(),
            motion: options.animation.clone(),
        }
    }

    /// Elements in bucket order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.table.iter().map(|e| &e.value)
    }

    /// Insert `value` if absent. Null and duplicates are rejected.
    pub fn add(&mut self, value: Value) -> bool {
        self.add_reporting_rehash(value).0
    }

    /// Remove `value`, returning whether it was present.
    pub fn remove(&mut self, value: &Value) -> bool {
        match self.table.remove(value) {
            Some(entity) => {
                self.departures.push(entity);
                self.log.record(format!("remove({value})"));
                true
            }
            None => {
                self.log.record(format!("remove({value}): absent"));
                false
            }
        }
    }

    /// Membership test over the key's bucket chain.
    pub fn contains(&mut self, value: &Value) -> bool {
        let found = match self.table.find_mut(value) {
            Some(entity) => {
                entity.flash();
                true
            }
            None => false,
        };
        self.log.record(format!(
            "contains({value}) -> {found} (bucket {})",
            self.table.bucket_index(value)
        ));
        found
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.departures.extend(self.table.drain());
        self.log.record("clear");
    }

    /// Configured rehash threshold.
    #[must_use]
    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    /// Current `len / capacity`.
    #[must_use]
    pub fn fill_ratio(&self) -> f32 {
        self.table.fill_ratio()
    }

    /// Number of rehashes so far.
    #[must_use]
    pub fn rehash_count(&self) -> u64 {
        self.table.rehash_count()
    }

    /// Entries sharing a bucket with an earlier entry.
    #[must_use]
    pub fn collisions(&self) -> usize {
        self.table.collisions()
    }

    /// Longest bucket chain.
    #[must_use]
    pub fn max_chain_length(&self) -> usize {
        self.table.max_chain_length()
    }

    /// Bucket the value hashes to at the current capacity.
    #[must_use]
    pub fn bucket_of(&self, value: &Value) -> usize {
        self.table.bucket_index(value)
    }

    pub(super) fn add_reporting_rehash(&mut self, value: Value) -> (bool, bool) {
        if value.is_null() {
            self.log.record("add(null) rejected");
            return (false, false);
        }
        if let Some(existing) = self.table.find_mut(&value) {
            existing.flash();
            self.log.record(format!("add({value}): duplicate"));
            return (false, false);
        }
        self.log.record(format!(
            "add({value}) -> bucket {}",
            self.table.bucket_index(&value)
        ));
        let rehashed = self.table.insert_new(AnimatedEntity::new(value));
        (true, rehashed)
    }

    pub(super) fn lookup(&self, value: &Value) -> Option<&AnimatedEntity> {
        self.table.find(value)
    }
}

impl Default for ChainedSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Container for ChainedSet {
    fn kind(&self) -> ContainerKind {
        ContainerKind::ChainedSet
    }

    fn len(&self) -> usize {
        self.table.len()
    }

    fn capacity(&self) -> usize {
        self.table.capacity()
    }

    fn log(&self) -> &OperationLog {
        &self.log
    }

    fn live_entities(&self) -> Vec<&AnimatedEntity> {
        self.table.iter().collect()
    }

    fn departures(&self) -> &DepartureQueue {
        &self.departures
    }

    fn tick(&mut self, dt: f32) -> usize {
        advance_all(self.table.iter_mut(), &mut self.departures, dt, &self.motion)
    }
}

/// Hash set that iterates in insertion order.
#[derive(Debug, Default)]
pub struct LinkedChainedSet {
    inner: ChainedSet,
    order: Vec<Value>,
}

impl LinkedChainedSet {
    /// Empty set with 16 buckets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty set built from `options`.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        Self {
            inner: ChainedSet::from_options(options, HashFlavor::Standard),
            order: Vec::new(),
        }
    }

    /// Elements in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.order.iter()
    }

    /// Insert `value` if absent, appending it to the insertion order.
    pub fn add(&mut self, value: Value) -> bool {
        let (added, rehashed) = self.inner.add_reporting_rehash(value.clone());
        if rehashed {
            self.rebuild_order();
        }
        if added {
            self.order.push(value);
        }
        added
    }

    /// Remove `value` from the table and the insertion order.
    pub fn remove(&mut self, value: &Value) -> bool {
        let removed = self.inner.remove(value);
        if removed {
            self.order.retain(|v| v != value);
        }
        removed
    }

    /// Membership test.
    pub fn contains(&mut self, value: &Value) -> bool {
        self.inner.contains(value)
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.inner.clear();
        self.order.clear();
    }

    /// Configured rehash threshold.
    #[must_use]
    pub fn load_factor(&self) -> f32 {
        self.inner.load_factor()
    }

    /// Number of rehashes so far.
    #[must_use]
    pub fn rehash_count(&self) -> u64 {
        self.inner.rehash_count()
    }

    /// Entries sharing a bucket with an earlier entry.
    #[must_use]
    pub fn collisions(&self) -> usize {
        self.inner.collisions()
    }

    /// Longest bucket chain.
    #[must_use]
    pub fn max_chain_length(&self) -> usize {
        self.inner.max_chain_length()
    }

    fn rebuild_order(&mut self) {
        let previous = std::mem::take(&mut self.order);
        self.order = previous
            .into_iter()
            .filter(|v| self.inner.lookup(v).is_some())
            .collect();
    }
}

impl Container for LinkedChainedSet {
    fn kind(&self) -> ContainerKind {
        ContainerKind::LinkedChainedSet
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn log(&self) -> &OperationLog {
        self.inner.log()
    }

    fn live_entities(&self) -> Vec<&AnimatedEntity> {
        self.order
            .iter()
            .filter_map(|v| self.inner.lookup(v))
            .collect()
    }

    fn departures(&self) -> &DepartureQueue {
        self.inner.departures()
    }

    fn tick(&mut self, dt: f32) -> usize {
        self.inner.tick(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_and_null_are_rejected() {
        let mut set = ChainedSet::new();
        assert!(set.add(Value::from("x")));
        assert!(!set.add(Value::from("x")));
        assert!(!set.add(Value::Null));
        assert_eq!(set.len(), 1);
        assert_eq!(set.log().count(), 3);
    }

    #[test]
    fn rehash_keeps_every_element() {
        let mut set = ChainedSet::new();
        for k in 0..40 {
            assert!(set.add(Value::from(k)));
        }
        assert_eq!(set.capacity(), 64);
        assert_eq!(set.rehash_count(), 2);
        for k in 0..40 {
            assert!(set.contains(&Value::from(k)));
        }
        assert!(set.fill_ratio() <= set.load_factor());
    }

    #[test]
    fn removed_element_leaves_but_stays_drawable() {
        let mut set = ChainedSet::new();
        let _ = set.add(Value::from(5));
        assert!(set.remove(&Value::from(5)));
        assert!(!set.remove(&Value::from(5)));
        assert!(!set.contains(&Value::from(5)));
        assert!(set.is_empty());
        assert_eq!(set.entities().len(), 1);
    }

    #[test]
    fn linked_set_iterates_in_insertion_order_across_rehash() {
        let mut set = LinkedChainedSet::new();
        let keys: Vec<i64> = (0..20).rev().collect();
        for &k in &keys {
            let _ = set.add(Value::from(k));
        }
        let _ = set.remove(&Value::from(7));
        let expected: Vec<Value> = keys
            .iter()
            .filter(|&&k| k != 7)
            .map(|&k| Value::from(k))
            .collect();
        assert_eq!(set.values().cloned().collect::<Vec<_>>(), expected);
        let drawn: Vec<Value> = set
            .live_entities()
            .iter()
            .map(|e| e.value.clone())
            .collect();
        assert_eq!(drawn, expected);
        assert_eq!(set.rehash_count(), 1);
    }

    #[test]
    fn linked_set_duplicate_does_not_move() {
        let mut set = LinkedChainedSet::new();
        for c in ['a', 'b', 'c'] {
            let _ = set.add(Value::from(c));
        }
        assert!(!set.add(Value::from('a')));
        assert_eq!(set.values().next(), Some(&Value::from('a')));
        assert_eq!(set.len(), 3);
    }
}
