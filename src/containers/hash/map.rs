use super::{HashFlavor, HashTable};
use crate::containers::{advance_all, Container, ContainerKind, OperationLog, PutResult};
use crate::entity::{AnimatedEntity, DepartureQueue};
use crate::options::{AnimationOptions, Options};
use crate::value::Value;

/// Hash map with separate chaining, in either capacity flavor.
#[derive(Debug)]
pub struct ChainedMap {
    table: HashTable,
    departures: DepartureQueue,
    log: OperationLog,
    motion: AnimationOptions,
}

impl ChainedMap {
    /// Empty power-of-two map (16 buckets, load factor 0.75).
    #[must_use]
    pub fn new() -> Self {
        Self::from_options(&Options::default(), HashFlavor::Standard)
    }

    /// Empty map with prime-ish buckets (11, growing ×2+1).
    #[must_use]
    pub fn historic() -> Self {
        Self::from_options(&Options::default(), HashFlavor::Historic)
    }

    /// Empty map with explicit flavor, bucket count and load factor.
    #[must_use]
    pub fn with_capacity(flavor: HashFlavor, capacity: usize, load_factor: f32) -> Self {
        let options = Options::default();
        Self {
            table: HashTable::new(flavor, capacity, load_factor, options.layout),
            departures: DepartureQueue::new(),
            log: OperationLog::default(),
            motion: options.animation,
        }
    }

    /// Empty map of the given flavor built from `options`.
    #[must_use]
    pub fn from_options(options: &Options, flavor: HashFlavor) -> Self {
        Self {
            table: HashTable::from_options(flavor, &options.containers, &options.layout),
            departures: DepartureQueue::new(),
            log: OperationLog::default(),
            motion: options.animation.clone(),
        }
    }

    /// Capacity policy.
    #[must_use]
    pub fn flavor(&self) -> HashFlavor {
        self.table.flavor()
    }

    /// Insert or replace. Null keys and null values are rejected.
    pub fn put(&mut self, key: Value, value: Value) -> PutResult {
        self.put_reporting_rehash(key, value).0
    }

    /// Value stored under `key`.
    pub fn get(&mut self, key: &Value) -> Option<&Value> {
        let bucket = self.table.bucket_index(key);
        self.log.record(format!("get({key}) in bucket {bucket}"));
        let entity = self.table.find_mut(key)?;
        entity.flash();
        entity.paired.as_ref()
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        match self.table.remove(key) {
            Some(entity) => {
                self.log.record(format!("remove({key})"));
                let value = entity.paired.clone();
                self.departures.push(entity);
                value
            }
            None => {
                self.log.record(format!("remove({key}): absent"));
                None
            }
        }
    }

    /// Whether `key` is stored.
    pub fn contains_key(&mut self, key: &Value) -> bool {
        let found = match self.table.find_mut(key) {
            Some(entity) => {
                entity.flash();
                true
            }
            None => false,
        };
        self.log.record(format!("containsKey({key}) -> {found}"));
        found
    }

    /// Keys in bucket order.
    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.table.iter().map(|e| &e.value)
    }

    /// Values in bucket order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.table.iter().filter_map(|e| e.paired.as_ref())
    }

    /// Remove every entry.
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

    /// Bucket `key` hashes to at the current capacity.
    #[must_use]
    pub fn bucket_of(&self, key: &Value) -> usize {
        self.table.bucket_index(key)
    }

    pub(super) fn put_reporting_rehash(&mut self, key: Value, value: Value) -> (PutResult, bool) {
        if key.is_null() || value.is_null() {
            self.log.record(format!("put({key}, {value}) rejected"));
            return (PutResult::Rejected, false);
        }
        let bucket = self.table.bucket_index(&key);
        if let Some(entry) = self.table.find_mut(&key) {
            self.log.record(format!("put({key}, {value}) replaced in bucket {bucket}"));
            return match entry.replace_paired(value) {
                Some(previous) => (PutResult::Replaced(previous), false),
                None => (PutResult::Inserted, false),
            };
        }
        self.log.record(format!("put({key}, {value}) -> bucket {bucket}"));
        let rehashed = self.table.insert_new(AnimatedEntity::entry(key, value));
        (PutResult::Inserted, rehashed)
    }

    pub(super) fn lookup(&self, key: &Value) -> Option<&AnimatedEntity> {
        self.table.find(key)
    }
}

impl Default for ChainedMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Container for ChainedMap {
    fn kind(&self) -> ContainerKind {
        match self.table.flavor() {
            HashFlavor::Standard => ContainerKind::ChainedMap,
            HashFlavor::Historic => ContainerKind::HistoricMap,
        }
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

/// Hash map that iterates in insertion order. Re-putting an existing key
/// keeps its original position.
#[derive(Debug, Default)]
pub struct LinkedChainedMap {
    inner: ChainedMap,
    order: Vec<Value>,
}

impl LinkedChainedMap {
    /// Empty map with 16 buckets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty map built from `options`.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        Self {
            inner: ChainedMap::from_options(options, HashFlavor::Standard),
            order: Vec::new(),
        }
    }

    /// Insert or replace, recording first insertion order.
    pub fn put(&mut self, key: Value, value: Value) -> PutResult {
        let (result, rehashed) = self.inner.put_reporting_rehash(key.clone(), value);
        if rehashed {
            self.rebuild_order();
        }
        if result == PutResult::Inserted {
            self.order.push(key);
        }
        result
    }

    /// Value stored under `key`.
    pub fn get(&mut self, key: &Value) -> Option<&Value> {
        self.inner.get(key)
    }

    /// Remove `key` from the table and the insertion order.
    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        let removed = self.inner.remove(key);
        if removed.is_some() {
            self.order.retain(|k| k != key);
        }
        removed
    }

    /// Whether `key` is stored.
    pub fn contains_key(&mut self, key: &Value) -> bool {
        self.inner.contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.order.iter()
    }

    /// Values in key insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.order
            .iter()
            .filter_map(|k| self.inner.lookup(k).and_then(|e| e.paired.as_ref()))
    }

    /// Remove every entry.
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
            .filter(|k| self.inner.lookup(k).is_some())
            .collect();
    }
}

impl Container for LinkedChainedMap {
    fn kind(&self) -> ContainerKind {
        ContainerKind::LinkedChainedMap
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
            .filter_map(|k| self.inner.lookup(k))
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
    fn put_get_replace_remove() {
        let mut map = ChainedMap::new();
        assert_eq!(map.put(Value::from(3), Value::from("x")), PutResult::Inserted);
        assert_eq!(
            map.put(Value::from(3), Value::from("y")),
            PutResult::Replaced(Value::from("x"))
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&Value::from(3)), Some(&Value::from("y")));
        assert_eq!(map.remove(&Value::from(3)), Some(Value::from("y")));
        assert_eq!(map.get(&Value::from(3)), None);
        assert_eq!(map.remove(&Value::from(3)), None);
    }

    #[test]
    fn null_key_or_value_is_rejected() {
        let mut map = ChainedMap::new();
        assert!(map.put(Value::Null, Value::from(1)).is_rejected());
        assert!(map.put(Value::from(1), Value::Null).is_rejected());
        assert!(map.is_empty());
        assert_eq!(map.log().count(), 2);
    }

    #[test]
    fn rehash_doubles_at_threshold_and_keeps_entries() {
        let mut map = ChainedMap::new();
        for k in 0..12 {
            let _ = map.put(Value::from(k), Value::from(k * 10));
        }
        assert_eq!(map.capacity(), 16);
        let _ = map.put(Value::from(12), Value::from(120));
        assert_eq!(map.capacity(), 32);
        for k in 0..13 {
            assert_eq!(map.get(&Value::from(k)), Some(&Value::from(k * 10)));
        }
    }

    #[test]
    fn historic_map_reports_its_own_kind() {
        let mut map = ChainedMap::historic();
        assert_eq!(map.kind(), ContainerKind::HistoricMap);
        assert_eq!(map.capacity(), 11);
        for k in 0..9 {
            let _ = map.put(Value::from(k), Value::from(true));
        }
        assert_eq!(map.capacity(), 23);
        assert_eq!(map.rehash_count(), 1);
    }

    #[test]
    fn keys_and_values_follow_buckets() {
        let mut map = ChainedMap::new();
        for k in [5, 1, 3] {
            let _ = map.put(Value::from(k), Value::from(k + 100));
        }
        let keys: Vec<Value> = map.keys().cloned().collect();
        assert_eq!(keys, [1, 3, 5].map(Value::from).to_vec());
        let values: Vec<Value> = map.values().cloned().collect();
        assert_eq!(values, [101, 103, 105].map(Value::from).to_vec());
    }

    #[test]
    fn linked_map_keeps_first_insertion_position() {
        let mut map = LinkedChainedMap::new();
        for k in [30, 10, 20] {
            let _ = map.put(Value::from(k), Value::from('v'));
        }
        let _ = map.put(Value::from(30), Value::from('w'));
        let keys: Vec<Value> = map.keys().cloned().collect();
        assert_eq!(keys, [30, 10, 20].map(Value::from).to_vec());
        assert_eq!(map.values().next(), Some(&Value::from('w')));
    }

    #[test]
    fn linked_map_order_survives_rehash_and_removal() {
        let mut map = LinkedChainedMap::new();
        for k in (0..15).rev() {
            let _ = map.put(Value::from(k), Value::from(k));
        }
        assert_eq!(map.rehash_count(), 1);
        assert_eq!(map.remove(&Value::from(14)), Some(Value::from(14)));
        let keys: Vec<Value> = map.keys().cloned().collect();
        let expected: Vec<Value> = (0..14).rev().map(Value::from).collect();
        assert_eq!(keys, expected);
        assert_eq!(map.live_entities().len(), 14);
    }
}
