use super::{Color, Insertion, RbTree};
use crate::containers::{advance_all, Container, ContainerKind, OperationLog, PutResult};
use crate::entity::{AnimatedEntity, DepartureQueue};
use crate::error::VizError;
use crate::options::{AnimationOptions, Options};
use crate::value::Value;

/// Sorted map backed by a red-black tree.
///
/// Keys must be mutually comparable; a key of another kind makes `put`,
/// `get` and `contains_key` return [`VizError::Incomparable`].
#[derive(Debug)]
pub struct OrderedMap {
    tree: RbTree,
    departures: DepartureQueue,
    log: OperationLog,
    motion: AnimationOptions,
}

impl OrderedMap {
    /// Empty map with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::from_options(&Options::default())
    }

    /// Empty map laid out from `options`.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        Self {
            tree: RbTree::new(options.layout.clone()),
            departures: DepartureQueue::new(),
            log: OperationLog::default(),
            motion: options.animation.clone(),
        }
    }

    /// Insert or replace. An existing key keeps its node; only the value
    /// changes.
    pub fn put(&mut self, key: Value, value: Value) -> Result<PutResult, VizError> {
        if key.is_null() || value.is_null() {
            self.log.record(format!("put({key}, {value}) rejected"));
            return Ok(PutResult::Rejected);
        }
        let rotations = self.tree.rotation_count();
        let description = format!("put({key}, {value})");
        match self.tree.insert(AnimatedEntity::entry(key, value.clone()))? {
            Insertion::Existing(id) => {
                self.log.record(format!("{description} replaced"));
                let previous = self.tree.entity_mut(id).replace_paired(value);
                Ok(previous.map_or(PutResult::Inserted, PutResult::Replaced))
            }
            Insertion::Linked(_) => {
                let rotated = self.tree.rotation_count() - rotations;
                self.log.record(format!("{description} with {rotated} rotation(s)"));
                Ok(PutResult::Inserted)
            }
        }
    }

    /// Value stored under `key`.
    pub fn get(&mut self, key: &Value) -> Result<Option<&Value>, VizError> {
        self.log.record(format!("get({key})"));
        let Some(id) = self.tree.find(key)? else {
            return Ok(None);
        };
        let entity = self.tree.entity_mut(id);
        entity.flash();
        Ok(entity.paired.as_ref())
    }

    /// Whether `key` is stored.
    pub fn contains_key(&mut self, key: &Value) -> Result<bool, VizError> {
        let found = self.tree.find(key)?;
        if let Some(id) = found {
            self.tree.entity_mut(id).flash();
        }
        self.log.record(format!("containsKey({key}) -> {}", found.is_some()));
        Ok(found.is_some())
    }

    /// Smallest key, following the left spine.
    pub fn first_key(&mut self) -> Option<&Value> {
        self.log.record("firstKey");
        let id = self.tree.first()?;
        let entity = self.tree.entity_mut(id);
        entity.flash();
        Some(&entity.value)
    }

    /// Largest key, following the right spine.
    pub fn last_key(&mut self) -> Option<&Value> {
        self.log.record("lastKey");
        let id = self.tree.last()?;
        let entity = self.tree.entity_mut(id);
        entity.flash();
        Some(&entity.value)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.tree.in_order().map(|e| &e.value)
    }

    /// Values in ascending key order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.tree.in_order().filter_map(|e| e.paired.as_ref())
    }

    /// Root key, if any.
    #[must_use]
    pub fn root_key(&self) -> Option<&Value> {
        self.tree.root().map(|id| &self.tree.entity(id).value)
    }

    /// Keys in order with their node colours.
    #[must_use]
    pub fn colored_keys(&self) -> Vec<(&Value, Color)> {
        self.tree
            .in_order_colored()
            .into_iter()
            .map(|(e, c)| (&e.value, c))
            .collect()
    }

    /// Edges on the longest root-to-leaf path.
    #[must_use]
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Black nodes on every root-to-nil path.
    #[must_use]
    pub fn black_height(&self) -> usize {
        self.tree.black_height()
    }

    /// Rotations performed so far.
    #[must_use]
    pub fn rotation_count(&self) -> u64 {
        self.tree.rotation_count()
    }

    /// Validate every red-black property; returns the black height.
    pub fn check_invariants(&self) -> Result<usize, VizError> {
        self.tree.check_invariants()
    }

    /// Mark every node leaving (pre-order) and drop the root.
    pub fn clear(&mut self) {
        self.departures.extend(self.tree.drain_pre_order());
        self.log.record("clear");
    }
}

impl Default for OrderedMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Container for OrderedMap {
    fn kind(&self) -> ContainerKind {
        ContainerKind::OrderedMap
    }

    fn len(&self) -> usize {
        self.tree.len()
    }

    fn capacity(&self) -> usize {
        self.tree.len()
    }

    fn log(&self) -> &OperationLog {
        &self.log
    }

    fn live_entities(&self) -> Vec<&AnimatedEntity> {
        self.tree.in_order().collect()
    }

    fn departures(&self) -> &DepartureQueue {
        &self.departures
    }

    fn tick(&mut self, dt: f32) -> usize {
        advance_all(self.tree.entities_mut(), &mut self.departures, dt, &self.motion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_twenty_five_fifteen() {
        let mut map = OrderedMap::new();
        for k in [10, 20, 5, 15] {
            let _ = map.put(Value::from(k), Value::from(k * 2)).unwrap();
        }
        assert_eq!(map.root_key(), Some(&Value::from(10)));
        assert_eq!(map.colored_keys()[1], (&Value::from(10), Color::Black));
        assert_eq!(map.height(), 2);
        assert_eq!(
            map.keys().cloned().collect::<Vec<_>>(),
            [5, 10, 15, 20].map(Value::from).to_vec()
        );
        assert_eq!(map.first_key(), Some(&Value::from(5)));
        assert_eq!(map.last_key(), Some(&Value::from(20)));
        assert_eq!(map.check_invariants().unwrap(), 2);
    }

    #[test]
    fn replacing_a_value_does_not_restructure() {
        let mut map = OrderedMap::new();
        for k in 1..=7 {
            let _ = map.put(Value::from(k), Value::from('a')).unwrap();
        }
        let rotations = map.rotation_count();
        let result = map.put(Value::from(4), Value::from('b')).unwrap();
        assert_eq!(result, PutResult::Replaced(Value::from('a')));
        assert_eq!(map.rotation_count(), rotations);
        assert_eq!(map.len(), 7);
        assert_eq!(map.get(&Value::from(4)).unwrap(), Some(&Value::from('b')));
    }

    #[test]
    fn mismatched_key_kind_is_an_error() {
        let mut map = OrderedMap::new();
        let _ = map.put(Value::from("k"), Value::from(1)).unwrap();
        assert!(map.put(Value::from(1), Value::from(1)).is_err());
        assert!(map.get(&Value::from(true)).is_err());
        assert!(map.contains_key(&Value::from('c')).is_err());
        assert!(map.contains_key(&Value::from("k")).unwrap());
    }

    #[test]
    fn null_is_rejected_without_comparing() {
        let mut map = OrderedMap::new();
        let _ = map.put(Value::from(1), Value::from(1)).unwrap();
        assert!(map.put(Value::Null, Value::from(1)).unwrap().is_rejected());
        assert!(map.put(Value::from(2), Value::Null).unwrap().is_rejected());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn empty_map_queries() {
        let mut map = OrderedMap::new();
        assert_eq!(map.first_key(), None);
        assert_eq!(map.last_key(), None);
        assert_eq!(map.get(&Value::from(1)).unwrap(), None);
        assert_eq!(map.height(), 0);
        assert_eq!(map.check_invariants().unwrap(), 0);
    }

    #[test]
    fn clear_sends_nodes_to_departures() {
        let mut map = OrderedMap::new();
        for k in 0..5 {
            let _ = map.put(Value::from(k), Value::from(k)).unwrap();
        }
        map.clear();
        assert!(map.is_empty());
        assert!(map.root_key().is_none());
        assert_eq!(map.departures().len(), 5);
        assert_eq!(map.entities().len(), 5);
    }
}
