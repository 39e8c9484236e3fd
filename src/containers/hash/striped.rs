use web_time::{Duration, Instant};

use super::{ChainedMap, HashFlavor};
use crate::containers::{Container, ContainerKind, OperationLog, PutResult};
use crate::entity::{AnimatedEntity, DepartureQueue};
use crate::options::Options;
use crate::value::Value;

/// Record of the segment an access "locked". Display state only; nothing
/// ever waits on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentLock {
    /// Segment index in `[0, concurrency_level)`.
    pub segment: usize,
    /// When the access happened.
    pub acquired_at: Instant,
}

/// Hash map whose buckets are partitioned into fixed lock segments.
///
/// Every `put`, `get`, `remove` and `contains_key` notes which segment it
/// touched so a renderer can highlight it for `lock_highlight`.
#[derive(Debug)]
pub struct StripedMap {
    inner: ChainedMap,
    concurrency_level: usize,
    lock: Option<SegmentLock>,
    lock_highlight: Duration,
}

impl StripedMap {
    /// Empty map with 16 buckets and 16 segments.
    #[must_use]
    pub fn new() -> Self {
        Self::from_options(&Options::default())
    }

    /// Empty map with an explicit bucket count and concurrency level.
    #[must_use]
    pub fn with_level(capacity: usize, concurrency_level: usize) -> Self {
        let mut options = Options::default();
        options.containers.hash_capacity = capacity;
        options.containers.concurrency_level = concurrency_level;
        Self::from_options(&options)
    }

    /// Empty map built from `options`.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        Self {
            inner: ChainedMap::from_options(options, HashFlavor::Standard),
            concurrency_level: options.containers.concurrency_level.max(1),
            lock: None,
            lock_highlight: Duration::from_millis(options.animation.lock_highlight_ms),
        }
    }

    /// Number of lock segments.
    #[must_use]
    pub fn concurrency_level(&self) -> usize {
        self.concurrency_level
    }

    /// Segment owning bucket `bucket` at the current capacity.
    #[must_use]
    pub fn segment_for_bucket(&self, bucket: usize) -> usize {
        let per_segment = (self.inner.capacity() / self.concurrency_level).max(1);
        (bucket / per_segment).min(self.concurrency_level - 1)
    }

    /// Segment `key` routes to at the current capacity.
    #[must_use]
    pub fn segment_for_key(&self, key: &Value) -> usize {
        self.segment_for_bucket(self.inner.bucket_of(key))
    }

    /// Most recent lock record, however old.
    #[must_use]
    pub fn last_lock(&self) -> Option<SegmentLock> {
        self.lock
    }

    /// Segment still shown as held at `now`.
    #[must_use]
    pub fn held_segment(&self, now: Instant) -> Option<usize> {
        self.lock
            .filter(|l| now.saturating_duration_since(l.acquired_at) < self.lock_highlight)
            .map(|l| l.segment)
    }

    /// Insert or replace under the key's segment.
    ///
    /// A put that rehashes records the segment of the key's bucket in the
    /// grown table.
    pub fn put(&mut self, key: Value, value: Value) -> PutResult {
        self.touch(&key);
        let (result, rehashed) = self.inner.put_reporting_rehash(key.clone(), value);
        if rehashed {
            self.touch(&key);
        }
        result
    }

    /// Value stored under `key`.
    pub fn get(&mut self, key: &Value) -> Option<&Value> {
        self.touch(key);
        self.inner.get(key)
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        self.touch(key);
        self.inner.remove(key)
    }

    /// Whether `key` is stored.
    pub fn contains_key(&mut self, key: &Value) -> bool {
        self.touch(key);
        self.inner.contains_key(key)
    }

    /// Keys in bucket order.
    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.inner.keys()
    }

    /// Remove every entry. No segment is touched.
    pub fn clear(&mut self) {
        self.inner.clear();
        self.lock = None;
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

    fn touch(&mut self, key: &Value) {
        if key.is_null() {
            return;
        }
        let segment = self.segment_for_key(key);
        self.lock = Some(SegmentLock {
            segment,
            acquired_at: Instant::now(),
        });
    }
}

impl Default for StripedMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Container for StripedMap {
    fn kind(&self) -> ContainerKind {
        ContainerKind::StripedMap
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
        self.inner.live_entities()
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
    fn bucket_ten_of_sixteen_is_segment_two() {
        let mut map = StripedMap::with_level(16, 4);
        assert_eq!(map.segment_for_bucket(10), 2);
        let _ = map.put(Value::from(10), Value::from("ten"));
        assert_eq!(map.last_lock().map(|l| l.segment), Some(2));
    }

    #[test]
    fn rehashing_put_locks_the_segment_of_the_new_bucket() {
        let mut map = StripedMap::with_level(16, 4);
        for k in 0..12 {
            let _ = map.put(Value::from(k), Value::from(k));
        }
        assert_eq!(map.capacity(), 16);
        // bucket 4 of 16 (segment 1) before the rehash, bucket 20 of 32 after
        let _ = map.put(Value::from(20), Value::from(20));
        assert_eq!(map.capacity(), 32);
        assert_eq!(map.inner.bucket_of(&Value::from(20)), 20);
        assert_eq!(map.last_lock().map(|l| l.segment), Some(2));
    }

    #[test]
    fn segments_clamp_to_last() {
        let map = StripedMap::with_level(16, 3);
        assert_eq!(map.segment_for_bucket(0), 0);
        assert_eq!(map.segment_for_bucket(15), 2);
        let fine = StripedMap::with_level(4, 16);
        assert_eq!(fine.segment_for_bucket(3), 3);
    }

    #[test]
    fn every_access_records_a_lock() {
        let mut map = StripedMap::with_level(16, 4);
        let _ = map.put(Value::from(1), Value::from(1));
        assert_eq!(map.last_lock().map(|l| l.segment), Some(0));
        let _ = map.get(&Value::from(13));
        assert_eq!(map.last_lock().map(|l| l.segment), Some(3));
        let _ = map.contains_key(&Value::from(6));
        assert_eq!(map.last_lock().map(|l| l.segment), Some(1));
        let _ = map.remove(&Value::from(9));
        assert_eq!(map.last_lock().map(|l| l.segment), Some(2));
    }

    #[test]
    fn lock_is_held_only_for_the_highlight_window() {
        let mut map = StripedMap::with_level(16, 4);
        assert_eq!(map.held_segment(Instant::now()), None);
        let _ = map.put(Value::from(5), Value::from(5));
        let acquired = map.last_lock().map(|l| l.acquired_at);
        let Some(acquired) = acquired else {
            panic!("put must record a lock");
        };
        assert_eq!(map.held_segment(acquired), Some(1));
        let later = acquired + Duration::from_millis(601);
        assert_eq!(map.held_segment(later), None);
    }

    #[test]
    fn behaves_like_a_map() {
        let mut map = StripedMap::new();
        for k in 0..20 {
            let _ = map.put(Value::from(k), Value::from(-k));
        }
        assert_eq!(map.capacity(), 32);
        assert_eq!(map.get(&Value::from(19)), Some(&Value::from(-19)));
        assert_eq!(map.len(), 20);
    }
}
