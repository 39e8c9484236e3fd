//! Separate-chaining hash family.
//!
//! [`HashTable`] is the shared engine: bucket selection, chain append,
//! load-factor rehash and per-bucket layout. The public sets and maps wrap it
//! and add insertion order ([`LinkedChainedSet`], [`LinkedChainedMap`]) or
//! segment routing ([`StripedMap`]).

mod map;
mod set;
mod striped;

pub use map::{ChainedMap, LinkedChainedMap};
pub use set::{ChainedSet, LinkedChainedSet};
pub use striped::{SegmentLock, StripedMap};

use crate::entity::AnimatedEntity;
use crate::layout;
use crate::options::{ContainerOptions, LayoutOptions};
use crate::value::Value;

/// Capacity policy of a hash table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashFlavor {
    /// Power-of-two buckets doubling on rehash (default 16).
    #[default]
    Standard,
    /// Prime-ish buckets growing `×2 + 1` on rehash (default 11).
    Historic,
}

impl HashFlavor {
    /// Initial bucket count taken from `options`.
    #[must_use]
    pub fn initial_capacity(self, options: &ContainerOptions) -> usize {
        match self {
            Self::Standard => options.hash_capacity,
            Self::Historic => options.historic_capacity,
        }
    }

    /// Bucket count after one rehash.
    #[must_use]
    pub fn grown(self, capacity: usize) -> usize {
        match self {
            Self::Standard => capacity * 2,
            Self::Historic => capacity * 2 + 1,
        }
    }
}

/// Bucket array with chained entities.
#[derive(Debug, Clone)]
pub(crate) struct HashTable {
    buckets: Vec<Vec<AnimatedEntity>>,
    len: usize,
    load_factor: f32,
    flavor: HashFlavor,
    rehash_count: u64,
    layout: LayoutOptions,
}

impl HashTable {
    pub(crate) fn new(
        flavor: HashFlavor,
        capacity: usize,
        load_factor: f32,
        layout: LayoutOptions,
    ) -> Self {
        Self {
            buckets: vec![Vec::new(); capacity.max(1)],
            len: 0,
            load_factor: if load_factor > 0.0 { load_factor } else { 0.75 },
            flavor,
            rehash_count: 0,
            layout,
        }
    }

    pub(crate) fn from_options(
        flavor: HashFlavor,
        containers: &ContainerOptions,
        layout: &LayoutOptions,
    ) -> Self {
        Self::new(
            flavor,
            flavor.initial_capacity(containers),
            containers.load_factor,
            layout.clone(),
        )
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub(crate) fn flavor(&self) -> HashFlavor {
        self.flavor
    }

    pub(crate) fn load_factor(&self) -> f32 {
        self.load_factor
    }

    pub(crate) fn fill_ratio(&self) -> f32 {
        self.len as f32 / self.capacity() as f32
    }

    pub(crate) fn rehash_count(&self) -> u64 {
        self.rehash_count
    }

    pub(crate) fn bucket_index(&self, key: &Value) -> usize {
        key.non_negative_hash() as usize % self.capacity()
    }

    /// Sum over buckets of `chain_len - 1` for non-empty chains.
    pub(crate) fn collisions(&self) -> usize {
        self.buckets.iter().map(|c| c.len().saturating_sub(1)).sum()
    }

    pub(crate) fn max_chain_length(&self) -> usize {
        self.buckets.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub(crate) fn find(&self, key: &Value) -> Option<&AnimatedEntity> {
        self.buckets[self.bucket_index(key)]
            .iter()
            .find(|e| &e.value == key)
    }

    pub(crate) fn find_mut(&mut self, key: &Value) -> Option<&mut AnimatedEntity> {
        let bucket = self.bucket_index(key);
        self.buckets[bucket].iter_mut().find(|e| &e.value == key)
    }

    /// Append a new entity whose key is known to be absent. Returns whether
    /// the table rehashed first.
    pub(crate) fn insert_new(&mut self, entity: AnimatedEntity) -> bool {
        let rehashed = self.needs_rehash();
        if rehashed {
            self.rehash();
        }
        let bucket = self.bucket_index(&entity.value);
        let depth = self.buckets[bucket].len();
        let at = layout::chain(bucket, depth + 1, &self.layout);
        self.buckets[bucket].push(entity.spawned_at(at));
        self.len += 1;
        self.relayout();
        rehashed
    }

    pub(crate) fn remove(&mut self, key: &Value) -> Option<AnimatedEntity> {
        let bucket = self.bucket_index(key);
        let pos = self.buckets[bucket].iter().position(|e| &e.value == key)?;
        let entity = self.buckets[bucket].remove(pos);
        self.len -= 1;
        self.relayout();
        Some(entity)
    }

    pub(crate) fn drain(&mut self) -> Vec<AnimatedEntity> {
        self.len = 0;
        self.buckets.iter_mut().flat_map(std::mem::take).collect()
    }

    /// Live entities in bucket order, chain order within a bucket.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &AnimatedEntity> {
        self.buckets.iter().flatten()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut AnimatedEntity> {
        self.buckets.iter_mut().flatten()
    }

    fn needs_rehash(&self) -> bool {
        (self.len + 1) as f64 / self.capacity() as f64 > f64::from(self.load_factor)
    }

    fn rehash(&mut self) {
        let old = self.capacity();
        let grown = self.flavor.grown(old);
        let previous = std::mem::replace(&mut self.buckets, vec![Vec::new(); grown]);
        for entity in previous.into_iter().flatten() {
            let bucket = self.bucket_index(&entity.value);
            self.buckets[bucket].push(entity);
        }
        self.rehash_count += 1;
        log::debug!("rehash {old} -> {grown} buckets ({} entries)", self.len);
    }

    fn relayout(&mut self) {
        for (bucket, chain) in self.buckets.iter_mut().enumerate() {
            for (depth, entity) in chain.iter_mut().enumerate() {
                entity.retarget(bucket, layout::chain(bucket, depth, &self.layout));
            }
        }
    }
}
