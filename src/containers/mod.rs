//! Simulated containers.
//!
//! Each container re-implements the exact structural behaviour of a standard
//! collection (growth policy, rehash threshold, rotations, sifts) while
//! keeping every stored item as an [`AnimatedEntity`]. All of them share the
//! [`Container`] contract consumed by a renderer: counts, capacity, the last
//! operation, the entities to draw and a `tick` that advances fades.

pub mod array;
pub mod deque;
pub mod hash;
pub mod heap;
pub mod linked;
pub mod tree;

use std::fmt;
use std::str::FromStr;

pub use array::{DynamicArray, SubList, SubListMut};
pub use deque::RingDeque;
pub use hash::{
    ChainedMap, ChainedSet, HashFlavor, LinkedChainedMap, LinkedChainedSet,
    SegmentLock, StripedMap,
};
pub use heap::PriorityHeap;
pub use linked::LinkedSequence;
use serde::Serialize;
pub use tree::{Color, OrderedMap, OrderedSet};

use crate::entity::{AnimatedEntity, DepartureQueue};
use crate::error::VizError;
use crate::memory;
use crate::options::AnimationOptions;
use crate::value::Value;

/// Every simulated container flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    /// Growable array.
    DynamicArray,
    /// Doubly linked list.
    LinkedSequence,
    /// Circular-buffer double-ended queue.
    RingDeque,
    /// Hash set with chaining.
    ChainedSet,
    /// Hash set remembering insertion order.
    LinkedChainedSet,
    /// Hash map with chaining.
    ChainedMap,
    /// Hash map remembering insertion order.
    LinkedChainedMap,
    /// Hash map with prime capacities growing ×2+1.
    HistoricMap,
    /// Segmented hash map with cosmetic lock striping.
    StripedMap,
    /// Red-black tree map.
    OrderedMap,
    /// Red-black tree set.
    OrderedSet,
    /// Binary min-heap.
    PriorityHeap,
}

impl ContainerKind {
    /// Every kind, in workbench order.
    pub const ALL: [ContainerKind; 12] = [
        Self::DynamicArray,
        Self::LinkedSequence,
        Self::RingDeque,
        Self::ChainedSet,
        Self::LinkedChainedSet,
        Self::ChainedMap,
        Self::LinkedChainedMap,
        Self::HistoricMap,
        Self::StripedMap,
        Self::OrderedMap,
        Self::OrderedSet,
        Self::PriorityHeap,
    ];

    /// Short command name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::DynamicArray => "array",
            Self::LinkedSequence => "linked",
            Self::RingDeque => "deque",
            Self::ChainedSet => "set",
            Self::LinkedChainedSet => "linkedset",
            Self::ChainedMap => "map",
            Self::LinkedChainedMap => "linkedmap",
            Self::HistoricMap => "historic",
            Self::StripedMap => "striped",
            Self::OrderedMap => "treemap",
            Self::OrderedSet => "treeset",
            Self::PriorityHeap => "heap",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContainerKind {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| VizError::Command(format!("unknown container '{s}'")))
    }
}

/// Human-readable description of the last operation plus a running count.
///
/// Purely observational: nothing depends on the wording.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OperationLog {
    last: String,
    count: u64,
}

impl OperationLog {
    /// Record one operation.
    pub fn record(&mut self, description: impl Into<String>) {
        self.last = description.into();
        self.count += 1;
    }

    /// Description of the most recent operation.
    #[must_use]
    pub fn last(&self) -> &str {
        &self.last
    }

    /// Number of operations recorded so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }
}

/// Outcome of a map `put`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutResult {
    /// The key was absent and is now stored.
    Inserted,
    /// The key existed; its value was replaced. Holds the prior value.
    Replaced(Value),
    /// Null key or value; nothing changed.
    Rejected,
}

impl PutResult {
    /// The replaced value, if any.
    #[must_use]
    pub fn previous(&self) -> Option<&Value> {
        match self {
            Self::Replaced(v) => Some(v),
            _ => None,
        }
    }

    /// Whether the put was a no-op.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected)
    }
}

/// Serializable view of a container for an external renderer.
#[derive(Debug, Clone, Serialize)]
pub struct ContainerSnapshot {
    /// Container flavor.
    pub kind: ContainerKind,
    /// Live element count.
    pub len: usize,
    /// Slot/bucket capacity.
    pub capacity: usize,
    /// Last operation description.
    pub last_operation: String,
    /// Operations performed so far.
    pub operations: u64,
    /// Static memory estimate.
    pub memory_bytes: usize,
    /// Live entities followed by those still fading out.
    pub entities: Vec<AnimatedEntity>,
}

/// Uniform contract every simulated container offers its renderer.
pub trait Container {
    /// Which flavor this is.
    fn kind(&self) -> ContainerKind;

    /// Live element count.
    fn len(&self) -> usize;

    /// Whether no live elements remain.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slot/bucket capacity. Node-based containers report their live count.
    fn capacity(&self) -> usize;

    /// Last operation description and counter.
    fn log(&self) -> &OperationLog;

    /// Logically present entities, in structural order.
    fn live_entities(&self) -> Vec<&AnimatedEntity>;

    /// Entities fading out.
    fn departures(&self) -> &DepartureQueue;

    /// Advance interpolation by `dt` seconds and reclaim finished fades.
    /// Returns the number of entities detached.
    fn tick(&mut self, dt: f32) -> usize;

    /// Everything a renderer should draw, leaving entities included.
    fn entities(&self) -> Vec<&AnimatedEntity> {
        let mut all = self.live_entities();
        all.extend(self.departures().iter());
        all
    }

    /// Static memory estimate.
    fn memory_bytes(&self) -> usize {
        memory::estimate(self.kind(), self.capacity(), self.live_entities())
    }

    /// Owned snapshot for serialization.
    fn snapshot(&self) -> ContainerSnapshot {
        ContainerSnapshot {
            kind: self.kind(),
            len: self.len(),
            capacity: self.capacity(),
            last_operation: self.log().last().to_owned(),
            operations: self.log().count(),
            memory_bytes: self.memory_bytes(),
            entities: self.entities().into_iter().cloned().collect(),
        }
    }
}

/// Advance live entities and departures together.
pub(crate) fn advance_all<'a>(
    live: impl Iterator<Item = &'a mut AnimatedEntity>,
    departures: &mut DepartureQueue,
    dt: f32,
    motion: &AnimationOptions,
) -> usize {
    for entity in live {
        entity.advance(dt, motion);
    }
    departures.advance(dt, motion)
}
