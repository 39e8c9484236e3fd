//! Static memory-footprint estimates.
//!
//! A didactic model of what each container would cost on a 64-bit managed
//! heap with compressed headers: a fixed header per container flavor, one
//! reference per backing-array slot, a fixed cost per chain/tree node and a
//! per-kind cost for every stored value. Not an allocator trace; the same
//! inputs always give the same number.

use crate::containers::ContainerKind;
use crate::entity::AnimatedEntity;
use crate::value::Value;

/// Bytes per reference slot in a backing array.
pub const REFERENCE_BYTES: usize = 8;
/// Object header + fields of a string.
pub const TEXT_BASE_BYTES: usize = 24;
/// Header of the string's byte array.
pub const TEXT_ARRAY_HEADER_BYTES: usize = 16;

/// Fixed cost of the container object(s) themselves, backing array header
/// included.
#[must_use]
pub fn header_bytes(kind: ContainerKind) -> usize {
    match kind {
        ContainerKind::DynamicArray | ContainerKind::RingDeque => 40,
        ContainerKind::LinkedSequence => 32,
        ContainerKind::ChainedSet => 80,
        ContainerKind::LinkedChainedSet => 88,
        ContainerKind::ChainedMap | ContainerKind::HistoricMap => 64,
        ContainerKind::LinkedChainedMap => 72,
        ContainerKind::StripedMap => 80,
        ContainerKind::OrderedMap => 48,
        ContainerKind::OrderedSet => 64,
        ContainerKind::PriorityHeap => 48,
    }
}

/// Bytes per backing-array slot (zero for node-only structures).
#[must_use]
pub fn slot_bytes(kind: ContainerKind) -> usize {
    match kind {
        ContainerKind::LinkedSequence
        | ContainerKind::OrderedMap
        | ContainerKind::OrderedSet => 0,
        _ => REFERENCE_BYTES,
    }
}

/// Bytes per chain/list/tree node wrapping a stored value.
#[must_use]
pub fn node_bytes(kind: ContainerKind) -> usize {
    match kind {
        ContainerKind::DynamicArray
        | ContainerKind::RingDeque
        | ContainerKind::PriorityHeap => 0,
        ContainerKind::LinkedSequence => 24,
        ContainerKind::ChainedSet
        | ContainerKind::ChainedMap
        | ContainerKind::HistoricMap
        | ContainerKind::StripedMap => 32,
        ContainerKind::LinkedChainedSet
        | ContainerKind::LinkedChainedMap
        | ContainerKind::OrderedMap
        | ContainerKind::OrderedSet => 40,
    }
}

/// Rounds up to the next multiple of eight.
#[must_use]
pub fn ceil_to_8(bytes: usize) -> usize {
    bytes.div_ceil(8) * 8
}

/// Boxed size of one stored value.
#[must_use]
pub fn value_bytes(value: &Value) -> usize {
    match value {
        Value::Int(_) | Value::Bool(_) | Value::Char(_) | Value::Object(_) => 16,
        Value::Float(_) => 24,
        Value::Text(s) => {
            TEXT_BASE_BYTES + TEXT_ARRAY_HEADER_BYTES + ceil_to_8(s.len())
        }
        Value::Null => 0,
    }
}

/// Estimated bytes for a container of `kind` with `capacity` slots holding
/// `entities` (keys and paired values both counted).
#[must_use]
pub fn estimate<'a>(
    kind: ContainerKind,
    capacity: usize,
    entities: impl IntoIterator<Item = &'a AnimatedEntity>,
) -> usize {
    let stored: usize = entities
        .into_iter()
        .map(|e| {
            node_bytes(kind)
                + value_bytes(&e.value)
                + e.paired.as_ref().map_or(0, value_bytes)
        })
        .sum();
    header_bytes(kind) + capacity * slot_bytes(kind) + stored
}
