use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Initial sizing of freshly built containers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Containers", inline)]
#[serde(default)]
pub struct ContainerOptions {
    /// Initial dynamic array capacity.
    #[schemars(title = "Array Capacity", range(min = 1, max = 1024))]
    pub array_capacity: usize,
    /// Initial ring deque capacity.
    #[schemars(title = "Deque Capacity", range(min = 2, max = 1024))]
    pub deque_capacity: usize,
    /// Initial bucket count for power-of-two hash tables.
    #[schemars(title = "Hash Buckets", range(min = 1, max = 1024))]
    pub hash_capacity: usize,
    /// Initial (prime) bucket count for the historic hash flavor.
    #[schemars(title = "Historic Buckets", range(min = 1, max = 1024))]
    pub historic_capacity: usize,
    /// Size/capacity ratio above which a hash table rehashes.
    #[schemars(title = "Load Factor", range(min = 0.1, max = 4.0), extend("step" = 0.05))]
    pub load_factor: f32,
    /// Number of lock segments in the striped map.
    #[schemars(title = "Concurrency Level", range(min = 1, max = 64))]
    pub concurrency_level: usize,
    /// Initial priority heap capacity.
    #[schemars(title = "Heap Capacity", range(min = 1, max = 1024))]
    pub heap_capacity: usize,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            array_capacity: 10,
            deque_capacity: 16,
            hash_capacity: 16,
            historic_capacity: 11,
            load_factor: 0.75,
            concurrency_level: 16,
            heap_capacity: 11,
        }
    }
}
