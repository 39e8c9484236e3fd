use super::{Color, Insertion, RbTree};
use crate::containers::{advance_all, Container, ContainerKind, OperationLog};
use crate::entity::{AnimatedEntity, DepartureQueue};
use crate::error::VizError;
use crate::options::{AnimationOptions, Options};
use crate::value::Value;

/// Sorted set backed by a red-black tree.
#[derive(Debug)]
pub struct OrderedSet {
    tree: RbTree,
    departures: DepartureQueue,
    log: OperationLog,
    motion: AnimationOptions,
}

impl OrderedSet {
    /// Empty set with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::from_options(&Options::default())
    }

    /// Empty set laid out from `options`.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        Self {
            tree: RbTree::new(options.layout.clone()),
            departures: DepartureQueue::new(),
            log: OperationLog::default(),
            motion: options.animation.clone(),
        }
    }

    /// Insert `value`. Duplicates and null are rejected with `Ok(false)`.
    pub fn add(&mut self, value: Value) -> Result<bool, VizError> {
        if value.is_null() {
            self.log.record("add(null) rejected");
            return Ok(false);
        }
        let description = format!("add({value})");
        match self.tree.insert(AnimatedEntity::new(value))? {
            Insertion::Existing(id) => {
                self.tree.entity_mut(id).flash();
                self.log.record(format!("{description}: duplicate"));
                Ok(false)
            }
            Insertion::Linked(_) => {
                self.log.record(description);
                Ok(true)
            }
        }
    }

    /// Membership test by descent.
    pub fn contains(&mut self, value: &Value) -> Result<bool, VizError> {
        let found = self.tree.find(value)?;
        if let Some(id) = found {
            self.tree.entity_mut(id).flash();
        }
        self.log.record(format!("contains({value}) -> {}", found.is_some()));
        Ok(found.is_some())
    }

    /// Smallest element.
    pub fn first(&mut self) -> Option<&Value> {
        self.log.record("first");
        let id = self.tree.first()?;
        let entity = self.tree.entity_mut(id);
        entity.flash();
        Some(&entity.value)
    }

    /// Largest element.
    pub fn last(&mut self) -> Option<&Value> {
        self.log.record("last");
        let id = self.tree.last()?;
        let entity = self.tree.entity_mut(id);
        entity.flash();
        Some(&entity.value)
    }

    /// Elements in ascending order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.tree.in_order().map(|e| &e.value)
    }

    /// Elements in order with their node colours.
    #[must_use]
    pub fn colored_values(&self) -> Vec<(&Value, Color)> {
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

impl Default for OrderedSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Container for OrderedSet {
    fn kind(&self) -> ContainerKind {
        ContainerKind::OrderedSet
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
