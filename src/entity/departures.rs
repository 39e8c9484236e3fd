use crate::entity::AnimatedEntity;
use crate::options::AnimationOptions;

/// Entities that were logically removed but are still fading out.
///
/// Nothing in here counts toward size, search or iteration. Entities are
/// reclaimed by [`advance`](Self::advance) once their fade completes.
#[derive(Debug, Clone, Default)]
pub struct DepartureQueue {
    leaving: Vec<AnimatedEntity>,
    reclaimed: u64,
}

impl DepartureQueue {
    /// Empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `entity` leaving and keep it attached until it fades out.
    pub fn push(&mut self, mut entity: AnimatedEntity) {
        entity.begin_leaving();
        self.leaving.push(entity);
    }

    /// Mark every entity leaving.
    pub fn extend(&mut self, entities: impl IntoIterator<Item = AnimatedEntity>) {
        for entity in entities {
            self.push(entity);
        }
    }

    /// Advance fades and detach entities that are gone. Returns how many
    /// were reclaimed by this call.
    pub fn advance(&mut self, dt: f32, motion: &AnimationOptions) -> usize {
        for entity in &mut self.leaving {
            entity.advance(dt, motion);
        }
        self.reclaim()
    }

    /// Detach gone entities without advancing time. Safe to call repeatedly.
    pub fn reclaim(&mut self) -> usize {
        let before = self.leaving.len();
        self.leaving.retain(|e| !e.is_gone());
        let reclaimed = before - self.leaving.len();
        self.reclaimed += reclaimed as u64;
        if reclaimed > 0 {
            log::trace!("reclaimed {reclaimed} departed entities");
        }
        reclaimed
    }

    /// Entities still fading out.
    pub fn iter(&self) -> impl Iterator<Item = &AnimatedEntity> {
        self.leaving.iter()
    }

    /// Number of entities still fading out.
    #[must_use]
    pub fn len(&self) -> usize {
        self.leaving.len()
    }

    /// Whether nothing is fading out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.leaving.is_empty()
    }

    /// Total entities detached over the queue's lifetime.
    #[must_use]
    pub fn reclaimed_total(&self) -> u64 {
        self.reclaimed
    }
}
