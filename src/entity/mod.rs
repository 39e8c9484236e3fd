//! Lifecycle and interpolation state for anything a container displays.
//!
//! Array elements, hash entries, list nodes and tree nodes are all an
//! [`AnimatedEntity`]: a logical value plus the fields a renderer needs to
//! draw it (position easing toward a target, alpha, scale, highlight).
//!
//! An entity moves `Pending → Active → Leaving → Gone`. Containers own their
//! live entities directly; removal hands the entity to the container's
//! [`DepartureQueue`], which keeps it attached while it fades out and drops
//! it once its alpha reaches zero.

mod departures;

pub use departures::DepartureQueue;
use glam::Vec2;
use serde::Serialize;

use crate::options::AnimationOptions;
use crate::value::{Value, ValueKind};

/// Where an entity is in its display lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// Just attached; fading in.
    Pending,
    /// Fully visible and logically present.
    Active,
    /// Logically removed; fading out but still drawn.
    Leaving,
    /// Fade finished; ready to be detached.
    Gone,
}

/// A displayable item owned by one container.
#[derive(Debug, Clone, Serialize)]
pub struct AnimatedEntity {
    /// Element, key or node value.
    pub value: Value,
    /// Mapped value for map entries.
    pub paired: Option<Value>,
    /// Kind tag of `value`, used only for colour/format.
    pub kind: ValueKind,
    /// Lifecycle state. Only containers move an entity to `Leaving`.
    pub state: Lifecycle,
    /// Display slot: array index, bucket index, ring slot or heap index.
    pub slot: usize,
    /// Current on-screen position.
    pub position: Vec2,
    /// Position the entity is easing toward.
    pub target: Vec2,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
    /// Draw scale in `[0.5, 1]`.
    pub scale: f32,
    /// Highlight intensity in `[0, 1]`, decays every tick.
    pub highlight: f32,
    #[serde(skip)]
    fade: f32,
}

impl AnimatedEntity {
    /// A pending entity holding `value`.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self {
            kind: value.kind(),
            value,
            paired: None,
            state: Lifecycle::Pending,
            slot: 0,
            position: Vec2::ZERO,
            target: Vec2::ZERO,
            alpha: 0.0,
            scale: 0.5,
            highlight: 1.0,
            fade: 0.0,
        }
    }

    /// A pending map entry.
    #[must_use]
    pub fn entry(key: Value, value: Value) -> Self {
        let mut entity = Self::new(key);
        entity.paired = Some(value);
        entity
    }

    /// Place the entity (position and target) at `at`.
    #[must_use]
    pub fn spawned_at(mut self, at: Vec2) -> Self {
        self.position = at;
        self.target = at;
        self
    }

    /// Whether the entity still counts as logically present.
    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self.state, Lifecycle::Pending | Lifecycle::Active)
    }

    /// Whether the entity has finished fading out.
    #[must_use]
    pub fn is_gone(&self) -> bool {
        self.state == Lifecycle::Gone
    }

    /// Move the easing target.
    pub fn retarget(&mut self, slot: usize, target: Vec2) {
        self.slot = slot;
        self.target = target;
    }

    /// Start a highlight flash.
    pub fn flash(&mut self) {
        self.highlight = 1.0;
    }

    /// Replace the paired value, returning the previous one.
    pub fn replace_paired(&mut self, value: Value) -> Option<Value> {
        self.flash();
        self.paired.replace(value)
    }

    /// Detached copy that fades in from where this entity currently is.
    #[must_use]
    pub fn fresh_copy(&self) -> Self {
        let mut copy = Self::new(self.value.clone()).spawned_at(self.position);
        copy.paired.clone_from(&self.paired);
        copy.slot = self.slot;
        copy.target = self.target;
        copy
    }

    pub(crate) fn begin_leaving(&mut self) {
        if self.is_live() {
            self.state = Lifecycle::Leaving;
        }
    }

    /// Advance interpolation by `dt` seconds.
    pub fn advance(&mut self, dt: f32, motion: &AnimationOptions) {
        let dt = dt.max(0.0);
        let k = (motion.approach_rate * dt).clamp(0.0, 1.0);
        self.position += (self.target - self.position) * k;

        let step = dt / motion.fade_seconds.max(1e-3);
        match self.state {
            Lifecycle::Pending => {
                self.fade = (self.fade + step).min(1.0);
                if self.fade >= 1.0 {
                    self.state = Lifecycle::Active;
                }
            }
            Lifecycle::Active => self.fade = 1.0,
            Lifecycle::Leaving => {
                self.fade = (self.fade - step).max(0.0);
                if self.fade <= 0.0 {
                    self.state = Lifecycle::Gone;
                }
            }
            Lifecycle::Gone => self.fade = 0.0,
        }
        self.alpha = motion.easing.evaluate(self.fade);
        self.scale = 0.5 + 0.5 * self.alpha;
        self.highlight = (self.highlight
            - dt / motion.highlight_seconds.max(1e-3))
        .max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motion() -> AnimationOptions {
        AnimationOptions {
            fade_seconds: 0.5,
            ..AnimationOptions::default()
        }
    }

    #[test]
    fn new_entity_is_pending_and_invisible() {
        let e = AnimatedEntity::new(Value::from(3));
        assert_eq!(e.state, Lifecycle::Pending);
        assert_eq!(e.kind, ValueKind::Integer);
        assert_eq!(e.alpha, 0.0);
        assert!(e.is_live());
    }

    #[test]
    fn pending_becomes_active_after_fade() {
        let mut e = AnimatedEntity::new(Value::from(3));
        e.advance(0.25, &motion());
        assert_eq!(e.state, Lifecycle::Pending);
        assert!(e.alpha > 0.0 && e.alpha < 1.0);
        e.advance(0.25, &motion());
        assert_eq!(e.state, Lifecycle::Active);
        assert!((e.alpha - 1.0).abs() < 1e-6);
        assert!((e.scale - 1.0).abs() < 1e-6);
    }

    #[test]
    fn leaving_fades_to_gone() {
        let mut e = AnimatedEntity::new(Value::from(3));
        e.advance(1.0, &motion());
        e.begin_leaving();
        assert!(!e.is_live());
        e.advance(0.3, &motion());
        assert_eq!(e.state, Lifecycle::Leaving);
        e.advance(0.3, &motion());
        assert!(e.is_gone());
        assert_eq!(e.alpha, 0.0);
    }

    #[test]
    fn pending_entity_can_leave_directly() {
        let mut e = AnimatedEntity::new(Value::from(3));
        e.advance(0.1, &motion());
        e.begin_leaving();
        assert_eq!(e.state, Lifecycle::Leaving);
        e.advance(0.1, &motion());
        assert!(e.is_gone());
    }

    #[test]
    fn gone_entity_never_revives() {
        let mut e = AnimatedEntity::new(Value::from(3));
        e.begin_leaving();
        e.advance(1.0, &motion());
        e.begin_leaving();
        e.advance(1.0, &motion());
        assert!(e.is_gone());
    }

    #[test]
    fn position_eases_toward_target() {
        let mut e = AnimatedEntity::new(Value::from(1)).spawned_at(Vec2::ZERO);
        e.retarget(4, Vec2::new(100.0, 0.0));
        e.advance(0.05, &motion());
        assert!(e.position.x > 0.0 && e.position.x < 100.0);
        e.advance(10.0, &motion());
        assert!((e.position.x - 100.0).abs() < 1e-3);
        assert_eq!(e.slot, 4);
    }

    #[test]
    fn replace_paired_returns_previous() {
        let mut e = AnimatedEntity::entry(Value::from(1), Value::from("a"));
        e.highlight = 0.0;
        assert_eq!(e.replace_paired(Value::from("b")), Some(Value::from("a")));
        assert_eq!(e.paired, Some(Value::from("b")));
        assert_eq!(e.highlight, 1.0);
    }
}
