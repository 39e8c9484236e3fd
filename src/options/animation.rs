use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::easing::EasingFunction;

/// Timing of entity fades, movement and highlight decay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Animation", inline)]
#[serde(default)]
pub struct AnimationOptions {
    /// Seconds for an entity to fade fully in or out.
    #[schemars(title = "Fade Seconds", range(min = 0.01, max = 5.0), extend("step" = 0.01))]
    pub fade_seconds: f32,
    /// Fraction of the remaining distance to target covered per second.
    #[schemars(title = "Approach Rate", range(min = 0.5, max = 40.0), extend("step" = 0.5))]
    pub approach_rate: f32,
    /// Seconds for a highlight flash to decay.
    #[schemars(title = "Highlight Seconds", range(min = 0.05, max = 5.0), extend("step" = 0.05))]
    pub highlight_seconds: f32,
    /// How long a striped-map segment stays "held" after an access.
    #[schemars(title = "Lock Highlight (ms)", range(min = 0, max = 5000))]
    pub lock_highlight_ms: u64,
    /// Curve applied to fade progress.
    #[schemars(skip)]
    pub easing: EasingFunction,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            fade_seconds: 0.35,
            approach_rate: 8.0,
            highlight_seconds: 0.8,
            lock_highlight_ms: 600,
            easing: EasingFunction::DEFAULT,
        }
    }
}
