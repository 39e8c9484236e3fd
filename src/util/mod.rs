//! Shared utilities.
//!
//! Easing curves applied to entity fades.

pub mod easing;
