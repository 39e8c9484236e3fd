use serde::{Deserialize, Serialize};

use crate::value::ValueKind;

/// Per-kind entity palette plus structural accents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorOptions {
    /// RGB for integer values.
    pub integer: [f32; 3],
    /// RGB for floating point values.
    pub floating: [f32; 3],
    /// RGB for boolean values.
    pub boolean: [f32; 3],
    /// RGB for character values.
    pub character: [f32; 3],
    /// RGB for text values.
    pub text: [f32; 3],
    /// RGB for objects and null.
    pub other: [f32; 3],
    /// RGB for red tree nodes.
    pub tree_red: [f32; 3],
    /// RGB for black tree nodes.
    pub tree_black: [f32; 3],
    /// RGB overlay for a held striped-map segment.
    pub segment_lock: [f32; 3],
}

impl Default for ColorOptions {
    fn default() -> Self {
        Self {
            integer: [0.30, 0.55, 0.95],
            floating: [0.55, 0.35, 0.90],
            boolean: [0.95, 0.60, 0.20],
            character: [0.25, 0.75, 0.45],
            text: [0.90, 0.30, 0.40],
            other: [0.55, 0.55, 0.55],
            tree_red: [0.85, 0.15, 0.15],
            tree_black: [0.12, 0.12, 0.12],
            segment_lock: [1.0, 0.85, 0.2],
        }
    }
}

impl ColorOptions {
    /// Fill color for an entity holding a value of `kind`.
    #[must_use]
    pub fn color_for(&self, kind: ValueKind) -> [f32; 3] {
        match kind {
            ValueKind::Integer => self.integer,
            ValueKind::Floating => self.floating,
            ValueKind::Boolean => self.boolean,
            ValueKind::Character => self.character,
            ValueKind::Text => self.text,
            ValueKind::Other => self.other,
        }
    }
}
