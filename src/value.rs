//! Values stored in the simulated containers.
//!
//! The simulations only ever hold a small closed set of primitive-like
//! values. Each carries a [`ValueKind`] tag that the renderer uses to pick a
//! colour; correctness (equality, ordering, hashing) depends only on the
//! value itself.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use rustc_hash::FxHasher;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::VizError;

/// Display/format category of a stored value.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Whole numbers.
    Integer,
    /// Floating point numbers.
    Floating,
    /// `true` / `false`.
    Boolean,
    /// A single character.
    Character,
    /// A string.
    Text,
    /// Opaque objects and null.
    Other,
}

impl ValueKind {
    /// Lower-case name used in status strings.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Floating => "floating",
            Self::Boolean => "boolean",
            Self::Character => "character",
            Self::Text => "text",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A logical value held by an entity.
///
/// Floats compare and hash by bit pattern so that `Value` can be used as a
/// hash key. `Null` is what a user supplies for "no value"; hash-based and
/// ordered containers reject it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// Character value.
    Char(char),
    /// Text value.
    Text(String),
    /// Opaque object identified by a label. Has no natural ordering.
    Object(String),
    /// Absence of a value.
    Null,
}

impl Value {
    /// The display kind of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Floating,
            Self::Bool(_) => ValueKind::Boolean,
            Self::Char(_) => ValueKind::Character,
            Self::Text(_) => ValueKind::Text,
            Self::Object(_) | Self::Null => ValueKind::Other,
        }
    }

    /// Whether this is [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Hash code with the sign bit cleared, used for bucket selection.
    ///
    /// Integers fold their high and low halves together, so small integers
    /// hash to themselves and land in bucket `key mod capacity`.
    #[must_use]
    pub fn non_negative_hash(&self) -> u32 {
        let raw = match self {
            Self::Int(v) => {
                let bits = *v as u64;
                (bits ^ (bits >> 32)) as u32
            }
            Self::Float(v) => {
                let bits = v.to_bits();
                (bits ^ (bits >> 32)) as u32
            }
            Self::Bool(true) => 1231,
            Self::Bool(false) => 1237,
            Self::Char(c) => u32::from(*c),
            Self::Text(s) | Self::Object(s) => {
                let mut hasher = FxHasher::default();
                s.hash(&mut hasher);
                hasher.finish() as u32
            }
            Self::Null => 0,
        };
        raw & 0x7fff_ffff
    }

    /// Natural ordering between two values of the same kind.
    ///
    /// Mixed kinds, objects and null have no ordering and produce
    /// [`VizError::Incomparable`].
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, VizError> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Ok(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => Ok(a.total_cmp(b)),
            (Self::Bool(a), Self::Bool(b)) => Ok(a.cmp(b)),
            (Self::Char(a), Self::Char(b)) => Ok(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Ok(a.cmp(b)),
            _ => Err(VizError::Incomparable {
                left: self.kind(),
                right: other.kind(),
            }),
        }
    }

    /// UTF-8 length for text values, zero otherwise.
    #[must_use]
    pub fn text_len(&self) -> usize {
        match self {
            Self::Text(s) => s.len(),
            _ => 0,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Text(a), Self::Text(b))
            | (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Null, Self::Null) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        self.non_negative_hash().hash(state);
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Char(c) => write!(f, "'{c}'"),
            Self::Text(s) => write!(f, "\"{s}\""),
            Self::Object(label) => write!(f, "#{label}"),
            Self::Null => f.write_str("null"),
        }
    }
}

impl FromStr for Value {
    type Err = VizError;

    /// Parses the forms produced by `Display`: `42`, `4.5`, `true`, `'c'`,
    /// `"text"`, `#label`, `null`. Any other bare word becomes text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(VizError::Command("empty value".to_owned()));
        }
        if s == "null" {
            return Ok(Self::Null);
        }
        if let Ok(b) = s.parse::<bool>() {
            return Ok(Self::Bool(b));
        }
        if let Some(inner) = s.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')) {
            let mut chars = inner.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                return Ok(Self::Char(c));
            }
        }
        if s.len() >= 2 {
            if let Some(inner) =
                s.strip_prefix('"').and_then(|r| r.strip_suffix('"'))
            {
                return Ok(Self::Text(inner.to_owned()));
            }
        }
        if let Some(label) = s.strip_prefix('#') {
            return Ok(Self::Object(label.to_owned()));
        }
        if let Ok(v) = s.parse::<i64>() {
            return Ok(Self::Int(v));
        }
        let numeric = s
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
        if numeric {
            if let Ok(v) = s.parse::<f64>() {
                return Ok(Self::Float(v));
            }
        }
        Ok(Self::Text(s.to_owned()))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Self::Char(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}
