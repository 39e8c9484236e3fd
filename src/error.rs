//! Crate-level error types.

use std::fmt;

use crate::value::ValueKind;

/// Errors produced by the collectviz crate.
///
/// Expected-empty and expected-absent conditions (popping an empty heap,
/// indexing past the end of an array) are not errors; containers report those
/// through their return values and operation log instead.
#[derive(Debug)]
pub enum VizError {
    /// Two values without a natural ordering between them were compared.
    Incomparable {
        /// Kind of the value being inserted or looked up.
        left: ValueKind,
        /// Kind of the value already stored.
        right: ValueKind,
    },
    /// A structural invariant (red-black colouring, heap order) was broken.
    Invariant(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// A workbench command could not be parsed or does not apply.
    Command(String),
}

impl fmt::Display for VizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incomparable { left, right } => {
                write!(f, "cannot compare {left} with {right}")
            }
            Self::Invariant(msg) => write!(f, "invariant violated: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Command(msg) => write!(f, "command error: {msg}"),
        }
    }
}

impl std::error::Error for VizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for VizError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
