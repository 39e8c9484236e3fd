//! The workbench's textual vocabulary.
//!
//! One line is one [`Command`]: a target container (or `*` for all of them),
//! a verb and its arguments, e.g. `array insert 2 7`, `map put 3 'x'`,
//! `heap poll`, `* random`. Arguments parse as [`Value`]s, so `"two words"`,
//! `'c'`, `4.5`, `true`, `null` and `#label` all work.

use std::fmt;
use std::str::FromStr;

use crate::containers::{ContainerKind, PutResult};
use crate::error::VizError;
use crate::value::Value;

/// Which container(s) a command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A single container.
    One(ContainerKind),
    /// Every container that understands the verb.
    All,
}

/// A container operation with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Generic insert: append, add, offer.
    Add(Value),
    /// Insert at the front.
    AddFirst(Value),
    /// Insert at the back.
    AddLast(Value),
    /// Array insert at an index.
    Insert {
        /// Destination index.
        index: usize,
        /// Inserted value.
        value: Value,
    },
    /// Array overwrite at an index.
    Set {
        /// Overwritten index.
        index: usize,
        /// New value.
        value: Value,
    },
    /// Map insert or replace.
    Put {
        /// Entry key.
        key: Value,
        /// Entry value.
        value: Value,
    },
    /// Map lookup by key, or array read when the argument is an index.
    Get(Value),
    /// Remove by value or key.
    Remove(Value),
    /// Array removal by index.
    RemoveAt(usize),
    /// Remove the first element.
    RemoveFirst,
    /// Remove the last element.
    RemoveLast,
    /// Array removal of `[from, to)`.
    RemoveRange {
        /// First removed index.
        from: usize,
        /// One past the last removed index.
        to: usize,
    },
    /// Heap minimum removal.
    Poll,
    /// Heap minimum.
    Peek,
    /// Front element.
    PeekFirst,
    /// Back element.
    PeekLast,
    /// Smallest key of a tree.
    First,
    /// Largest key of a tree.
    Last,
    /// Membership / key test.
    Contains(Value),
    /// First index of a value in the array.
    IndexOf(Value),
    /// Last index of a value in the array.
    LastIndexOf(Value),
    /// Array capacity trim.
    Trim,
    /// Array capacity reservation.
    Ensure(usize),
    /// Remove everything.
    Clear,
    /// Insert a random integer (as key and value for maps).
    Random,
}

/// A parsed workbench line.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Addressed container(s).
    pub target: Target,
    /// Operation to run.
    pub op: Op,
}

/// Result of running one operation on one container.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Operation without a return value.
    Done,
    /// Success flag.
    Flag(bool),
    /// Returned or removed value.
    Value(Option<Value>),
    /// Search result index.
    Index(Option<usize>),
    /// Map put result.
    Put(PutResult),
    /// Number of affected elements.
    Count(usize),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => f.write_str("ok"),
            Self::Flag(b) => write!(f, "{b}"),
            Self::Value(Some(v)) => write!(f, "{v}"),
            Self::Value(None) => f.write_str("none"),
            Self::Index(Some(i)) => write!(f, "index {i}"),
            Self::Index(None) => f.write_str("not found"),
            Self::Put(PutResult::Inserted) => f.write_str("inserted"),
            Self::Put(PutResult::Replaced(v)) => write!(f, "replaced {v}"),
            Self::Put(PutResult::Rejected) => f.write_str("rejected"),
            Self::Count(n) => write!(f, "{n} affected"),
        }
    }
}

/// Split a line into words, keeping double-quoted and single-quoted runs
/// (quotes included) together.
fn tokenize(line: &str) -> Result<Vec<String>, VizError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    for c in line.chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => {
                if (c == '"' || c == '\'') && current.is_empty() {
                    quote = Some(c);
                }
                current.push(c);
            }
        }
    }
    if quote.is_some() {
        return Err(VizError::Command(format!("unterminated quote in '{line}'")));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

fn value_arg(args: &[String], i: usize, verb: &str) -> Result<Value, VizError> {
    args.get(i)
        .ok_or_else(|| VizError::Command(format!("'{verb}' is missing an argument")))?
        .parse()
}

fn index_arg(args: &[String], i: usize, verb: &str) -> Result<usize, VizError> {
    let raw = args
        .get(i)
        .ok_or_else(|| VizError::Command(format!("'{verb}' is missing an index")))?;
    raw.parse()
        .map_err(|_| VizError::Command(format!("'{raw}' is not an index")))
}

impl FromStr for Op {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = tokenize(s)?;
        let Some((verb, args)) = tokens.split_first() else {
            return Err(VizError::Command("missing verb".to_owned()));
        };
        let verb = verb.to_ascii_lowercase();
        let v = verb.as_str();
        let op = match v {
            "add" | "append" | "offer" => Self::Add(value_arg(args, 0, v)?),
            "addfirst" | "push" => Self::AddFirst(value_arg(args, 0, v)?),
            "addlast" => Self::AddLast(value_arg(args, 0, v)?),
            "insert" => Self::Insert {
                index: index_arg(args, 0, v)?,
                value: value_arg(args, 1, v)?,
            },
            "set" => Self::Set {
                index: index_arg(args, 0, v)?,
                value: value_arg(args, 1, v)?,
            },
            "put" => Self::Put {
                key: value_arg(args, 0, v)?,
                value: value_arg(args, 1, v)?,
            },
            "get" => Self::Get(value_arg(args, 0, v)?),
            "remove" => Self::Remove(value_arg(args, 0, v)?),
            "removeat" => Self::RemoveAt(index_arg(args, 0, v)?),
            "removefirst" | "pollfirst" => Self::RemoveFirst,
            "removelast" | "polllast" | "pop" => Self::RemoveLast,
            "removerange" => Self::RemoveRange {
                from: index_arg(args, 0, v)?,
                to: index_arg(args, 1, v)?,
            },
            "poll" => Self::Poll,
            "peek" => Self::Peek,
            "peekfirst" => Self::PeekFirst,
            "peeklast" => Self::PeekLast,
            "first" | "firstkey" => Self::First,
            "last" | "lastkey" => Self::Last,
            "contains" | "containskey" => Self::Contains(value_arg(args, 0, v)?),
            "indexof" => Self::IndexOf(value_arg(args, 0, v)?),
            "lastindexof" => Self::LastIndexOf(value_arg(args, 0, v)?),
            "trim" | "trimtosize" => Self::Trim,
            "ensure" | "ensurecapacity" => Self::Ensure(index_arg(args, 0, v)?),
            "clear" => Self::Clear,
            "random" => Self::Random,
            other => return Err(VizError::Command(format!("unknown verb '{other}'"))),
        };
        Ok(op)
    }
}

impl FromStr for Command {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (head, rest) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| VizError::Command(format!("expected '<container> <verb>', got '{line}'")))?;
        let target = if head == "*" {
            Target::All
        } else {
            Target::One(head.parse()?)
        };
        Ok(Self {
            target,
            op: rest.parse()?,
        })
    }
}
