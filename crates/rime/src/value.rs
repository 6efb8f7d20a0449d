//! The value stored in every container slot.
//!
//! A slot holds either a scalar or another container. Containers are
//! reference-counted handles to frozen nodes, so cloning a `Value` is O(1)
//! and never copies nested storage.

use std::fmt;
use std::sync::Arc;

use crate::container::{Container, ContainerKind};
use crate::hash::{self, FALSE_HASH, NULL_HASH, TRUE_HASH};
use crate::number::Number;
use crate::record::Record;
use crate::sequence::Sequence;

/// A scalar or a nested container.
///
/// Ordering is total: `Null < Bool < Number < Text < Record < Sequence`,
/// then by content. Equality is structural and order-sensitive for record
/// fields.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    /// Absent / null marker
    Null,
    Bool(bool),
    /// Integer or float, compared by value
    Number(Number),
    Text(Arc<str>),
    Record(Record),
    Sequence(Sequence),
}

impl Value {
    pub fn number(n: f64) -> Self {
        Value::Number(Number::from(n))
    }

    pub fn text(s: impl Into<Arc<str>>) -> Self {
        Value::Text(s.into())
    }

    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Value::Sequence(sequence) => Some(sequence),
            _ => None,
        }
    }

    /// Shares the container held by this value, if any.
    pub fn as_container(&self) -> Option<Container> {
        match self {
            Value::Record(record) => Some(Container::Record(record.clone())),
            Value::Sequence(sequence) => Some(Container::Sequence(sequence.clone())),
            _ => None,
        }
    }

    pub fn into_container(self) -> Option<Container> {
        match self {
            Value::Record(record) => Some(Container::Record(record)),
            Value::Sequence(sequence) => Some(Container::Sequence(sequence)),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Value::Record(_) | Value::Sequence(_))
    }

    /// Type tag of the held container; `None` for scalars.
    pub fn container_kind(&self) -> Option<ContainerKind> {
        match self {
            Value::Record(_) => Some(ContainerKind::Record),
            Value::Sequence(_) => Some(ContainerKind::Sequence),
            _ => None,
        }
    }

    /// True when both values are the same container instance.
    ///
    /// Scalars have no identity and always compare `false`.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Record(a), Value::Record(b)) => a.ptr_eq(b),
            (Value::Sequence(a), Value::Sequence(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Content hash: cached for containers, computed on the spot for scalars.
    pub fn hash_code(&self) -> u32 {
        match self {
            Value::Null => NULL_HASH,
            Value::Bool(true) => TRUE_HASH,
            Value::Bool(false) => FALSE_HASH,
            Value::Number(n) => n.hash_code(),
            Value::Text(s) => hash::text_hash(s),
            Value::Record(record) => record.hash_code(),
            Value::Sequence(sequence) => sequence.hash_code(),
        }
    }

    /// Text used when this value is one element of [`Sequence::join`]:
    /// `Null` is empty, text is unquoted, everything else renders normally.
    pub(crate) fn join_fragment(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Text(s) => s.to_string(),
            other => other.to_string(),
        }
    }
}

/// Text is quoted; containers render through their own `Display`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Record(record) => fmt::Display::fmt(record, f),
            Value::Sequence(sequence) => fmt::Display::fmt(sequence, f),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Number::from(n))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(Number::from(n))
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::text(s)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<Sequence> for Value {
    fn from(sequence: Sequence) -> Self {
        Value::Sequence(sequence)
    }
}

impl From<Container> for Value {
    fn from(container: Container) -> Self {
        match container {
            Container::Record(record) => Value::Record(record),
            Container::Sequence(sequence) => Value::Sequence(sequence),
        }
    }
}
