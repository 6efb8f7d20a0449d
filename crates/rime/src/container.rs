//! The two container variants behind one handle.

use std::fmt;
use std::sync::Arc;

use indexmap::map::Values;

use crate::error::{Error, Result};
use crate::key::Key;
use crate::path;
use crate::record::Record;
use crate::sequence::Sequence;
use crate::value::Value;
use crate::wrap::Wrap;

/// Type tag distinguishing records from sequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContainerKind {
    Record,
    Sequence,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerKind::Record => f.write_str("Record"),
            ContainerKind::Sequence => f.write_str("Sequence"),
        }
    }
}

/// A record or a sequence.
///
/// Operations common to both kinds live here; kind-specific algebra is
/// reached through [`as_record`](Self::as_record) /
/// [`as_sequence`](Self::as_sequence), which fail with
/// [`Error::WrongKind`] on the other variant.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Container {
    Record(Record),
    Sequence(Sequence),
}

impl Container {
    /// Wraps `value`, which must be record-like, sequence-like or already a
    /// container.
    pub fn wrap(value: impl Wrap) -> Result<Container> {
        value.wrap().into_container().ok_or(Error::ScalarRoot)
    }

    pub fn kind(&self) -> ContainerKind {
        match self {
            Container::Record(_) => ContainerKind::Record,
            Container::Sequence(_) => ContainerKind::Sequence,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Container::Record(record) => record.len(),
            Container::Sequence(sequence) => sequence.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &Key) -> Option<&Value> {
        match self {
            Container::Record(record) => record.get_key(key),
            Container::Sequence(sequence) => sequence.get_key(key),
        }
    }

    /// Own-key test.
    pub fn contains_key(&self, key: &Key) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> Vec<Key> {
        match self {
            Container::Record(record) => record.keys().into_iter().map(Key::Name).collect(),
            Container::Sequence(sequence) => sequence.keys().into_iter().map(Key::Index).collect(),
        }
    }

    pub fn values(&self) -> Vec<Value> {
        match self {
            Container::Record(record) => record.values(),
            Container::Sequence(sequence) => sequence.values(),
        }
    }

    pub fn entries(&self) -> Vec<(Key, Value)> {
        match self {
            Container::Record(record) => record
                .entries()
                .into_iter()
                .map(|(name, value)| (Key::Name(name), value))
                .collect(),
            Container::Sequence(sequence) => sequence
                .entries()
                .into_iter()
                .map(|(index, value)| (Key::Index(index), value))
                .collect(),
        }
    }

    /// Values in stored order.
    pub fn iter(&self) -> Iter<'_> {
        match self {
            Container::Record(record) => Iter::Record(record.iter()),
            Container::Sequence(sequence) => Iter::Sequence(sequence.iter()),
        }
    }

    pub fn hash_code(&self) -> u32 {
        match self {
            Container::Record(record) => record.hash_code(),
            Container::Sequence(sequence) => sequence.hash_code(),
        }
    }

    /// Same type tag, same hash and recursively equal content.
    pub fn equals(&self, other: &Container) -> bool {
        self == other
    }

    pub fn ptr_eq(&self, other: &Container) -> bool {
        match (self, other) {
            (Container::Record(a), Container::Record(b)) => a.ptr_eq(b),
            (Container::Sequence(a), Container::Sequence(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    pub fn as_record(&self) -> Result<&Record> {
        match self {
            Container::Record(record) => Ok(record),
            Container::Sequence(_) => Err(self.wrong_kind(ContainerKind::Record)),
        }
    }

    pub fn as_sequence(&self) -> Result<&Sequence> {
        match self {
            Container::Sequence(sequence) => Ok(sequence),
            Container::Record(_) => Err(self.wrong_kind(ContainerKind::Sequence)),
        }
    }

    fn wrong_kind(&self, expected: ContainerKind) -> Error {
        log::debug!("rejected {} operation on a {}", expected, self.kind());
        Error::WrongKind {
            expected,
            found: self.kind(),
        }
    }

    /// Fails unless `key` can address a slot of this container.
    pub(crate) fn check_key(&self, key: &Key) -> Result<()> {
        match self {
            Container::Sequence(_) if key.as_index().is_none() => {
                Err(Error::InvalidIndex { key: key.clone() })
            }
            _ => Ok(()),
        }
    }

    /// Copy with `value` stored under `key`.
    pub(crate) fn with_child(&self, key: &Key, value: Value) -> Result<Container> {
        self.check_key(key)?;
        Ok(match self {
            Container::Record(record) => Container::Record(record.with_entry(key.to_name(), value)),
            Container::Sequence(sequence) => {
                let index = key.as_index().ok_or_else(|| Error::InvalidIndex { key: key.clone() })?;
                Container::Sequence(sequence.with_item(index, value)?)
            }
        })
    }

    pub fn set(&self, key: impl Into<Key>, value: impl Wrap) -> Result<Container> {
        path::set_in(self, &[key.into()], value)
    }

    /// Shallow merge into this container: field union for records,
    /// positional overwrite for sequences.
    pub fn merge(&self, patch: impl Wrap) -> Result<Container> {
        path::merge_in(self, &[], patch, false)
    }

    pub fn merge_deep(&self, patch: impl Wrap) -> Result<Container> {
        path::merge_in(self, &[], patch, true)
    }

    /// Copy without `key`. Missing keys leave the container unchanged.
    pub fn remove(&self, key: &Key) -> Result<Container> {
        self.check_key(key)?;
        Ok(match self {
            Container::Record(record) => Container::Record(record.remove(&key.as_name())),
            Container::Sequence(sequence) => match key.as_index() {
                Some(index) => Container::Sequence(sequence.remove(index)),
                None => self.clone(),
            },
        })
    }

    pub fn get_in(&self, path: &[Key]) -> Option<Value> {
        path::get_in(self, path)
    }

    pub fn set_in(&self, path: &[Key], value: impl Wrap) -> Result<Container> {
        path::set_in(self, path, value)
    }

    pub fn merge_in(&self, path: &[Key], patch: impl Wrap) -> Result<Container> {
        path::merge_in(self, path, patch, false)
    }

    pub fn merge_in_deep(&self, path: &[Key], patch: impl Wrap) -> Result<Container> {
        path::merge_in(self, path, patch, true)
    }

    /// Same as `to_string()`; no locale-specific formatting is applied.
    pub fn to_locale_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::Record(record) => fmt::Display::fmt(record, f),
            Container::Sequence(sequence) => fmt::Display::fmt(sequence, f),
        }
    }
}

impl From<Record> for Container {
    fn from(record: Record) -> Self {
        Container::Record(record)
    }
}

impl From<Sequence> for Container {
    fn from(sequence: Sequence) -> Self {
        Container::Sequence(sequence)
    }
}

impl TryFrom<Value> for Container {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value.into_container().ok_or(Error::ScalarRoot)
    }
}

/// Borrowing iterator over a container's values.
#[derive(Clone, Debug)]
pub enum Iter<'a> {
    Record(Values<'a, Arc<str>, Value>),
    Sequence(std::slice::Iter<'a, Value>),
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Iter::Record(values) => values.next(),
            Iter::Sequence(items) => items.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Iter::Record(values) => values.size_hint(),
            Iter::Sequence(items) => items.size_hint(),
        }
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Container {
    type Item = &'a Value;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
