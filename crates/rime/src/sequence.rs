//! Sequence: zero-based, contiguous, ordered container.
//!
//! Besides lookups this carries the bulk list algebra. Every transform builds
//! a brand-new sequence; queries return plain values.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Bound, Range, RangeBounds};
use std::slice::Iter;
use std::sync::Arc;

use crate::container::ContainerKind;
use crate::error::{Error, Result};
use crate::hash::{Accumulator, HashCell};
use crate::key::Key;
use crate::metrics::inc_metric;
use crate::path;
use crate::value::Value;
use crate::wrap::Wrap;

/// Most `Null` slots a single write past the end may add.
pub const MAX_PADDING: usize = 1 << 20;

struct SequenceNode {
    items: Vec<Value>,
    hash: HashCell,
}

/// Frozen ordered list of values.
#[derive(Clone)]
pub struct Sequence(Arc<SequenceNode>);

impl Sequence {
    pub fn new() -> Self {
        Self::from_items(Vec::new())
    }

    pub(crate) fn from_items(items: Vec<Value>) -> Self {
        inc_metric!(CONTAINERS_BUILT);
        Self(Arc::new(SequenceNode {
            items,
            hash: HashCell::new(),
        }))
    }

    fn items(&self) -> &[Value] {
        &self.0.items
    }

    pub fn len(&self) -> usize {
        self.0.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.items.get(index)
    }

    /// Lookup by path key. Names that are not canonical positions miss.
    pub fn get_key(&self, key: &Key) -> Option<&Value> {
        self.get(key.as_index()?)
    }

    pub fn contains_key(&self, index: usize) -> bool {
        index < self.len()
    }

    pub fn first(&self) -> Option<&Value> {
        self.0.items.first()
    }

    pub fn last(&self) -> Option<&Value> {
        self.0.items.last()
    }

    pub fn keys(&self) -> Vec<usize> {
        (0..self.len()).collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.0.items.clone()
    }

    pub fn entries(&self) -> Vec<(usize, Value)> {
        self.iter().cloned().enumerate().collect()
    }

    pub fn iter(&self) -> Iter<'_, Value> {
        self.0.items.iter()
    }

    pub fn hash_code(&self) -> u32 {
        self.0.hash.get_or_compute(|| {
            let mut acc = Accumulator::new(ContainerKind::Sequence);
            for (index, value) in self.iter().enumerate() {
                acc.push(index as u32);
                acc.push(value.hash_code());
            }
            let hash = acc.finish(self.len());
            log::trace!("hashed sequence of {} items: {}", self.len(), hash);
            hash
        })
    }

    pub fn equals(&self, other: &Sequence) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.len() != other.len() || self.hash_code() != other.hash_code() {
            return false;
        }
        self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }

    pub fn ptr_eq(&self, other: &Sequence) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Copy with `value` at `index`. Writing past the end pads with `Null`.
    ///
    /// Fails with [`Error::InvalidIndex`] when the padding would exceed
    /// [`MAX_PADDING`] slots.
    pub fn set(&self, index: usize, value: impl Wrap) -> Result<Sequence> {
        self.with_item(index, value.wrap())
    }

    pub(crate) fn with_item(&self, index: usize, value: Value) -> Result<Sequence> {
        let padding = index.saturating_sub(self.len());
        if padding > MAX_PADDING {
            log::debug!("refusing to pad {} slots for a write at index {}", padding, index);
            return Err(Error::InvalidIndex { key: Key::Index(index) });
        }
        let mut items = self.values();
        if index >= items.len() {
            items.resize(index + 1, Value::Null);
        }
        items[index] = value;
        Ok(Sequence::from_items(items))
    }

    /// Copy without the item at `index`; later items move down.
    pub fn remove(&self, index: usize) -> Sequence {
        if index >= self.len() {
            return self.clone();
        }
        let mut items = self.values();
        items.remove(index);
        Sequence::from_items(items)
    }

    /// Positional overwrite: `patch[i]` replaces `self[i]`; the result is as
    /// long as the longer of the two.
    pub fn merge(&self, patch: &Sequence) -> Sequence {
        self.merged(patch, false)
    }

    /// Like [`merge`](Self::merge), but positions holding records on both
    /// sides are merged recursively.
    pub fn merge_deep(&self, patch: &Sequence) -> Sequence {
        self.merged(patch, true)
    }

    pub(crate) fn merged(&self, patch: &Sequence, deep: bool) -> Sequence {
        let mut items = self.values();
        for (index, incoming) in patch.iter().enumerate() {
            if index < items.len() {
                items[index] = if deep {
                    path::merge_nested(Some(&items[index]), incoming)
                } else {
                    incoming.clone()
                };
            } else {
                items.push(incoming.clone());
            }
        }
        Sequence::from_items(items)
    }

    // ----- Transforms -----

    /// Appends the items of a sequence-like argument, or the argument itself.
    pub fn concat(&self, other: impl Wrap) -> Sequence {
        let mut items = self.values();
        match other.wrap() {
            Value::Sequence(tail) => items.extend(tail.iter().cloned()),
            single => items.push(single),
        }
        Sequence::from_items(items)
    }

    pub fn fill(&self, value: impl Wrap, range: impl RangeBounds<usize>) -> Sequence {
        let value = value.wrap();
        let range = clamp(range, self.len());
        let mut items = self.values();
        for slot in &mut items[range] {
            *slot = value.clone();
        }
        Sequence::from_items(items)
    }

    pub fn filter(&self, mut keep: impl FnMut(&Value, usize) -> bool) -> Sequence {
        let items = self
            .iter()
            .enumerate()
            .filter(|&(index, value)| keep(value, index))
            .map(|(_, value)| value.clone())
            .collect();
        Sequence::from_items(items)
    }

    pub fn map<T: Wrap>(&self, mut f: impl FnMut(&Value, usize) -> T) -> Sequence {
        let items = self
            .iter()
            .enumerate()
            .map(|(index, value)| f(value, index).wrap())
            .collect();
        Sequence::from_items(items)
    }

    /// Copy without the last item.
    pub fn pop(&self) -> Sequence {
        let end = self.len().saturating_sub(1);
        self.slice(..end)
    }

    pub fn push(&self, value: impl Wrap) -> Sequence {
        let mut items = self.values();
        items.push(value.wrap());
        Sequence::from_items(items)
    }

    /// Copy without the first item.
    pub fn shift(&self) -> Sequence {
        self.slice(1..)
    }

    pub fn unshift(&self, value: impl Wrap) -> Sequence {
        let mut items = Vec::with_capacity(self.len() + 1);
        items.push(value.wrap());
        items.extend(self.iter().cloned());
        Sequence::from_items(items)
    }

    /// Out-of-range bounds are clamped to the length.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Sequence {
        let range = clamp(range, self.len());
        Sequence::from_items(self.items()[range].to_vec())
    }

    /// Copy with `delete_count` items removed at `start` and `items`
    /// inserted in their place.
    pub fn splice<T: Wrap>(
        &self,
        start: usize,
        delete_count: usize,
        items: impl IntoIterator<Item = T>,
    ) -> Sequence {
        let start = start.min(self.len());
        let end = start.saturating_add(delete_count).min(self.len());
        let mut values = self.values();
        values.splice(start..end, items.into_iter().map(Wrap::wrap));
        Sequence::from_items(values)
    }

    /// Sorted by the total value ordering (stable).
    pub fn sort(&self) -> Sequence {
        self.sort_by(Value::cmp)
    }

    pub fn sort_by(&self, compare: impl FnMut(&Value, &Value) -> Ordering) -> Sequence {
        let mut items = self.values();
        items.sort_by(compare);
        Sequence::from_items(items)
    }

    pub fn reverse(&self) -> Sequence {
        Sequence::from_items(self.iter().rev().cloned().collect())
    }

    /// Copies the items in `source` over the positions starting at `dest`,
    /// keeping the length. Copying stops at the end of the sequence.
    pub fn copy_within(&self, source: impl RangeBounds<usize>, dest: usize) -> Sequence {
        let source = clamp(source, self.len());
        if dest >= self.len() || source.is_empty() {
            return Sequence::from_items(self.values());
        }
        let count = source.len().min(self.len() - dest);
        let mut items = self.values();
        let copied = self.items()[source.start..source.start + count].to_vec();
        items[dest..dest + count].clone_from_slice(&copied);
        Sequence::from_items(items)
    }

    // ----- Queries -----

    pub fn reduce<A>(&self, init: A, mut f: impl FnMut(A, &Value, usize) -> A) -> A {
        self.iter()
            .enumerate()
            .fold(init, |acc, (index, value)| f(acc, value, index))
    }

    pub fn reduce_right<A>(&self, init: A, mut f: impl FnMut(A, &Value, usize) -> A) -> A {
        self.iter()
            .enumerate()
            .rev()
            .fold(init, |acc, (index, value)| f(acc, value, index))
    }

    pub fn find(&self, mut predicate: impl FnMut(&Value, usize) -> bool) -> Option<&Value> {
        self.iter()
            .enumerate()
            .find(|&(index, value)| predicate(value, index))
            .map(|(_, value)| value)
    }

    pub fn find_index(&self, mut predicate: impl FnMut(&Value, usize) -> bool) -> Option<usize> {
        self.iter()
            .enumerate()
            .position(|(index, value)| predicate(value, index))
    }

    pub fn index_of(&self, needle: &Value) -> Option<usize> {
        self.iter().position(|value| value == needle)
    }

    pub fn last_index_of(&self, needle: &Value) -> Option<usize> {
        self.iter().rposition(|value| value == needle)
    }

    pub fn contains(&self, needle: &Value) -> bool {
        self.index_of(needle).is_some()
    }

    pub fn every(&self, mut predicate: impl FnMut(&Value, usize) -> bool) -> bool {
        self.iter()
            .enumerate()
            .all(|(index, value)| predicate(value, index))
    }

    pub fn some(&self, mut predicate: impl FnMut(&Value, usize) -> bool) -> bool {
        self.iter()
            .enumerate()
            .any(|(index, value)| predicate(value, index))
    }

    pub fn join(&self, separator: &str) -> String {
        self.iter()
            .map(Value::join_fragment)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

fn clamp(range: impl RangeBounds<usize>, len: usize) -> Range<usize> {
    let start = match range.start_bound() {
        Bound::Included(&start) => start,
        Bound::Excluded(&start) => start.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&end) => end.saturating_add(1),
        Bound::Excluded(&end) => end,
        Bound::Unbounded => len,
    };
    let end = end.min(len);
    start.min(end)..end
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// `Sequence {0: value, ...}` in index order.
impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", ContainerKind::Sequence)?;
        for (index, value) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", index, value)?;
        }
        f.write_str("}")
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Sequence {}

impl Hash for Sequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash_code());
    }
}

impl PartialOrd for Sequence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Sequence {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.ptr_eq(other) {
            return Ordering::Equal;
        }
        self.iter().cmp(other.iter())
    }
}

impl<V: Wrap> FromIterator<V> for Sequence {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Sequence::from_items(iter.into_iter().map(Wrap::wrap).collect())
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Value;
    type IntoIter = Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
