//! Record: string-keyed container preserving insertion order.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;
use indexmap::map::{Iter, Values};

use crate::container::ContainerKind;
use crate::hash::{self, Accumulator, HashCell};
use crate::key::Key;
use crate::metrics::inc_metric;
use crate::path;
use crate::value::Value;
use crate::wrap::Wrap;

struct RecordNode {
    entries: IndexMap<Arc<str>, Value>,
    hash: HashCell,
}

/// Frozen mapping from field names to values.
///
/// Cloning shares the node. Every "modifying" method returns a new record
/// whose unchanged children are the same instances as in `self`.
#[derive(Clone)]
pub struct Record(Arc<RecordNode>);

impl Record {
    pub fn new() -> Self {
        Self::from_entries(IndexMap::new())
    }

    pub(crate) fn from_entries(entries: IndexMap<Arc<str>, Value>) -> Self {
        inc_metric!(CONTAINERS_BUILT);
        Self(Arc::new(RecordNode {
            entries,
            hash: HashCell::new(),
        }))
    }

    pub fn len(&self) -> usize {
        self.0.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.entries.get(name)
    }

    /// Lookup by path key; positions are read as their decimal names.
    pub fn get_key(&self, key: &Key) -> Option<&Value> {
        self.get(&key.as_name())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.entries.contains_key(name)
    }

    pub fn keys(&self) -> Vec<Arc<str>> {
        self.0.entries.keys().cloned().collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.0.entries.values().cloned().collect()
    }

    pub fn entries(&self) -> Vec<(Arc<str>, Value)> {
        self.iter_entries()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Values in insertion order.
    pub fn iter(&self) -> Values<'_, Arc<str>, Value> {
        self.0.entries.values()
    }

    pub fn iter_entries(&self) -> Iter<'_, Arc<str>, Value> {
        self.0.entries.iter()
    }

    pub fn hash_code(&self) -> u32 {
        self.0.hash.get_or_compute(|| {
            let mut acc = Accumulator::new(ContainerKind::Record);
            for (name, value) in &self.0.entries {
                acc.push(hash::text_hash(name));
                acc.push(value.hash_code());
            }
            let hash = acc.finish(self.len());
            log::trace!("hashed record with {} fields: {}", self.len(), hash);
            hash
        })
    }

    /// Structural equality. Field order is significant.
    pub fn equals(&self, other: &Record) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.len() != other.len() || self.hash_code() != other.hash_code() {
            return false;
        }
        self.iter_entries()
            .zip(other.iter_entries())
            .all(|((name_a, a), (name_b, b))| name_a == name_b && a == b)
    }

    pub fn ptr_eq(&self, other: &Record) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Copy with `name` bound to `value`. New names are appended.
    pub fn set(&self, name: impl Into<Arc<str>>, value: impl Wrap) -> Record {
        self.with_entry(name.into(), value.wrap())
    }

    pub(crate) fn with_entry(&self, name: Arc<str>, value: Value) -> Record {
        let mut entries = self.0.entries.clone();
        entries.insert(name, value);
        Record::from_entries(entries)
    }

    /// Copy without `name`; remaining fields keep their order.
    pub fn remove(&self, name: &str) -> Record {
        if !self.contains_key(name) {
            return self.clone();
        }
        let mut entries = self.0.entries.clone();
        entries.shift_remove(name);
        Record::from_entries(entries)
    }

    /// Shallow union; `patch` wins on conflicting names.
    pub fn merge(&self, patch: &Record) -> Record {
        self.merged(patch, false)
    }

    /// Like [`merge`](Self::merge), but fields holding records on both sides
    /// are merged recursively instead of replaced.
    pub fn merge_deep(&self, patch: &Record) -> Record {
        self.merged(patch, true)
    }

    pub(crate) fn merged(&self, patch: &Record, deep: bool) -> Record {
        let mut entries = self.0.entries.clone();
        for (name, incoming) in patch.iter_entries() {
            let value = if deep {
                path::merge_nested(entries.get(name), incoming)
            } else {
                incoming.clone()
            };
            entries.insert(name.clone(), value);
        }
        Record::from_entries(entries)
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter_entries()).finish()
    }
}

/// `Record {"name": value, ...}` in insertion order.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", ContainerKind::Record)?;
        for (i, (name, value)) in self.iter_entries().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}: {}", name, value)?;
        }
        f.write_str("}")
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash_code());
    }
}

impl PartialOrd for Record {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Record {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.ptr_eq(other) {
            return Ordering::Equal;
        }
        self.iter_entries().cmp(other.iter_entries())
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<Arc<str>>,
    V: Wrap,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record::from_entries(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.wrap()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a Value;
    type IntoIter = Values<'a, Arc<str>, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrap;
    use serde_json::json;

    fn record(json: serde_json::Value) -> Record {
        match wrap(json) {
            Value::Record(record) => record,
            other => panic!("expected a record, got {:?}", other),
        }
    }

    #[test]
    fn reads_own_fields() {
        let r = record(json!({"foo": "bar", "n": 1}));
        assert_eq!(r.len(), 2);
        assert_eq!(r.get("foo"), Some(&Value::from("bar")));
        assert_eq!(r.get_key(&Key::from("n")), Some(&Value::from(1.0)));
        assert!(r.get("missing").is_none());
        assert!(r.contains_key("foo"));
        assert_eq!(r.keys(), vec![Arc::from("foo"), Arc::from("n")]);
        assert_eq!(r.values(), vec![Value::from("bar"), Value::from(1.0)]);
        assert_eq!(r.entries()[0], (Arc::from("foo"), Value::from("bar")));
    }

    #[test]
    fn positions_address_decimal_names() {
        let r = record(json!({"0": "zero"}));
        assert_eq!(r.get_key(&Key::Index(0)), Some(&Value::from("zero")));
    }

    #[test]
    fn set_shares_untouched_children() {
        let r = record(json!({"a": {"deep": true}, "b": 1}));
        let updated = r.set("b", 2.0);

        assert_eq!(r.get("b"), Some(&Value::from(1.0)));
        assert_eq!(updated.get("b"), Some(&Value::from(2.0)));
        assert!(r.get("a").unwrap().ptr_eq(updated.get("a").unwrap()));
    }

    #[test]
    fn set_appends_new_names() {
        let r = record(json!({"a": 1})).set("b", "x");
        assert_eq!(r.keys(), vec![Arc::from("a"), Arc::from("b")]);
    }

    #[test]
    fn remove_keeps_order_and_is_a_no_op_for_missing_names() {
        let r = record(json!({"a": 1, "b": 2, "c": 3}));
        assert_eq!(r.remove("b").keys(), vec![Arc::from("a"), Arc::from("c")]);
        assert!(r.remove("zzz").ptr_eq(&r));
    }

    #[test]
    fn shallow_and_deep_merge() {
        let base = record(json!({"a": {"x": 1}, "b": 1}));
        let patch = record(json!({"a": {"y": 2}, "c": 3}));

        assert_eq!(base.merge(&patch), record(json!({"a": {"y": 2}, "b": 1, "c": 3})));
        assert_eq!(
            base.merge_deep(&patch),
            record(json!({"a": {"x": 1, "y": 2}, "b": 1, "c": 3}))
        );
    }

    #[test]
    fn field_order_is_part_of_identity() {
        let ab = record(json!({"a": 1, "b": 2}));
        let ba = record(json!({"b": 2, "a": 1}));
        assert_ne!(ab, ba);
        assert_eq!(ab, record(json!({"a": 1, "b": 2})));
    }

    #[test]
    fn display_quotes_names_and_text() {
        let r = record(json!({"foo": "bar", "n": [1, {"x": null}]}));
        assert_eq!(
            r.to_string(),
            "Record {\"foo\": \"bar\", \"n\": Sequence {0: 1, 1: Record {\"x\": null}}}"
        );
        assert_eq!(Record::new().to_string(), "Record {}");
    }

    #[test]
    fn collects_from_pairs() {
        let r: Record = [("a", 1.0), ("b", 2.0)].into_iter().collect();
        assert_eq!(r, record(json!({"a": 1, "b": 2})));
        let total: f64 = r.iter().filter_map(Value::as_number).sum();
        assert_eq!(total, 3.0);
    }
}
