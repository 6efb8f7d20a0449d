//! The boundary back to plain, mutable data.
//!
//! `thaw` deep-copies a container tree into `serde_json` values. `mutate`
//! lends a thawed scratch copy to a closure. The serde impls write the same
//! shape `thaw` produces, so any serde format can carry a container tree.

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Value as JsonValue};

use crate::container::Container;
use crate::number::Number;
use crate::record::Record;
use crate::sequence::Sequence;
use crate::value::Value;
use crate::wrap::Wrap;

/// NaN and the infinities have no JSON spelling and thaw to `null`.
fn thaw_number(n: &Number) -> JsonValue {
    if let Some(int) = n.as_i64() {
        JsonValue::from(int)
    } else if let Some(uint) = n.as_u64() {
        JsonValue::from(uint)
    } else {
        serde_json::Number::from_f64(n.as_f64()).map_or(JsonValue::Null, JsonValue::Number)
    }
}

impl Value {
    pub fn thaw(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Number(n) => thaw_number(n),
            Value::Text(s) => JsonValue::String(s.to_string()),
            Value::Record(record) => record.thaw(),
            Value::Sequence(sequence) => sequence.thaw(),
        }
    }
}

impl Record {
    pub fn thaw(&self) -> JsonValue {
        JsonValue::Object(self.thaw_fields())
    }

    fn thaw_fields(&self) -> Map<String, JsonValue> {
        self.iter_entries()
            .map(|(name, value)| (name.to_string(), value.thaw()))
            .collect()
    }

    /// Runs `f` on a disposable thawed copy and returns its result as is.
    /// The record is never touched.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut Map<String, JsonValue>) -> R) -> R {
        let mut scratch = self.thaw_fields();
        f(&mut scratch)
    }
}

impl Sequence {
    pub fn thaw(&self) -> JsonValue {
        JsonValue::Array(self.thaw_items())
    }

    fn thaw_items(&self) -> Vec<JsonValue> {
        self.iter().map(Value::thaw).collect()
    }

    /// Runs `f` on a disposable thawed copy and returns its result as is.
    /// The sequence is never touched.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut Vec<JsonValue>) -> R) -> R {
        let mut scratch = self.thaw_items();
        f(&mut scratch)
    }
}

impl Container {
    pub fn thaw(&self) -> JsonValue {
        match self {
            Container::Record(record) => record.thaw(),
            Container::Sequence(sequence) => sequence.thaw(),
        }
    }

    /// Runs `f` on a disposable thawed copy and returns its result as is.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut JsonValue) -> R) -> R {
        let mut scratch = self.thaw();
        f(&mut scratch)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(int), _) => serializer.serialize_i64(int),
                (None, Some(uint)) => serializer.serialize_u64(uint),
                (None, None) => serializer.serialize_f64(n.as_f64()),
            },
            Value::Text(s) => serializer.serialize_str(s),
            Value::Record(record) => record.serialize(serializer),
            Value::Sequence(sequence) => sequence.serialize(serializer),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter_entries() {
            map.serialize_entry(name.as_ref(), value)?;
        }
        map.end()
    }
}

impl Serialize for Sequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for value in self {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl Serialize for Container {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Container::Record(record) => record.serialize(serializer),
            Container::Sequence(sequence) => sequence.serialize(serializer),
        }
    }
}

/// Reads any self-describing document and freezes it.
impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        JsonValue::deserialize(deserializer).map(Wrap::wrap)
    }
}
