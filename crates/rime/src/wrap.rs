//! Classifying raw data and freezing it into containers.

use std::collections::BTreeMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::container::Container;
use crate::number::Number;
use crate::record::Record;
use crate::sequence::Sequence;
use crate::value::Value;

/// What a raw value looks like to the wrapper factory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Plain key-value data that will become a [`Record`].
    Record,
    /// Plain ordered data that will become a [`Sequence`].
    Sequence,
    /// Already a container; wrapping returns it unchanged.
    Container,
    Scalar,
}

/// Data that can be frozen into a [`Value`].
///
/// Record-like and sequence-like input is copied into fresh storage with
/// every child wrapped in turn, so the result never aliases the input.
/// Containers are returned as the same instance.
pub trait Wrap {
    fn kind(&self) -> Kind;

    fn wrap(self) -> Value
    where
        Self: Sized;
}

/// Freezes `value`. Idempotent: wrapping a container yields that container.
pub fn wrap<T: Wrap>(value: T) -> Value {
    value.wrap()
}

pub fn is_container<T: Wrap>(value: &T) -> bool {
    value.kind() == Kind::Container
}

impl Wrap for Value {
    fn kind(&self) -> Kind {
        if self.is_container() {
            Kind::Container
        } else {
            Kind::Scalar
        }
    }

    fn wrap(self) -> Value {
        self
    }
}

impl Wrap for &Value {
    fn kind(&self) -> Kind {
        <Value as Wrap>::kind(self)
    }

    fn wrap(self) -> Value {
        self.clone()
    }
}

impl Wrap for Container {
    fn kind(&self) -> Kind {
        Kind::Container
    }

    fn wrap(self) -> Value {
        Value::from(self)
    }
}

impl Wrap for Record {
    fn kind(&self) -> Kind {
        Kind::Container
    }

    fn wrap(self) -> Value {
        Value::Record(self)
    }
}

impl Wrap for Sequence {
    fn kind(&self) -> Kind {
        Kind::Container
    }

    fn wrap(self) -> Value {
        Value::Sequence(self)
    }
}

impl Wrap for &JsonValue {
    fn kind(&self) -> Kind {
        match self {
            JsonValue::Object(_) => Kind::Record,
            JsonValue::Array(_) => Kind::Sequence,
            _ => Kind::Scalar,
        }
    }

    fn wrap(self) -> Value {
        match self {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => wrap_json_number(n).map_or(Value::Null, Value::Number),
            JsonValue::String(s) => Value::text(s.as_str()),
            JsonValue::Array(items) => Value::Sequence(items.iter().collect()),
            JsonValue::Object(fields) => Value::Record(
                fields
                    .iter()
                    .map(|(name, field)| (name.as_str(), field))
                    .collect(),
            ),
        }
    }
}

/// Integers keep their integer spelling; everything else is read as a double.
fn wrap_json_number(n: &serde_json::Number) -> Option<Number> {
    if let Some(int) = n.as_i64() {
        Some(Number::from(int))
    } else if let Some(uint) = n.as_u64() {
        Some(Number::from(uint))
    } else {
        n.as_f64().map(Number::from)
    }
}

impl Wrap for JsonValue {
    fn kind(&self) -> Kind {
        <&JsonValue as Wrap>::kind(&self)
    }

    fn wrap(self) -> Value {
        <&JsonValue as Wrap>::wrap(&self)
    }
}

impl Wrap for bool {
    fn kind(&self) -> Kind {
        Kind::Scalar
    }

    fn wrap(self) -> Value {
        Value::Bool(self)
    }
}

macro_rules! wrap_number {
    ($($ty:ty),+) => {
        $(
            impl Wrap for $ty {
                fn kind(&self) -> Kind {
                    Kind::Scalar
                }

                fn wrap(self) -> Value {
                    Value::Number(Number::from(self))
                }
            }
        )+
    };
}

wrap_number!(f64, f32, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Wrap for &str {
    fn kind(&self) -> Kind {
        Kind::Scalar
    }

    fn wrap(self) -> Value {
        Value::text(self)
    }
}

impl Wrap for String {
    fn kind(&self) -> Kind {
        Kind::Scalar
    }

    fn wrap(self) -> Value {
        Value::text(self)
    }
}

impl Wrap for Arc<str> {
    fn kind(&self) -> Kind {
        Kind::Scalar
    }

    fn wrap(self) -> Value {
        Value::Text(self)
    }
}

/// `None` freezes to `Null`.
impl<T: Wrap> Wrap for Option<T> {
    fn kind(&self) -> Kind {
        self.as_ref().map_or(Kind::Scalar, Wrap::kind)
    }

    fn wrap(self) -> Value {
        self.map_or(Value::Null, Wrap::wrap)
    }
}

impl<T: Wrap> Wrap for Vec<T> {
    fn kind(&self) -> Kind {
        Kind::Sequence
    }

    fn wrap(self) -> Value {
        Value::Sequence(self.into_iter().collect())
    }
}

impl<T: Wrap, const N: usize> Wrap for [T; N] {
    fn kind(&self) -> Kind {
        Kind::Sequence
    }

    fn wrap(self) -> Value {
        Value::Sequence(self.into_iter().collect())
    }
}

impl<T: Wrap + Clone> Wrap for &[T] {
    fn kind(&self) -> Kind {
        Kind::Sequence
    }

    fn wrap(self) -> Value {
        Value::Sequence(self.iter().cloned().collect())
    }
}

impl<K: Into<Arc<str>>, V: Wrap> Wrap for IndexMap<K, V> {
    fn kind(&self) -> Kind {
        Kind::Record
    }

    fn wrap(self) -> Value {
        Value::Record(self.into_iter().collect())
    }
}

/// Fields are taken in key order.
impl<K: Into<Arc<str>>, V: Wrap> Wrap for BTreeMap<K, V> {
    fn kind(&self) -> Kind {
        Kind::Record
    }

    fn wrap(self) -> Value {
        Value::Record(self.into_iter().collect())
    }
}
