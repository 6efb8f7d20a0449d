//! Numbers as plain data spells them.
//!
//! Integers stay integers and floats stay floats, so a number thaws back to
//! the spelling it was wrapped from. Comparison, equality and hashing go by
//! mathematical value: `2` and `2.0` are the same number.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use ordered_float::OrderedFloat;

use crate::hash;

/// An integer (any `i64` or `u64`) or an IEEE double.
///
/// Floats follow `OrderedFloat`: `-0.0 == 0.0`, NaN equals itself and sorts
/// above every other number.
#[derive(Clone, Copy, Debug)]
pub struct Number(Repr);

#[derive(Clone, Copy, Debug)]
enum Repr {
    Int(i64),
    /// Only values above `i64::MAX`.
    UInt(u64),
    Float(f64),
}

/// Lowest and one past the highest integer a `Number` can hold.
const INTEGER_FLOOR: f64 = -9_223_372_036_854_775_808.0;
const INTEGER_CEILING: f64 = 18_446_744_073_709_551_616.0;

impl Number {
    pub fn is_integer(&self) -> bool {
        !matches!(self.0, Repr::Float(_))
    }

    /// The value as a double; integers beyond 2^53 round.
    pub fn as_f64(&self) -> f64 {
        match self.0 {
            Repr::Int(n) => n as f64,
            Repr::UInt(n) => n as f64,
            Repr::Float(n) => n,
        }
    }

    /// `Some` only for integers that fit; floats are never converted.
    pub fn as_i64(&self) -> Option<i64> {
        match self.0 {
            Repr::Int(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self.0 {
            Repr::Int(n) => u64::try_from(n).ok(),
            Repr::UInt(n) => Some(n),
            Repr::Float(_) => None,
        }
    }

    fn integer(&self) -> Option<i128> {
        match self.0 {
            Repr::Int(n) => Some(i128::from(n)),
            Repr::UInt(n) => Some(i128::from(n)),
            Repr::Float(_) => None,
        }
    }

    pub(crate) fn hash_code(&self) -> u32 {
        match self.integer() {
            // Integers a double holds exactly must hash like that double.
            Some(int) if (int as f64) as i128 == int => hash::number_hash(int as f64),
            Some(int) => hash::integer_hash(int),
            None => hash::number_hash(self.as_f64()),
        }
    }
}

/// Exact comparison of an integer against a double.
fn cmp_integer_float(int: i128, float: f64) -> Ordering {
    if float.is_nan() || float >= INTEGER_CEILING {
        return Ordering::Less;
    }
    if float < INTEGER_FLOOR {
        return Ordering::Greater;
    }
    let whole = float.trunc();
    match int.cmp(&(whole as i128)) {
        Ordering::Equal => OrderedFloat(0.0).cmp(&OrderedFloat(float - whole)),
        unequal => unequal,
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.integer(), other.integer()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(a), None) => cmp_integer_float(a, other.as_f64()),
            (None, Some(b)) => cmp_integer_float(b, self.as_f64()).reverse(),
            (None, None) => OrderedFloat(self.as_f64()).cmp(&OrderedFloat(other.as_f64())),
        }
    }
}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash_code());
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number(Repr::Float(n))
    }
}

impl From<f32> for Number {
    fn from(n: f32) -> Self {
        Number(Repr::Float(f64::from(n)))
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number(Repr::Int(n))
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(n) => Number(Repr::Int(n)),
            Err(_) => Number(Repr::UInt(n)),
        }
    }
}

macro_rules! number_from_integer {
    ($via:ty: $($ty:ty),+) => {
        $(
            impl From<$ty> for Number {
                fn from(n: $ty) -> Self {
                    Number::from(n as $via)
                }
            }
        )+
    };
}

number_from_integer!(i64: i8, i16, i32, isize);
number_from_integer!(u64: u8, u16, u32, usize);

/// Integers in decimal; floats the way the host prints them.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Repr::Int(n) => write!(f, "{}", n),
            Repr::UInt(n) => write!(f, "{}", n),
            Repr::Float(n) => f.write_str(&format_float(n)),
        }
    }
}

/// Plain decimal between 1e-6 and 1e21, exponent form (`1e+21`, `1e-7`)
/// outside it, and `NaN` / `Infinity` spelled out.
fn format_float(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        let sign = if n < 0.0 { "-" } else { "" };
        return format!("{}Infinity", sign);
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{}", n);
    }
    let exponential = format!("{:e}", n);
    match exponential.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => exponential,
    }
}
