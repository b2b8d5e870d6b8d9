//! Best-effort conversion from stored values to Rust types
//!
//! [`FromValue`] backs every typed getter on
//! [`Configuration`](crate::Configuration). A conversion that is not possible
//! yields `None`, and the getter falls back to its default.

use fastconf_tree::{IndexMap, Tree, Value};

/// Coerce a stored [`Value`] into `Self`
///
/// # Rules
/// - integers: from `Integer` (range checked), from finite `Float`
///   (truncated, range checked) or from a numeric string
/// - floats: from any number or a numeric string
/// - `bool`: from `Bool` or the strings `"true"` / `"false"`
/// - `String`: from any scalar
/// - `Vec<T>`: from `List` when every element coerces
/// - `Tree` / `IndexMap<String, T>`: from `Tree`
pub trait FromValue: Sized {
    /// Convert, or `None` if the value has an incompatible shape
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Integer(n) => Some(n.to_string()),
            Value::Float(f) => Some(f.to_string()),
            _ => None,
        }
    }
}

/// Truncate toward zero if the result fits `i64`
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn truncate_float(f: f64) -> Option<i64> {
    if !f.is_finite() {
        return None;
    }
    let t = f.trunc();
    if t >= i64::MIN as f64 && t < i64::MAX as f64 {
        Some(t as i64)
    } else {
        None
    }
}

macro_rules! from_value_integer {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::Integer(n) => <$ty>::try_from(*n).ok(),
                        Value::Float(f) => truncate_float(*f).and_then(|n| <$ty>::try_from(n).ok()),
                        Value::String(s) => s.trim().parse().ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

from_value_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => s.trim().parse().ok(),
            other => other.as_f64(),
        }
    }
}

impl FromValue for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: &Value) -> Option<Self> {
        f64::from_value(value).map(|f| f as f32)
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_list()?.iter().map(T::from_value).collect()
    }
}

impl FromValue for Tree {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_tree().cloned()
    }
}

impl<T: FromValue> FromValue for IndexMap<String, T> {
    fn from_value(value: &Value) -> Option<Self> {
        value
            .as_tree()?
            .iter()
            .map(|(key, item)| T::from_value(item).map(|item| (key.clone(), item)))
            .collect()
    }
}
