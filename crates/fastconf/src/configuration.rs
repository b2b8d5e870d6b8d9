//! The [`Configuration`] facade
//!
//! Implementors supply raw path access and persistence; everything typed is
//! provided on top of that by default methods.

use crate::coerce::FromValue;
use crate::error::{ConfigError, ConfigResult};
use fastconf_serialize::SerializerRegistry;
use fastconf_tree::{IndexMap, IndexSet, Tree, Value};
use std::any::{type_name, Any};
use std::fmt::Display;
use std::str::FromStr;

/// Typed access to a dotted-path configuration tree
///
/// # Reads and writes
/// Every method taking `&self` may still write: mutations go through
/// [`set_value`](Self::set_value) and [`remove`](Self::remove), which persist
/// synchronously before returning. Two *read-looking* methods also write:
/// [`get_or_set_default`](Self::get_or_set_default) and the
/// `get_or_set_*` collection getters store their default when the path is
/// absent.
///
/// # Absent values
/// A missing path is never an error. A stored `Null` counts as absent for
/// every typed getter.
pub trait Configuration {
    /// Raw lookup
    fn get_value(&self, path: &str) -> Option<Value>;

    /// Whether anything is stored at `path`
    fn contains(&self, path: &str) -> bool;

    /// Store `value` at `path` and persist
    fn set_value(&self, path: &str, value: Value);

    /// Remove `path` (cascading) and persist; `false` if nothing was there
    fn remove(&self, path: &str) -> bool;

    /// Immediate child names at the top of this configuration
    fn single_layer_key_set(&self) -> IndexSet<String>;

    /// Immediate child names of the branch at `path`
    fn single_layer_key_set_at(&self, path: &str) -> IndexSet<String>;

    /// Dotted leaf paths of this configuration
    fn key_set(&self) -> IndexSet<String>;

    /// Dotted leaf paths below `path`, relative to it
    fn key_set_at(&self, path: &str) -> IndexSet<String>;

    /// Registry used by the `*_serializable` methods
    fn serializers(&self) -> &SerializerRegistry;

    /// Store anything convertible into a [`Value`]
    fn set(&self, path: &str, value: impl Into<Value>)
    where
        Self: Sized,
    {
        self.set_value(path, value.into());
    }

    /// Lookup plus coercion; `None` if absent or not coercible
    fn find<T: FromValue>(&self, path: &str) -> Option<T>
    where
        Self: Sized,
    {
        let value = self.get_value(path).filter(|v| !v.is_null())?;
        T::from_value(&value)
    }

    /// Stored value coerced to `T`, else `default`
    fn get_or<T: FromValue>(&self, path: &str, default: T) -> T
    where
        Self: Sized,
    {
        self.find(path).unwrap_or(default)
    }

    /// Like [`get_or`](Self::get_or), but **writes** `default` when `path`
    /// is absent
    ///
    /// The write persists exactly as [`set`](Self::set) does. A value that is
    /// present but not coercible is left alone and `default` is returned.
    fn get_or_set_default<T>(&self, path: &str, default: T) -> T
    where
        Self: Sized,
        T: FromValue + Into<Value> + Clone,
    {
        match self.get_value(path).filter(|v| !v.is_null()) {
            Some(stored) => T::from_value(&stored).unwrap_or(default),
            None => {
                self.set_value(path, default.clone().into());
                default
            }
        }
    }

    /// Write `value` only if nothing is stored at `path`
    fn set_default(&self, path: &str, value: impl Into<Value>)
    where
        Self: Sized,
    {
        if !self.contains(path) {
            self.set_value(path, value.into());
        }
    }

    /// String at `path`, `""` if absent
    fn get_string(&self, path: &str) -> String
    where
        Self: Sized,
    {
        self.get_or(path, String::new())
    }

    /// `i64` at `path`, `0` if absent
    fn get_long(&self, path: &str) -> i64
    where
        Self: Sized,
    {
        self.get_or(path, 0)
    }

    /// `i32` at `path`, `0` if absent
    fn get_int(&self, path: &str) -> i32
    where
        Self: Sized,
    {
        self.get_or(path, 0)
    }

    /// `i8` at `path`, `0` if absent
    fn get_byte(&self, path: &str) -> i8
    where
        Self: Sized,
    {
        self.get_or(path, 0)
    }

    /// `bool` at `path`, `false` if absent
    fn get_boolean(&self, path: &str) -> bool
    where
        Self: Sized,
    {
        self.get_or(path, false)
    }

    /// `f32` at `path`, `0.0` if absent
    fn get_float(&self, path: &str) -> f32
    where
        Self: Sized,
    {
        self.get_or(path, 0.0)
    }

    /// `f64` at `path`, `0.0` if absent
    fn get_double(&self, path: &str) -> f64
    where
        Self: Sized,
    {
        self.get_or(path, 0.0)
    }

    /// Stored list as raw values, empty if absent or not a list
    fn get_list(&self, path: &str) -> Vec<Value>
    where
        Self: Sized,
    {
        self.get_or(path, Vec::new())
    }

    /// Strings at `path`, empty if absent
    fn get_string_list(&self, path: &str) -> Vec<String>
    where
        Self: Sized,
    {
        self.get_or(path, Vec::new())
    }

    /// `i32`s at `path`, empty if absent
    fn get_integer_list(&self, path: &str) -> Vec<i32>
    where
        Self: Sized,
    {
        self.get_or(path, Vec::new())
    }

    /// `i64`s at `path`, empty if absent
    fn get_long_list(&self, path: &str) -> Vec<i64>
    where
        Self: Sized,
    {
        self.get_or(path, Vec::new())
    }

    /// `i8`s at `path`, empty if absent
    fn get_byte_list(&self, path: &str) -> Vec<i8>
    where
        Self: Sized,
    {
        self.get_or(path, Vec::new())
    }

    /// Branch at `path`, empty if absent or a leaf
    fn get_map(&self, path: &str) -> Tree
    where
        Self: Sized,
    {
        self.get_or(path, Tree::new())
    }

    /// Typed list; **writes** an empty list when `path` is absent
    fn get_or_set_list<T>(&self, path: &str) -> Vec<T>
    where
        Self: Sized,
        T: FromValue + Into<Value> + Clone,
    {
        self.get_or_set_default(path, Vec::new())
    }

    /// Typed map; **writes** an empty table when `path` is absent
    fn get_or_set_map<T>(&self, path: &str) -> IndexMap<String, T>
    where
        Self: Sized,
        T: FromValue + Into<Value> + Clone,
    {
        self.get_or_set_default(path, IndexMap::new())
    }

    /// Decode the variant name stored at `path`
    ///
    /// Matching is whatever `E::from_str` does; enums deriving
    /// `strum::EnumString` match names case-sensitively.
    ///
    /// # Errors
    /// [`ConfigError::InvalidEnumValue`] if the stored value is not a string
    /// or names no variant. An absent path gives `Ok(None)`.
    fn get_enum<E: FromStr>(&self, path: &str) -> ConfigResult<Option<E>>
    where
        Self: Sized,
    {
        let Some(stored) = self.get_value(path).filter(|v| !v.is_null()) else {
            return Ok(None);
        };
        let invalid = || ConfigError::InvalidEnumValue {
            path: path.to_string(),
            value: stored.to_string(),
            enum_type: type_name::<E>(),
        };
        match &stored {
            Value::String(name) => name.parse().map(Some).map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }

    /// Store the variant name of `value`
    fn set_enum<E: Display>(&self, path: &str, value: &E)
    where
        Self: Sized,
    {
        self.set_value(path, Value::String(value.to_string()));
    }

    /// Decode the value at `path` with the serializer registered for `T`
    ///
    /// # Errors
    /// [`ConfigError::Serialize`] when a value is present and `T` has no
    /// serializer, or the serializer rejects it. An absent path gives
    /// `Ok(None)`.
    fn get_serializable<T: Any>(&self, path: &str) -> ConfigResult<Option<T>>
    where
        Self: Sized,
    {
        match self.get_value(path).filter(|v| !v.is_null()) {
            Some(stored) => Ok(Some(self.serializers().deserialize::<T>(&stored)?)),
            None => Ok(None),
        }
    }

    /// Encode `value` with the serializer registered for `T` and store it
    ///
    /// # Errors
    /// [`ConfigError::Serialize`] if `T` has no serializer; nothing is
    /// written in that case.
    fn set_serializable<T: Any>(&self, path: &str, value: &T) -> ConfigResult<()>
    where
        Self: Sized,
    {
        let encoded = self.serializers().serialize(value)?;
        self.set_value(path, encoded);
        Ok(())
    }

    /// Decode every element of the list at `path`
    ///
    /// A present value that is not a list yields an empty list.
    ///
    /// # Errors
    /// As [`get_serializable`](Self::get_serializable), for the first
    /// element that fails.
    fn get_serializable_list<T: Any>(&self, path: &str) -> ConfigResult<Option<Vec<T>>>
    where
        Self: Sized,
    {
        let Some(stored) = self.get_value(path).filter(|v| !v.is_null()) else {
            return Ok(None);
        };
        let registry = self.serializers();
        let items = match stored.as_list() {
            Some(items) => items
                .iter()
                .map(|item| registry.deserialize::<T>(item))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        Ok(Some(items))
    }

    /// Encode every element and store them as one list
    ///
    /// # Errors
    /// [`ConfigError::Serialize`] for the first element that fails; nothing
    /// is written in that case.
    fn set_serializable_list<T: Any>(&self, path: &str, values: &[T]) -> ConfigResult<()>
    where
        Self: Sized,
    {
        let registry = self.serializers();
        let encoded = values
            .iter()
            .map(|value| registry.serialize(value))
            .collect::<Result<Vec<_>, _>>()?;
        self.set_value(path, Value::List(encoded));
        Ok(())
    }
}
