//! Serializer registry
//!
//! Provides [`SerializerRegistry`], keyed by exact [`TypeId`].
//!
//! Lookups never fall back to a "compatible" type: a serializer registered
//! for `T` is found only when asked about `T` itself, never for a wrapper
//! or a trait object standing in for it.

use crate::error::SerializeError;
use crate::serializable::ConfSerializable;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use fastconf_tree::Value;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::{type_name, Any, TypeId};
use std::sync::Arc;
use tracing::{debug, warn};

type SerializeFn = Box<dyn Fn(&dyn Any) -> Result<Value, SerializeError> + Send + Sync>;
type DeserializeFn = Box<dyn Fn(&Value) -> Result<Box<dyn Any + Send>, SerializeError> + Send + Sync>;

/// One registered type
struct Registration {
    type_name: &'static str,
    serialize: SerializeFn,
    deserialize: DeserializeFn,
}

/// Registry of value serializers
///
/// Append-only and safe to share: registrations and lookups may run
/// concurrently from any thread. The first registration for a type wins;
/// later ones are ignored.
///
/// There is no process-wide instance. Build one, register into it, and
/// hand it (usually as `Arc<SerializerRegistry>`) to the configurations
/// that need it.
#[derive(Default)]
pub struct SerializerRegistry {
    entries: DashMap<TypeId, Arc<Registration>>,
}

impl SerializerRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pair of conversion functions for `T`
    ///
    /// Returns `false` if `T` already had a serializer; the existing one is
    /// kept.
    pub fn register<T, S, D>(&self, serialize: S, deserialize: D) -> bool
    where
        T: Any + Send,
        S: Fn(&T) -> Result<Value, SerializeError> + Send + Sync + 'static,
        D: Fn(&Value) -> Result<T, SerializeError> + Send + Sync + 'static,
    {
        let registration = Registration {
            type_name: type_name::<T>(),
            serialize: Box::new(move |any: &dyn Any| match any.downcast_ref::<T>() {
                Some(value) => serialize(value),
                None => Err(SerializeError::rejected::<T>("value is not of the registered type")),
            }),
            deserialize: Box::new(move |raw: &Value| {
                deserialize(raw).map(|value| Box::new(value) as Box<dyn Any + Send>)
            }),
        };

        match self.entries.entry(TypeId::of::<T>()) {
            Entry::Occupied(_) => {
                warn!(type_name = type_name::<T>(), "serializer already registered, keeping the first");
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(registration));
                debug!(type_name = type_name::<T>(), "registered serializer");
                true
            }
        }
    }

    /// Register a [`ConfSerializable`] implementation
    pub fn register_serializable<S: ConfSerializable>(&self, serializer: S) -> bool {
        let serializer = Arc::new(serializer);
        let reader = Arc::clone(&serializer);
        self.register::<S::Target, _, _>(
            move |value| serializer.serialize(value),
            move |raw| reader.deserialize(raw),
        )
    }

    /// Register `T` through its serde implementation
    ///
    /// The stored form is whatever `serde_json` produces for `T`, converted
    /// to a [`Value`].
    pub fn register_serde<T>(&self) -> bool
    where
        T: Serialize + DeserializeOwned + Any + Send,
    {
        self.register::<T, _, _>(
            |value| {
                serde_json::to_value(value)
                    .map(Value::from_json)
                    .map_err(|e| SerializeError::rejected::<T>(e.to_string()))
            },
            |raw| {
                serde_json::from_value(raw.to_json())
                    .map_err(|e| SerializeError::rejected::<T>(e.to_string()))
            },
        )
    }

    /// Check if `T` has a serializer
    #[inline]
    #[must_use]
    pub fn is_registered<T: Any>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Convert `value` with the serializer registered for exactly `T`
    ///
    /// # Errors
    /// - `SerializeError::NoSerializer` if `T` is not registered
    /// - `SerializeError::Rejected` if the serializer refuses the value
    pub fn serialize<T: Any>(&self, value: &T) -> Result<Value, SerializeError> {
        let registration = self
            .lookup(TypeId::of::<T>())
            .ok_or_else(SerializeError::no_serializer::<T>)?;
        (registration.serialize)(value)
    }

    /// Convert a type-erased value using its runtime type
    ///
    /// # Errors
    /// Same as [`serialize`](Self::serialize)
    pub fn serialize_any(&self, value: &dyn Any) -> Result<Value, SerializeError> {
        let type_id = value.type_id();
        let registration = self.lookup(type_id).ok_or_else(|| SerializeError::NoSerializer {
            type_name: format!("{type_id:?}"),
        })?;
        (registration.serialize)(value)
    }

    /// Rebuild a `T` from its stored form
    ///
    /// `raw` is passed to the serializer as-is.
    ///
    /// # Errors
    /// - `SerializeError::NoSerializer` if `T` is not registered
    /// - `SerializeError::Rejected` if the serializer refuses `raw`
    pub fn deserialize<T: Any>(&self, raw: &Value) -> Result<T, SerializeError> {
        let registration = self
            .lookup(TypeId::of::<T>())
            .ok_or_else(SerializeError::no_serializer::<T>)?;
        let boxed = (registration.deserialize)(raw)?;
        boxed
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| SerializeError::rejected::<T>("serializer produced a different type"))
    }

    /// Names of all registered types (unordered)
    #[must_use]
    pub fn type_names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.type_name).collect()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clone the registration out so no map guard is held while user code runs
    fn lookup(&self, type_id: TypeId) -> Option<Arc<Registration>> {
        self.entries.get(&type_id).map(|entry| Arc::clone(entry.value()))
    }
}

impl std::fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerializerRegistry")
            .field("type_names", &self.type_names())
            .finish()
    }
}
