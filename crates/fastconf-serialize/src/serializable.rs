//! Serializer trait
//!
//! Defines [`ConfSerializable`], a bidirectional converter between one
//! domain type and a storable [`Value`].

use crate::error::SerializeError;
use fastconf_tree::Value;
use std::any::Any;

/// Converter between a domain type and its stored form
///
/// Implement this for a dedicated serializer type and hand it to
/// [`SerializerRegistry::register_serializable`](crate::SerializerRegistry::register_serializable).
///
/// # Contract
/// - `deserialize(serialize(x))` must reproduce `x`
/// - `deserialize` receives the raw stored value unvalidated; it is
///   responsible for rejecting shapes it cannot read
///
/// # Example
/// ```rust
/// use fastconf_serialize::{ConfSerializable, SerializeError};
/// use fastconf_tree::{Tree, Value};
///
/// #[derive(Debug, PartialEq)]
/// struct Port(u16);
///
/// struct PortSerializer;
///
/// impl ConfSerializable for PortSerializer {
///     type Target = Port;
///
///     fn serialize(&self, value: &Port) -> Result<Value, SerializeError> {
///         Ok(Value::from(value.0))
///     }
///
///     fn deserialize(&self, raw: &Value) -> Result<Port, SerializeError> {
///         raw.as_i64()
///             .and_then(|n| u16::try_from(n).ok())
///             .map(Port)
///             .ok_or_else(|| SerializeError::rejected::<Port>(format!("not a port: {raw}")))
///     }
/// }
/// ```
pub trait ConfSerializable: Send + Sync + 'static {
    /// The domain type handled by this serializer
    type Target: Any + Send;

    /// Convert the domain value into its stored form
    ///
    /// # Errors
    /// Returns error if the value cannot be represented
    fn serialize(&self, value: &Self::Target) -> Result<Value, SerializeError>;

    /// Rebuild the domain value from its stored form
    ///
    /// # Errors
    /// Returns error if `raw` has the wrong shape
    fn deserialize(&self, raw: &Value) -> Result<Self::Target, SerializeError>;
}
