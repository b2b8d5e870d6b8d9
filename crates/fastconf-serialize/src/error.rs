//! Error types for serializer dispatch

/// Errors raised while converting domain values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerializeError {
    /// Nothing registered for the exact type
    #[error("no serializer registered for type: {type_name}")]
    NoSerializer { type_name: String },

    /// The serializer refused the input
    #[error("serializer for {type_name} rejected value: {reason}")]
    Rejected { type_name: String, reason: String },
}

impl SerializeError {
    /// Missing registration for `T`
    #[must_use]
    pub fn no_serializer<T: ?Sized>() -> Self {
        Self::NoSerializer {
            type_name: std::any::type_name::<T>().to_string(),
        }
    }

    /// Shape rejection reported by the serializer for `T`
    pub fn rejected<T: ?Sized>(reason: impl Into<String>) -> Self {
        Self::Rejected {
            type_name: std::any::type_name::<T>().to_string(),
            reason: reason.into(),
        }
    }

    /// True for a missing registration, as opposed to a rejected value
    #[must_use]
    pub const fn is_missing_serializer(&self) -> bool {
        matches!(self, Self::NoSerializer { .. })
    }
}
