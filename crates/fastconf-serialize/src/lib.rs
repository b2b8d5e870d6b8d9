//! fastconf Serialize
//!
//! Exact-type registry of converters between domain objects and storable
//! [`Value`](fastconf_tree::Value)s.
//!
//! # Overview
//!
//! - **ConfSerializable**: Bidirectional converter for one domain type
//! - **SerializerRegistry**: Concurrent, append-only registry keyed by `TypeId`
//!
//! # Example
//!
//! ```rust
//! use fastconf_serialize::SerializerRegistry;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Point { x: i32, y: i32 }
//!
//! let registry = SerializerRegistry::new();
//! registry.register_serde::<Point>();
//!
//! let stored = registry.serialize(&Point { x: 1, y: 2 }).unwrap();
//! let back: Point = registry.deserialize(&stored).unwrap();
//! assert_eq!(back, Point { x: 1, y: 2 });
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod registry;
pub mod serializable;

// Re-exports
pub use error::SerializeError;
pub use registry::SerializerRegistry;
pub use serializable::ConfSerializable;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
