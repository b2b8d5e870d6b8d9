//! fastconf
//!
//! Typed, file-backed configuration over a dotted-path tree.
//!
//! # Overview
//!
//! - **Configuration**: Typed facade (getters with defaults, enums,
//!   registered serializers) over raw path access
//! - **ConfigFile**: JSON or TOML file mirrored by an in-memory tree
//! - **ConfigSection**: The same facade rooted at a path prefix
//! - **ConfigCodec**: Text ↔ tree conversion per file format
//!
//! # Example
//!
//! ```rust,no_run
//! use fastconf::prelude::*;
//!
//! # fn main() -> Result<(), fastconf::ConfigError> {
//! let config = ConfigFile::open("config/server.json")?;
//!
//! // Written to disk before `set` returns
//! config.set("server.port", 8080);
//!
//! // Absent paths fall back to defaults
//! let port = config.get_int("server.port");
//! let host = config.get_or("server.host", "localhost".to_string());
//!
//! // Reads that store their default when missing
//! let workers = config.get_or_set_default("server.workers", 4);
//!
//! let db = config.section("database");
//! db.set_default("pool.size", 8);
//! # let _ = (port, host, workers);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod coerce;
pub mod configuration;
pub mod error;
pub mod file;
pub mod file_type;
pub mod section;

// Re-exports
pub use codec::{ConfigCodec, JsonCodec, TomlCodec};
pub use coerce::FromValue;
pub use configuration::Configuration;
pub use error::{CodecError, ConfigError, ConfigResult};
pub use file::{ConfigFile, ConfigFileBuilder, ErrorHandler};
pub use file_type::FileType;
pub use section::ConfigSection;

pub use fastconf_serialize::{ConfSerializable, SerializeError, SerializerRegistry};
pub use fastconf_tree::{ConfigPath, IndexMap, IndexSet, PathKeyStore, Tree, Value};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commonly used types
pub mod prelude {
    pub use crate::{
        ConfSerializable, ConfigFile, ConfigResult, ConfigSection, Configuration, FileType,
        SerializerRegistry, Tree, Value,
    };
}
