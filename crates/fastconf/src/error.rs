//! Error types for fastconf
//!
//! Provides error handling for:
//! - Codec operations (text ↔ tree)
//! - Backing file I/O (load and persist)
//! - Typed access that indicates misuse (bad enum value, missing serializer)
//!
//! Absent keys are never errors; typed getters return defaults or `None`.

use fastconf_serialize::SerializeError;
use std::path::PathBuf;

/// Errors converting between document text and a tree
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Malformed JSON, or JSON encoding failure
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed TOML
    #[error("toml syntax error: {0}")]
    TomlSyntax(#[from] toml::de::Error),

    /// TOML encoding failure
    #[error("toml encoding error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    /// Document root was a scalar or list
    #[error("document root must be a table, found {found}")]
    NotATable { found: &'static str },

    /// Value has no representation in the target format
    #[error("value cannot be represented: {0}")]
    Unrepresentable(String),

    /// Encoder produced invalid UTF-8
    #[error("encoded output is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Main fastconf error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error on the backing file
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing file could not be decoded or encoded
    #[error("codec error on {path}: {source}")]
    Codec {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// No file type matches the file extension
    #[error("unknown configuration file type: '{0}'")]
    UnknownFileType(String),

    /// Stored value does not name a variant of the requested enum
    #[error("invalid value {value} at '{path}' for enum {enum_type}")]
    InvalidEnumValue {
        path: String,
        value: String,
        enum_type: &'static str,
    },

    /// Serializer lookup or conversion failed
    #[error("serializer error: {0}")]
    Serialize(#[from] SerializeError),
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create codec error for path
    pub fn codec_error(path: impl Into<PathBuf>, source: CodecError) -> Self {
        Self::Codec {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for fastconf operations
pub type ConfigResult<T> = Result<T, ConfigError>;
