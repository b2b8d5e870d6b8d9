//! Document codecs
//!
//! Converts between the text of a backing file and a [`Tree`]:
//! - JSON via `serde_json`
//! - TOML via `toml`

use crate::error::CodecError;
use fastconf_tree::Tree;
use std::path::Path;

mod json;
mod toml;

pub use self::json::JsonCodec;
pub use self::toml::TomlCodec;

/// Codec trait for one structured-text format
///
/// Implement this trait to back a [`ConfigFile`](crate::ConfigFile) with a
/// new format.
pub trait ConfigCodec: Send + Sync + 'static {
    /// Parse document text into a tree
    ///
    /// # Errors
    /// Malformed text, or a document whose root is not a table.
    fn decode(&self, text: &str) -> Result<Tree, CodecError>;

    /// Render a tree as document text
    ///
    /// # Errors
    /// A value the format cannot represent.
    fn encode(&self, tree: &Tree) -> Result<String, CodecError>;

    /// Supported file extensions (without dot)
    fn extensions(&self) -> &[&str];

    /// Check if this codec handles the given path
    fn can_decode(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions().contains(&ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_matches_by_extension() {
        assert!(JsonCodec.can_decode(Path::new("config.json")));
        assert!(JsonCodec.can_decode(Path::new("/etc/app/config.json")));
        assert!(!JsonCodec.can_decode(Path::new("config.toml")));
        assert!(TomlCodec.can_decode(Path::new("Cargo.toml")));
        assert!(!TomlCodec.can_decode(Path::new("toml")));
    }
}
