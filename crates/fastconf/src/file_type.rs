//! Supported backing file formats

use crate::codec::{ConfigCodec, JsonCodec, TomlCodec};
use crate::error::{ConfigError, ConfigResult};
use std::fmt;
use std::path::Path;

/// Format of a backing file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// `.json`
    Json,
    /// `.toml`
    Toml,
}

impl FileType {
    /// All supported formats
    pub const ALL: [Self; 2] = [Self::Json, Self::Toml];

    /// File extension without the dot
    #[inline]
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }

    /// Match an extension, ignoring ASCII case
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.extension().eq_ignore_ascii_case(extension))
    }

    /// Infer the format from a file name
    ///
    /// # Errors
    /// [`ConfigError::UnknownFileType`] if the extension is missing or
    /// unsupported.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| ConfigError::UnknownFileType(path.display().to_string()))
    }

    /// Codec reading and writing this format
    #[must_use]
    pub fn codec(self) -> &'static dyn ConfigCodec {
        match self {
            Self::Json => &JsonCodec,
            Self::Toml => &TomlCodec,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_lookup() {
        assert_eq!(FileType::from_extension("json"), Some(FileType::Json));
        assert_eq!(FileType::from_extension("TOML"), Some(FileType::Toml));
        assert_eq!(FileType::from_extension("yaml"), None);
    }

    #[test]
    fn path_lookup() {
        assert_eq!(FileType::from_path(Path::new("a/b/app.json")).unwrap(), FileType::Json);
        assert!(matches!(
            FileType::from_path(Path::new("app.ini")),
            Err(ConfigError::UnknownFileType(_))
        ));
        assert!(FileType::from_path(Path::new("Makefile")).is_err());
    }

    #[test]
    fn codec_agrees_with_extension() {
        for ty in FileType::ALL {
            assert!(ty.codec().extensions().contains(&ty.extension()));
        }
    }
}
