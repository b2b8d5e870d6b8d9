//! Path-prefixed view of a [`ConfigFile`]

use crate::configuration::Configuration;
use crate::file::ConfigFile;
use fastconf_serialize::SerializerRegistry;
use fastconf_tree::{ConfigPath, IndexSet, Value};

/// A [`Configuration`] rooted at `prefix` inside a [`ConfigFile`]
///
/// Every path is resolved as `prefix.path` before it reaches the file, so
/// writes persist exactly as they would through the file itself. An empty
/// prefix forwards paths unchanged. Sections nest: `section("b")` on a
/// section at `a` is a section at `a.b`.
#[derive(Debug, Clone)]
pub struct ConfigSection<'a> {
    file: &'a ConfigFile,
    prefix: ConfigPath,
}

impl<'a> ConfigSection<'a> {
    pub(crate) fn new(file: &'a ConfigFile, prefix: &str) -> Self {
        Self {
            file,
            prefix: ConfigPath::parse(prefix),
        }
    }

    /// Nested view at `prefix.sub`
    #[must_use]
    pub fn section(&self, sub: &str) -> ConfigSection<'a> {
        ConfigSection {
            file: self.file,
            prefix: self.prefix.resolve(sub),
        }
    }

    #[inline]
    #[must_use]
    pub fn prefix(&self) -> &ConfigPath {
        &self.prefix
    }

    #[inline]
    #[must_use]
    pub fn file(&self) -> &'a ConfigFile {
        self.file
    }

    fn full_path(&self, path: &str) -> String {
        if self.prefix.is_root() {
            path.to_string()
        } else {
            self.prefix.resolve(path).to_string()
        }
    }
}

impl Configuration for ConfigSection<'_> {
    fn get_value(&self, path: &str) -> Option<Value> {
        self.file.get_value(&self.full_path(path))
    }

    fn contains(&self, path: &str) -> bool {
        self.file.contains(&self.full_path(path))
    }

    fn set_value(&self, path: &str, value: Value) {
        self.file.set_value(&self.full_path(path), value);
    }

    fn remove(&self, path: &str) -> bool {
        self.file.remove(&self.full_path(path))
    }

    fn single_layer_key_set(&self) -> IndexSet<String> {
        if self.prefix.is_root() {
            return self.file.single_layer_key_set();
        }
        self.file.single_layer_key_set_at(&self.prefix.to_string())
    }

    fn single_layer_key_set_at(&self, path: &str) -> IndexSet<String> {
        self.file.single_layer_key_set_at(&self.full_path(path))
    }

    fn key_set(&self) -> IndexSet<String> {
        if self.prefix.is_root() {
            return self.file.key_set();
        }
        self.file.key_set_at(&self.prefix.to_string())
    }

    fn key_set_at(&self, path: &str) -> IndexSet<String> {
        self.file.key_set_at(&self.full_path(path))
    }

    fn serializers(&self) -> &SerializerRegistry {
        self.file.serializers()
    }
}
