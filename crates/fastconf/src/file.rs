//! File-backed configuration
//!
//! A [`ConfigFile`] keeps its tree in memory and mirrors every mutation to
//! disk before the mutating call returns:
//! - Ingress: file text → codec → [`PathKeyStore::load`] (on build and
//!   [`reload`](ConfigFile::reload))
//! - Egress: snapshot → codec → file text (after each mutation)
//!
//! The in-memory tree is authoritative. A failed write is reported to the
//! error handler and otherwise ignored; the mutation that triggered it is
//! kept.

use crate::codec::ConfigCodec;
use crate::configuration::Configuration;
use crate::error::{ConfigError, ConfigResult};
use crate::file_type::FileType;
use crate::section::ConfigSection;
use fastconf_serialize::SerializerRegistry;
use fastconf_tree::{IndexMap, IndexSet, PathKeyStore, Tree, Value};
use parking_lot::Mutex;
use std::cmp::Ordering;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Callback receiving load and persist failures
pub type ErrorHandler = Arc<dyn Fn(&ConfigError) + Send + Sync>;

fn default_error_handler() -> ErrorHandler {
    Arc::new(|error: &ConfigError| {
        warn!(error = %error, "configuration file operation failed");
    })
}

/// Builder for [`ConfigFile`]
pub struct ConfigFileBuilder {
    path: PathBuf,
    file_type: Option<FileType>,
    defaults: Option<Vec<u8>>,
    registry: Option<Arc<SerializerRegistry>>,
    error_handler: Option<ErrorHandler>,
}

impl ConfigFileBuilder {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            file_type: None,
            defaults: None,
            registry: None,
            error_handler: None,
        }
    }

    /// Force a format instead of inferring it from the extension
    #[must_use]
    pub fn file_type(mut self, file_type: FileType) -> Self {
        self.file_type = Some(file_type);
        self
    }

    /// Document copied into the file when it is new or empty
    #[must_use]
    pub fn defaults(mut self, document: impl Into<Vec<u8>>) -> Self {
        self.defaults = Some(document.into());
        self
    }

    /// Serializer registry shared with other configurations
    #[must_use]
    pub fn registry(mut self, registry: Arc<SerializerRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replace the default handler, which logs at `warn`
    #[must_use]
    pub fn error_handler(mut self, handler: impl Fn(&ConfigError) + Send + Sync + 'static) -> Self {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    /// Create the file if needed, then load it
    ///
    /// A file that exists but cannot be read or parsed is not an error
    /// here: it is reported to the error handler and the configuration
    /// starts empty.
    ///
    /// # Errors
    /// - [`ConfigError::UnknownFileType`] if no format was given and the
    ///   extension is not recognised
    /// - [`ConfigError::Io`] if the file or its directories cannot be
    ///   created, or the defaults cannot be written
    pub fn build(self) -> ConfigResult<ConfigFile> {
        let file_type = match self.file_type {
            Some(file_type) => file_type,
            None => FileType::from_path(&self.path)?,
        };
        let path = absolute(self.path)?;

        let created = create_file(&path)?;
        if let Some(defaults) = &self.defaults {
            let empty = created
                || fs::metadata(&path)
                    .map_err(|e| ConfigError::io_error(&path, e))?
                    .len()
                    == 0;
            if empty {
                fs::write(&path, defaults).map_err(|e| ConfigError::io_error(&path, e))?;
                debug!(path = %path.display(), "wrote default document");
            }
        }

        let file = ConfigFile {
            path,
            file_type,
            store: PathKeyStore::new(),
            registry: self.registry.unwrap_or_default(),
            error_handler: self.error_handler.unwrap_or_else(default_error_handler),
            write_lock: Mutex::new(()),
        };
        file.reload();
        Ok(file)
    }
}

impl std::fmt::Debug for ConfigFileBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigFileBuilder")
            .field("path", &self.path)
            .field("file_type", &self.file_type)
            .field("has_defaults", &self.defaults.is_some())
            .finish_non_exhaustive()
    }
}

/// Configuration backed by one JSON or TOML file
///
/// # Thread safety
/// Shareable across threads. Each mutation and the write that follows it
/// run under one per-file lock, so the file always reflects the mutations
/// in the order they happened. Reads never take that lock.
pub struct ConfigFile {
    path: PathBuf,
    file_type: FileType,
    store: PathKeyStore,
    registry: Arc<SerializerRegistry>,
    error_handler: ErrorHandler,
    write_lock: Mutex<()>,
}

impl ConfigFile {
    /// Start building a configuration at `path`
    #[must_use]
    pub fn builder(path: impl Into<PathBuf>) -> ConfigFileBuilder {
        ConfigFileBuilder::new(path.into())
    }

    /// Open with the format inferred from the extension
    ///
    /// # Errors
    /// See [`ConfigFileBuilder::build`].
    pub fn open(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        Self::builder(path).build()
    }

    /// Open as JSON whatever the extension
    ///
    /// # Errors
    /// See [`ConfigFileBuilder::build`].
    pub fn json(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        Self::builder(path).file_type(FileType::Json).build()
    }

    /// Open as TOML whatever the extension
    ///
    /// # Errors
    /// See [`ConfigFileBuilder::build`].
    pub fn toml(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        Self::builder(path).file_type(FileType::Toml).build()
    }

    /// Builder for `<dir>/<name>.<ext>`
    ///
    /// An extension already on `name` is replaced by the one for
    /// `file_type`.
    #[must_use]
    pub fn named(dir: impl AsRef<Path>, name: &str, file_type: FileType) -> ConfigFileBuilder {
        let stem = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name);
        let path = dir
            .as_ref()
            .join(format!("{stem}.{}", file_type.extension()));
        Self::builder(path).file_type(file_type)
    }

    /// Replace the tree with the file's current contents
    ///
    /// On failure the handler is called and the tree is left as it was.
    pub fn reload(&self) {
        if let Err(error) = self.try_reload() {
            self.report(&error);
        }
    }

    /// [`reload`](Self::reload), returning the failure instead of
    /// reporting it
    ///
    /// # Errors
    /// The file cannot be read or decoded.
    pub fn try_reload(&self) -> ConfigResult<()> {
        let _guard = self.write_lock.lock();
        let tree = self.read_tree()?;
        debug!(path = %self.path.display(), entries = tree.len(), "loaded configuration");
        self.store.load(tree);
        Ok(())
    }

    /// Write the current tree to disk, reporting failure to the handler
    pub fn write(&self) {
        if let Err(error) = self.try_write() {
            self.report(&error);
        }
    }

    /// Write the current tree to disk
    ///
    /// # Errors
    /// The tree cannot be encoded or the file cannot be written.
    pub fn try_write(&self) -> ConfigResult<()> {
        let _guard = self.write_lock.lock();
        self.persist()
    }

    /// Shallow-merge `entries` into the root and persist
    pub fn put_all(&self, entries: Tree) {
        let _guard = self.write_lock.lock();
        self.store.merge(entries);
        self.persist_or_report();
    }

    /// Copy of the whole tree
    #[must_use]
    pub fn data(&self) -> Tree {
        self.store.to_map()
    }

    /// The underlying store, for sizes and entry sets
    #[inline]
    #[must_use]
    pub fn store(&self) -> &PathKeyStore {
        &self.store
    }

    /// Look up several paths at once
    #[must_use]
    pub fn get_all(&self, paths: &[&str]) -> Vec<Option<Value>> {
        paths.iter().map(|path| self.store.get(path)).collect()
    }

    /// Remove several paths with a single write
    pub fn remove_all(&self, paths: &[&str]) {
        let _guard = self.write_lock.lock();
        let removed = paths
            .iter()
            .fold(false, |any, path| self.store.remove(path) || any);
        if removed {
            self.persist_or_report();
        }
    }

    /// Insert every leaf of `defaults` whose path is not already present
    ///
    /// Writes once, and only if something was added.
    pub fn add_defaults_from_tree(&self, defaults: &Tree) {
        let _guard = self.write_lock.lock();
        let mut added = 0_usize;
        for (path, value) in PathKeyStore::from_tree(defaults.clone()).entry_set() {
            if !self.store.contains_key(&path) {
                self.store.insert(&path, value);
                added += 1;
            }
        }
        if added > 0 {
            debug!(path = %self.path.display(), added, "added default entries");
            self.persist_or_report();
        }
    }

    /// [`add_defaults_from_tree`](Self::add_defaults_from_tree) for a plain
    /// map
    pub fn add_defaults_from_map(&self, defaults: IndexMap<String, Value>) {
        self.add_defaults_from_tree(&Tree::from(defaults));
    }

    /// Remove everything and persist
    pub fn clear(&self) {
        let _guard = self.write_lock.lock();
        self.store.clear();
        self.persist_or_report();
    }

    /// Replace text in the file and reload it
    ///
    /// # Errors
    /// The file cannot be read, written or decoded afterwards. The tree is
    /// unchanged if the replaced text does not decode.
    pub fn replace_text(&self, target: &str, replacement: &str) -> ConfigResult<()> {
        let _guard = self.write_lock.lock();
        let text = fs::read_to_string(&self.path).map_err(|e| ConfigError::io_error(&self.path, e))?;
        fs::write(&self.path, text.replace(target, replacement))
            .map_err(|e| ConfigError::io_error(&self.path, e))?;
        let tree = self.read_tree()?;
        self.store.load(tree);
        Ok(())
    }

    /// View of the subtree at `prefix`
    #[must_use]
    pub fn section(&self, prefix: &str) -> ConfigSection<'_> {
        ConfigSection::new(self, prefix)
    }

    /// File name including extension
    #[must_use]
    pub fn name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// Absolute path of the backing file
    #[inline]
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.path
    }

    #[inline]
    #[must_use]
    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Registry shared by this file and its sections
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<SerializerRegistry> {
        &self.registry
    }

    fn codec(&self) -> &'static dyn ConfigCodec {
        self.file_type.codec()
    }

    fn read_tree(&self) -> ConfigResult<Tree> {
        let text = fs::read_to_string(&self.path).map_err(|e| ConfigError::io_error(&self.path, e))?;
        self.codec()
            .decode(&text)
            .map_err(|e| ConfigError::codec_error(&self.path, e))
    }

    /// Caller holds `write_lock`
    fn persist(&self) -> ConfigResult<()> {
        let text = self
            .codec()
            .encode(&self.store.snapshot())
            .map_err(|e| ConfigError::codec_error(&self.path, e))?;
        fs::write(&self.path, text).map_err(|e| ConfigError::io_error(&self.path, e))?;
        debug!(path = %self.path.display(), "persisted configuration");
        Ok(())
    }

    fn persist_or_report(&self) {
        if let Err(error) = self.persist() {
            self.report(&error);
        }
    }

    fn report(&self, error: &ConfigError) {
        (self.error_handler)(error);
    }
}

impl Configuration for ConfigFile {
    fn get_value(&self, path: &str) -> Option<Value> {
        self.store.get(path)
    }

    fn contains(&self, path: &str) -> bool {
        self.store.contains_key(path)
    }

    fn set_value(&self, path: &str, value: Value) {
        let _guard = self.write_lock.lock();
        self.store.insert(path, value);
        self.persist_or_report();
    }

    fn remove(&self, path: &str) -> bool {
        let _guard = self.write_lock.lock();
        let removed = self.store.remove(path);
        if removed {
            self.persist_or_report();
        }
        removed
    }

    fn single_layer_key_set(&self) -> IndexSet<String> {
        self.store.single_layer_key_set()
    }

    fn single_layer_key_set_at(&self, path: &str) -> IndexSet<String> {
        self.store.single_layer_key_set_at(path)
    }

    fn key_set(&self) -> IndexSet<String> {
        self.store.key_set()
    }

    fn key_set_at(&self, path: &str) -> IndexSet<String> {
        self.store.key_set_at(path)
    }

    fn serializers(&self) -> &SerializerRegistry {
        &self.registry
    }
}

impl std::fmt::Debug for ConfigFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigFile")
            .field("path", &self.path)
            .field("file_type", &self.file_type)
            .field("entries", &self.store.single_layer_size())
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ConfigFile {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for ConfigFile {}

impl PartialOrd for ConfigFile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordered by file path
impl Ord for ConfigFile {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path.cmp(&other.path)
    }
}

fn absolute(path: PathBuf) -> ConfigResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().map_err(|e| ConfigError::io_error(&path, e))?;
    Ok(cwd.join(path))
}

/// `true` if the file did not exist before
fn create_file(path: &Path) -> ConfigResult<bool> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConfigError::io_error(parent, e))?;
    }
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => {
            debug!(path = %path.display(), "created configuration file");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(ConfigError::io_error(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn named_replaces_extension() {
        let dir = TempDir::new().unwrap();
        let file = ConfigFile::named(dir.path(), "server.yml", FileType::Toml)
            .build()
            .unwrap();
        assert_eq!(file.name(), "server.toml");
        assert_eq!(file.file_type(), FileType::Toml);
        assert!(file.file_path().is_absolute());
    }

    #[test]
    fn build_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/app.json");
        let file = ConfigFile::open(&path).unwrap();
        assert!(path.exists());
        assert!(file.store().is_empty());
    }

    #[test]
    fn unknown_extension_fails() {
        let dir = TempDir::new().unwrap();
        let err = ConfigFile::open(dir.path().join("app.ini")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownFileType(_)));
    }

    #[test]
    fn explicit_type_overrides_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.conf");
        let file = ConfigFile::toml(&path).unwrap();
        file.set("a.b", 1);
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[a]\nb = 1");
    }

    #[test]
    fn files_order_by_path() {
        let dir = TempDir::new().unwrap();
        let a = ConfigFile::open(dir.path().join("a.json")).unwrap();
        let b = ConfigFile::open(dir.path().join("b.json")).unwrap();
        assert!(a < b);
        assert_ne!(a, b);
    }
}
