//! Testing utilities for fastconf workspace
//!
//! Shared test helpers, fixtures, and sample types.

#![allow(missing_docs)]

use fastconf::{
    ConfSerializable, ConfigError, ConfigFile, FileType, SerializeError, SerializerRegistry, Tree,
    Value,
};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Install a test subscriber honouring `RUST_LOG`; safe to call repeatedly
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Fresh directory plus a path for `file_name` inside it (file not created)
pub fn temp_config_path(file_name: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(file_name);
    (dir, path)
}

/// Open a new, empty config file of the given type in a fresh directory
pub fn open_temp(file_type: FileType) -> (TempDir, ConfigFile) {
    let (dir, path) = temp_config_path(&format!("test.{}", file_type.extension()));
    let file = ConfigFile::builder(path).file_type(file_type).build().unwrap();
    (dir, file)
}

/// Like [`open_temp`], sharing `registry`
pub fn open_temp_with_registry(
    file_type: FileType,
    registry: Arc<SerializerRegistry>,
) -> (TempDir, ConfigFile) {
    let (dir, path) = temp_config_path(&format!("test.{}", file_type.extension()));
    let file = ConfigFile::builder(path)
        .file_type(file_type)
        .registry(registry)
        .build()
        .unwrap();
    (dir, file)
}

/// Error handler that records every message it receives
pub fn recording_handler() -> (
    impl Fn(&ConfigError) + Send + Sync + 'static,
    Arc<Mutex<Vec<String>>>,
) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let handler = move |error: &ConfigError| sink.lock().push(error.to_string());
    (handler, seen)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Stores a [`Point`] as `{x, y}`
pub struct PointSerializer;

impl ConfSerializable for PointSerializer {
    type Target = Point;

    fn serialize(&self, value: &Point) -> Result<Value, SerializeError> {
        let tree: Tree = [("x", value.x), ("y", value.y)].into_iter().collect();
        Ok(Value::Tree(tree))
    }

    fn deserialize(&self, raw: &Value) -> Result<Point, SerializeError> {
        let coord = |name: &str| {
            raw.as_tree()
                .and_then(|tree| tree.get(name))
                .and_then(Value::as_i64)
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| SerializeError::rejected::<Point>(format!("missing {name} in {raw}")))
        };
        Ok(Point::new(coord("x")?, coord("y")?))
    }
}

/// Registry with [`PointSerializer`] registered
pub fn registry_with_point() -> Arc<SerializerRegistry> {
    let registry = SerializerRegistry::new();
    registry.register_serializable(PointSerializer);
    Arc::new(registry)
}

/// Sample enum for enum getters
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display)]
pub enum Mode {
    Fast,
    Safe,
    Balanced,
}

/// `{"server": {"host": "localhost", "port": 8080}, "debug": true}`
pub fn sample_tree() -> Tree {
    let server: Tree = [
        ("host", Value::from("localhost")),
        ("port", Value::Integer(8080)),
    ]
    .into_iter()
    .collect();
    [("server", Value::Tree(server)), ("debug", Value::Bool(true))]
        .into_iter()
        .collect()
}
