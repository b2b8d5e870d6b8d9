//! File backing: load, persist, reload and failure reporting

use fastconf::prelude::*;
use fastconf::{ConfigCodec, ConfigError, IndexMap, PathKeyStore};
use fastconf_test_utils::{init_tracing, open_temp, recording_handler, sample_tree, temp_config_path};
use pretty_assertions::assert_eq;
use std::fs;
use std::sync::Arc;
use std::thread;

fn on_disk(file: &ConfigFile) -> Tree {
    file.file_type()
        .codec()
        .decode(&fs::read_to_string(file.file_path()).unwrap())
        .unwrap()
}

#[test]
fn test_set_persists_before_returning() {
    init_tracing();
    let (_dir, file) = open_temp(FileType::Json);

    file.set("server.port", 8080);

    let disk = PathKeyStore::from_tree(on_disk(&file));
    assert_eq!(disk.get("server.port"), Some(Value::Integer(8080)));
}

#[test]
fn test_json_written_with_three_space_indent() {
    let (_dir, file) = open_temp(FileType::Json);
    file.set("a.b", true);

    let text = fs::read_to_string(file.file_path()).unwrap();
    assert_eq!(text, "{\n   \"a\": {\n      \"b\": true\n   }\n}\n");
}

#[test]
fn test_toml_file_survives_reopen() {
    let (_dir, path) = temp_config_path("app.toml");
    {
        let file = ConfigFile::open(&path).unwrap();
        assert_eq!(file.file_type(), FileType::Toml);
        file.set("db.host", "localhost");
        file.set("db.port", 5432);
        file.set("name", "svc");
    }

    let reopened = ConfigFile::open(&path).unwrap();
    assert_eq!(reopened.get_string("db.host"), "localhost");
    assert_eq!(reopened.get_int("db.port"), 5432);
    assert_eq!(reopened.get_string("name"), "svc");
}

#[test]
fn test_defaults_written_to_new_file() {
    let (_dir, path) = temp_config_path("app.json");
    let file = ConfigFile::builder(&path)
        .defaults(r#"{"greeting": "hello"}"#)
        .build()
        .unwrap();

    assert_eq!(file.get_string("greeting"), "hello");
    assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"greeting": "hello"}"#);
}

#[test]
fn test_defaults_written_to_empty_existing_file() {
    let (_dir, path) = temp_config_path("app.json");
    fs::write(&path, "").unwrap();

    let file = ConfigFile::builder(&path)
        .defaults(r#"{"greeting": "hello"}"#)
        .build()
        .unwrap();
    assert_eq!(file.get_string("greeting"), "hello");
}

#[test]
fn test_defaults_ignored_for_populated_file() {
    let (_dir, path) = temp_config_path("app.json");
    fs::write(&path, r#"{"greeting": "hi"}"#).unwrap();

    let file = ConfigFile::builder(&path)
        .defaults(r#"{"greeting": "hello"}"#)
        .build()
        .unwrap();
    assert_eq!(file.get_string("greeting"), "hi");
}

#[test]
fn test_reload_picks_up_external_edits() {
    let (_dir, file) = open_temp(FileType::Json);
    file.set("old", 1);

    fs::write(file.file_path(), r#"{"new": {"key": 2}}"#).unwrap();
    file.reload();

    assert!(!file.contains("old"));
    assert_eq!(file.get_long("new.key"), 2);
}

#[test]
fn test_failed_reload_keeps_previous_tree() {
    let (handler, seen) = recording_handler();
    let (_dir, path) = temp_config_path("app.json");
    let file = ConfigFile::builder(&path).error_handler(handler).build().unwrap();
    file.set("kept", true);

    fs::write(&path, "{ not json").unwrap();
    file.reload();

    assert!(file.get_boolean("kept"));
    assert_eq!(seen.lock().len(), 1);
    assert!(matches!(file.try_reload(), Err(ConfigError::Codec { .. })));
}

#[test]
fn test_failed_first_load_starts_empty() {
    let (handler, seen) = recording_handler();
    let (_dir, path) = temp_config_path("app.toml");
    fs::write(&path, "= broken").unwrap();

    let file = ConfigFile::builder(&path).error_handler(handler).build().unwrap();

    assert!(file.store().is_empty());
    assert_eq!(seen.lock().len(), 1);
}

#[test]
fn test_failed_persist_keeps_mutation() {
    let (handler, seen) = recording_handler();
    let (dir, path) = temp_config_path("gone/app.json");
    let file = ConfigFile::builder(&path).error_handler(handler).build().unwrap();

    fs::remove_dir_all(dir.path().join("gone")).unwrap();
    file.set("still.here", 1);

    assert_eq!(file.get_int("still.here"), 1);
    assert_eq!(seen.lock().len(), 1);
    assert!(seen.lock()[0].contains("app.json"));
}

#[test]
fn test_put_all_is_shallow() {
    let (_dir, file) = open_temp(FileType::Json);
    file.set("server.timeout", 30);

    file.put_all(sample_tree());

    // `server` was replaced wholesale
    assert!(!file.contains("server.timeout"));
    assert_eq!(file.get_string("server.host"), "localhost");
    assert_eq!(on_disk(&file), sample_tree());
}

#[test]
fn test_data_is_detached_copy() {
    let (_dir, file) = open_temp(FileType::Json);
    file.put_all(sample_tree());

    let mut data = file.data();
    data.insert("debug", false);

    assert!(file.get_boolean("debug"));
}

#[test]
fn test_get_all_and_remove_all() {
    let (_dir, file) = open_temp(FileType::Json);
    file.put_all(sample_tree());

    assert_eq!(
        file.get_all(&["debug", "server.port", "missing"]),
        vec![Some(Value::Bool(true)), Some(Value::Integer(8080)), None]
    );

    file.remove_all(&["server.host", "server.port", "missing"]);

    assert_eq!(file.single_layer_key_set().into_iter().collect::<Vec<_>>(), vec!["debug"]);
    assert_eq!(on_disk(&file).keys().collect::<Vec<_>>(), vec!["debug"]);
}

#[test]
fn test_add_defaults_keeps_existing_leaves() {
    let (_dir, file) = open_temp(FileType::Json);
    file.set("server.port", 9000);

    file.add_defaults_from_tree(&sample_tree());

    assert_eq!(file.get_int("server.port"), 9000);
    assert_eq!(file.get_string("server.host"), "localhost");
    assert!(file.get_boolean("debug"));
}

#[test]
fn test_add_defaults_from_map() {
    let (_dir, file) = open_temp(FileType::Toml);
    let mut defaults = IndexMap::new();
    defaults.insert("retries".to_string(), Value::Integer(3));

    file.add_defaults_from_map(defaults);

    assert_eq!(file.get_int("retries"), 3);
    assert_eq!(on_disk(&file).get("retries"), Some(&Value::Integer(3)));
}

#[test]
fn test_clear_empties_file() {
    let (_dir, file) = open_temp(FileType::Json);
    file.put_all(sample_tree());

    file.clear();

    assert!(file.key_set().is_empty());
    assert!(on_disk(&file).is_empty());
}

#[test]
fn test_replace_text_reloads() {
    let (_dir, file) = open_temp(FileType::Json);
    file.set("host", "staging.local");

    file.replace_text("staging", "prod").unwrap();

    assert_eq!(file.get_string("host"), "prod.local");
}

#[test]
fn test_concurrent_writers_all_reach_disk() {
    let (_dir, file) = open_temp(FileType::Json);
    let file = Arc::new(file);

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let file = Arc::clone(&file);
            thread::spawn(move || {
                for i in 0..10 {
                    file.set(&format!("t{t}.k{i}"), i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(file.store().size(), 80);
    let reopened = ConfigFile::open(file.file_path()).unwrap();
    assert_eq!(reopened.key_set(), file.key_set());
}
