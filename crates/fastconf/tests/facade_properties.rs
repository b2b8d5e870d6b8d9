//! Behaviour of the typed facade over a real file

use fastconf::prelude::*;
use fastconf::{ConfigError, IndexMap};
use fastconf_test_utils::{open_temp, open_temp_with_registry, registry_with_point, Mode, Point};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_nested_insert_flattens() {
    let (_dir, file) = open_temp(FileType::Json);
    file.set("a.b.c", 5);

    assert_eq!(file.key_set().into_iter().collect::<Vec<_>>(), vec!["a.b.c"]);
    assert_eq!(file.single_layer_key_set().into_iter().collect::<Vec<_>>(), vec!["a"]);
}

#[test]
fn test_scalar_replaced_by_branch() {
    let (_dir, file) = open_temp(FileType::Json);
    file.set("a.b", 1);
    file.set("a.b.c", 2);

    assert_eq!(file.get_int("a.b.c"), 2);
    assert_eq!(file.key_set_at("a.b").into_iter().collect::<Vec<_>>(), vec!["c"]);
}

#[test]
fn test_remove_prunes_and_is_idempotent() {
    let (_dir, file) = open_temp(FileType::Json);
    file.set("x.y", 1);

    assert!(file.remove("x.y"));
    assert!(!file.contains("x"));
    assert!(file.key_set().is_empty());

    assert!(!file.remove("x.y"));
    assert!(file.key_set().is_empty());
}

#[test]
fn test_get_or_set_default_persists() {
    let (_dir, file) = open_temp(FileType::Json);

    assert_eq!(file.get_or_set_default("missing", 42), 42);
    assert_eq!(file.get_or("missing", 0), 42);

    let reopened = ConfigFile::open(file.file_path()).unwrap();
    assert_eq!(reopened.get_or("missing", 0), 42);
}

#[test]
fn test_get_or_set_default_keeps_existing() {
    let (_dir, file) = open_temp(FileType::Json);
    file.set("n", 7);

    assert_eq!(file.get_or_set_default("n", 42), 7);
    assert_eq!(file.get_int("n"), 7);
}

#[test]
fn test_set_default_only_when_absent() {
    let (_dir, file) = open_temp(FileType::Json);
    file.set_default("k", "first");
    file.set_default("k", "second");

    assert_eq!(file.get_string("k"), "first");
}

#[test]
fn test_get_falls_back_on_mismatch() {
    let (_dir, file) = open_temp(FileType::Json);
    file.set("list", vec![1, 2]);
    file.set("text", "abc");
    file.set("num", "17");
    file.set("ratio", 2);

    assert_eq!(file.get_or("list", 9_i64), 9);
    assert_eq!(file.get_int("text"), 0);
    assert_eq!(file.get_int("num"), 17);
    assert_eq!(file.get_double("ratio"), 2.0);
    assert_eq!(file.get_string("ratio"), "2");
    assert_eq!(file.get_or("absent", 5_u8), 5);
}

#[test]
fn test_null_counts_as_absent() {
    let (_dir, file) = open_temp(FileType::Json);
    file.set("nothing", Value::Null);

    assert!(file.contains("nothing"));
    assert_eq!(file.get_or("nothing", 3), 3);
    assert_eq!(file.get_enum::<Mode>("nothing").unwrap(), None);
}

#[test]
fn test_list_and_map_getters() {
    let (_dir, file) = open_temp(FileType::Toml);
    file.set("names", vec!["a", "b"]);
    file.set("ids", vec![1, 2, 300]);
    file.set("limits.cpu", 2);
    file.set("limits.mem", 512);

    assert_eq!(file.get_string_list("names"), vec!["a", "b"]);
    assert_eq!(file.get_long_list("ids"), vec![1, 2, 300]);
    // 300 does not fit i8, so the whole list falls back
    assert!(file.get_byte_list("ids").is_empty());
    assert_eq!(file.get_list("names").len(), 2);
    assert_eq!(file.get_map("limits").len(), 2);
    assert!(file.get_map("names").is_empty());
}

#[test]
fn test_get_or_set_collections_write_empty() {
    let (_dir, file) = open_temp(FileType::Json);

    let list: Vec<String> = file.get_or_set_list("tags");
    let map: IndexMap<String, i64> = file.get_or_set_map("weights");

    assert!(list.is_empty());
    assert!(map.is_empty());
    assert_eq!(file.get_value("tags"), Some(Value::List(Vec::new())));
    assert_eq!(file.get_value("weights"), Some(Value::Tree(Tree::new())));
}

#[test]
fn test_enum_round_trip() {
    let (_dir, file) = open_temp(FileType::Json);
    file.set_enum("mode", &Mode::Balanced);

    assert_eq!(file.get_enum::<Mode>("mode").unwrap(), Some(Mode::Balanced));
}

#[test]
fn test_enum_invalid_or_absent() {
    let (_dir, file) = open_temp(FileType::Json);
    file.set("mode", "balanced");
    file.set("count", 3);

    assert!(matches!(
        file.get_enum::<Mode>("mode"),
        Err(ConfigError::InvalidEnumValue { .. })
    ));
    assert!(matches!(
        file.get_enum::<Mode>("count"),
        Err(ConfigError::InvalidEnumValue { .. })
    ));
    assert_eq!(file.get_enum::<Mode>("absent").unwrap(), None);
}

#[test]
fn test_serializable_round_trip() {
    let (_dir, file) = open_temp_with_registry(FileType::Json, registry_with_point());

    file.set_serializable("p", &Point::new(1, 2)).unwrap();

    assert_eq!(file.get_serializable::<Point>("p").unwrap(), Some(Point::new(1, 2)));
    assert_eq!(file.get_int("p.x"), 1);
}

#[test]
fn test_serializable_absent_is_none() {
    let (_dir, file) = open_temp(FileType::Json);
    assert_eq!(file.get_serializable::<Point>("p").unwrap(), None);
}

#[test]
fn test_serializable_without_registration_fails() {
    let (_dir, file) = open_temp(FileType::Json);
    file.set("p.x", 1);

    let err = file.get_serializable::<Point>("p").unwrap_err();
    assert!(matches!(err, ConfigError::Serialize(ref e) if e.is_missing_serializer()));

    assert!(file.set_serializable("q", &Point::new(0, 0)).is_err());
    assert!(!file.contains("q"));
}

#[test]
fn test_serializable_list() {
    let (_dir, file) = open_temp_with_registry(FileType::Toml, registry_with_point());
    let points = [Point::new(1, 2), Point::new(3, 4)];

    file.set_serializable_list("path", &points).unwrap();

    assert_eq!(
        file.get_serializable_list::<Point>("path").unwrap(),
        Some(points.to_vec())
    );
    file.set("scalar", 1);
    assert_eq!(file.get_serializable_list::<Point>("scalar").unwrap(), Some(Vec::new()));
    assert_eq!(file.get_serializable_list::<Point>("absent").unwrap(), None);
}

fn segment() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

fn dotted_path() -> impl Strategy<Value = String> {
    proptest::collection::vec(segment(), 1..4).prop_map(|segments| segments.join("."))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_set_then_get_survives_reopen(path in dotted_path(), n in any::<i64>()) {
        let (_dir, file) = open_temp(FileType::Json);
        file.set(&path, n);

        prop_assert_eq!(file.get_or(&path, n.wrapping_add(1)), n);
        let reopened = ConfigFile::open(file.file_path()).unwrap();
        prop_assert_eq!(reopened.get_value(&path), Some(Value::Integer(n)));
    }

    #[test]
    fn prop_toml_reopen_keeps_key_set(
        entries in proptest::collection::vec((dotted_path(), any::<bool>()), 1..8)
    ) {
        let (_dir, file) = open_temp(FileType::Toml);
        for (path, flag) in &entries {
            file.set(path, *flag);
        }

        let reopened = ConfigFile::open(file.file_path()).unwrap();
        prop_assert_eq!(reopened.key_set(), file.key_set());
        for key in file.key_set() {
            prop_assert_eq!(reopened.get_value(&key), file.get_value(&key));
        }
    }
}
