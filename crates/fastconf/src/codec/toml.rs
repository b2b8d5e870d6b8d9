//! TOML document codec
//!
//! TOML has no null: `Null` entries of a table are left out of the output,
//! and a `Null` inside an array cannot be encoded at all. Datetimes are read
//! as their string form.

use crate::codec::ConfigCodec;
use crate::error::CodecError;
use fastconf_tree::{Tree, Value};
use toml::{Table, Value as TomlValue};

/// TOML codec
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlCodec;

impl ConfigCodec for TomlCodec {
    fn decode(&self, text: &str) -> Result<Tree, CodecError> {
        let table: Table = text.parse()?;
        Ok(tree_from_table(table))
    }

    fn encode(&self, tree: &Tree) -> Result<String, CodecError> {
        let table = table_from_tree(tree)?;
        Ok(toml::to_string(&table)?)
    }

    fn extensions(&self) -> &[&str] {
        &["toml"]
    }
}

fn tree_from_table(table: Table) -> Tree {
    table
        .into_iter()
        .map(|(key, value)| (key, value_from_toml(value)))
        .collect()
}

fn value_from_toml(value: TomlValue) -> Value {
    match value {
        TomlValue::String(s) => Value::String(s),
        TomlValue::Integer(n) => Value::Integer(n),
        TomlValue::Float(f) => Value::Float(f),
        TomlValue::Boolean(b) => Value::Bool(b),
        TomlValue::Datetime(dt) => Value::String(dt.to_string()),
        TomlValue::Array(items) => Value::List(items.into_iter().map(value_from_toml).collect()),
        TomlValue::Table(table) => Value::Tree(tree_from_table(table)),
    }
}

fn table_from_tree(tree: &Tree) -> Result<Table, CodecError> {
    let mut table = Table::new();
    for (key, value) in tree {
        if let Some(encoded) = value_to_toml(value)? {
            table.insert(key.clone(), encoded);
        }
    }
    Ok(table)
}

/// `Ok(None)` for null
fn value_to_toml(value: &Value) -> Result<Option<TomlValue>, CodecError> {
    let encoded = match value {
        Value::Null => return Ok(None),
        Value::Bool(b) => TomlValue::Boolean(*b),
        Value::Integer(n) => TomlValue::Integer(*n),
        Value::Float(f) => TomlValue::Float(*f),
        Value::String(s) => TomlValue::String(s.clone()),
        Value::List(items) => TomlValue::Array(
            items
                .iter()
                .map(|item| {
                    value_to_toml(item)?.ok_or_else(|| {
                        CodecError::Unrepresentable("null inside a TOML array".to_string())
                    })
                })
                .collect::<Result<_, _>>()?,
        ),
        Value::Tree(tree) => TomlValue::Table(table_from_tree(tree)?),
    };
    Ok(Some(encoded))
}
