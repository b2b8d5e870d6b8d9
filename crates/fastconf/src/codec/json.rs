//! JSON document codec
//!
//! Output is pretty-printed with a three-space indent and keeps insertion
//! order.

use crate::codec::ConfigCodec;
use crate::error::CodecError;
use fastconf_tree::{Tree, Value};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

const INDENT: &[u8] = b"   ";

/// JSON codec
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl ConfigCodec for JsonCodec {
    fn decode(&self, text: &str) -> Result<Tree, CodecError> {
        // A freshly created file is empty
        if text.trim().is_empty() {
            return Ok(Tree::new());
        }

        let json: serde_json::Value = serde_json::from_str(text)?;
        match Value::from_json(json) {
            Value::Tree(tree) => Ok(tree),
            other => Err(CodecError::NotATable {
                found: other.type_name(),
            }),
        }
    }

    fn encode(&self, tree: &Tree) -> Result<String, CodecError> {
        let mut out = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
        tree.to_json().serialize(&mut serializer)?;
        out.push(b'\n');
        Ok(String::from_utf8(out)?)
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }
}
