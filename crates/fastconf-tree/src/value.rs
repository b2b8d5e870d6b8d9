//! Storable value model
//!
//! [`Value`] is the closed set of things a configuration tree can hold and
//! [`Tree`] is its branch node: an insertion-ordered mapping from segment
//! name to [`Value`].

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// A value stored in the configuration tree
///
/// Every recursive traversal matches on this enum, so adding a variant is a
/// compile error everywhere a case would be missed.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Explicit null (JSON `null`)
    #[default]
    Null,

    /// Boolean scalar
    Bool(bool),

    /// Signed integer scalar
    Integer(i64),

    /// Floating point scalar
    Float(f64),

    /// String scalar
    String(String),

    /// Ordered list; never expanded by key flattening
    List(Vec<Value>),

    /// Nested branch
    Tree(Tree),
}

impl Value {
    /// Short name of the variant, for diagnostics
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Tree(_) => "tree",
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_tree(&self) -> bool {
        matches!(self, Self::Tree(_))
    }

    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_tree(&self) -> Option<&Tree> {
        match self {
            Self::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Convert from a parsed JSON document
    ///
    /// Numbers that fit `i64` become [`Value::Integer`], everything else
    /// becomes [`Value::Float`].
    #[must_use]
    pub fn from_json(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Self::Integer(i),
                (None, Some(f)) => Self::Float(f),
                (None, None) => Self::Null,
            },
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(items) => Self::List(items.into_iter().map(Self::from_json).collect()),
            JsonValue::Object(map) => Self::Tree(Tree::from_json_map(map)),
        }
    }

    /// Convert into a JSON document
    ///
    /// Non-finite floats have no JSON form and encode as `null`.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Integer(n) => JsonValue::Number((*n).into()),
            Self::Float(f) => serde_json::Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
            Self::String(s) => JsonValue::String(s.clone()),
            Self::List(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
            Self::Tree(tree) => tree.to_json(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

macro_rules! value_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(n: $ty) -> Self {
                    Self::Integer(i64::from(n))
                }
            }
        )*
    };
}

value_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    #[inline]
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f32> for Value {
    #[inline]
    fn from(f: f32) -> Self {
        Self::Float(f64::from(f))
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<String> for Value {
    #[inline]
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<Tree> for Value {
    #[inline]
    fn from(tree: Tree) -> Self {
        Self::Tree(tree)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<V: Into<Value>> From<IndexMap<String, V>> for Value {
    fn from(map: IndexMap<String, V>) -> Self {
        Self::Tree(map.into_iter().collect())
    }
}

/// Branch node of the configuration tree
///
/// Cloning a `Tree` is O(1): the entries sit behind a shared handle and are
/// copied on first write (`Arc::make_mut`), so a mutation never shows
/// through another clone. Children are owned by value, so the structure is
/// a strict ownership tree with no cycles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree(Arc<IndexMap<String, Value>>);

impl Tree {
    /// Create empty tree
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Mutable access to a child; detaches this node from other clones
    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries_mut().get_mut(key)
    }

    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert or replace a child
    ///
    /// Replacing keeps the key's original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries_mut().insert(key.into(), value.into())
    }

    /// Remove a child, preserving the order of the remaining keys
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        if !self.0.contains_key(key) {
            return None;
        }
        self.entries_mut().shift_remove(key)
    }

    pub fn clear(&mut self) {
        if !self.0.is_empty() {
            self.entries_mut().clear();
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Entry map for in-place edits
    #[inline]
    pub(crate) fn entries_mut(&mut self) -> &mut IndexMap<String, Value> {
        Arc::make_mut(&mut self.0)
    }

    /// Build from a JSON object
    #[must_use]
    pub fn from_json_map(map: serde_json::Map<String, JsonValue>) -> Self {
        map.into_iter().map(|(k, v)| (k, Value::from_json(v))).collect()
    }

    /// Convert into a JSON object, preserving key order
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(self.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
    }

    /// Copy entries out into a plain map
    #[must_use]
    pub fn to_index_map(&self) -> IndexMap<String, Value> {
        (*self.0).clone()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Tree {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(Arc::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect()))
    }
}

impl From<IndexMap<String, Value>> for Tree {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self(Arc::new(map))
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
