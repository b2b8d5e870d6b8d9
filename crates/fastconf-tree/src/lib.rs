//! fastconf Tree
//!
//! Dotted-path addressed configuration tree.
//!
//! # Core Concepts
//!
//! - [`Value`]: Tagged union of storable values (scalars, lists, branches)
//! - [`Tree`]: Insertion-ordered, copy-on-write branch node
//! - [`ConfigPath`]: `.`-separated path into a tree
//! - [`PathKeyStore`]: Owner of one root tree; get/insert/remove/flatten
//!
//! # Example
//!
//! ```rust
//! use fastconf_tree::{PathKeyStore, Value};
//!
//! let store = PathKeyStore::new();
//! store.insert("a.b", 1);
//! store.insert("a.b.c", 2);
//!
//! // The scalar at `a.b` was replaced by a branch
//! assert_eq!(store.get("a.b.c"), Some(Value::Integer(2)));
//!
//! // Removing the last leaf prunes the now-empty branch chain
//! store.remove("a.b.c");
//! assert!(!store.contains_key("a"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod path;
mod store;
mod value;

pub use path::{ConfigPath, PathError};
pub use store::PathKeyStore;
pub use value::{Tree, Value};

/// Re-exported so callers can name key-set types without a direct dependency
pub use indexmap::{IndexMap, IndexSet};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn json_round_trip_through_store() {
        let json = serde_json::json!({
            "server": {"host": "localhost", "ports": [80, 443]},
            "debug": true
        });
        let Value::Tree(tree) = Value::from_json(json.clone()) else {
            panic!("object should convert to a tree");
        };

        let store = PathKeyStore::from_tree(tree);
        assert_eq!(store.get("server.host"), Some(Value::from("localhost")));
        assert_eq!(store.to_map().to_json(), json);
    }

    #[test]
    fn prefixed_paths_address_the_same_node() {
        let store = PathKeyStore::new();
        let section = ConfigPath::parse("db");
        store.insert(&section.resolve("pool.size").to_string(), 8);
        assert_eq!(store.get("db.pool.size"), Some(Value::Integer(8)));
    }
}
