//! Path-addressed configuration store
//!
//! Provides [`PathKeyStore`], the owner of one root [`Tree`] addressed with
//! dotted paths.
//!
//! # Consistency
//!
//! Mutations (`insert`, `remove`, `merge`, `clear`, `load`) serialize on a
//! single per-store mutex. Each one copies the root handle, edits the copy
//! (only nodes on the edited path are duplicated) and swaps it in. Readers
//! take the current root handle and traverse it without holding any lock,
//! so they never wait for a mutator.
//!
//! Reads are not linearizable against concurrent mutation: a reader may be
//! working on a root that a mutator is about to replace, and two successive
//! reads (say `contains_key` then `get`) may see different roots.

use crate::path::ConfigPath;
use crate::value::{Tree, Value};
use indexmap::IndexSet;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};

/// Dotted-path addressed configuration tree
///
/// # Example
/// ```
/// use fastconf_tree::{PathKeyStore, Value};
///
/// let store = PathKeyStore::new();
/// store.insert("server.port", 8080);
///
/// assert_eq!(store.get("server.port"), Some(Value::Integer(8080)));
/// assert!(store.contains_key("server"));
/// assert_eq!(store.key_set().into_iter().collect::<Vec<_>>(), vec!["server.port"]);
/// ```
#[derive(Debug, Default)]
pub struct PathKeyStore {
    root: RwLock<Tree>,
    mutation: Mutex<()>,
}

impl PathKeyStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create store owning an initial tree
    #[inline]
    #[must_use]
    pub fn from_tree(tree: Tree) -> Self {
        Self {
            root: RwLock::new(tree),
            mutation: Mutex::new(()),
        }
    }

    /// Current root handle (O(1), detached from later mutations)
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Tree {
        self.root.read().clone()
    }

    /// Plain nested snapshot of the whole tree, in insertion order
    #[inline]
    #[must_use]
    pub fn to_map(&self) -> Tree {
        self.snapshot()
    }

    /// Value at `path`, which may be a scalar, a list or a branch
    ///
    /// Absent keys and paths running through a non-tree value yield `None`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<Value> {
        let root = self.snapshot();
        lookup(&root, ConfigPath::parse(path).segments()).cloned()
    }

    /// True if every intermediate segment is a branch and the last one exists
    #[must_use]
    pub fn contains_key(&self, path: &str) -> bool {
        let root = self.snapshot();
        lookup(&root, ConfigPath::parse(path).segments()).is_some()
    }

    /// Write `value` at `path`, creating missing branches
    ///
    /// An intermediate segment that currently holds a scalar or list is
    /// replaced by a fresh branch; the previous value is discarded. The
    /// root path is not addressable and is ignored.
    pub fn insert(&self, path: &str, value: impl Into<Value>) {
        let path = ConfigPath::parse(path);
        if path.is_root() {
            debug!("ignoring insert at root path");
            return;
        }
        let value = value.into();
        self.mutate(|root| insert_at(root, path.segments(), value));
    }

    /// Remove the value at `path`, pruning branches left empty
    ///
    /// Returns `false` (and changes nothing) if the path is absent.
    pub fn remove(&self, path: &str) -> bool {
        let path = ConfigPath::parse(path);
        let _guard = self.mutation.lock();
        let mut next = self.snapshot();
        if lookup(&next, path.segments()).is_none() {
            return false;
        }
        remove_at(&mut next, path.segments());
        *self.root.write() = next;
        true
    }

    /// Shallow union at the root: each entry replaces the root entry wholesale
    pub fn merge(&self, entries: Tree) {
        self.mutate(|root| {
            for (key, value) in &entries {
                root.insert(key.clone(), value.clone());
            }
        });
    }

    /// Replace the whole tree
    pub fn load(&self, tree: Tree) {
        self.mutate(|root| *root = tree);
    }

    pub fn clear(&self) {
        self.mutate(Tree::clear);
    }

    /// Immediate child names of the root
    #[must_use]
    pub fn single_layer_key_set(&self) -> IndexSet<String> {
        self.snapshot().keys().cloned().collect()
    }

    /// Immediate child names of the branch at `path` (empty if not a branch)
    #[must_use]
    pub fn single_layer_key_set_at(&self, path: &str) -> IndexSet<String> {
        self.branch_at(path)
            .map(|branch| branch.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Fully-qualified dotted paths of every leaf
    #[must_use]
    pub fn key_set(&self) -> IndexSet<String> {
        let mut keys = IndexSet::new();
        flatten(&self.snapshot(), None, &mut |key, _| {
            keys.insert(key);
        });
        keys
    }

    /// Leaf paths below the branch at `path`, relative to it
    #[must_use]
    pub fn key_set_at(&self, path: &str) -> IndexSet<String> {
        let mut keys = IndexSet::new();
        if let Some(branch) = self.branch_at(path) {
            flatten(&branch, None, &mut |key, _| {
                keys.insert(key);
            });
        }
        keys
    }

    /// Every leaf as `(dotted path, value)`, depth first in insertion order
    #[must_use]
    pub fn entry_set(&self) -> Vec<(String, Value)> {
        let mut entries = Vec::new();
        flatten(&self.snapshot(), None, &mut |key, value| {
            entries.push((key, value.clone()));
        });
        entries
    }

    /// Leaves below the branch at `path`, keyed relative to it
    #[must_use]
    pub fn entry_set_at(&self, path: &str) -> Vec<(String, Value)> {
        let mut entries = Vec::new();
        if let Some(branch) = self.branch_at(path) {
            flatten(&branch, None, &mut |key, value| {
                entries.push((key, value.clone()));
            });
        }
        entries
    }

    /// Number of root entries
    #[must_use]
    pub fn single_layer_size(&self) -> usize {
        self.root.read().len()
    }

    /// Number of immediate children of the branch at `path`
    #[must_use]
    pub fn single_layer_size_at(&self, path: &str) -> usize {
        self.branch_at(path).map_or(0, |branch| branch.len())
    }

    /// Number of leaves in the whole tree
    #[must_use]
    pub fn size(&self) -> usize {
        count_leaves(&self.snapshot())
    }

    /// Number of leaves below the branch at `path`
    #[must_use]
    pub fn size_at(&self, path: &str) -> usize {
        self.branch_at(path).map_or(0, |branch| count_leaves(&branch))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.read().is_empty()
    }

    fn branch_at(&self, path: &str) -> Option<Tree> {
        let root = self.snapshot();
        match lookup(&root, ConfigPath::parse(path).segments()) {
            Some(Value::Tree(branch)) => Some(branch.clone()),
            _ => None,
        }
    }

    fn mutate<R>(&self, edit: impl FnOnce(&mut Tree) -> R) -> R {
        let _guard = self.mutation.lock();
        let mut next = self.snapshot();
        let out = edit(&mut next);
        *self.root.write() = next;
        out
    }
}

impl Clone for PathKeyStore {
    fn clone(&self) -> Self {
        Self::from_tree(self.snapshot())
    }
}

impl From<Tree> for PathKeyStore {
    fn from(tree: Tree) -> Self {
        Self::from_tree(tree)
    }
}

/// Walk `segments` from `node`; `None` on the root path
fn lookup<'a>(node: &'a Tree, segments: &[String]) -> Option<&'a Value> {
    match segments {
        [] => None,
        [leaf] => node.get(leaf),
        [head, rest @ ..] => match node.get(head)? {
            Value::Tree(branch) => lookup(branch, rest),
            _ => None,
        },
    }
}

fn insert_at(node: &mut Tree, segments: &[String], value: Value) {
    match segments {
        [] => {}
        [leaf] => {
            node.insert(leaf.clone(), value);
        }
        [head, rest @ ..] => {
            let slot = node
                .entries_mut()
                .entry(head.clone())
                .or_insert_with(|| Value::Tree(Tree::new()));
            if !slot.is_tree() {
                trace!(segment = %head, replaced = slot.type_name(), "overwriting leaf with branch");
                *slot = Value::Tree(Tree::new());
            }
            if let Value::Tree(branch) = slot {
                insert_at(branch, rest, value);
            }
        }
    }
}

/// Caller guarantees the path exists
fn remove_at(node: &mut Tree, segments: &[String]) {
    match segments {
        [] => {}
        [leaf] => {
            node.remove(leaf);
        }
        [head, rest @ ..] => {
            let emptied = match node.get_mut(head) {
                Some(Value::Tree(branch)) => {
                    remove_at(branch, rest);
                    branch.is_empty()
                }
                _ => false,
            };
            if emptied {
                trace!(segment = %head, "pruning empty branch");
                node.remove(head);
            }
        }
    }
}

/// Visit every leaf below `node` with its dotted path
///
/// Branches are descended into; lists are leaves. Empty branches
/// contribute nothing.
fn flatten(node: &Tree, prefix: Option<&str>, visit: &mut dyn FnMut(String, &Value)) {
    for (key, value) in node {
        let full = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        match value {
            Value::Tree(branch) => flatten(branch, Some(&full), visit),
            leaf => visit(full, leaf),
        }
    }
}

fn count_leaves(node: &Tree) -> usize {
    node.values()
        .map(|value| match value {
            Value::Tree(branch) => count_leaves(branch),
            _ => 1,
        })
        .sum()
}
