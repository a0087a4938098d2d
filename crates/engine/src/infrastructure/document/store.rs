//! In-memory, path-addressed document store.
//!
//! Documents live at slash-separated paths (`packages/core`,
//! `packages/core/versions/1.0.0`). A collection is the set of documents one
//! segment below a path. Each document remembers the order it was inserted
//! in, which is the store's natural listing order.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub type Document = Map<String, Value>;

#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    data: Document,
}

/// Snapshot view of one document inside a collection listing.
#[derive(Debug, Clone, Copy)]
pub struct Listed<'a> {
    pub path: &'a str,
    pub seq: u64,
    pub data: &'a Document,
}

/// The documents themselves. Only reachable through a [`DocumentStore`] lock.
#[derive(Debug, Default)]
pub struct Documents {
    entries: BTreeMap<String, Entry>,
    next_seq: u64,
}

impl Documents {
    pub fn get(&self, path: &str) -> Option<&Document> {
        self.entries.get(path).map(|e| &e.data)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut Document> {
        self.entries.get_mut(path).map(|e| &mut e.data)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Insert a new document. Returns false, changing nothing, if the path is taken.
    pub fn create(&mut self, path: impl Into<String>, data: Document) -> bool {
        let path = path.into();
        if self.entries.contains_key(&path) {
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(path, Entry { seq, data });
        true
    }

    /// Move a document, keeping its insertion order. Returns false, changing
    /// nothing, if the source is missing or the destination is taken.
    pub fn rename(&mut self, from: &str, to: impl Into<String>) -> bool {
        let to = to.into();
        if from == to {
            return self.entries.contains_key(from);
        }
        if self.entries.contains_key(&to) {
            return false;
        }
        match self.entries.remove(from) {
            Some(entry) => {
                self.entries.insert(to, entry);
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, path: &str) -> bool {
        self.entries.remove(path).is_some()
    }

    /// Delete a document and every document nested below it.
    pub fn delete_tree(&mut self, path: &str) -> usize {
        let nested = format!("{path}/");
        let before = self.entries.len();
        self.entries
            .retain(|key, _| key != path && !key.starts_with(&nested));
        before - self.entries.len()
    }

    /// Documents directly inside `collection`, in path order.
    pub fn list(&self, collection: &str) -> Vec<Listed<'_>> {
        let prefix = format!("{collection}/");
        self.entries
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter(|(key, _)| !key[prefix.len()..].contains('/'))
            .map(|(key, entry)| Listed {
                path: key.as_str(),
                seq: entry.seq,
                data: &entry.data,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared handle to the documents, guarded by a single reader/writer lock.
#[derive(Debug, Default)]
pub struct DocumentStore {
    inner: RwLock<Documents>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Documents> {
        self.inner.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Documents> {
        self.inner.write().await
    }
}
