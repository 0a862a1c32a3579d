//! In-memory document store
//!
//! Used by tests and headless embedders. Saves can be made to fail, per
//! document or globally, to exercise persistence diagnostics.

use async_trait::async_trait;
use beatnest_core::{DocumentName, DocumentStore, PersistenceError};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Inner {
    docs: HashMap<DocumentName, serde_json::Value>,
    save_counts: HashMap<DocumentName, usize>,
    failing: HashSet<DocumentName>,
    fail_all: bool,
}

/// Document store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    inner: Mutex<Inner>,
}

impl MemoryDocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a document without counting it as a save
    pub fn insert(&self, name: DocumentName, value: serde_json::Value) {
        self.lock().docs.insert(name, value);
    }

    /// Current content of a document
    pub fn get(&self, name: DocumentName) -> Option<serde_json::Value> {
        self.lock().docs.get(&name).cloned()
    }

    /// Number of successful saves of a document
    pub fn save_count(&self, name: DocumentName) -> usize {
        self.lock().save_counts.get(&name).copied().unwrap_or(0)
    }

    /// Make every save fail (or succeed again)
    pub fn fail_saves(&self, fail: bool) {
        self.lock().fail_all = fail;
    }

    /// Make saves of one document fail
    pub fn fail_saves_for(&self, name: DocumentName) {
        self.lock().failing.insert(name);
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn load(&self, name: DocumentName) -> Result<Option<serde_json::Value>, PersistenceError> {
        Ok(self.get(name))
    }

    async fn save(&self, name: DocumentName, value: serde_json::Value) -> Result<(), PersistenceError> {
        let mut inner = self.lock();
        if inner.fail_all || inner.failing.contains(&name) {
            return Err(PersistenceError::backend(name, "save rejected by memory store"));
        }

        inner.docs.insert(name, value);
        *inner.save_counts.entry(name).or_insert(0) += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn counts_saves_but_not_seeds() {
        let store = MemoryDocumentStore::new();
        store.insert(DocumentName::Favorites, json!([]));
        assert_eq!(store.save_count(DocumentName::Favorites), 0);

        store.save(DocumentName::Favorites, json!([1])).await.unwrap();
        assert_eq!(store.save_count(DocumentName::Favorites), 1);
        assert_eq!(store.get(DocumentName::Favorites), Some(json!([1])));
    }

    #[tokio::test]
    async fn injected_failure_keeps_previous_content() {
        let store = MemoryDocumentStore::new();
        store.save(DocumentName::History, json!(["a"])).await.unwrap();
        store.fail_saves_for(DocumentName::History);

        let err = store.save(DocumentName::History, json!(["b"])).await.unwrap_err();
        assert_eq!(err.document(), DocumentName::History);
        assert_eq!(store.get(DocumentName::History), Some(json!(["a"])));

        // Other documents unaffected
        store.save(DocumentName::Favorites, json!([])).await.unwrap();
    }
}
