//! In-memory document store for testing and development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::traits::store::DocumentStore;

type DocKey = (String, String);

/// In-process `(collection, document_id)` → JSON map.
///
/// `fail_next_reads` / `fail_next_writes` make the next N operations
/// fail with `Unavailable`, for driving the retry and graceful-
/// degradation paths in tests.
#[derive(Default)]
pub struct MemoryDocumentStore {
    docs: RwLock<HashMap<DocKey, Value>>,
    failing_reads: AtomicU32,
    failing_writes: AtomicU32,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` read operations fail.
    pub fn fail_next_reads(&self, n: u32) {
        self.failing_reads.store(n, Ordering::SeqCst);
    }

    /// Make the next `n` write operations fail.
    pub fn fail_next_writes(&self, n: u32) {
        self.failing_writes.store(n, Ordering::SeqCst);
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: &str) -> usize {
        self.docs
            .read()
            .unwrap()
            .keys()
            .filter(|(c, _)| c == collection)
            .count()
    }

    fn check(&self, counter: &AtomicU32) -> Result<(), StoreError> {
        // Saturating decrement; u32::MAX means "fail forever".
        let remaining = counter.load(Ordering::SeqCst);
        if remaining == 0 {
            return Ok(());
        }
        if remaining != u32::MAX {
            counter.store(remaining - 1, Ordering::SeqCst);
        }
        Err(StoreError::unavailable("injected store failure"))
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        self.check(&self.failing_reads)?;
        Ok(self
            .docs
            .read()
            .unwrap()
            .get(&(collection.to_string(), id.to_string()))
            .cloned())
    }

    async fn set(&self, collection: &str, id: &str, doc: &Value) -> Result<(), StoreError> {
        self.check(&self.failing_writes)?;
        self.docs
            .write()
            .unwrap()
            .insert((collection.to_string(), id.to_string()), doc.clone());
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, StoreError> {
        self.check(&self.failing_reads)?;
        let docs = self.docs.read().unwrap();
        let mut listed: Vec<(String, Value)> = docs
            .iter()
            .filter(|((c, _), _)| c == collection)
            .map(|((_, id), doc)| (id.clone(), doc.clone()))
            .collect();
        listed.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(listed)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.check(&self.failing_writes)?;
        self.docs
            .write()
            .unwrap()
            .remove(&(collection.to_string(), id.to_string()));
        Ok(())
    }
}
