//! Process-local document store.
//!
//! Backs tests and `--store memory` deployments. Documents live in a
//! two-level map (collection, then storage key) behind a single mutex, so
//! the uniqueness check inside [`MemoryStore::create`] is atomic with the
//! insert. Storage keys are Crockford-base32 ULIDs, matching the opaque,
//! store-assigned key contract of the real backend.

use super::DocumentStore;
use ferroid::{base32::Base32UlidExt, id::ULID};
use intake_core::{ApplicationRecord, Error, Result};
use parking_lot::Mutex;
use std::collections::HashMap;

type Collection = HashMap<String, ApplicationRecord>;

/// In-memory [`DocumentStore`] with store-level email uniqueness.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live documents in a collection. Test observability only.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .get(collection)
            .map_or(0, Collection::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, collection: &str, record: &ApplicationRecord) -> Result<String> {
        let mut collections = self.collections.lock();
        let docs = collections.entry(collection.to_string()).or_default();

        // The lock spans check and insert, so two concurrent submissions
        // with the same email cannot both land here.
        if docs.values().any(|doc| doc.email == record.email) {
            return Err(Error::EmailAlreadyExists);
        }

        let key = ULID::now().encode().to_string();
        debug_assert!(!docs.contains_key(&key));
        docs.insert(key.clone(), record.clone());
        Ok(key)
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<ApplicationRecord>> {
        Ok(self
            .collections
            .lock()
            .get(collection)
            .and_then(|docs| docs.get(key))
            .cloned())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<()> {
        if let Some(docs) = self.collections.lock().get_mut(collection) {
            docs.remove(key);
        }
        Ok(())
    }

    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<ApplicationRecord>> {
        let collections = self.collections.lock();
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matches = Vec::new();
        for doc in docs.values() {
            let as_value = serde_json::to_value(doc).map_err(|e| Error::Store {
                context: format!("memory: serializing document for query: {e}"),
            })?;
            if as_value.get(field).and_then(|v| v.as_str()) == Some(value) {
                matches.push(doc.clone());
            }
        }
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use intake_core::NewApplication;

    const COLLECTION: &str = "applications_test";

    fn record(email: &str) -> ApplicationRecord {
        ApplicationRecord::stamped(
            NewApplication {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: email.to_string(),
                year: 2026,
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = MemoryStore::new();
        let key = store.create(COLLECTION, &record("ada@example.com")).await.unwrap();

        let fetched = store.get(COLLECTION, &key).await.unwrap().unwrap();
        assert_eq!(fetched.email, "ada@example.com");
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let store = MemoryStore::new();
        store.create(COLLECTION, &record("ada@example.com")).await.unwrap();

        let err = store
            .create(COLLECTION, &record("ada@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), "EMAIL_ALREADY_EXISTS");
        assert_eq!(store.len(COLLECTION), 1);
    }

    #[tokio::test]
    async fn keys_are_unique_per_create() {
        let store = MemoryStore::new();
        let a = store.create(COLLECTION, &record("a@example.com")).await.unwrap();
        let b = store.create(COLLECTION, &record("b@example.com")).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryStore::new();
        let key = store.create(COLLECTION, &record("ada@example.com")).await.unwrap();

        store.delete(COLLECTION, &key).await.unwrap();
        assert!(store.get(COLLECTION, &key).await.unwrap().is_none());

        // Second delete of the same key is not an error.
        store.delete(COLLECTION, &key).await.unwrap();
    }

    #[tokio::test]
    async fn query_by_field_filters_on_email() {
        let store = MemoryStore::new();
        store.create(COLLECTION, &record("ada@example.com")).await.unwrap();
        store.create(COLLECTION, &record("grace@example.com")).await.unwrap();

        let hits = store
            .query_by_field(COLLECTION, "email", "ada@example.com")
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].email, "ada@example.com");

        let none = store
            .query_by_field(COLLECTION, "email", "nobody@example.com")
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = MemoryStore::new();
        store.create("applications_f25", &record("ada@example.com")).await.unwrap();

        let hits = store
            .query_by_field("applications_s26", "email", "ada@example.com")
            .await
            .unwrap();
        assert!(hits.is_empty());
    }
}
