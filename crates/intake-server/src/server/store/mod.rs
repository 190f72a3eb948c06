//! Document-store abstraction for application records.
//!
//! The intake pipeline only ever talks to a [`DocumentStore`], a narrow,
//! collection-scoped interface over an external document service. Two
//! adapters exist:
//!
//! - [`MemoryStore`] - process-local reference implementation used by tests
//!   and `--store memory` deployments. Enforces email uniqueness inside the
//!   create call, closing the duplicate-guard race for this backend.
//! - [`FirestoreStore`] - Google Firestore over its REST v1 API. Firestore
//!   offers no unique index, so for this backend the duplicate guard's
//!   pre-check remains the only enforcement.
//!
//! All operations fail with [`Error::Store`] carrying internal context that
//! is logged server-side and never leaked to clients.
//!
//! [`Error::Store`]: intake_core::Error::Store

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

use intake_core::{ApplicationRecord, Result};

/// Collection-scoped create/get/delete/query access to the external
/// document service.
///
/// Storage keys are allocated by the store on create and are opaque to
/// callers; the pipeline derives the client-facing id from them.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a new document and returns its freshly allocated storage
    /// key. Never overwrites an existing document.
    async fn create(&self, collection: &str, record: &ApplicationRecord) -> Result<String>;

    /// Point read. `Ok(None)` when no live document has this key.
    async fn get(&self, collection: &str, key: &str) -> Result<Option<ApplicationRecord>>;

    /// Removes a document. Idempotent on the store side: deleting a missing
    /// key is not an error. Callers needing the pre-delete field values must
    /// read them first.
    async fn delete(&self, collection: &str, key: &str) -> Result<()>;

    /// Returns all live documents whose `field` equals `value`. Used by the
    /// duplicate guard.
    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<ApplicationRecord>>;
}
