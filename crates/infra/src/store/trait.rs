use std::cmp::Ordering;
use std::sync::Arc;

use thiserror::Error;

use pulse_catalog::Document;

/// Persistence operation error.
///
/// These are **infrastructure errors** (connectivity, query failures, decode
/// problems) as opposed to validation failures, which never reach the store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The store is not reachable right now.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(String),

    /// A storage-level constraint rejected the write.
    #[error("write conflict: {0}")]
    Conflict(String),

    #[error("failed to decode stored record: {0}")]
    Decode(String),
}

/// One collection (table) of documents of a single entity kind.
#[async_trait::async_trait]
pub trait Collection<D: Document>: Send + Sync {
    /// Persist one document, returning it as stored.
    async fn insert_one(&self, doc: D) -> Result<D, StoreError>;

    /// Persist a batch in a single write.
    async fn insert_many(&self, docs: Vec<D>) -> Result<Vec<D>, StoreError>;

    /// All documents, newest `created_at` first (see [`newest_first`]).
    async fn find_all_sorted(&self) -> Result<Vec<D>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    /// Remove every document, returning how many were deleted.
    async fn delete_all(&self) -> Result<u64, StoreError>;
}

#[async_trait::async_trait]
impl<D, C> Collection<D> for Arc<C>
where
    D: Document,
    C: Collection<D> + ?Sized,
{
    async fn insert_one(&self, doc: D) -> Result<D, StoreError> {
        (**self).insert_one(doc).await
    }

    async fn insert_many(&self, docs: Vec<D>) -> Result<Vec<D>, StoreError> {
        (**self).insert_many(docs).await
    }

    async fn find_all_sorted(&self) -> Result<Vec<D>, StoreError> {
        (**self).find_all_sorted().await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        (**self).count().await
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        (**self).delete_all().await
    }
}

/// Insert-if-absent marker records used to guard one-time operations.
#[async_trait::async_trait]
pub trait SeedGuard: Send + Sync {
    /// Atomically create `marker`. Returns `false` if it already existed.
    async fn try_claim(&self, marker: &str) -> Result<bool, StoreError>;

    /// Remove `marker` (no-op if absent).
    async fn release(&self, marker: &str) -> Result<(), StoreError>;
}

/// Listing order: `created_at` descending, identifier descending on ties.
pub fn newest_first<D: Document>(a: &D, b: &D) -> Ordering {
    b.created_at()
        .cmp(&a.created_at())
        .then_with(|| b.id().cmp(a.id()))
}
