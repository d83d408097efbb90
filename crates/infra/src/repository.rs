//! Entity repositories: validation paired with persistence, per entity kind.
//!
//! A repository never touches storage with unvalidated input. Storage errors
//! pass through unchanged; shaping them into responses is the API's job.

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use pulse_catalog::{Contact, Document, Draft, Faq, Product};
use pulse_core::FieldErrors;

use crate::store::{Collection, StoreError};

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The input was rejected before any persistence attempt.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl From<FieldErrors> for RepositoryError {
    fn from(errors: FieldErrors) -> Self {
        RepositoryError::Validation(errors)
    }
}

/// Repository for one document kind over any [`Collection`] of it.
pub struct Repository<D, C: ?Sized> {
    collection: Arc<C>,
    _doc: PhantomData<fn() -> D>,
}

pub type ProductRepository = Repository<Product, dyn Collection<Product>>;
pub type FaqRepository = Repository<Faq, dyn Collection<Faq>>;
pub type ContactRepository = Repository<Contact, dyn Collection<Contact>>;

impl<D, C> Repository<D, C>
where
    D: Document,
    C: Collection<D> + ?Sized,
{
    pub fn new(collection: Arc<C>) -> Self {
        Self {
            collection,
            _doc: PhantomData,
        }
    }

    /// Validate `input`, then store a new record built from it.
    ///
    /// Identifier and both timestamps are assigned here; any client-supplied
    /// values for them are rejected as unknown keys by validation.
    pub async fn create(&self, input: &Value) -> Result<D, RepositoryError> {
        let draft = D::Draft::validate(input)?;
        let doc = D::create(draft, Utc::now());
        let stored = self.collection.insert_one(doc).await?;
        debug!(kind = %D::KIND, "record created");
        Ok(stored)
    }

    /// Every record, newest first.
    pub async fn list(&self) -> Result<Vec<D>, StoreError> {
        self.collection.find_all_sorted().await
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        self.collection.count().await
    }
}

impl<D, C: ?Sized> Clone for Repository<D, C> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            _doc: PhantomData,
        }
    }
}
