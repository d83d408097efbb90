//! In-memory document store for tests/dev.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};

use pulse_catalog::{Contact, Document, Faq, Product};

use crate::connection::{ConnectionProbe, ConnectionState, ConnectionStatus};

use super::r#trait::{Collection, SeedGuard, StoreError, newest_first};

/// All three collections plus seed markers, behind std locks.
///
/// The store can be taken "offline": every operation then fails with
/// [`StoreError::Unavailable`] and its status reports disconnected, which is
/// how callers exercise the storage-failure paths without a database.
#[derive(Debug)]
pub struct InMemoryStore {
    products: RwLock<Vec<Product>>,
    faqs: RwLock<Vec<Faq>>,
    contacts: RwLock<Vec<Contact>>,
    markers: Mutex<HashSet<String>>,
    status: Arc<ConnectionStatus>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            products: RwLock::new(Vec::new()),
            faqs: RwLock::new(Vec::new()),
            contacts: RwLock::new(Vec::new()),
            markers: Mutex::new(HashSet::new()),
            status: ConnectionStatus::new(true),
        }
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn status(&self) -> Arc<ConnectionStatus> {
        self.status.clone()
    }

    pub fn set_online(&self, online: bool) {
        let state = if online {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        };
        self.status.set(state);
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        match self.status.state() {
            ConnectionState::Connected => Ok(()),
            ConnectionState::Disconnected => {
                Err(StoreError::Unavailable("in-memory store is offline".to_string()))
            }
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Query("lock poisoned".to_string())
}

/// Maps a document type to its slot in the store.
pub trait InMemoryDocument: Document {
    fn slot(store: &InMemoryStore) -> &RwLock<Vec<Self>>;
}

impl InMemoryDocument for Product {
    fn slot(store: &InMemoryStore) -> &RwLock<Vec<Self>> {
        &store.products
    }
}

impl InMemoryDocument for Faq {
    fn slot(store: &InMemoryStore) -> &RwLock<Vec<Self>> {
        &store.faqs
    }
}

impl InMemoryDocument for Contact {
    fn slot(store: &InMemoryStore) -> &RwLock<Vec<Self>> {
        &store.contacts
    }
}

#[async_trait::async_trait]
impl<D: InMemoryDocument> Collection<D> for InMemoryStore {
    async fn insert_one(&self, doc: D) -> Result<D, StoreError> {
        self.ensure_online()?;
        D::slot(self).write().map_err(poisoned)?.push(doc.clone());
        Ok(doc)
    }

    async fn insert_many(&self, docs: Vec<D>) -> Result<Vec<D>, StoreError> {
        self.ensure_online()?;
        D::slot(self)
            .write()
            .map_err(poisoned)?
            .extend(docs.iter().cloned());
        Ok(docs)
    }

    async fn find_all_sorted(&self) -> Result<Vec<D>, StoreError> {
        self.ensure_online()?;
        let mut docs = D::slot(self).read().map_err(poisoned)?.clone();
        docs.sort_by(newest_first);
        Ok(docs)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.ensure_online()?;
        Ok(D::slot(self).read().map_err(poisoned)?.len() as u64)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        self.ensure_online()?;
        let mut docs = D::slot(self).write().map_err(poisoned)?;
        let removed = docs.len() as u64;
        docs.clear();
        Ok(removed)
    }
}

#[async_trait::async_trait]
impl SeedGuard for InMemoryStore {
    async fn try_claim(&self, marker: &str) -> Result<bool, StoreError> {
        self.ensure_online()?;
        Ok(self.markers.lock().map_err(poisoned)?.insert(marker.to_string()))
    }

    async fn release(&self, marker: &str) -> Result<(), StoreError> {
        self.ensure_online()?;
        self.markers.lock().map_err(poisoned)?.remove(marker);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pulse_catalog::{NewFaq, NewProduct};

    fn product_at(name: &str, minute: u32) -> Product {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 12, minute, 0).unwrap();
        Product::create(
            NewProduct {
                name: name.to_string(),
                description: "d".into(),
                price: 10.0,
                image: "https://example.com/p.png".into(),
                category: "c".into(),
                features: vec![],
            },
            at,
        )
    }

    #[tokio::test]
    async fn find_all_sorted_returns_newest_first() {
        let store = InMemoryStore::new();
        // Inserted out of order on purpose.
        for (name, minute) in [("t2", 2), ("t1", 1), ("t3", 3)] {
            store.insert_one(product_at(name, minute)).await.unwrap();
        }

        let names: Vec<String> = Collection::<Product>::find_all_sorted(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["t3", "t2", "t1"]);
    }

    #[tokio::test]
    async fn equal_timestamps_fall_back_to_identifier_order() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let draft = NewFaq {
            question: "q".into(),
            answer: "a".into(),
            category: "general".into(),
        };
        let first = Faq::create(draft.clone(), now);
        let second = Faq::create(draft, now);
        store.insert_many(vec![first.clone(), second.clone()]).await.unwrap();

        let listed = Collection::<Faq>::find_all_sorted(&store).await.unwrap();
        assert_eq!(listed, vec![second, first]);
    }

    #[tokio::test]
    async fn collections_are_independent() {
        let store = InMemoryStore::new();
        store.insert_one(product_at("p", 0)).await.unwrap();

        assert_eq!(Collection::<Product>::count(&store).await.unwrap(), 1);
        assert_eq!(Collection::<Faq>::count(&store).await.unwrap(), 0);
        assert_eq!(Collection::<Contact>::count(&store).await.unwrap(), 0);

        assert_eq!(Collection::<Product>::delete_all(&store).await.unwrap(), 1);
        assert_eq!(Collection::<Product>::count(&store).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn offline_store_fails_every_operation() {
        let store = InMemoryStore::new();
        store.set_online(false);

        assert_eq!(store.status().state(), ConnectionState::Disconnected);
        let err = store.insert_one(product_at("p", 0)).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(Collection::<Faq>::count(&store).await.is_err());
        assert!(store.try_claim("m").await.is_err());

        store.set_online(true);
        assert_eq!(Collection::<Product>::count(&store).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn markers_are_claimed_once_until_released() {
        let store = InMemoryStore::new();
        assert!(store.try_claim("sample-data").await.unwrap());
        assert!(!store.try_claim("sample-data").await.unwrap());

        store.release("sample-data").await.unwrap();
        assert!(store.try_claim("sample-data").await.unwrap());
    }
}
