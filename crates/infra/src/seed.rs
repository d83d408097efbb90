//! Sample-data initializer.
//!
//! Seeds the product and FAQ collections with the canonical dataset. The
//! "already seeded" decision is guarded by an insert-if-absent marker
//! ([`SeedGuard`]), so two concurrent calls cannot both insert.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, instrument, warn};

use pulse_catalog::{Document, Faq, Product, sample};

use crate::store::{Collection, SeedGuard, StoreError};

/// Marker claimed by a successful seeding run.
pub const SAMPLE_DATA_MARKER: &str = "sample-data";

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Storage(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    AlreadySeeded,
    Seeded { products: usize, faqs: usize },
}

pub struct SampleDataInitializer {
    products: Arc<dyn Collection<Product>>,
    faqs: Arc<dyn Collection<Faq>>,
    guard: Arc<dyn SeedGuard>,
}

impl SampleDataInitializer {
    pub fn new(
        products: Arc<dyn Collection<Product>>,
        faqs: Arc<dyn Collection<Faq>>,
        guard: Arc<dyn SeedGuard>,
    ) -> Self {
        Self {
            products,
            faqs,
            guard,
        }
    }

    /// Seed unless data already exists.
    ///
    /// With `force`, existing products and FAQs are deleted first (irreversible)
    /// and seeding always proceeds. A failed insert is not rolled back; the
    /// marker is released so a later call can try again.
    #[instrument(skip(self), err)]
    pub async fn run(&self, force: bool) -> Result<SeedOutcome, SeedError> {
        if force {
            let products = self.products.delete_all().await?;
            let faqs = self.faqs.delete_all().await?;
            self.guard.release(SAMPLE_DATA_MARKER).await?;
            info!(products, faqs, "cleared existing data before reseeding");
        } else if self.products.count().await? > 0 && self.faqs.count().await? > 0 {
            return Ok(SeedOutcome::AlreadySeeded);
        }

        if !self.guard.try_claim(SAMPLE_DATA_MARKER).await? {
            info!("sample data already claimed by another run");
            return Ok(SeedOutcome::AlreadySeeded);
        }

        match self.insert_samples().await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                if let Err(release_err) = self.guard.release(SAMPLE_DATA_MARKER).await {
                    warn!(error = %release_err, "failed to release seed marker");
                }
                Err(e.into())
            }
        }
    }

    async fn insert_samples(&self) -> Result<SeedOutcome, StoreError> {
        let now = Utc::now();
        let products: Vec<Product> = sample::products()
            .into_iter()
            .map(|draft| Product::create(draft, now))
            .collect();
        let faqs: Vec<Faq> = sample::faqs()
            .into_iter()
            .map(|draft| Faq::create(draft, now))
            .collect();

        let products = self.products.insert_many(products).await?.len();
        let faqs = self.faqs.insert_many(faqs).await?.len();
        info!(products, faqs, "sample data initialized");
        Ok(SeedOutcome::Seeded { products, faqs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use pulse_catalog::NewFaq;

    fn initializer(store: &Arc<InMemoryStore>) -> SampleDataInitializer {
        SampleDataInitializer::new(store.clone(), store.clone(), store.clone())
    }

    async fn counts(store: &InMemoryStore) -> (u64, u64) {
        (
            Collection::<Product>::count(store).await.unwrap(),
            Collection::<Faq>::count(store).await.unwrap(),
        )
    }

    #[tokio::test]
    async fn second_run_without_force_is_a_no_op() {
        let store = InMemoryStore::arc();
        let seeder = initializer(&store);

        assert_eq!(
            seeder.run(false).await.unwrap(),
            SeedOutcome::Seeded { products: 4, faqs: 6 }
        );
        assert_eq!(seeder.run(false).await.unwrap(), SeedOutcome::AlreadySeeded);
        assert_eq!(counts(&store).await, (4, 6));
    }

    #[tokio::test]
    async fn force_replaces_existing_data() {
        let store = InMemoryStore::arc();
        let seeder = initializer(&store);
        seeder.run(false).await.unwrap();
        let extra = Faq::create(
            NewFaq {
                question: "Extra?".into(),
                answer: "Yes.".into(),
                category: "general".into(),
            },
            Utc::now(),
        );
        store.insert_one(extra).await.unwrap();
        assert_eq!(counts(&store).await, (4, 7));

        assert_eq!(
            seeder.run(true).await.unwrap(),
            SeedOutcome::Seeded { products: 4, faqs: 6 }
        );
        assert_eq!(counts(&store).await, (4, 6));
    }

    #[tokio::test]
    async fn partially_empty_store_is_seeded() {
        let store = InMemoryStore::arc();
        let seeder = initializer(&store);
        seeder.run(false).await.unwrap();
        Collection::<Faq>::delete_all(&*store).await.unwrap();
        store.release(SAMPLE_DATA_MARKER).await.unwrap();

        assert_eq!(
            seeder.run(false).await.unwrap(),
            SeedOutcome::Seeded { products: 4, faqs: 6 }
        );
        assert_eq!(counts(&store).await, (8, 6));
    }

    #[tokio::test]
    async fn held_marker_reports_already_seeded() {
        let store = InMemoryStore::arc();
        assert!(store.try_claim(SAMPLE_DATA_MARKER).await.unwrap());

        assert_eq!(
            initializer(&store).run(false).await.unwrap(),
            SeedOutcome::AlreadySeeded
        );
        assert_eq!(counts(&store).await, (0, 0));
    }

    #[tokio::test]
    async fn concurrent_runs_seed_once() {
        let store = InMemoryStore::arc();
        let seeder = Arc::new(initializer(&store));

        let (a, b) = tokio::join!(seeder.run(false), seeder.run(false));
        let outcomes = [a.unwrap(), b.unwrap()];
        assert_eq!(
            outcomes
                .iter()
                .filter(|o| matches!(o, SeedOutcome::Seeded { .. }))
                .count(),
            1
        );
        assert_eq!(counts(&store).await, (4, 6));
    }

    #[tokio::test]
    async fn offline_store_surfaces_storage_error() {
        let store = InMemoryStore::arc();
        store.set_online(false);

        assert!(matches!(
            initializer(&store).run(false).await,
            Err(SeedError::Storage(StoreError::Unavailable(_)))
        ));
    }

    /// FAQ collection whose batch insert always fails.
    struct BrokenFaqs;

    #[async_trait::async_trait]
    impl Collection<Faq> for BrokenFaqs {
        async fn insert_one(&self, _doc: Faq) -> Result<Faq, StoreError> {
            Err(StoreError::Query("insert rejected".into()))
        }

        async fn insert_many(&self, _docs: Vec<Faq>) -> Result<Vec<Faq>, StoreError> {
            Err(StoreError::Query("insert rejected".into()))
        }

        async fn find_all_sorted(&self) -> Result<Vec<Faq>, StoreError> {
            Ok(Vec::new())
        }

        async fn count(&self) -> Result<u64, StoreError> {
            Ok(0)
        }

        async fn delete_all(&self) -> Result<u64, StoreError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn failed_insert_keeps_partial_data_and_frees_the_marker() {
        let store = InMemoryStore::arc();
        let seeder = SampleDataInitializer::new(store.clone(), Arc::new(BrokenFaqs), store.clone());

        assert!(matches!(
            seeder.run(false).await,
            Err(SeedError::Storage(StoreError::Query(_)))
        ));
        // Products landed before the FAQ batch failed; nothing is rolled back.
        assert_eq!(Collection::<Product>::count(&*store).await.unwrap(), 4);
        assert!(store.try_claim(SAMPLE_DATA_MARKER).await.unwrap());
    }
}
