use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use pulse_catalog::{Contact, Faq, Product};
use pulse_infra::config::{Config, Environment};
use pulse_infra::connection::{ConnectionProbe, ConnectionStatus, RETRY_DELAY, spawn_supervisor};
use pulse_infra::repository::{ContactRepository, FaqRepository, ProductRepository, Repository};
use pulse_infra::seed::SampleDataInitializer;
use pulse_infra::store::{Collection, InMemoryStore, PostgresStore, SeedGuard, StoreError};

/// Storage backend the services were wired against.
enum Backend {
    InMemory,
    Postgres {
        store: Arc<PostgresStore>,
        supervisor: JoinHandle<()>,
    },
}

/// Everything the handlers need, shared behind an `Arc` extension.
pub struct AppServices {
    pub products: ProductRepository,
    pub faqs: FaqRepository,
    pub contacts: ContactRepository,
    pub seeder: SampleDataInitializer,
    pub connection: Arc<dyn ConnectionProbe>,
    pub environment: Environment,
    pub started_at: Instant,
    backend: Backend,
}

impl AppServices {
    fn wire<S>(
        store: Arc<S>,
        connection: Arc<dyn ConnectionProbe>,
        environment: Environment,
        backend: Backend,
    ) -> Self
    where
        S: Collection<Product> + Collection<Faq> + Collection<Contact> + SeedGuard + 'static,
    {
        let products: Arc<dyn Collection<Product>> = store.clone();
        let faqs: Arc<dyn Collection<Faq>> = store.clone();
        let contacts: Arc<dyn Collection<Contact>> = store.clone();
        let guard: Arc<dyn SeedGuard> = store;

        Self {
            products: Repository::new(products.clone()),
            faqs: Repository::new(faqs.clone()),
            contacts: Repository::new(contacts),
            seeder: SampleDataInitializer::new(products, faqs, guard),
            connection,
            environment,
            started_at: Instant::now(),
            backend,
        }
    }

    /// Wire against an in-memory store (dev/tests).
    pub fn in_memory(store: Arc<InMemoryStore>, environment: Environment) -> Self {
        let connection: Arc<dyn ConnectionProbe> = store.status();
        Self::wire(store, connection, environment, Backend::InMemory)
    }

    /// Wire against Postgres. The pool connects lazily; a supervisor task
    /// keeps retrying until the database is reachable.
    pub fn postgres(database_url: &str, environment: Environment) -> Result<Self, StoreError> {
        let store = Arc::new(PostgresStore::connect_lazy(database_url)?);
        let status = ConnectionStatus::new(false);
        let supervisor = spawn_supervisor((*store).clone(), status.clone(), RETRY_DELAY);

        Ok(Self::wire(
            store.clone(),
            status,
            environment,
            Backend::Postgres { store, supervisor },
        ))
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::InMemory => "in-memory",
            Backend::Postgres { .. } => "postgres",
        }
    }

    /// Stop supervision and close the database pool.
    pub async fn shutdown(&self) {
        match &self.backend {
            Backend::InMemory => {}
            Backend::Postgres { store, supervisor } => {
                supervisor.abort();
                store.close().await;
            }
        }
    }
}

pub fn build_services(config: &Config) -> Result<AppServices, StoreError> {
    match config.database_url.as_deref() {
        Some(url) => {
            let services = AppServices::postgres(url, config.environment)?;
            info!("using postgres store");
            Ok(services)
        }
        None => {
            warn!("DATABASE_URL not set; using in-memory store (data is lost on restart)");
            Ok(AppServices::in_memory(InMemoryStore::arc(), config.environment))
        }
    }
}
