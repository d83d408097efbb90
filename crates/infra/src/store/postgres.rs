//! Postgres-backed document store.
//!
//! One table per entity kind plus `seed_markers`. Table definitions come from
//! the catalog schemas (see [`super::schema`]), so storage constraints and
//! request validation share a single source.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (check constraint violation) | `23514` | `Conflict` |
//! | Database (other) | any other | `Query` |
//! | PoolTimedOut / PoolClosed / Io / Tls | N/A | `Unavailable` |
//! | Decode / ColumnDecode / ColumnNotFound | N/A | `Decode` |
//! | Other | N/A | `Query` |

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::query_builder::Separated;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::{info, instrument};
use uuid::Uuid;

use pulse_catalog::{Contact, ContactStatus, Document, Faq, Product, contact, faq, product};
use pulse_core::{ContactId, Email, FaqId, ProductId};

use crate::connection::Connector;

use super::r#trait::{Collection, SeedGuard, StoreError};
use super::schema::{SEED_MARKERS_DDL, column_list, create_index_sql, create_table_sql};

/// How long a query waits for a pooled connection before failing.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Postgres-backed store for all three collections.
///
/// ## Thread Safety
///
/// Uses the SQLx connection pool, which is `Send + Sync` and cheap to clone.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Arc<PgPool>,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create a store whose pool dials lazily, so startup never blocks on the
    /// database. The connection supervisor performs the first real connect.
    pub fn connect_lazy(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_lazy(database_url)
            .map_err(|e| map_sqlx_error("connect_lazy", e))?;
        Ok(Self::new(pool))
    }

    /// Create tables, indexes and the marker table if missing.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for schema in [&product::SCHEMA, &faq::SCHEMA, &contact::SCHEMA] {
            sqlx::query(&create_table_sql(schema))
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("create_table", e))?;
            sqlx::query(&create_index_sql(schema))
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("create_index", e))?;
        }
        sqlx::query(SEED_MARKERS_DDL)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("create_seed_markers", e))?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("database connection pool closed");
    }
}

/// Row mapping for a document type.
pub trait PgDocument: Document {
    /// Bind one row's values in [`column_list`] order.
    fn push_row(&self, row: &mut Separated<'_, '_, Postgres, &'static str>);

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error>;
}

fn decode_err<E>(e: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(e))
}

impl PgDocument for Product {
    fn push_row(&self, row: &mut Separated<'_, '_, Postgres, &'static str>) {
        row.push_bind(*self.id.as_uuid())
            .push_bind(self.name.clone())
            .push_bind(self.description.clone())
            .push_bind(self.price)
            .push_bind(self.image.clone())
            .push_bind(self.category.clone())
            .push_bind(self.features.clone())
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Product {
            id: ProductId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            image: row.try_get("image")?,
            category: row.try_get("category")?,
            features: row.try_get("features")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl PgDocument for Faq {
    fn push_row(&self, row: &mut Separated<'_, '_, Postgres, &'static str>) {
        row.push_bind(*self.id.as_uuid())
            .push_bind(self.question.clone())
            .push_bind(self.answer.clone())
            .push_bind(self.category.clone())
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Faq {
            id: FaqId::from_uuid(row.try_get::<Uuid, _>("id")?),
            question: row.try_get("question")?,
            answer: row.try_get("answer")?,
            category: row.try_get("category")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl PgDocument for Contact {
    fn push_row(&self, row: &mut Separated<'_, '_, Postgres, &'static str>) {
        row.push_bind(*self.id.as_uuid())
            .push_bind(self.name.clone())
            .push_bind(self.email.to_string())
            .push_bind(self.message.clone())
            .push_bind(self.status.as_str())
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let email: String = row.try_get("email")?;
        let status: String = row.try_get("status")?;
        Ok(Contact {
            id: ContactId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            email: Email::parse(&email).map_err(decode_err)?,
            message: row.try_get("message")?,
            status: status.parse::<ContactStatus>().map_err(decode_err)?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

fn decode_rows<D: PgDocument>(rows: &[PgRow]) -> Result<Vec<D>, StoreError> {
    rows.iter()
        .map(D::from_row)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| map_sqlx_error("decode", e))
}

#[async_trait::async_trait]
impl<D: PgDocument> Collection<D> for PostgresStore {
    async fn insert_one(&self, doc: D) -> Result<D, StoreError> {
        Collection::<D>::insert_many(self, vec![doc])
            .await?
            .pop()
            .ok_or_else(|| StoreError::Decode("insert returned no row".to_string()))
    }

    #[instrument(skip(self, docs), fields(table = D::KIND.collection(), count = docs.len()), err)]
    async fn insert_many(&self, docs: Vec<D>) -> Result<Vec<D>, StoreError> {
        if docs.is_empty() {
            return Ok(Vec::new());
        }
        let cols = column_list(D::schema()).join(", ");

        // Single multi-row INSERT: the batch lands atomically.
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("INSERT INTO {} ({cols}) ", D::KIND.collection()));
        qb.push_values(docs.iter(), |mut row, doc| doc.push_row(&mut row));
        qb.push(format!(" RETURNING {cols}"));

        let rows = qb
            .build()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_many", e))?;
        decode_rows(&rows)
    }

    #[instrument(skip(self), fields(table = D::KIND.collection()), err)]
    async fn find_all_sorted(&self) -> Result<Vec<D>, StoreError> {
        let sql = format!(
            "SELECT {cols} FROM {table} ORDER BY created_at DESC, id DESC",
            cols = column_list(D::schema()).join(", "),
            table = D::KIND.collection(),
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_all_sorted", e))?;
        decode_rows(&rows)
    }

    #[instrument(skip(self), fields(table = D::KIND.collection()), err)]
    async fn count(&self) -> Result<u64, StoreError> {
        let sql = format!("SELECT COUNT(*) AS total FROM {}", D::KIND.collection());
        let row = sqlx::query(&sql)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("count", e))?;
        let total: i64 = row
            .try_get("total")
            .map_err(|e| map_sqlx_error("count", e))?;
        Ok(total.max(0) as u64)
    }

    #[instrument(skip(self), fields(table = D::KIND.collection()), err)]
    async fn delete_all(&self) -> Result<u64, StoreError> {
        let sql = format!("DELETE FROM {}", D::KIND.collection());
        let result = sqlx::query(&sql)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_all", e))?;
        Ok(result.rows_affected())
    }
}

#[async_trait::async_trait]
impl SeedGuard for PostgresStore {
    async fn try_claim(&self, marker: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO seed_markers (name)
            VALUES ($1)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(marker)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("try_claim", e))?;
        Ok(result.rows_affected() == 1)
    }

    async fn release(&self, marker: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM seed_markers WHERE name = $1")
            .bind(marker)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("release", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Connector for PostgresStore {
    async fn connect(&self) -> Result<(), StoreError> {
        self.ensure_schema().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ping", e))?;
        Ok(())
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") | Some("23514") => StoreError::Conflict(msg),
                _ => StoreError::Query(msg),
            }
        }
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Unavailable(format!("{operation}: {err}")),
        sqlx::Error::Decode(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_) => StoreError::Decode(format!("{operation}: {err}")),
        _ => StoreError::Query(format!("sqlx error in {}: {}", operation, err)),
    }
}
