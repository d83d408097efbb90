//! Persistence adapter boundary.
//!
//! The core needs only a handful of capabilities per entity kind (insert one,
//! insert many, find all sorted newest-first, count, delete all) plus an
//! atomic seeding marker. Implementations: in-memory (dev/tests) and Postgres.

pub mod in_memory;
pub mod postgres;
pub mod schema;
pub mod r#trait;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use r#trait::{Collection, SeedGuard, StoreError, newest_first};
