//! Infrastructure layer: persistence adapters, connection supervision,
//! repositories, sample-data seeding and runtime configuration.

pub mod config;
pub mod connection;
pub mod repository;
pub mod seed;
pub mod store;
