//! `pulse-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! typed record identifiers, the entity contract shared by every persisted
//! record kind, value objects, and the validation error model.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult, FieldErrors};
pub use id::{ContactId, FaqId, ProductId};
pub use value_object::{Email, ValueObject};
