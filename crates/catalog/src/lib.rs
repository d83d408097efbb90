//! Catalog domain module: products, FAQs and contact submissions.
//!
//! This crate contains the record types, their declarative constraint sets and
//! the validation layer, implemented purely as deterministic domain logic
//! (no IO, no HTTP, no storage).

pub mod contact;
pub mod document;
pub mod faq;
pub mod product;
pub mod sample;
pub mod schema;
pub mod validate;

pub use contact::{Contact, ContactStatus, NewContact};
pub use document::{Document, Draft};
pub use faq::{Faq, NewFaq};
pub use product::{NewProduct, Product};
pub use schema::{EntityKind, EntitySchema, FieldKind, FieldRule, TextFormat};
