//! `stockia-core`: shared building blocks for the Stockia client.
//!
//! This crate contains **pure** primitives (no IO): identifiers, the domain
//! error model, the entity trait and the typed form schema used by every
//! input screen.

pub mod entity;
pub mod error;
pub mod form;
pub mod id;

pub use entity::Entity;
pub use error::DomainError;
pub use form::{
    FieldError, FieldErrorKind, FieldId, FieldSpec, FieldValue, FormSchema, FormValues, InputKind,
    Rule, ValidForm,
};
pub use id::{CategoryId, CustomerId, MovementId, ProductId, SupplierId, UserId};
