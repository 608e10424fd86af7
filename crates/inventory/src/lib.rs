//! Inventory stock-adjustment rules.
//!
//! This crate contains the business rules for inventory movements, implemented
//! purely as deterministic logic (no IO, no HTTP, no caching):
//!
//! - [`validator`]: turns the raw adjustment form into an [`InventoryMovement`]
//!   or a list of field errors.
//! - [`projection`]: previews the stock that results from a movement.

pub mod movement;
pub mod projection;
pub mod validator;

pub use movement::{InventoryMovement, MovementDirection};
pub use projection::{preview, project};
pub use validator::{MovementForm, MovementValidator, StockPolicy, movement_schema};
