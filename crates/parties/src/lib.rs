//! Parties: customers and suppliers.
//!
//! Read-mostly reference records plus the customer registration form.

pub mod customer;
pub mod supplier;

pub use customer::{Customer, CustomerQuery, CustomerRequest, customer_schema};
pub use supplier::Supplier;
