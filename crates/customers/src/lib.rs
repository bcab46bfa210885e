//! Customers domain module.
//!
//! Customers are read-only from the order workflow's point of view; this crate
//! only knows how to validate a registration and rebuild a stored record.

pub mod customer;

pub use customer::{Customer, NewCustomer};
