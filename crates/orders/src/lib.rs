//! Orders domain module.
//!
//! This crate contains the business rules for placing an order, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage). Loading customers/products
//! and persisting the result is orchestrated by `storefront-infra`.

pub mod order;
pub mod planning;

pub use order::{Order, OrderLineItem, OrderRequest, RequestedProduct};
pub use planning::{InventoryUpdate, inventory_updates, plan_order};
