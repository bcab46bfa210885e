//! Storage boundary for customers, products, and orders.
//!
//! Application services depend only on these traits; `in_memory` backs dev/tests and
//! `postgres` backs production.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use storefront_core::{CustomerId, DomainError, OrderId, ProductId};
use storefront_customers::{Customer, NewCustomer};
use storefront_orders::{InventoryUpdate, Order, OrderLineItem};
use storefront_products::{NewProduct, Product};

pub use in_memory::{InMemoryOrders, InMemoryTable};
pub use postgres::PostgresStore;

/// Repository operation error.
///
/// These are **infrastructure errors** (storage, lost updates, unreadable rows) as
/// opposed to domain errors, except for `Domain`, which carries a rule a store
/// enforced while building an entity.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    /// A guarded write found state different from what the caller expected.
    #[error("write conflict: {0}")]
    Conflict(String),

    /// A stored row could not be turned back into a domain value.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[async_trait]
pub trait CustomersRepository: Send + Sync {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StoreError>;

    /// Exact match.
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, StoreError>;

    /// Persist a new customer, assigning its identifier.
    async fn create(&self, new: NewCustomer) -> Result<Customer, StoreError>;
}

#[async_trait]
pub trait ProductsRepository: Send + Sync {
    /// Batch lookup. Returns only the products that exist; omissions mean not found.
    async fn find_all_by_id(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError>;

    /// Case-sensitive exact match.
    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, StoreError>;

    /// Persist a new product, assigning its identifier.
    async fn create(&self, new: NewProduct) -> Result<Product, StoreError>;

    /// Apply a batch of stock writes, all or nothing.
    ///
    /// Every product must still hold its `expected_quantity`; otherwise nothing is
    /// written and `StoreError::Conflict` is returned.
    async fn update_quantities(&self, updates: &[InventoryUpdate]) -> Result<(), StoreError>;
}

#[async_trait]
pub trait OrdersRepository: Send + Sync {
    /// Persist an order with its line items and apply its stock updates as one unit,
    /// assigning the order id.
    ///
    /// Stock updates are guarded like `ProductsRepository::update_quantities`: if any
    /// product no longer holds its `expected_quantity`, neither the order nor any
    /// stock change is written and `StoreError::Conflict` is returned.
    async fn create(
        &self,
        customer: &Customer,
        line_items: Vec<OrderLineItem>,
        stock: &[InventoryUpdate],
    ) -> Result<Order, StoreError>;

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError>;
}

#[async_trait]
impl<S> CustomersRepository for Arc<S>
where
    S: CustomersRepository + ?Sized,
{
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, StoreError> {
        (**self).find_by_email(email).await
    }

    async fn create(&self, new: NewCustomer) -> Result<Customer, StoreError> {
        (**self).create(new).await
    }
}

#[async_trait]
impl<S> ProductsRepository for Arc<S>
where
    S: ProductsRepository + ?Sized,
{
    async fn find_all_by_id(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError> {
        (**self).find_all_by_id(ids).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, StoreError> {
        (**self).find_by_name(name).await
    }

    async fn create(&self, new: NewProduct) -> Result<Product, StoreError> {
        (**self).create(new).await
    }

    async fn update_quantities(&self, updates: &[InventoryUpdate]) -> Result<(), StoreError> {
        (**self).update_quantities(updates).await
    }
}

#[async_trait]
impl<S> OrdersRepository for Arc<S>
where
    S: OrdersRepository + ?Sized,
{
    async fn create(
        &self,
        customer: &Customer,
        line_items: Vec<OrderLineItem>,
        stock: &[InventoryUpdate],
    ) -> Result<Order, StoreError> {
        (**self).create(customer, line_items, stock).await
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        (**self).find_by_id(id).await
    }
}
