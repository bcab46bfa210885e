use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storefront_core::{CustomerId, DomainError, DomainResult, Entity, OrderId, ProductId};
use storefront_customers::Customer;

/// One requested `(product, quantity)` pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedProduct {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Input to the order-creation workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub customer_id: CustomerId,
    pub products: Vec<RequestedProduct>,
}

impl OrderRequest {
    pub fn new(customer_id: CustomerId, products: Vec<RequestedProduct>) -> Self {
        Self {
            customer_id,
            products,
        }
    }

    pub fn product_ids(&self) -> Vec<ProductId> {
        self.products.iter().map(|p| p.product_id).collect()
    }

    /// Shape checks that need no lookups.
    ///
    /// A product may appear only once: stock is checked and decremented per line,
    /// so repeating a product would let two lines each pass against the same stock.
    pub fn validate(&self) -> DomainResult<()> {
        if self.products.is_empty() {
            return Err(DomainError::validation(
                "order must contain at least one product",
            ));
        }

        let mut seen = HashSet::with_capacity(self.products.len());
        for line in &self.products {
            if line.quantity == 0 {
                return Err(DomainError::validation(format!(
                    "quantity for product {} must be positive",
                    line.product_id
                )));
            }
            if !seen.insert(line.product_id) {
                return Err(DomainError::validation(format!(
                    "product {} is requested more than once",
                    line.product_id
                )));
            }
        }
        Ok(())
    }
}

/// Order line: product, quantity, unit price captured when the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Snapshot of the product price; later price changes do not touch it.
    pub price: Decimal,
}

impl OrderLineItem {
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Aggregate: an order together with its line items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    customer: Customer,
    line_items: Vec<OrderLineItem>,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Assemble a newly persisted order. Orders are never empty.
    pub fn place(
        id: OrderId,
        customer: Customer,
        line_items: Vec<OrderLineItem>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if line_items.is_empty() {
            return Err(DomainError::validation(
                "cannot place an order without line items",
            ));
        }
        Ok(Self {
            id,
            customer,
            line_items,
            created_at,
        })
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn line_items(&self) -> &[OrderLineItem] {
        &self.line_items
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn total_quantity(&self) -> u64 {
        self.line_items.iter().map(|l| u64::from(l.quantity)).sum()
    }

    pub fn total(&self) -> Decimal {
        self.line_items.iter().map(OrderLineItem::subtotal).sum()
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> OrderId {
        self.id
    }
}
