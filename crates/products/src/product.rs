use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, Entity, ProductId};

/// Largest stock level a product may hold (stores keep it in a 32-bit signed column).
pub const MAX_QUANTITY: u32 = i32::MAX as u32;

/// Creation input for a product (identifier is assigned by the store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    /// Unit price; must not be negative.
    pub price: Decimal,
    /// Units in stock.
    pub quantity: u32,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: Decimal, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
        }
    }

    /// Deterministic checks. Name uniqueness is enforced by the application service.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if self.price < Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "product price cannot be negative (got {})",
                self.price
            )));
        }
        if self.quantity > MAX_QUANTITY {
            return Err(DomainError::validation(format!(
                "product quantity cannot exceed {MAX_QUANTITY} (got {})",
                self.quantity
            )));
        }
        Ok(())
    }
}

/// Entity: Product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    name: String,
    price: Decimal,
    quantity: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a newly created product from validated input.
    ///
    /// The name is stored exactly as given: duplicate detection is a
    /// case-sensitive exact match on it.
    pub fn create(id: ProductId, new: NewProduct, created_at: DateTime<Utc>) -> DomainResult<Self> {
        new.validate()?;
        Ok(Self {
            id,
            name: new.name,
            price: new.price,
            quantity: new.quantity,
            created_at,
            updated_at: created_at,
        })
    }

    /// Rebuild a product from a stored record.
    pub fn restore(
        id: ProductId,
        name: String,
        price: Decimal,
        quantity: u32,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            price,
            quantity,
            created_at,
            updated_at,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Units currently available.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn has_stock_for(&self, requested: u32) -> bool {
        requested <= self.quantity
    }

    /// Overwrite the stock level (inventory update after an order).
    pub fn set_quantity(&mut self, quantity: u32, at: DateTime<Utc>) {
        self.quantity = quantity;
        self.updated_at = at;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}
