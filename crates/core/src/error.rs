//! Domain error model.

use thiserror::Error;

use crate::id::{CustomerId, OrderId, ProductId};

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// missing references, stock). Infrastructure concerns belong elsewhere.
///
/// Variants carry the offending identifiers and quantities so callers can
/// branch on the failure without parsing the message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("could not find any customer with id {customer_id}")]
    CustomerNotFound { customer_id: CustomerId },

    #[error("could not find product {product_id}")]
    ProductNotFound { product_id: ProductId },

    #[error("could not find order {order_id}")]
    OrderNotFound { order_id: OrderId },

    /// None of the requested products exist.
    #[error("could not find any products with the given ids")]
    NoProductsFound,

    #[error(
        "quantity {requested} is not available for product {product_id} (available: {available})"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    #[error("there is already one product named {name:?}")]
    DuplicateName { name: String },

    #[error("e-mail {email:?} is already in use")]
    DuplicateEmail { email: String },

    /// State changed underneath a write (e.g. stock moved between validation and update).
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Coarse classification of [`DomainError`], used at the HTTP boundary.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    EmptyResult,
    InsufficientStock,
    DuplicateName,
    Duplicate,
    Validation,
    Conflict,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation(_) => ErrorKind::Validation,
            DomainError::CustomerNotFound { .. }
            | DomainError::ProductNotFound { .. }
            | DomainError::OrderNotFound { .. } => ErrorKind::NotFound,
            DomainError::NoProductsFound => ErrorKind::EmptyResult,
            DomainError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            DomainError::DuplicateName { .. } => ErrorKind::DuplicateName,
            DomainError::DuplicateEmail { .. } => ErrorKind::Duplicate,
            DomainError::Conflict(_) => ErrorKind::Conflict,
        }
    }
}
