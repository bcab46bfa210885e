//! Application services: orchestrate repository calls around the pure domain rules.
//!
//! Each service takes its repositories in `new` and is otherwise stateless, so one
//! instance can be shared across requests behind an `Arc`.

pub mod customers;
pub mod orders;
pub mod products;

use thiserror::Error;

use storefront_core::DomainError;

use crate::repository::StoreError;

pub use customers::CreateCustomerService;
pub use orders::{CreateOrderService, FindOrderService};
pub use products::CreateProductService;

/// Failure of an application service call.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Business rule rejected the request; nothing was written.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Storage failed.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Domain(e) => ServiceError::Domain(e),
            StoreError::Conflict(msg) => ServiceError::Domain(DomainError::conflict(msg)),
            other => ServiceError::Store(other),
        }
    }
}

impl ServiceError {
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            ServiceError::Domain(e) => Some(e),
            ServiceError::Store(_) => None,
        }
    }
}
