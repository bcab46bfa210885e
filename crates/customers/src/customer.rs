use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{CustomerId, DomainError, DomainResult, Entity};

/// Registration input for a customer (identifier is assigned by the store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
}

impl NewCustomer {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Deterministic registration checks (no IO).
    ///
    /// E-mail uniqueness needs a lookup and is checked by the application service.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("customer name cannot be empty"));
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation(format!(
                "customer e-mail {:?} is not a valid address",
                self.email
            )));
        }
        Ok(())
    }
}

/// Entity: Customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    id: CustomerId,
    name: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl Customer {
    /// Build a freshly registered customer from validated input.
    pub fn register(
        id: CustomerId,
        new: NewCustomer,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        new.validate()?;
        Ok(Self {
            id,
            name: new.name.trim().to_string(),
            email: new.email.trim().to_string(),
            created_at,
        })
    }

    /// Rebuild a customer from a stored record.
    pub fn restore(
        id: CustomerId,
        name: String,
        email: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            created_at,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> CustomerId {
        self.id
    }
}
