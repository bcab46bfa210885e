use tracing::{info, instrument};

use storefront_core::{DomainError, Entity};
use storefront_customers::{Customer, NewCustomer};

use crate::repository::CustomersRepository;

use super::ServiceError;

/// Registers customers; e-mail addresses are unique.
pub struct CreateCustomerService<C> {
    customers: C,
}

impl<C: CustomersRepository> CreateCustomerService<C> {
    pub fn new(customers: C) -> Self {
        Self { customers }
    }

    #[instrument(skip(self, new), err)]
    pub async fn execute(&self, new: NewCustomer) -> Result<Customer, ServiceError> {
        new.validate()?;

        let email = new.email.trim();
        if self.customers.find_by_email(email).await?.is_some() {
            return Err(DomainError::DuplicateEmail {
                email: email.to_string(),
            }
            .into());
        }

        let customer = self.customers.create(new).await?;
        info!(customer_id = %customer.id(), "customer registered");
        Ok(customer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryTable;

    #[tokio::test]
    async fn registers_customer() {
        let service = CreateCustomerService::new(InMemoryTable::<Customer>::new());
        let customer = service
            .execute(NewCustomer::new("Ada", "ada@example.com"))
            .await
            .unwrap();
        assert_eq!(customer.name(), "Ada");
        assert_eq!(customer.email(), "ada@example.com");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let service = CreateCustomerService::new(InMemoryTable::<Customer>::new());
        service
            .execute(NewCustomer::new("Ada", "ada@example.com"))
            .await
            .unwrap();

        let err = service
            .execute(NewCustomer::new("Another Ada", " ada@example.com "))
            .await
            .unwrap_err();
        match err {
            ServiceError::Domain(DomainError::DuplicateEmail { email }) => {
                assert_eq!(email, "ada@example.com")
            }
            other => panic!("expected DuplicateEmail, got {other:?}"),
        }
    }
}
