use tracing::{info, instrument};

use storefront_core::{DomainError, Entity};
use storefront_products::{NewProduct, Product};

use crate::repository::ProductsRepository;

use super::ServiceError;

/// Creates catalog products; names are unique (case-sensitive).
pub struct CreateProductService<P> {
    products: P,
}

impl<P: ProductsRepository> CreateProductService<P> {
    pub fn new(products: P) -> Self {
        Self { products }
    }

    #[instrument(skip(self, new), fields(name = %new.name), err)]
    pub async fn execute(&self, new: NewProduct) -> Result<Product, ServiceError> {
        new.validate()?;

        if self.products.find_by_name(&new.name).await?.is_some() {
            return Err(DomainError::DuplicateName { name: new.name }.into());
        }

        let product = self.products.create(new).await?;
        info!(product_id = %product.id(), "product created");
        Ok(product)
    }
}
