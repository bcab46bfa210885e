//! Order placement and lookup.
//!
//! ```text
//! OrderRequest
//!   ↓ validate shape (no IO)
//! 1. resolve customer
//!   ↓
//! 2-5. resolve products in one batch, plan line items + stock writes (pure)
//!   ↓
//! 6-7. persist order + line items and write back stock (one atomic, guarded unit)
//! ```
//!
//! Nothing is written before step 6, and a stock conflict in step 7 leaves nothing
//! written.

use tracing::{info, instrument, warn};

use storefront_core::{DomainError, Entity, OrderId};
use storefront_orders::{Order, OrderRequest, inventory_updates, plan_order};

use crate::repository::{CustomersRepository, OrdersRepository, ProductsRepository};

use super::ServiceError;

pub struct CreateOrderService<O, P, C> {
    orders: O,
    products: P,
    customers: C,
}

impl<O, P, C> CreateOrderService<O, P, C>
where
    O: OrdersRepository,
    P: ProductsRepository,
    C: CustomersRepository,
{
    pub fn new(orders: O, products: P, customers: C) -> Self {
        Self {
            orders,
            products,
            customers,
        }
    }

    #[instrument(
        skip(self, request),
        fields(customer_id = %request.customer_id, lines = request.products.len()),
        err
    )]
    pub async fn execute(&self, request: OrderRequest) -> Result<Order, ServiceError> {
        request.validate()?;

        let customer = self
            .customers
            .find_by_id(request.customer_id)
            .await?
            .ok_or(DomainError::CustomerNotFound {
                customer_id: request.customer_id,
            })?;

        let products = self
            .products
            .find_all_by_id(&request.product_ids())
            .await?;

        let line_items = plan_order(&request, &products)?;
        let stock = inventory_updates(&line_items, &products)?;

        let order = match self.orders.create(&customer, line_items, &stock).await {
            Ok(order) => order,
            Err(e) => {
                warn!(error = %e, "order rejected while writing");
                return Err(e.into());
            }
        };

        info!(
            order_id = %order.id(),
            total = %order.total(),
            "order created"
        );
        Ok(order)
    }
}

pub struct FindOrderService<O> {
    orders: O,
}

impl<O: OrdersRepository> FindOrderService<O> {
    pub fn new(orders: O) -> Self {
        Self { orders }
    }

    #[instrument(skip(self), err)]
    pub async fn execute(&self, order_id: OrderId) -> Result<Order, ServiceError> {
        match self.orders.find_by_id(order_id).await? {
            Some(order) => Ok(order),
            None => {
                warn!(%order_id, "order not found");
                Err(DomainError::OrderNotFound { order_id }.into())
            }
        }
    }
}
