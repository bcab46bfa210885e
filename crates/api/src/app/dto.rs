use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;

use storefront_core::{CustomerId, Entity, ProductId};
use storefront_customers::{Customer, NewCustomer};
use storefront_orders::{Order, OrderLineItem, OrderRequest, RequestedProduct};
use storefront_products::{NewProduct, Product};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
}

impl From<CreateCustomerRequest> for NewCustomer {
    fn from(body: CreateCustomerRequest) -> Self {
        NewCustomer::new(body.name, body.email)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(body: CreateProductRequest) -> Self {
        NewProduct::new(body.name, body.price, body.quantity)
    }
}

#[derive(Debug, Deserialize)]
pub struct OrderProductRequest {
    pub id: String,
    pub quantity: u32,
    /// Accepted for compatibility; the stored product price is always used.
    #[serde(default)]
    pub price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: String,
    pub products: Vec<OrderProductRequest>,
}

impl CreateOrderRequest {
    pub fn into_domain(self) -> Result<OrderRequest, axum::response::Response> {
        let customer_id: CustomerId = self.customer_id.parse().map_err(|_| {
            errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid customer_id")
        })?;

        let products = self
            .products
            .into_iter()
            .map(|line| {
                let product_id: ProductId = line.id.parse().map_err(|_| {
                    errors::json_error(
                        StatusCode::BAD_REQUEST,
                        "invalid_id",
                        format!("invalid product id {:?}", line.id),
                    )
                })?;
                if let Some(price) = line.price {
                    tracing::debug!(%product_id, %price, "ignoring client-supplied price");
                }
                Ok(RequestedProduct {
                    product_id,
                    quantity: line.quantity,
                })
            })
            .collect::<Result<Vec<_>, axum::response::Response>>()?;

        Ok(OrderRequest::new(customer_id, products))
    }
}

// -------------------------
// Response mapping
// -------------------------

pub fn customer_to_json(c: &Customer) -> serde_json::Value {
    serde_json::json!({
        "id": c.id().to_string(),
        "name": c.name(),
        "email": c.email(),
        "created_at": c.created_at(),
    })
}

pub fn product_to_json(p: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": p.id().to_string(),
        "name": p.name(),
        "price": p.price(),
        "quantity": p.quantity(),
        "created_at": p.created_at(),
        "updated_at": p.updated_at(),
    })
}

fn line_item_to_json(l: &OrderLineItem) -> serde_json::Value {
    serde_json::json!({
        "product_id": l.product_id.to_string(),
        "quantity": l.quantity,
        "price": l.price,
    })
}

pub fn order_to_json(o: &Order) -> serde_json::Value {
    serde_json::json!({
        "id": o.id().to_string(),
        "customer": customer_to_json(o.customer()),
        "order_products": o.line_items().iter().map(line_item_to_json).collect::<Vec<_>>(),
        "created_at": o.created_at(),
    })
}
