//! Order planning: the read-only half of order creation.
//!
//! Given a request and the products the store returned for it, decide which line
//! items to write, or which check fails first. After the order is persisted, compute
//! the stock levels to write back.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, Entity, ProductId};
use storefront_products::Product;

use crate::order::{OrderLineItem, OrderRequest};

/// Stock write for one product after an order.
///
/// `expected_quantity` is the stock seen during validation; stores apply the
/// update only while the product still holds exactly that amount.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryUpdate {
    pub product_id: ProductId,
    pub expected_quantity: u32,
    pub new_quantity: u32,
}

/// Validate a request against the resolved products and build its line items.
///
/// Checks run in a fixed order and stop at the first failure:
/// 1. nothing resolved at all -> `NoProductsFound`
/// 2. first requested id missing from `resolved` -> `ProductNotFound`
/// 3. first line asking for more than is in stock -> `InsufficientStock`
///
/// Line items keep the request order and capture each product's current price.
pub fn plan_order(request: &OrderRequest, resolved: &[Product]) -> DomainResult<Vec<OrderLineItem>> {
    if resolved.is_empty() {
        return Err(DomainError::NoProductsFound);
    }

    let by_id = index(resolved);

    if let Some(missing) = request
        .products
        .iter()
        .find(|line| !by_id.contains_key(&line.product_id))
    {
        return Err(DomainError::ProductNotFound {
            product_id: missing.product_id,
        });
    }

    for line in &request.products {
        let product = by_id[&line.product_id];
        if !product.has_stock_for(line.quantity) {
            return Err(DomainError::InsufficientStock {
                product_id: line.product_id,
                requested: line.quantity,
                available: product.quantity(),
            });
        }
    }

    Ok(request
        .products
        .iter()
        .map(|line| OrderLineItem {
            product_id: line.product_id,
            quantity: line.quantity,
            price: by_id[&line.product_id].price(),
        })
        .collect())
}

/// Stock levels to write back for the planned line items.
///
/// `resolved` must be the same product snapshot the lines were planned against;
/// each update expects the stock seen in it.
pub fn inventory_updates(
    line_items: &[OrderLineItem],
    resolved: &[Product],
) -> DomainResult<Vec<InventoryUpdate>> {
    let by_id = index(resolved);

    line_items
        .iter()
        .map(|line| {
            let product = by_id
                .get(&line.product_id)
                .ok_or(DomainError::ProductNotFound {
                    product_id: line.product_id,
                })?;
            let new_quantity = product.quantity().checked_sub(line.quantity).ok_or(
                DomainError::InsufficientStock {
                    product_id: line.product_id,
                    requested: line.quantity,
                    available: product.quantity(),
                },
            )?;
            Ok(InventoryUpdate {
                product_id: line.product_id,
                expected_quantity: product.quantity(),
                new_quantity,
            })
        })
        .collect()
}

fn index(products: &[Product]) -> HashMap<ProductId, &Product> {
    products.iter().map(|p| (p.id(), p)).collect()
}
