//! Integration tests for the order pipeline against in-memory repositories.
//!
//! Tests: OrderRequest → CreateOrderService → orders + products tables
//!
//! Verifies:
//! - Stock is decremented by exactly the ordered quantities
//! - Rejected orders leave every table untouched
//! - Line items sum to the requested quantities

use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal::Decimal;

use storefront_core::{CustomerId, DomainError, Entity, ProductId};
use storefront_customers::{Customer, NewCustomer};
use storefront_orders::{OrderRequest, RequestedProduct};
use storefront_products::{NewProduct, Product};

use crate::repository::{CustomersRepository, InMemoryOrders, InMemoryTable, ProductsRepository};
use crate::services::{CreateOrderService, CreateProductService, ServiceError};

type Tables = (
    Arc<InMemoryOrders>,
    Arc<InMemoryTable<Product>>,
    Arc<InMemoryTable<Customer>>,
);

fn tables() -> Tables {
    let products = Arc::new(InMemoryTable::new());
    (
        Arc::new(InMemoryOrders::new(products.clone())),
        products,
        Arc::new(InMemoryTable::new()),
    )
}

fn order_service(
    (orders, products, customers): &Tables,
) -> CreateOrderService<
    Arc<InMemoryOrders>,
    Arc<InMemoryTable<Product>>,
    Arc<InMemoryTable<Customer>>,
> {
    CreateOrderService::new(orders.clone(), products.clone(), customers.clone())
}

async fn seed_customer(t: &Tables) -> Customer {
    CustomersRepository::create(&*t.2, NewCustomer::new("C1", "c1@example.com"))
        .await
        .unwrap()
}

async fn seed_product(t: &Tables, name: &str, quantity: u32) -> Product {
    ProductsRepository::create(&*t.1, NewProduct::new(name, Decimal::new(1000, 2), quantity))
        .await
        .unwrap()
}

fn req(customer_id: CustomerId, lines: &[(ProductId, u32)]) -> OrderRequest {
    OrderRequest::new(
        customer_id,
        lines
            .iter()
            .map(|&(product_id, quantity)| RequestedProduct {
                product_id,
                quantity,
            })
            .collect(),
    )
}

fn stock(t: &Tables, id: ProductId) -> u32 {
    t.1.get(id).unwrap().quantity()
}

#[tokio::test]
async fn order_decrements_stock_then_oversell_is_rejected() {
    let t = tables();
    let c1 = seed_customer(&t).await;
    let p1 = seed_product(&t, "P1", 5).await;
    let service = order_service(&t);

    let order = service
        .execute(req(c1.id(), &[(p1.id(), 3)]))
        .await
        .unwrap();
    assert_eq!(order.customer().id(), c1.id());
    assert_eq!(order.line_items().len(), 1);
    assert_eq!(order.line_items()[0].quantity, 3);
    assert_eq!(order.line_items()[0].price, Decimal::new(1000, 2));
    assert_eq!(stock(&t, p1.id()), 2);

    let err = service
        .execute(req(c1.id(), &[(p1.id(), 5)]))
        .await
        .unwrap_err();
    match err {
        ServiceError::Domain(DomainError::InsufficientStock {
            product_id,
            requested,
            available,
        }) => {
            assert_eq!(product_id, p1.id());
            assert_eq!(requested, 5);
            assert_eq!(available, 2);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }
    assert_eq!(stock(&t, p1.id()), 2);
    assert_eq!(t.0.len(), 1);
}

#[tokio::test]
async fn unknown_customer_writes_nothing() {
    let t = tables();
    let p1 = seed_product(&t, "P1", 5).await;
    let product_writes = t.1.write_count();

    let err = order_service(&t)
        .execute(req(CustomerId::new(), &[(p1.id(), 1)]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::CustomerNotFound { .. })
    ));
    assert_eq!(t.0.write_count(), 0);
    assert_eq!(t.1.write_count(), product_writes);
    assert_eq!(stock(&t, p1.id()), 5);
}

#[tokio::test]
async fn unknown_product_in_any_position_writes_nothing() {
    let t = tables();
    let c1 = seed_customer(&t).await;
    let a = seed_product(&t, "A", 5).await;
    let b = seed_product(&t, "B", 5).await;
    let product_writes = t.1.write_count();
    let service = order_service(&t);

    for position in 0..3 {
        let missing = ProductId::new();
        let mut lines = vec![(a.id(), 1), (b.id(), 1)];
        lines.insert(position, (missing, 1));

        let err = service.execute(req(c1.id(), &lines)).await.unwrap_err();
        match err {
            ServiceError::Domain(DomainError::ProductNotFound { product_id }) => {
                assert_eq!(product_id, missing)
            }
            other => panic!("expected ProductNotFound, got {other:?}"),
        }
    }

    assert_eq!(t.0.write_count(), 0);
    assert_eq!(t.1.write_count(), product_writes);
    assert_eq!(stock(&t, a.id()), 5);
    assert_eq!(stock(&t, b.id()), 5);
}

#[tokio::test]
async fn all_products_unknown_is_empty_result() {
    let t = tables();
    let c1 = seed_customer(&t).await;

    let err = order_service(&t)
        .execute(req(c1.id(), &[(ProductId::new(), 1)]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::NoProductsFound)
    ));
    assert_eq!(t.0.write_count(), 0);
}

#[tokio::test]
async fn shortage_on_one_line_rejects_whole_order() {
    let t = tables();
    let c1 = seed_customer(&t).await;
    let a = seed_product(&t, "A", 5).await;
    let b = seed_product(&t, "B", 1).await;
    let product_writes = t.1.write_count();

    let err = order_service(&t)
        .execute(req(c1.id(), &[(a.id(), 2), (b.id(), 2)]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::InsufficientStock { .. })
    ));
    assert_eq!(t.0.write_count(), 0);
    assert_eq!(t.1.write_count(), product_writes);
    assert_eq!(stock(&t, a.id()), 5);
    assert_eq!(stock(&t, b.id()), 1);
}

#[tokio::test]
async fn ordering_exact_stock_empties_product() {
    let t = tables();
    let c1 = seed_customer(&t).await;
    let p1 = seed_product(&t, "P1", 4).await;

    order_service(&t)
        .execute(req(c1.id(), &[(p1.id(), 4)]))
        .await
        .unwrap();

    assert_eq!(stock(&t, p1.id()), 0);
}

#[tokio::test]
async fn duplicate_product_name_keeps_single_record() {
    let t = tables();
    let service = CreateProductService::new(t.1.clone());
    service
        .execute(NewProduct::new("Widget", Decimal::new(500, 2), 3))
        .await
        .unwrap();

    let err = service
        .execute(NewProduct::new("Widget", Decimal::new(700, 2), 8))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::DuplicateName { .. })
    ));
    assert_eq!(t.1.len(), 1);
    let kept = t.1.find_by_name("Widget").await.unwrap().unwrap();
    assert_eq!(kept.price(), Decimal::new(500, 2));
    assert_eq!(kept.quantity(), 3);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn stock_after_order_is_before_minus_ordered(
        lines in prop::collection::vec((0u32..20, 1u32..20), 1..5)
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        rt.block_on(async {
            let t = tables();
            let c1 = seed_customer(&t).await;

            let mut seeded = Vec::new();
            for (i, (extra, ordered)) in lines.iter().enumerate() {
                let before = ordered + extra;
                let p = seed_product(&t, &format!("P{i}"), before).await;
                seeded.push((p.id(), before, *ordered));
            }

            let wanted: Vec<(ProductId, u32)> =
                seeded.iter().map(|&(id, _, q)| (id, q)).collect();
            let order = order_service(&t)
                .execute(req(c1.id(), &wanted))
                .await
                .unwrap();

            let requested_total: u64 = wanted.iter().map(|&(_, q)| u64::from(q)).sum();
            assert_eq!(order.total_quantity(), requested_total);

            for (id, before, ordered) in seeded {
                assert_eq!(stock(&t, id), before - ordered);
            }
        });
    }
}
