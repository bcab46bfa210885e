use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;

use storefront_core::{CustomerId, Entity, ProductId};
use storefront_customers::{Customer, NewCustomer};
use storefront_infra::repository::{
    CustomersRepository, InMemoryOrders, InMemoryTable, ProductsRepository,
};
use storefront_infra::services::CreateOrderService;
use storefront_orders::{OrderRequest, RequestedProduct, plan_order};
use storefront_products::{MAX_QUANTITY, NewProduct, Product};

fn catalog(lines: usize) -> (OrderRequest, Vec<Product>) {
    let now = Utc::now();
    let products: Vec<Product> = (0..lines)
        .map(|i| {
            Product::create(
                ProductId::new(),
                NewProduct::new(format!("P{i}"), Decimal::new(1999, 2), 1_000),
                now,
            )
            .unwrap()
        })
        .collect();
    let request = OrderRequest::new(
        CustomerId::new(),
        products
            .iter()
            .map(|p| RequestedProduct {
                product_id: p.id(),
                quantity: 1,
            })
            .collect(),
    );
    (request, products)
}

/// Pure planning: lookup, stock checks, price snapshot.
fn bench_plan_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_order");

    for lines in [1usize, 10, 100] {
        let (request, products) = catalog(lines);
        group.throughput(Throughput::Elements(lines as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, _| {
            b.iter(|| plan_order(black_box(&request), black_box(&products)).unwrap());
        });
    }

    group.finish();
}

/// Full service call against in-memory tables.
fn bench_create_order(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let mut group = c.benchmark_group("create_order_in_memory");

    for lines in [1usize, 10] {
        let products = Arc::new(InMemoryTable::<Product>::new());
        let orders = Arc::new(InMemoryOrders::new(products.clone()));
        let customers = Arc::new(InMemoryTable::<Customer>::new());

        let (customer, ids) = rt.block_on(async {
            let customer =
                CustomersRepository::create(&*customers, NewCustomer::new("C1", "c1@example.com"))
                    .await
                    .unwrap();
            let mut ids = Vec::with_capacity(lines);
            for i in 0..lines {
                let p = ProductsRepository::create(
                    &*products,
                    NewProduct::new(format!("P{i}"), Decimal::ONE, MAX_QUANTITY),
                )
                .await
                .unwrap();
                ids.push(p.id());
            }
            (customer, ids)
        });

        let service = CreateOrderService::new(orders, products, customers);

        group.throughput(Throughput::Elements(lines as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, _| {
            b.iter(|| {
                let request = OrderRequest::new(
                    customer.id(),
                    ids.iter()
                        .map(|&product_id| RequestedProduct {
                            product_id,
                            quantity: 1,
                        })
                        .collect(),
                );
                rt.block_on(service.execute(request)).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_plan_order, bench_create_order);
criterion_main!(benches);
