use std::sync::Arc;

use storefront_core::OrderId;
use storefront_customers::{Customer, NewCustomer};
use storefront_infra::{
    config::StoreConfig,
    repository::{InMemoryOrders, InMemoryTable, PostgresStore, StoreError},
    services::{
        CreateCustomerService, CreateOrderService, CreateProductService, FindOrderService,
        ServiceError,
    },
};
use storefront_orders::{Order, OrderRequest};
use storefront_products::{NewProduct, Product};

/// Repository wiring selected at startup.
///
/// Service structs are built per call; they only hold `Arc` clones.
#[derive(Clone)]
pub enum AppServices {
    InMemory {
        customers: Arc<InMemoryTable<Customer>>,
        products: Arc<InMemoryTable<Product>>,
        orders: Arc<InMemoryOrders>,
    },
    Postgres {
        store: Arc<PostgresStore>,
    },
}

impl AppServices {
    pub fn in_memory() -> Self {
        let products = Arc::new(InMemoryTable::new());
        AppServices::InMemory {
            customers: Arc::new(InMemoryTable::new()),
            orders: Arc::new(InMemoryOrders::new(products.clone())),
            products,
        }
    }

    pub async fn create_customer(&self, new: NewCustomer) -> Result<Customer, ServiceError> {
        match self {
            AppServices::InMemory { customers, .. } => {
                CreateCustomerService::new(customers.clone()).execute(new).await
            }
            AppServices::Postgres { store } => {
                CreateCustomerService::new(store.clone()).execute(new).await
            }
        }
    }

    pub async fn create_product(&self, new: NewProduct) -> Result<Product, ServiceError> {
        match self {
            AppServices::InMemory { products, .. } => {
                CreateProductService::new(products.clone()).execute(new).await
            }
            AppServices::Postgres { store } => {
                CreateProductService::new(store.clone()).execute(new).await
            }
        }
    }

    pub async fn create_order(&self, request: OrderRequest) -> Result<Order, ServiceError> {
        match self {
            AppServices::InMemory {
                customers,
                products,
                orders,
            } => {
                CreateOrderService::new(orders.clone(), products.clone(), customers.clone())
                    .execute(request)
                    .await
            }
            AppServices::Postgres { store } => {
                CreateOrderService::new(store.clone(), store.clone(), store.clone())
                    .execute(request)
                    .await
            }
        }
    }

    pub async fn find_order(&self, order_id: OrderId) -> Result<Order, ServiceError> {
        match self {
            AppServices::InMemory { orders, .. } => {
                FindOrderService::new(orders.clone()).execute(order_id).await
            }
            AppServices::Postgres { store } => {
                FindOrderService::new(store.clone()).execute(order_id).await
            }
        }
    }
}

pub async fn build_services(store: &StoreConfig) -> Result<AppServices, StoreError> {
    match store {
        StoreConfig::InMemory => {
            tracing::info!("using in-memory stores");
            Ok(AppServices::in_memory())
        }
        StoreConfig::Postgres {
            database_url,
            max_connections,
        } => {
            let store = PostgresStore::connect(database_url, *max_connections).await?;
            tracing::info!(max_connections, "using postgres stores");
            Ok(AppServices::Postgres {
                store: Arc::new(store),
            })
        }
    }
}
