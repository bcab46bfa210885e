use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use storefront_core::{CustomerId, Entity, OrderId, ProductId};
use storefront_customers::{Customer, NewCustomer};
use storefront_orders::{InventoryUpdate, Order, OrderLineItem};
use storefront_products::{NewProduct, Product};

use super::{CustomersRepository, OrdersRepository, ProductsRepository, StoreError};

/// In-memory entity table keyed by `Entity::id`.
///
/// Intended for tests/dev. Not optimized for performance. Counts successful write
/// operations so tests can assert that a failed workflow wrote nothing.
#[derive(Debug)]
pub struct InMemoryTable<E: Entity> {
    rows: RwLock<HashMap<E::Id, E>>,
    writes: AtomicU64,
}

impl<E: Entity> InMemoryTable<E> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            writes: AtomicU64::new(0),
        }
    }

    /// Number of write operations that changed this table.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Row count. Reads through a poisoned lock so inspection reports what is stored.
    pub fn len(&self) -> usize {
        self.rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: Entity + Clone> InMemoryTable<E> {
    /// Reads through a poisoned lock, like `len`.
    pub fn get(&self, id: E::Id) -> Option<E> {
        self.rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    fn find(&self, pred: impl Fn(&E) -> bool) -> Result<Option<E>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.values().find(|e| pred(e)).cloned())
    }

    fn insert(&self, entity: E) -> Result<E, StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        rows.insert(entity.id(), entity.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(entity)
    }
}

impl<E: Entity> Default for InMemoryTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StoreError {
    StoreError::Database("lock poisoned".to_string())
}

/// Verify every product still holds its expected stock. Writes nothing.
fn check_stock(
    rows: &HashMap<ProductId, Product>,
    updates: &[InventoryUpdate],
) -> Result<(), StoreError> {
    for u in updates {
        let current = rows
            .get(&u.product_id)
            .map(Product::quantity)
            .ok_or_else(|| StoreError::Conflict(format!("product {} vanished", u.product_id)))?;
        if current != u.expected_quantity {
            return Err(StoreError::Conflict(format!(
                "product {} stock is {}, expected {}",
                u.product_id, current, u.expected_quantity
            )));
        }
    }
    Ok(())
}

/// Caller must have run `check_stock` under the same guard.
fn apply_stock(rows: &mut HashMap<ProductId, Product>, updates: &[InventoryUpdate], at: DateTime<Utc>) {
    for u in updates {
        if let Some(p) = rows.get_mut(&u.product_id) {
            p.set_quantity(u.new_quantity, at);
        }
    }
}

#[async_trait]
impl CustomersRepository for InMemoryTable<Customer> {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, StoreError> {
        self.find(|c| c.email() == email)
    }

    async fn create(&self, new: NewCustomer) -> Result<Customer, StoreError> {
        let customer = Customer::register(CustomerId::new(), new, Utc::now())?;
        self.insert(customer)
    }
}

#[async_trait]
impl ProductsRepository for InMemoryTable<Product> {
    async fn find_all_by_id(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        let mut found: Vec<Product> = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(p) = rows.get(id) {
                if !found.iter().any(|f| f.id() == *id) {
                    found.push(p.clone());
                }
            }
        }
        Ok(found)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, StoreError> {
        self.find(|p| p.name() == name)
    }

    async fn create(&self, new: NewProduct) -> Result<Product, StoreError> {
        let product = Product::create(ProductId::new(), new, Utc::now())?;
        self.insert(product)
    }

    async fn update_quantities(&self, updates: &[InventoryUpdate]) -> Result<(), StoreError> {
        if updates.is_empty() {
            return Ok(());
        }

        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        check_stock(&rows, updates)?;
        apply_stock(&mut rows, updates, Utc::now());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Orders table bound to the product table its orders draw stock from.
///
/// `create` holds the product lock while it checks stock, inserts the order, and
/// writes the new quantities, so a stale stock read leaves both tables untouched.
#[derive(Debug)]
pub struct InMemoryOrders {
    orders: InMemoryTable<Order>,
    products: Arc<InMemoryTable<Product>>,
}

impl InMemoryOrders {
    pub fn new(products: Arc<InMemoryTable<Product>>) -> Self {
        Self {
            orders: InMemoryTable::new(),
            products,
        }
    }

    /// Number of orders written.
    pub fn write_count(&self) -> u64 {
        self.orders.write_count()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn get(&self, id: OrderId) -> Option<Order> {
        self.orders.get(id)
    }
}

#[async_trait]
impl OrdersRepository for InMemoryOrders {
    async fn create(
        &self,
        customer: &Customer,
        line_items: Vec<OrderLineItem>,
        stock: &[InventoryUpdate],
    ) -> Result<Order, StoreError> {
        let now = Utc::now();
        let order = Order::place(OrderId::new(), customer.clone(), line_items, now)?;

        // Lock order: products, then orders.
        let mut products = self.products.rows.write().map_err(|_| poisoned())?;
        check_stock(&products, stock)?;

        let mut orders = self.orders.rows.write().map_err(|_| poisoned())?;
        orders.insert(order.id(), order.clone());
        self.orders.writes.fetch_add(1, Ordering::SeqCst);

        if !stock.is_empty() {
            apply_stock(&mut products, stock, now);
            self.products.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(order)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let rows = self.orders.rows.read().map_err(|_| poisoned())?;
        Ok(rows.get(&id).cloned())
    }
}
