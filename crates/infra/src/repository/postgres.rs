//! Postgres-backed repositories.
//!
//! Expected tables (schema management is handled outside this crate):
//!
//! ```text
//! customers       (id uuid pk, name text, email text unique, created_at timestamptz)
//! products        (id uuid pk, name text unique, price numeric, quantity integer,
//!                  created_at timestamptz, updated_at timestamptz)
//! orders          (id uuid pk, customer_id uuid -> customers.id, created_at timestamptz)
//! orders_products (order_id uuid -> orders.id, line_no integer, product_id uuid -> products.id,
//!                  quantity integer, price numeric, primary key (order_id, line_no))
//! ```
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (other) | Any other | `Database` |
//! | PoolClosed / other | N/A | `Database` |
//! | Row decode failure | N/A | `Corrupt` |

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgConnection, PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::{Span, instrument};
use uuid::Uuid;

use storefront_core::{CustomerId, Entity, OrderId, ProductId};
use storefront_customers::{Customer, NewCustomer};
use storefront_orders::{InventoryUpdate, Order, OrderLineItem};
use storefront_products::{NewProduct, Product};

use super::{CustomersRepository, OrdersRepository, ProductsRepository, StoreError};

/// Postgres store implementing every repository trait over one pool.
///
/// Uses SQLx connection pool which is thread-safe (Arc + Send + Sync).
/// Multi-statement writes (order + line items, stock batches) run in a transaction.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Arc<PgPool>,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl CustomersRepository for PostgresStore {
    #[instrument(skip(self, id), fields(customer_id = %id), err)]
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, created_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_customer_by_id", e))?;

        row.map(|r| customer_from_row(&r, "")).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, created_at
            FROM customers
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_customer_by_email", e))?;

        row.map(|r| customer_from_row(&r, "")).transpose()
    }

    #[instrument(skip(self, new), err)]
    async fn create(&self, new: NewCustomer) -> Result<Customer, StoreError> {
        let customer = Customer::register(CustomerId::new(), new, Utc::now())?;

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, email, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(customer.id().as_uuid())
        .bind(customer.name())
        .bind(customer.email())
        .bind(customer.created_at())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_customer", e))?;

        Ok(customer)
    }
}

#[async_trait]
impl ProductsRepository for PostgresStore {
    #[instrument(skip(self, ids), fields(requested = ids.len(), found = tracing::field::Empty), err)]
    async fn find_all_by_id(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

        let rows = sqlx::query(
            r#"
            SELECT id, name, price, quantity, created_at, updated_at
            FROM products
            WHERE id = ANY($1)
            "#,
        )
        .bind(uuids)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_products_by_ids", e))?;

        let products = rows
            .iter()
            .map(product_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Span::current().record("found", products.len());
        Ok(products)
    }

    #[instrument(skip(self), err)]
    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, price, quantity, created_at, updated_at
            FROM products
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_product_by_name", e))?;

        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self, new), fields(name = %new.name), err)]
    async fn create(&self, new: NewProduct) -> Result<Product, StoreError> {
        let product = Product::create(ProductId::new(), new, Utc::now())?;

        sqlx::query(
            r#"
            INSERT INTO products (id, name, price, quantity, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(product.id().as_uuid())
        .bind(product.name())
        .bind(product.price())
        .bind(to_db_quantity(product.quantity())?)
        .bind(product.created_at())
        .bind(product.updated_at())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_product", e))?;

        Ok(product)
    }

    /// Compare-and-set per product inside one transaction.
    #[instrument(skip(self, updates), fields(update_count = updates.len()), err)]
    async fn update_quantities(&self, updates: &[InventoryUpdate]) -> Result<(), StoreError> {
        if updates.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        if let Err(e) = apply_stock_updates(&mut tx, updates).await {
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(e);
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(())
    }
}

#[async_trait]
impl OrdersRepository for PostgresStore {
    #[instrument(
        skip(self, customer, line_items, stock),
        fields(
            customer_id = %customer.id(),
            line_count = line_items.len(),
            order_id = tracing::field::Empty
        ),
        err
    )]
    async fn create(
        &self,
        customer: &Customer,
        line_items: Vec<OrderLineItem>,
        stock: &[InventoryUpdate],
    ) -> Result<Order, StoreError> {
        let order = Order::place(OrderId::new(), customer.clone(), line_items, Utc::now())?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        // Guarded stock writes first: they lock the product rows for the rest of the
        // transaction, and a miss aborts before the order exists.
        if let Err(e) = apply_stock_updates(&mut tx, stock).await {
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(e);
        }

        sqlx::query(
            r#"
            INSERT INTO orders (id, customer_id, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(order.id().as_uuid())
        .bind(customer.id().as_uuid())
        .bind(order.created_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_order", e))?;

        for (idx, line) in order.line_items().iter().enumerate() {
            let line_no = i32::try_from(idx + 1)
                .map_err(|_| StoreError::Corrupt(format!("too many line items ({})", idx + 1)))?;
            sqlx::query(
                r#"
                INSERT INTO orders_products (order_id, line_no, product_id, quantity, price)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(order.id().as_uuid())
            .bind(line_no)
            .bind(line.product_id.as_uuid())
            .bind(to_db_quantity(line.quantity)?)
            .bind(line.price)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_order_line", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Span::current().record("order_id", tracing::field::display(order.id()));
        Ok(order)
    }

    #[instrument(skip(self, id), fields(order_id = %id), err)]
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let header = sqlx::query(
            r#"
            SELECT
                o.id,
                o.created_at,
                c.id AS customer_id,
                c.name AS customer_name,
                c.email AS customer_email,
                c.created_at AS customer_created_at
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            WHERE o.id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_order", e))?;

        let Some(header) = header else {
            return Ok(None);
        };

        let customer = customer_from_row(&header, "customer_")?;
        let created_at: DateTime<Utc> = header.try_get("created_at").map_err(corrupt)?;

        let lines = sqlx::query(
            r#"
            SELECT product_id, quantity, price
            FROM orders_products
            WHERE order_id = $1
            ORDER BY line_no ASC
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_order_lines", e))?;

        let line_items = lines
            .iter()
            .map(|r| {
                Ok::<_, StoreError>(OrderLineItem {
                    product_id: ProductId::from_uuid(r.try_get("product_id").map_err(corrupt)?),
                    quantity: from_db_quantity(r.try_get("quantity").map_err(corrupt)?)?,
                    price: r.try_get::<Decimal, _>("price").map_err(corrupt)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Order::place(id, customer, line_items, created_at)?))
    }
}

/// Run the guarded `UPDATE ... WHERE quantity = expected` for each update on `conn`.
///
/// Returns `Conflict` at the first product whose stock moved; the caller rolls back.
async fn apply_stock_updates(
    conn: &mut PgConnection,
    updates: &[InventoryUpdate],
) -> Result<(), StoreError> {
    for u in updates {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET quantity = $1, updated_at = NOW()
            WHERE id = $2 AND quantity = $3
            "#,
        )
        .bind(to_db_quantity(u.new_quantity)?)
        .bind(u.product_id.as_uuid())
        .bind(to_db_quantity(u.expected_quantity)?)
        .execute(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("update_product_quantity", e))?;

        if result.rows_affected() != 1 {
            return Err(StoreError::Conflict(format!(
                "stock for product {} changed since it was read (expected {})",
                u.product_id, u.expected_quantity
            )));
        }
    }
    Ok(())
}

/// Read a customer from `row`, with column names optionally prefixed (for joins).
///
/// The unprefixed layout uses `id`, `name`, `email`, `created_at`.
fn customer_from_row(row: &PgRow, prefix: &str) -> Result<Customer, StoreError> {
    let col = |name: &str| {
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}{name}")
        }
    };
    Ok(Customer::restore(
        CustomerId::from_uuid(row.try_get(col("id").as_str()).map_err(corrupt)?),
        row.try_get(col("name").as_str()).map_err(corrupt)?,
        row.try_get(col("email").as_str()).map_err(corrupt)?,
        row.try_get(col("created_at").as_str()).map_err(corrupt)?,
    ))
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    Ok(Product::restore(
        ProductId::from_uuid(row.try_get("id").map_err(corrupt)?),
        row.try_get("name").map_err(corrupt)?,
        row.try_get("price").map_err(corrupt)?,
        from_db_quantity(row.try_get("quantity").map_err(corrupt)?)?,
        row.try_get("created_at").map_err(corrupt)?,
        row.try_get("updated_at").map_err(corrupt)?,
    ))
}

fn to_db_quantity(quantity: u32) -> Result<i32, StoreError> {
    i32::try_from(quantity)
        .map_err(|_| StoreError::Corrupt(format!("quantity {quantity} does not fit an integer column")))
}

fn from_db_quantity(quantity: i32) -> Result<u32, StoreError> {
    u32::try_from(quantity)
        .map_err(|_| StoreError::Corrupt(format!("negative quantity {quantity} in database")))
}

fn corrupt(err: sqlx::Error) -> StoreError {
    StoreError::Corrupt(format!("failed to decode row: {err}"))
}

/// Map SQLx errors to StoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                // Unique violation (duplicate name / e-mail raced past the lookup).
                Some("23505") => StoreError::Conflict(msg),
                _ => StoreError::Database(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Database(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Database(format!("sqlx error in {}: {}", operation, err)),
    }
}
