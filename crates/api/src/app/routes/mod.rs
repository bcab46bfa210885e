use axum::Router;

pub mod customers;
pub mod orders;
pub mod products;
pub mod system;

/// Router for all resource endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/customers", customers::router())
        .nest("/products", products::router())
        .nest("/orders", orders::router())
}
