use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/", post(create_customer))
}

pub async fn create_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateCustomerRequest>,
) -> axum::response::Response {
    match services.create_customer(body.into()).await {
        Ok(customer) => (StatusCode::CREATED, Json(dto::customer_to_json(&customer))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
