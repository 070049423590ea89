use super::common::TableParams;
use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::queries::customer_queries::CustomersTableQuery;
use crate::queries::Query as _;
use crate::services::customers::CreateCustomerRequest;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;

async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.customers.create_customer(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state
        .services
        .customers
        .delete_customer(customer_id)
        .await?;
    Ok(Json(json!({
        "deleted": true,
        "customer_id": customer_id,
    })))
}

async fn customers_table(
    State(state): State<AppState>,
    Query(params): Query<TableParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = CustomersTableQuery {
        page: params.page(),
        search: params.search,
    }
    .execute(&state.db)
    .await?;
    Ok(Json(page))
}

pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/customers", post(create_customer))
        .route("/customers/:id", delete(delete_customer))
        .route("/customersTable", get(customers_table))
}
