use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::queries::rental_queries::RentedFilmsQuery;
use crate::queries::Query as _;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct RentFilmRequest {
    pub customer_id: Option<i32>,
    pub film_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ReturnFilmRequest {
    pub customer_id: Option<i32>,
    pub film_id: Option<i32>,
}

fn require(value: Option<i32>, field: &str) -> Result<i32, ServiceError> {
    value.ok_or_else(|| ServiceError::ValidationError(format!("{} is required", field)))
}

async fn rent_film(
    State(state): State<AppState>,
    Json(request): Json<RentFilmRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let customer_id = require(request.customer_id, "customer_id")?;
    let film_id = require(request.film_id, "film_id")?;

    let receipt = state
        .services
        .rentals
        .rent_film(customer_id, film_id)
        .await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

async fn return_film(
    State(state): State<AppState>,
    Json(request): Json<ReturnFilmRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let customer_id = require(request.customer_id, "customer_id")?;
    let film_id = require(request.film_id, "film_id")?;

    let receipt = state
        .services
        .rentals
        .return_film(customer_id, film_id)
        .await?;
    Ok(Json(receipt))
}

async fn rented_films(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let films = RentedFilmsQuery { customer_id }.execute(&state.db).await?;
    Ok(Json(json!({
        "customer_id": customer_id,
        "rented_films": films,
    })))
}

pub fn rental_routes() -> Router<AppState> {
    Router::new()
        .route("/rentFilm", post(rent_film))
        .route("/returnFilm", post(return_film))
        .route("/customer/:id/rentedFilms", get(rented_films))
}
