//! Rental API Library
//!
//! HTTP API over the externally owned `sakila` movie-rental schema:
//! top-five reports, searchable listings, detail views, and the
//! customer/rental write flows.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod middleware_helpers;
pub mod queries;
pub mod services;
pub mod tracing;

use axum::{extract::State, response::Json, routing::get, Router};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// Assembles the full route table. Route names and response field
/// casings are frozen for compatibility with existing clients.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "rental-api up" }))
        .route("/health", get(health_check))
        .merge(handlers::films::film_routes())
        .merge(handlers::actors::actor_routes())
        .merge(handlers::customers::customer_routes())
        .merge(handlers::rentals::rental_routes())
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    Json(json!({
        "status": if db_status == "healthy" { "healthy" } else { "degraded" },
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
