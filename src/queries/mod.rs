//! Read-side query objects. Each query owns its parameters and knows how
//! to execute itself against a connection, keeping handler code thin.

pub mod actor_queries;
pub mod customer_queries;
pub mod film_queries;
pub mod rental_queries;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;

/// Fixed page size for the table listing endpoints.
pub const PAGE_SIZE: u64 = 20;

#[async_trait]
pub trait Query: Send + Sync {
    type Result: Send + Sync;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError>;
}

/// Zero-based row offset for a 1-based page number.
pub(crate) fn page_offset(page: u64) -> u64 {
    page.saturating_sub(1) * PAGE_SIZE
}
