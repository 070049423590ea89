use async_trait::async_trait;
use sea_orm::sea_query::{Alias, Expr};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};

use super::{page_offset, Query, PAGE_SIZE};
use crate::entities::customer;
use crate::errors::ServiceError;

/// One row of the customers listing.
#[derive(Debug, Serialize)]
pub struct CustomerRow {
    pub customer_id: i32,
    pub store_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct CustomersPage {
    pub current_page: u64,
    pub customers_per_page: u64,
    pub total: u64,
    pub customers: Vec<CustomerRow>,
}

/// Paginated customers listing; the optional search term matches names,
/// email, and the customer id, case-insensitively.
#[derive(Debug, Serialize, Deserialize)]
pub struct CustomersTableQuery {
    pub page: u64,
    pub search: Option<String>,
}

impl CustomersTableQuery {
    fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

#[async_trait]
impl Query for CustomersTableQuery {
    type Result = CustomersPage;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let page = self.page.max(1);

        let mut selection = customer::Entity::find();
        if let Some(term) = self.search_term() {
            selection = selection.filter(customer_search_condition(term));
        }

        let total = selection.clone().count(db).await?;

        let customers = selection
            .order_by_asc(customer::Column::CustomerId)
            .limit(PAGE_SIZE)
            .offset(page_offset(page))
            .all(db)
            .await?
            .into_iter()
            .map(|c| CustomerRow {
                customer_id: c.customer_id,
                store_id: c.store_id,
                first_name: c.first_name,
                last_name: c.last_name,
                email: c.email,
                active: c.active,
            })
            .collect();

        Ok(CustomersPage {
            current_page: page,
            customers_per_page: PAGE_SIZE,
            total,
            customers,
        })
    }
}

// LIKE is case-insensitive under both the MySQL default collation and
// SQLite's ASCII rules. The id column is cast to text so a numeric
// search term can match it.
fn customer_search_condition(term: &str) -> Condition {
    let pattern = format!("%{}%", term);
    Condition::any()
        .add(customer::Column::FirstName.like(pattern.clone()))
        .add(customer::Column::LastName.like(pattern.clone()))
        .add(customer::Column::Email.like(pattern.clone()))
        .add(
            Expr::expr(
                Expr::col((customer::Entity, customer::Column::CustomerId))
                    .cast_as(Alias::new("char")),
            )
            .like(pattern),
        )
}
