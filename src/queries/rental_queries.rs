use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use serde::{Deserialize, Serialize};

use super::Query;
use crate::entities::{film, inventory, rental};
use crate::errors::ServiceError;

/// One film a customer currently has out.
#[derive(Debug, Serialize, FromQueryResult)]
pub struct RentedFilm {
    pub rental_id: i32,
    pub film_id: i32,
    pub title: String,
    pub rental_date: chrono::NaiveDateTime,
}

/// Open rentals for one customer, most recent first. Reads the rental
/// table only; an unknown customer id simply yields an empty list.
#[derive(Debug, Serialize, Deserialize)]
pub struct RentedFilmsQuery {
    pub customer_id: i32,
}

#[async_trait]
impl Query for RentedFilmsQuery {
    type Result = Vec<RentedFilm>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        rental::Entity::find()
            .join(JoinType::InnerJoin, rental::Relation::Inventory.def())
            .join(JoinType::InnerJoin, inventory::Relation::Film.def())
            .filter(rental::Column::CustomerId.eq(self.customer_id))
            .filter(rental::Column::ReturnDate.is_null())
            .select_only()
            .column_as(rental::Column::RentalId, "rental_id")
            .column_as(Expr::col((film::Entity, film::Column::FilmId)), "film_id")
            .column_as(Expr::col((film::Entity, film::Column::Title)), "title")
            .column_as(rental::Column::RentalDate, "rental_date")
            .order_by_desc(rental::Column::RentalDate)
            .order_by_desc(rental::Column::RentalId)
            .into_model::<RentedFilm>()
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }
}
