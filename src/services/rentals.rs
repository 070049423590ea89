use crate::db::DbPool;
use crate::entities::{customer, film, inventory, rental};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set, Statement, TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Rentals recorded through the API are attributed to the default staff
/// member; the schema requires one and the API surface has no staff
/// concept.
const DEFAULT_STAFF_ID: i32 = 1;

#[derive(Debug, Serialize)]
pub struct RentalReceipt {
    pub rental_id: i32,
    pub inventory_id: i32,
    pub film_id: i32,
    pub customer_id: i32,
    pub rental_date: NaiveDateTime,
}

#[derive(Debug, Serialize)]
pub struct ReturnReceipt {
    pub rental_id: i32,
    pub film_id: i32,
    pub customer_id: i32,
    pub returned: bool,
    pub return_date: NaiveDateTime,
}

/// Service for the rent/return flows
#[derive(Clone)]
pub struct RentalService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl RentalService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Rents one available copy of a film to a customer.
    ///
    /// The availability check and the rental insert are a single
    /// conditional `INSERT ... SELECT` inside a transaction, so two
    /// concurrent requests cannot both claim the last copy.
    #[instrument(skip(self))]
    pub async fn rent_film(
        &self,
        customer_id: i32,
        film_id: i32,
    ) -> Result<RentalReceipt, ServiceError> {
        let db = &*self.db_pool;

        customer::Entity::find_by_id(customer_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Customer not found".to_string()))?;
        film::Entity::find_by_id(film_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Film not found".to_string()))?;

        let now = Utc::now().naive_utc();
        let txn = db.begin().await?;

        let insert = Statement::from_sql_and_values(
            txn.get_database_backend(),
            r#"INSERT INTO rental (rental_date, inventory_id, customer_id, return_date, staff_id, last_update)
               SELECT ?, i.inventory_id, ?, NULL, ?, ?
               FROM inventory i
               WHERE i.film_id = ?
                 AND NOT EXISTS (
                     SELECT 1 FROM rental r
                     WHERE r.inventory_id = i.inventory_id
                       AND r.return_date IS NULL
                 )
               ORDER BY i.inventory_id
               LIMIT 1"#,
            vec![
                now.into(),
                customer_id.into(),
                DEFAULT_STAFF_ID.into(),
                now.into(),
                film_id.into(),
            ],
        );

        let result = txn.execute(insert).await?;
        if result.rows_affected() == 0 {
            txn.rollback().await?;
            return Err(ServiceError::Conflict(
                "No copies of this film are currently available".to_string(),
            ));
        }

        let recorded = rental::Entity::find()
            .join(JoinType::InnerJoin, rental::Relation::Inventory.def())
            .filter(inventory::Column::FilmId.eq(film_id))
            .filter(rental::Column::CustomerId.eq(customer_id))
            .filter(rental::Column::ReturnDate.is_null())
            .order_by_desc(rental::Column::RentalId)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError("rental row missing after insert".to_string())
            })?;

        txn.commit().await?;

        info!(
            rental_id = recorded.rental_id,
            inventory_id = recorded.inventory_id,
            customer_id,
            film_id,
            "film rented"
        );
        if let Err(e) = self
            .event_sender
            .send(Event::FilmRented {
                rental_id: recorded.rental_id,
                film_id,
                customer_id,
            })
            .await
        {
            warn!(error = %e, "failed to publish film rented event");
        }

        Ok(RentalReceipt {
            rental_id: recorded.rental_id,
            inventory_id: recorded.inventory_id,
            film_id,
            customer_id,
            rental_date: recorded.rental_date,
        })
    }

    /// Closes the customer's most recent open rental of the film.
    #[instrument(skip(self))]
    pub async fn return_film(
        &self,
        customer_id: i32,
        film_id: i32,
    ) -> Result<ReturnReceipt, ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await?;

        let open = rental::Entity::find()
            .join(JoinType::InnerJoin, rental::Relation::Inventory.def())
            .filter(inventory::Column::FilmId.eq(film_id))
            .filter(rental::Column::CustomerId.eq(customer_id))
            .filter(rental::Column::ReturnDate.is_null())
            .order_by_desc(rental::Column::RentalDate)
            .order_by_desc(rental::Column::RentalId)
            .one(&txn)
            .await?;

        let Some(open) = open else {
            txn.rollback().await?;
            return Err(ServiceError::InvalidOperation(
                "Customer is not renting this film".to_string(),
            ));
        };

        let now = Utc::now().naive_utc();
        let rental_id = open.rental_id;
        let mut active: rental::ActiveModel = open.into();
        active.return_date = Set(Some(now));
        active.last_update = Set(now);
        active.update(&txn).await?;

        txn.commit().await?;

        info!(rental_id, customer_id, film_id, "film returned");
        if let Err(e) = self
            .event_sender
            .send(Event::FilmReturned {
                rental_id,
                film_id,
                customer_id,
            })
            .await
        {
            warn!(error = %e, "failed to publish film returned event");
        }

        Ok(ReturnReceipt {
            rental_id,
            film_id,
            customer_id,
            returned: true,
            return_date: now,
        })
    }
}
