use crate::db::DbPool;
use crate::entities::customer;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Store/address defaults applied when the caller does not specify them.
/// Every sakila deployment seeds store 1 and address 1.
const DEFAULT_STORE_ID: i32 = 1;
const DEFAULT_ADDRESS_ID: i32 = 1;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomerRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub store_id: Option<i32>,
    pub address_id: Option<i32>,
}

/// Service for managing customers
#[derive(Clone)]
pub struct CustomerService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl CustomerService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a new customer with a server-assigned creation timestamp.
    #[instrument(skip(self, request))]
    pub async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<customer::Model, ServiceError> {
        let first_name = required_field(request.first_name)?;
        let last_name = required_field(request.last_name)?;
        let email = required_field(request.email)?;

        let now = Utc::now().naive_utc();
        let created = customer::ActiveModel {
            store_id: Set(request.store_id.unwrap_or(DEFAULT_STORE_ID)),
            first_name: Set(first_name),
            last_name: Set(last_name),
            email: Set(Some(email)),
            address_id: Set(request.address_id.unwrap_or(DEFAULT_ADDRESS_ID)),
            active: Set(true),
            create_date: Set(now),
            last_update: Set(now),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;

        info!(customer_id = created.customer_id, "customer created");
        if let Err(e) = self
            .event_sender
            .send(Event::CustomerCreated(created.customer_id))
            .await
        {
            warn!(error = %e, "failed to publish customer created event");
        }

        Ok(created)
    }

    /// Deletes a customer, failing with NotFound when no row matches.
    #[instrument(skip(self))]
    pub async fn delete_customer(&self, customer_id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        customer::Entity::find_by_id(customer_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Customer not found".to_string()))?;

        customer::Entity::delete_by_id(customer_id).exec(db).await?;

        info!(customer_id, "customer deleted");
        if let Err(e) = self
            .event_sender
            .send(Event::CustomerDeleted(customer_id))
            .await
        {
            warn!(error = %e, "failed to publish customer deleted event");
        }

        Ok(())
    }
}

fn required_field(value: Option<String>) -> Result<String, ServiceError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ServiceError::ValidationError(
            "Please fill all fields".to_string(),
        )),
    }
}
