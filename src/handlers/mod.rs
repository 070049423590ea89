pub mod actors;
pub mod common;
pub mod customers;
pub mod films;
pub mod rentals;

use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::customers::CustomerService;
use crate::services::rentals::RentalService;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub customers: Arc<CustomerService>,
    pub rentals: Arc<RentalService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        let customers = Arc::new(CustomerService::new(db_pool.clone(), event_sender.clone()));
        let rentals = Arc::new(RentalService::new(db_pool, event_sender));

        Self { customers, rentals }
    }
}
