use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Domain events emitted by the write-side services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    CustomerCreated(i32),
    CustomerDeleted(i32),
    FilmRented {
        rental_id: i32,
        film_id: i32,
        customer_id: i32,
    },
    FilmReturned {
        rental_id: i32,
        film_id: i32,
        customer_id: i32,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Background consumer for domain events. Event handling is currently
/// observational only; failures to deliver never affect the request
/// that produced the event.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match event {
            Event::CustomerCreated(customer_id) => {
                info!(customer_id, "customer created");
            }
            Event::CustomerDeleted(customer_id) => {
                info!(customer_id, "customer deleted");
            }
            Event::FilmRented {
                rental_id,
                film_id,
                customer_id,
            } => {
                info!(rental_id, film_id, customer_id, "film rented");
            }
            Event::FilmReturned {
                rental_id,
                film_id,
                customer_id,
            } => {
                info!(rental_id, film_id, customer_id, "film returned");
            }
        }
    }

    warn!("Event processing loop has ended");
}
