#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    middleware, Router,
};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseBackend, EntityTrait, PaginatorTrait, Set, Statement,
};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use rental_api::{
    config::AppConfig,
    db::{self, DbConfig},
    entities::{actor, category, customer, film, film_actor, film_category, inventory, rental},
    events::{self, EventSender},
    handlers::AppServices,
    middleware_helpers::request_id::request_id_middleware,
    AppState,
};

/// Schema for the sakila subset this service touches. Production never
/// creates these tables; tests own a private in-memory copy.
const SCHEMA: &[&str] = &[
    r#"CREATE TABLE film (
        film_id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT,
        release_year SMALLINT,
        language_id SMALLINT NOT NULL DEFAULT 1,
        rental_duration SMALLINT NOT NULL DEFAULT 3,
        rental_rate DECIMAL(4,2) NOT NULL DEFAULT 4.99,
        length SMALLINT,
        replacement_cost DECIMAL(5,2) NOT NULL DEFAULT 19.99,
        rating TEXT,
        special_features TEXT,
        last_update DATETIME NOT NULL
    );"#,
    r#"CREATE TABLE actor (
        actor_id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        last_update DATETIME NOT NULL
    );"#,
    r#"CREATE TABLE category (
        category_id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        last_update DATETIME NOT NULL
    );"#,
    r#"CREATE TABLE film_actor (
        actor_id INTEGER NOT NULL,
        film_id INTEGER NOT NULL,
        last_update DATETIME NOT NULL,
        PRIMARY KEY (actor_id, film_id)
    );"#,
    r#"CREATE TABLE film_category (
        film_id INTEGER NOT NULL,
        category_id INTEGER NOT NULL,
        last_update DATETIME NOT NULL,
        PRIMARY KEY (film_id, category_id)
    );"#,
    r#"CREATE TABLE customer (
        customer_id INTEGER PRIMARY KEY AUTOINCREMENT,
        store_id INTEGER NOT NULL,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email TEXT,
        address_id INTEGER NOT NULL,
        active BOOLEAN NOT NULL DEFAULT 1,
        create_date DATETIME NOT NULL,
        last_update DATETIME NOT NULL
    );"#,
    r#"CREATE TABLE inventory (
        inventory_id INTEGER PRIMARY KEY AUTOINCREMENT,
        film_id INTEGER NOT NULL,
        store_id INTEGER NOT NULL,
        last_update DATETIME NOT NULL
    );"#,
    r#"CREATE TABLE rental (
        rental_id INTEGER PRIMARY KEY AUTOINCREMENT,
        rental_date DATETIME NOT NULL,
        inventory_id INTEGER NOT NULL,
        customer_id INTEGER NOT NULL,
        return_date DATETIME,
        staff_id INTEGER NOT NULL,
        last_update DATETIME NOT NULL
    );"#,
];

/// Helper harness for spinning up an application backed by an in-memory
/// SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let cfg = AppConfig {
            database_url: Some("sqlite::memory:".to_string()),
            db_host: "localhost".to_string(),
            db_user: "root".to_string(),
            db_password: String::new(),
            host: "127.0.0.1".to_string(),
            port: 18_080,
            environment: "test".to_string(),
            log_level: "info".to_string(),
            log_json: false,
            db_max_connections: 1,
            db_min_connections: 1,
            db_connect_timeout_secs: 5,
            db_idle_timeout_secs: 600,
            db_acquire_timeout_secs: 5,
        };

        // A single connection keeps every statement on the same
        // in-memory database.
        let pool = db::establish_connection_with_config(&DbConfig {
            url: cfg.effective_database_url(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(600),
            acquire_timeout: Duration::from_secs(5),
        })
        .await
        .expect("failed to create test database");

        for ddl in SCHEMA {
            pool.execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                ddl.to_string(),
            ))
            .await
            .expect("create test schema");
        }

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db_arc.clone(), event_sender.clone());

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };

        let router = rental_api::routes()
            .layer(middleware::from_fn(request_id_middleware))
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Send a request against the router with an optional JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        self.request_with_headers(method, uri, body, &[]).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    // --- seeding helpers ------------------------------------------------

    pub async fn seed_film(&self, title: &str, rental_rate: Decimal) -> film::Model {
        film::ActiveModel {
            title: Set(title.to_string()),
            description: Set(Some(format!("{} description", title))),
            release_year: Set(Some(2006)),
            language_id: Set(1),
            rental_duration: Set(3),
            rental_rate: Set(rental_rate),
            length: Set(Some(90)),
            replacement_cost: Set(Decimal::new(1999, 2)),
            rating: Set(Some("PG".to_string())),
            special_features: Set(Some("Trailers".to_string())),
            last_update: Set(now()),
            ..Default::default()
        }
        .insert(self.state.db.as_ref())
        .await
        .expect("seed film")
    }

    pub async fn seed_category(&self, name: &str) -> category::Model {
        category::ActiveModel {
            name: Set(name.to_string()),
            last_update: Set(now()),
            ..Default::default()
        }
        .insert(self.state.db.as_ref())
        .await
        .expect("seed category")
    }

    pub async fn link_film_category(&self, film_id: i32, category_id: i32) {
        film_category::ActiveModel {
            film_id: Set(film_id),
            category_id: Set(category_id),
            last_update: Set(now()),
        }
        .insert(self.state.db.as_ref())
        .await
        .expect("link film to category");
    }

    pub async fn seed_actor(&self, first_name: &str, last_name: &str) -> actor::Model {
        actor::ActiveModel {
            first_name: Set(first_name.to_string()),
            last_name: Set(last_name.to_string()),
            last_update: Set(now()),
            ..Default::default()
        }
        .insert(self.state.db.as_ref())
        .await
        .expect("seed actor")
    }

    pub async fn link_film_actor(&self, actor_id: i32, film_id: i32) {
        film_actor::ActiveModel {
            actor_id: Set(actor_id),
            film_id: Set(film_id),
            last_update: Set(now()),
        }
        .insert(self.state.db.as_ref())
        .await
        .expect("link actor to film");
    }

    pub async fn seed_customer(&self, first_name: &str, last_name: &str) -> customer::Model {
        customer::ActiveModel {
            store_id: Set(1),
            first_name: Set(first_name.to_string()),
            last_name: Set(last_name.to_string()),
            email: Set(Some(format!(
                "{}.{}@example.com",
                first_name.to_lowercase(),
                last_name.to_lowercase()
            ))),
            address_id: Set(1),
            active: Set(true),
            create_date: Set(now()),
            last_update: Set(now()),
            ..Default::default()
        }
        .insert(self.state.db.as_ref())
        .await
        .expect("seed customer")
    }

    pub async fn seed_inventory(&self, film_id: i32, copies: usize) -> Vec<inventory::Model> {
        let mut created = Vec::with_capacity(copies);
        for _ in 0..copies {
            created.push(
                inventory::ActiveModel {
                    film_id: Set(film_id),
                    store_id: Set(1),
                    last_update: Set(now()),
                    ..Default::default()
                }
                .insert(self.state.db.as_ref())
                .await
                .expect("seed inventory copy"),
            );
        }
        created
    }

    /// Seeds an already-closed rental so report counts can be driven
    /// without tying up inventory.
    pub async fn seed_closed_rental(&self, inventory_id: i32, customer_id: i32) -> rental::Model {
        self.seed_rental(inventory_id, customer_id, now(), Some(now()))
            .await
    }

    pub async fn seed_rental(
        &self,
        inventory_id: i32,
        customer_id: i32,
        rental_date: NaiveDateTime,
        return_date: Option<NaiveDateTime>,
    ) -> rental::Model {
        rental::ActiveModel {
            rental_date: Set(rental_date),
            inventory_id: Set(inventory_id),
            customer_id: Set(customer_id),
            return_date: Set(return_date),
            staff_id: Set(1),
            last_update: Set(now()),
            ..Default::default()
        }
        .insert(self.state.db.as_ref())
        .await
        .expect("seed rental")
    }

    pub async fn rental_count(&self) -> u64 {
        rental::Entity::find()
            .count(self.state.db.as_ref())
            .await
            .expect("count rentals")
    }

    pub async fn customer_count(&self) -> u64 {
        customer::Entity::find()
            .count(self.state.db.as_ref())
            .await
            .expect("count customers")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

pub fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

pub async fn response_json(response: axum::response::Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
