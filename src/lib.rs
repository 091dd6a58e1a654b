//! Customer service: CRUD and search over a single customers table.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::{AppError, ConfigError};
pub use model::{Customer, CustomerChanges, NewCustomer};
pub use routes::{app, common_routes, customer_routes};
pub use schema::{CustomerCreate, CustomerResponse, CustomerUpdate, ListParams};
pub use service::CustomerService;
pub use state::AppState;
pub use store::{
    ensure_customer_table, ensure_database_exists, CustomerStore, MemoryCustomerStore, PgCustomerStore,
};
