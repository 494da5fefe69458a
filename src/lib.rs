//! Customer service: validated CRUD over a PostgreSQL `customers` table.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::{load_env_file, DbConfig, ServerConfig};
pub use error::{AppError, ConfigError, StoreError};
pub use model::{Customer, CustomerPatch, CustomerPayload, Gender, NewCustomer};
pub use response::Envelope;
pub use routes::{app, common_routes, customer_routes};
pub use service::{CustomerService, CustomerValidator, DATE_OF_BIRTH_FORMAT};
pub use state::AppState;
pub use store::{ensure_customers_table, CustomerFilter, CustomerStore, PgCustomerStore};
