//! Customer service binary: loads `.env`, connects to PostgreSQL, creates the table, serves HTTP.

use customer_service::{
    app, ensure_customers_table, load_env_file, AppState, CustomerValidator, DbConfig,
    PgCustomerStore, ServerConfig,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_env_file(".env")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("customer_service=info,tower_http=info")),
        )
        .init();

    let db = DbConfig::from_env()?;
    let server = ServerConfig::from_env();

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(db.max_connections)
        .connect_with(db.connect_options())
        .await
        .map_err(|e| {
            tracing::error!(
                host = %db.host,
                port = db.port,
                error = %e,
                "could not connect to database"
            );
            e
        })?;
    ensure_customers_table(&pool).await?;

    let state = AppState::new(Arc::new(PgCustomerStore::new(pool)), CustomerValidator::new()?);

    let listener = TcpListener::bind(&server.addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
