//! Customer persistence: the storage trait, its PostgreSQL implementation and table DDL.

use crate::error::StoreError;
use crate::model::{Customer, NewCustomer};
use async_trait::async_trait;
use sqlx::PgPool;

pub const CUSTOMERS_TABLE: &str = "customers";

const COLUMNS: &str = "id, first_name, last_name, date_of_birth, gender, e_mail, address";

/// Which customers a list query returns and how they are ordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CustomerFilter<'a> {
    /// Every row, by id.
    All,
    /// Exact first name match, ordered by first name.
    FirstName(&'a str),
    /// Exact last name match, ordered by last name.
    LastName(&'a str),
}

#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Insert and return the row with its storage-assigned id.
    async fn insert(&self, customer: &NewCustomer) -> Result<Customer, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, StoreError>;

    /// Insert or replace keyed by `customer.id`.
    async fn upsert(&self, customer: &Customer) -> Result<Customer, StoreError>;

    /// Returns the number of rows removed (0 when the id does not exist).
    async fn delete(&self, id: i64) -> Result<u64, StoreError>;

    async fn list(&self, filter: CustomerFilter<'_>) -> Result<Vec<Customer>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgCustomerStore {
    pool: PgPool,
}

impl PgCustomerStore {
    pub fn new(pool: PgPool) -> Self {
        PgCustomerStore { pool }
    }
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn insert(&self, customer: &NewCustomer) -> Result<Customer, StoreError> {
        let sql = format!(
            "INSERT INTO {} (first_name, last_name, date_of_birth, gender, e_mail, address) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            CUSTOMERS_TABLE, COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let row = sqlx::query_as::<_, Customer>(&sql)
            .bind(&customer.first_name)
            .bind(&customer.last_name)
            .bind(&customer.date_of_birth)
            .bind(customer.gender.as_str())
            .bind(&customer.email)
            .bind(customer.address.as_deref())
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, StoreError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", COLUMNS, CUSTOMERS_TABLE);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn upsert(&self, customer: &Customer) -> Result<Customer, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO {} ({})
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                date_of_birth = EXCLUDED.date_of_birth,
                gender = EXCLUDED.gender,
                e_mail = EXCLUDED.e_mail,
                address = EXCLUDED.address
            RETURNING {}
            "#,
            CUSTOMERS_TABLE, COLUMNS, COLUMNS
        );
        tracing::debug!(sql = %sql, id = customer.id, "query");
        let row = sqlx::query_as::<_, Customer>(&sql)
            .bind(customer.id)
            .bind(&customer.first_name)
            .bind(&customer.last_name)
            .bind(&customer.date_of_birth)
            .bind(customer.gender.as_str())
            .bind(&customer.email)
            .bind(customer.address.as_deref())
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: i64) -> Result<u64, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", CUSTOMERS_TABLE);
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn list(&self, filter: CustomerFilter<'_>) -> Result<Vec<Customer>, StoreError> {
        let (clause, value) = match filter {
            CustomerFilter::All => ("ORDER BY id", None),
            CustomerFilter::FirstName(name) => {
                ("WHERE first_name = $1 ORDER BY first_name, id", Some(name))
            }
            CustomerFilter::LastName(name) => {
                ("WHERE last_name = $1 ORDER BY last_name, id", Some(name))
            }
        };
        let sql = format!("SELECT {} FROM {} {}", COLUMNS, CUSTOMERS_TABLE, clause);
        tracing::debug!(sql = %sql, param = ?value, "query");
        let mut query = sqlx::query_as::<_, Customer>(&sql);
        if let Some(v) = value {
            query = query.bind(v);
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Create the customers table if it does not exist. Run once at startup.
pub async fn ensure_customers_table(pool: &PgPool) -> Result<(), StoreError> {
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id BIGSERIAL PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            date_of_birth TEXT NOT NULL,
            gender TEXT NOT NULL,
            e_mail TEXT NOT NULL,
            address TEXT
        )
        "#,
        CUSTOMERS_TABLE
    );
    sqlx::query(&ddl).execute(pool).await?;
    for column in ["first_name", "last_name"] {
        let index = format!(
            "CREATE INDEX IF NOT EXISTS {table}_{column}_idx ON {table} ({column})",
            table = CUSTOMERS_TABLE,
            column = column
        );
        sqlx::query(&index).execute(pool).await?;
    }
    tracing::info!(table = CUSTOMERS_TABLE, "customers table ready");
    Ok(())
}
