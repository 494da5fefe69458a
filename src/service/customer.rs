//! Customer operations: validation, merge and a single storage call each.

use crate::error::{AppError, StoreError};
use crate::model::{Customer, CustomerPatch, CustomerPayload};
use crate::service::validation::CustomerValidator;
use crate::store::{CustomerFilter, CustomerStore};
use chrono::NaiveDateTime;

pub struct CustomerService;

impl CustomerService {
    /// Validate a create request and insert it. Returns the stored row.
    pub async fn create(
        store: &dyn CustomerStore,
        validator: &CustomerValidator,
        payload: CustomerPayload,
        now: NaiveDateTime,
    ) -> Result<Customer, AppError> {
        let customer = validator.validate_new(payload, now).map_err(|e| {
            tracing::debug!(error = %e, "create rejected");
            e
        })?;
        let stored = store
            .insert(&customer)
            .await
            .map_err(|e| AppError::storage("Could not create customer", e))?;
        tracing::info!(id = stored.id, "customer created");
        Ok(stored)
    }

    /// Load, merge the supplied fields, then upsert once.
    /// A validation failure leaves storage untouched.
    pub async fn update(
        store: &dyn CustomerStore,
        validator: &CustomerValidator,
        id: i64,
        patch: CustomerPatch,
        now: NaiveDateTime,
    ) -> Result<Customer, AppError> {
        let current = store
            .find_by_id(id)
            .await
            .map_err(|e| AppError::storage("Could not update customer", e))?
            .ok_or_else(|| AppError::NotFound("Customer not found".into()))?;
        let merged = validator.apply_patch(&current, patch, now).map_err(|e| {
            tracing::debug!(id, error = %e, "update rejected");
            e
        })?;
        let stored = store
            .upsert(&merged)
            .await
            .map_err(|e| AppError::storage("Could not update customer", e))?;
        tracing::info!(id, "customer updated");
        Ok(stored)
    }

    /// Hard delete. Deleting an id that matches no row is not an error.
    pub async fn delete(store: &dyn CustomerStore, id: i64) -> Result<u64, AppError> {
        let affected = store
            .delete(id)
            .await
            .map_err(|e| AppError::storage("Could not delete customer", e))?;
        tracing::info!(id, affected, "customer deleted");
        Ok(affected)
    }

    pub async fn get(store: &dyn CustomerStore, id: i64) -> Result<Customer, AppError> {
        match store.find_by_id(id).await {
            Ok(Some(c)) => Ok(c),
            Ok(None) => Err(AppError::storage("Could not get the customer", StoreError::NotFound)),
            Err(e) => Err(AppError::storage("Could not get the customer", e)),
        }
    }

    pub async fn list(
        store: &dyn CustomerStore,
        filter: CustomerFilter<'_>,
    ) -> Result<Vec<Customer>, AppError> {
        store
            .list(filter)
            .await
            .map_err(|e| AppError::storage("Could not get customers", e))
    }
}
