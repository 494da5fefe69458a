//! Customer handlers: create, update, delete, read, list and name lookups.

use crate::error::AppError;
use crate::model::{CustomerPatch, CustomerPayload};
use crate::response::{ok_data, ok_message};
use crate::service::CustomerService;
use crate::state::AppState;
use crate::store::CustomerFilter;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;

fn require_id(id_str: &str) -> Result<&str, AppError> {
    let id = id_str.trim();
    if id.is_empty() {
        return Err(AppError::Internal("ID cannot be empty".into()));
    }
    Ok(id)
}

fn parse_id(id_str: &str, message: &str) -> Result<i64, AppError> {
    id_str.parse().map_err(|_| AppError::BadRequest(message.into()))
}

pub async fn create_customer(
    State(state): State<AppState>,
    body: Result<Json<CustomerPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = body.map_err(|e| {
        tracing::debug!(error = %e, "create body rejected");
        AppError::Unprocessable("Request failed".into())
    })?;
    CustomerService::create(
        state.store.as_ref(),
        &state.validator,
        payload,
        Utc::now().naive_utc(),
    )
    .await?;
    Ok(ok_message("Customer has been added"))
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Result<Json<CustomerPatch>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(id_str.trim(), "Invalid id format")?;
    let Json(patch) = body.map_err(|e| {
        tracing::debug!(error = %e, "update body rejected");
        AppError::BadRequest("Could not parse update data".into())
    })?;
    CustomerService::update(
        state.store.as_ref(),
        &state.validator,
        id,
        patch,
        Utc::now().naive_utc(),
    )
    .await?;
    Ok(ok_message("Customer updated successfully"))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(require_id(&id_str)?, "Could not delete customer")?;
    CustomerService::delete(state.store.as_ref(), id).await?;
    Ok(ok_message("Customer deleted successfully"))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(require_id(&id_str)?, "Could not get the customer")?;
    let customer = CustomerService::get(state.store.as_ref(), id).await?;
    Ok(ok_data("Customer id fetched successfully", customer))
}

pub async fn list_customers(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = CustomerService::list(state.store.as_ref(), CustomerFilter::All).await?;
    Ok(ok_data("Customers fetched successfully", rows))
}

pub async fn list_by_first_name(
    State(state): State<AppState>,
    Path(first_name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let rows =
        CustomerService::list(state.store.as_ref(), CustomerFilter::FirstName(&first_name)).await?;
    Ok(ok_data("Customers fetched successfully", rows))
}

pub async fn list_by_last_name(
    State(state): State<AppState>,
    Path(last_name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let rows =
        CustomerService::list(state.store.as_ref(), CustomerFilter::LastName(&last_name)).await?;
    Ok(ok_data("Customers fetched successfully", rows))
}
