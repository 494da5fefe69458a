//! Customer routes, mounted under `/api` by [`crate::routes::app`].

use crate::handlers::customer::{
    create_customer, delete_customer, get_customer, list_by_first_name, list_by_last_name,
    list_customers, update_customer,
};
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn customer_routes(state: AppState) -> Router {
    Router::new()
        .route("/create_customer", post(create_customer))
        .route("/update_customer/:id", put(update_customer))
        .route("/delete_customer/:id", delete(delete_customer))
        .route("/get_customer/:id", get(get_customer))
        .route("/customers", get(list_customers))
        .route("/get_customers_fn/:first_name", get(list_by_first_name))
        .route("/get_customers_ln/:last_name", get(list_by_last_name))
        .with_state(state)
}
