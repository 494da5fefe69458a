//! Shared application state for all routes.

use crate::service::CustomerValidator;
use crate::store::CustomerStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CustomerStore>,
    /// Built once at startup; rules never change while serving.
    pub validator: Arc<CustomerValidator>,
}

impl AppState {
    pub fn new(store: Arc<dyn CustomerStore>, validator: CustomerValidator) -> Self {
        AppState {
            store,
            validator: Arc::new(validator),
        }
    }
}
