//! In-memory store and request helpers for router tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Months, Utc};
use customer_service::{
    app, AppState, Customer, CustomerFilter, CustomerStore, CustomerValidator, NewCustomer,
    StoreError, DATE_OF_BIRTH_FORMAT,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<BTreeMap<i64, Customer>>,
    next_id: Mutex<i64>,
    pub writes: AtomicUsize,
    /// Every call fails as if the database were unreachable.
    pub fail: AtomicBool,
    /// Reads succeed, inserts/upserts/deletes fail.
    pub fail_writes: AtomicBool,
}

impl MemoryStore {
    fn check(&self) -> Result<(), StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), StoreError> {
        self.check()?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected("permission denied for table customers".into()));
        }
        Ok(())
    }

    pub fn get(&self, id: i64) -> Option<Customer> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn insert(&self, customer: &NewCustomer) -> Result<Customer, StoreError> {
        self.check_write()?;
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            *next
        };
        let row = customer.clone().into_customer(id);
        self.rows.lock().unwrap().insert(id, row.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, StoreError> {
        self.check()?;
        Ok(self.get(id))
    }

    async fn upsert(&self, customer: &Customer) -> Result<Customer, StoreError> {
        self.check_write()?;
        self.rows.lock().unwrap().insert(customer.id, customer.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(customer.clone())
    }

    async fn delete(&self, id: i64) -> Result<u64, StoreError> {
        self.check_write()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.lock().unwrap().remove(&id).map_or(0, |_| 1))
    }

    async fn list(&self, filter: CustomerFilter<'_>) -> Result<Vec<Customer>, StoreError> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        let mut out: Vec<Customer> = match filter {
            CustomerFilter::All => rows.values().cloned().collect(),
            CustomerFilter::FirstName(n) => {
                rows.values().filter(|c| c.first_name == n).cloned().collect()
            }
            CustomerFilter::LastName(n) => {
                rows.values().filter(|c| c.last_name == n).cloned().collect()
            }
        };
        match filter {
            CustomerFilter::FirstName(_) => {
                out.sort_by(|a, b| (&a.first_name, a.id).cmp(&(&b.first_name, b.id)))
            }
            CustomerFilter::LastName(_) => {
                out.sort_by(|a, b| (&a.last_name, a.id).cmp(&(&b.last_name, b.id)))
            }
            CustomerFilter::All => {}
        }
        Ok(out)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}

pub fn router() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let state = AppState::new(store.clone(), CustomerValidator::new().unwrap());
    (app(state), store)
}

/// Date of birth `years` years before today, formatted `DD-MM-YYYY`.
pub fn dob_years_ago(years: u32) -> String {
    let today = Utc::now().date_naive();
    today
        .checked_sub_months(Months::new(years * 12))
        .unwrap()
        .format(DATE_OF_BIRTH_FORMAT)
        .to_string()
}

pub fn valid_customer(first: &str, last: &str) -> serde_json::Value {
    serde_json::json!({
        "first_name": first,
        "last_name": last,
        "date_of_birth": dob_years_ago(30),
        "gender": "Male",
        "e_mail": "someone@example.com",
        "address": "12 Harbour Road"
    })
}

pub async fn call(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let body = match body {
        Some(v) => Body::from(serde_json::to_string(&v).unwrap()),
        None => Body::empty(),
    };
    send(router, builder.body(body).unwrap()).await
}

pub async fn send(router: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::json!(null)
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::json!(null))
    };
    (status, json)
}
