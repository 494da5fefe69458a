//! CustomerService: request rules applied in front of the store.

mod customer;
mod validation;
pub use customer::CustomerService;
pub use validation::{AgeWindow, CustomerValidator, Field, FieldRule, Format, DATE_OF_BIRTH_FORMAT};
