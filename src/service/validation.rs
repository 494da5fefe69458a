//! Customer field rules and the validator that applies them.

use crate::error::AppError;
use crate::model::{
    Customer, CustomerPatch, CustomerPayload, Gender, NewCustomer, ParseGenderError,
};
use chrono::{Months, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

pub const DATE_OF_BIRTH_FORMAT: &str = "%d-%m-%Y";

const EMAIL_PATTERN: &str = concat!(
    r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+",
    r"@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?",
    r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
);

/// Customer fields in the order they are validated and merged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    FirstName,
    LastName,
    DateOfBirth,
    Gender,
    Email,
    Address,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::FirstName,
        Field::LastName,
        Field::DateOfBirth,
        Field::Gender,
        Field::Email,
        Field::Address,
    ];

    /// JSON name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::DateOfBirth => "date_of_birth",
            Field::Gender => "gender",
            Field::Email => "e_mail",
            Field::Address => "address",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Email,
    DateOfBirth,
}

#[derive(Clone, Debug, Default)]
pub struct FieldRule {
    pub required: bool,
    pub max_length: Option<usize>,
    pub format: Option<Format>,
    pub allowed: Option<&'static [&'static str]>,
}

/// Exclusive age bounds in whole years, relative to the moment of validation.
#[derive(Clone, Copy, Debug)]
pub struct AgeWindow {
    pub min_years: u32,
    pub max_years: u32,
}

impl AgeWindow {
    /// True when `now - max_years < dob < now - min_years`, with `dob` taken at midnight.
    pub fn contains(&self, dob: NaiveDate, now: NaiveDateTime) -> bool {
        let born = dob.and_time(NaiveTime::default());
        let (Some(oldest), Some(youngest)) = (
            now.checked_sub_months(Months::new(self.max_years * 12)),
            now.checked_sub_months(Months::new(self.min_years * 12)),
        ) else {
            return false;
        };
        born > oldest && born < youngest
    }
}

/// Immutable rule table plus compiled patterns. Built once at startup and shared.
pub struct CustomerValidator {
    rules: Vec<(Field, FieldRule)>,
    email: Regex,
    age: AgeWindow,
}

impl CustomerValidator {
    pub fn new() -> Result<Self, regex::Error> {
        let rules = vec![
            (
                Field::FirstName,
                FieldRule { required: true, max_length: Some(100), ..Default::default() },
            ),
            (
                Field::LastName,
                FieldRule { required: true, max_length: Some(100), ..Default::default() },
            ),
            (
                Field::DateOfBirth,
                FieldRule {
                    required: true,
                    format: Some(Format::DateOfBirth),
                    ..Default::default()
                },
            ),
            (
                Field::Gender,
                FieldRule { required: true, allowed: Some(Gender::ALLOWED), ..Default::default() },
            ),
            (
                Field::Email,
                FieldRule { required: true, format: Some(Format::Email), ..Default::default() },
            ),
            (
                Field::Address,
                FieldRule { max_length: Some(200), ..Default::default() },
            ),
        ];
        Ok(CustomerValidator {
            rules,
            email: Regex::new(EMAIL_PATTERN)?,
            age: AgeWindow { min_years: 18, max_years: 60 },
        })
    }

    pub fn rule(&self, field: Field) -> Option<&FieldRule> {
        self.rules.iter().find(|(f, _)| *f == field).map(|(_, r)| r)
    }

    /// Validate one field value on its own. `None` means the field was not supplied.
    pub fn validate_field(
        &self,
        field: Field,
        value: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<(), AppError> {
        let Some(rule) = self.rule(field) else {
            return Ok(());
        };
        let name = field.as_str();
        let value = match value {
            Some(v) if !v.is_empty() => v,
            _ if rule.required => {
                return Err(AppError::Unprocessable(format!("{} is required", name)));
            }
            _ => return Ok(()),
        };
        if let Some(max) = rule.max_length {
            if value.chars().count() > max {
                return Err(AppError::Unprocessable(format!(
                    "{} must be at most {} characters",
                    name, max
                )));
            }
        }
        match rule.format {
            Some(Format::Email) => {
                if !self.email.is_match(value) {
                    return Err(AppError::Unprocessable(format!("{} must be a valid email", name)));
                }
            }
            Some(Format::DateOfBirth) => self.validate_date_of_birth(value, now)?,
            None => {}
        }
        if let Some(allowed) = rule.allowed {
            if !allowed.iter().any(|a| *a == value) {
                return Err(AppError::Unprocessable(format!(
                    "{} must be one of: {}",
                    name,
                    allowed.join(", ")
                )));
            }
        }
        Ok(())
    }

    fn validate_date_of_birth(&self, value: &str, now: NaiveDateTime) -> Result<(), AppError> {
        let bad_format =
            || AppError::Unprocessable("Date of birth must be of format DD-MM-YYYY".into());
        let dob = NaiveDate::parse_from_str(value, DATE_OF_BIRTH_FORMAT).map_err(|_| bad_format())?;
        // parse_from_str also takes single digits, spaces and signed years
        if dob.format(DATE_OF_BIRTH_FORMAT).to_string() != value {
            return Err(bad_format());
        }
        if !self.age.contains(dob, now) {
            return Err(AppError::Unprocessable(format!(
                "Customer must be older than {} and younger than {} years old",
                self.age.min_years, self.age.max_years
            )));
        }
        Ok(())
    }

    /// Validate every field of a create request, stopping at the first failure.
    pub fn validate_new(
        &self,
        payload: CustomerPayload,
        now: NaiveDateTime,
    ) -> Result<NewCustomer, AppError> {
        for field in Field::ALL {
            let value = match field {
                Field::FirstName => payload.first_name.as_deref(),
                Field::LastName => payload.last_name.as_deref(),
                Field::DateOfBirth => payload.date_of_birth.as_deref(),
                Field::Gender => payload.gender.as_deref(),
                Field::Email => payload.email.as_deref(),
                Field::Address => payload.address.as_deref(),
            };
            self.validate_field(field, value, now)?;
        }
        Ok(NewCustomer {
            first_name: payload.first_name.unwrap_or_default(),
            last_name: payload.last_name.unwrap_or_default(),
            date_of_birth: payload.date_of_birth.unwrap_or_default(),
            gender: parse_gender(payload.gender.as_deref().unwrap_or_default())?,
            email: payload.email.unwrap_or_default(),
            address: payload.address.filter(|a| !a.is_empty()),
        })
    }

    /// Merge the supplied fields onto a copy of `current`, in field order.
    /// The first invalid field aborts the merge and nothing is returned.
    pub fn apply_patch(
        &self,
        current: &Customer,
        patch: CustomerPatch,
        now: NaiveDateTime,
    ) -> Result<Customer, AppError> {
        let mut merged = current.clone();
        if let Some(v) = patch.first_name {
            self.validate_field(Field::FirstName, Some(&v), now)?;
            merged.first_name = v;
        }
        if let Some(v) = patch.last_name {
            self.validate_field(Field::LastName, Some(&v), now)?;
            merged.last_name = v;
        }
        if let Some(v) = patch.date_of_birth {
            self.validate_field(Field::DateOfBirth, Some(&v), now)?;
            merged.date_of_birth = v;
        }
        if let Some(v) = patch.gender {
            self.validate_field(Field::Gender, Some(&v), now)?;
            merged.gender = parse_gender(&v)?;
        }
        if let Some(v) = patch.email {
            self.validate_field(Field::Email, Some(&v), now)?;
            merged.email = v;
        }
        match patch.address {
            Some(Some(v)) => {
                self.validate_field(Field::Address, Some(&v), now)?;
                merged.address = Some(v).filter(|a| !a.is_empty());
            }
            Some(None) => merged.address = None,
            None => {}
        }
        Ok(merged)
    }
}

fn parse_gender(value: &str) -> Result<Gender, AppError> {
    value
        .parse()
        .map_err(|e: ParseGenderError| AppError::Unprocessable(e.to_string()))
}
