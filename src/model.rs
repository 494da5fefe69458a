//! Customer record and the request payloads that produce it.

use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use sqlx::{postgres::PgRow, FromRow, Row};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALLOWED: &'static [&'static str] = &["Male", "Female"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown gender '{0}'")]
pub struct ParseGenderError(pub String);

impl FromStr for Gender {
    type Err = ParseGenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            other => Err(ParseGenderError(other.to_string())),
        }
    }
}

/// A stored customer. Every field satisfied the validation rules when last written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// `DD-MM-YYYY`, kept in the form it was submitted.
    pub date_of_birth: String,
    pub gender: Gender,
    #[serde(rename = "e_mail")]
    pub email: String,
    pub address: Option<String>,
}

impl<'r> FromRow<'r, PgRow> for Customer {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let gender: String = row.try_get("gender")?;
        let gender = gender.parse().map_err(|e: ParseGenderError| sqlx::Error::ColumnDecode {
            index: "gender".into(),
            source: Box::new(e),
        })?;
        Ok(Customer {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            date_of_birth: row.try_get("date_of_birth")?,
            gender,
            email: row.try_get("e_mail")?,
            address: row.try_get("address")?,
        })
    }
}

/// A validated customer that has not been stored yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: Gender,
    pub email: String,
    pub address: Option<String>,
}

impl NewCustomer {
    pub fn into_customer(self, id: i64) -> Customer {
        Customer {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            email: self.email,
            address: self.address,
        }
    }
}

/// Create request body. Fields stay raw strings so rule violations surface as
/// validation errors rather than JSON parse errors.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CustomerPayload {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, rename = "e_mail", alias = "email")]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Update request body. Absent fields are left unchanged; a present value,
/// empty string included, is validated and applied.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CustomerPatch {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, rename = "e_mail", alias = "email")]
    pub email: Option<String>,
    /// `Some(None)` (explicit `null`) clears the address.
    #[serde(default, with = "double_option")]
    pub address: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_serializes_with_wire_names() {
        let c = Customer {
            id: 7,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            date_of_birth: "10-12-1990".into(),
            gender: Gender::Female,
            email: "ada@example.com".into(),
            address: None,
        };
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["e_mail"], "ada@example.com");
        assert_eq!(v["gender"], "Female");
        assert!(v["address"].is_null());
        assert!(v.get("email").is_none());
    }

    #[test]
    fn gender_parse_is_case_sensitive() {
        assert_eq!("Male".parse::<Gender>(), Ok(Gender::Male));
        assert!("male".parse::<Gender>().is_err());
    }

    #[test]
    fn patch_distinguishes_absent_null_and_empty() {
        let p: CustomerPatch = serde_json::from_str(r#"{"gender":"Female"}"#).unwrap();
        assert_eq!(p.gender.as_deref(), Some("Female"));
        assert!(p.first_name.is_none());
        assert!(p.address.is_none());

        let p: CustomerPatch = serde_json::from_str(r#"{"address":null,"first_name":""}"#).unwrap();
        assert_eq!(p.address, Some(None));
        assert_eq!(p.first_name.as_deref(), Some(""));
    }

    #[test]
    fn payload_accepts_email_alias() {
        let p: CustomerPayload = serde_json::from_str(r#"{"email":"a@b.io"}"#).unwrap();
        assert_eq!(p.email.as_deref(), Some("a@b.io"));
    }
}
