//! Request and response shapes at the API boundary, independent of the stored row.

use crate::error::AppError;
use crate::model::{Customer, CustomerChanges, NewCustomer};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

/// Body of `POST /customers`.
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct CustomerCreate {
    /// Display name, 1 to 50 characters.
    pub name: String,
    /// Unique phone number, 1 to 15 characters.
    pub phone: String,
    /// Area or region label, 1 to 30 characters.
    pub area: String,
}

impl From<CustomerCreate> for NewCustomer {
    fn from(c: CustomerCreate) -> Self {
        NewCustomer {
            name: c.name,
            phone: c.phone,
            area: c.area,
        }
    }
}

/// Body of `PUT /customers/{id}`. Omitted fields are left unchanged.
///
/// The outer `Option` records whether the key was present, the inner one whether it was `null`.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct CustomerUpdate {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub area: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl CustomerUpdate {
    /// Collapse to the store's merge type. Explicit nulls are rejected since every column is NOT NULL.
    pub fn into_changes(self) -> Result<CustomerChanges, AppError> {
        Ok(CustomerChanges {
            name: non_null("name", self.name)?,
            phone: non_null("phone", self.phone)?,
            area: non_null("area", self.area)?,
        })
    }
}

fn non_null(field: &str, value: Option<Option<String>>) -> Result<Option<String>, AppError> {
    match value {
        None => Ok(None),
        Some(Some(v)) => Ok(Some(v)),
        Some(None) => Err(AppError::Validation(format!("{} cannot be null", field))),
    }
}

/// A stored customer as returned to clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub area: String,
    pub created_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(c: Customer) -> Self {
        CustomerResponse {
            id: c.id,
            name: c.name,
            phone: c.phone,
            area: c.area,
            created_at: c.created_at,
        }
    }
}

/// Offset pagination for `GET /customers`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListParams {
    pub skip: i64,
    pub limit: i64,
}

impl ListParams {
    pub const DEFAULT_SKIP: i64 = 0;
    pub const DEFAULT_LIMIT: i64 = 100;

    /// Parse `skip` and `limit` from the query string. Other keys are ignored.
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, AppError> {
        Ok(ListParams {
            skip: non_negative(params, "skip", Self::DEFAULT_SKIP)?,
            limit: non_negative(params, "limit", Self::DEFAULT_LIMIT)?,
        })
    }
}

impl Default for ListParams {
    fn default() -> Self {
        ListParams {
            skip: Self::DEFAULT_SKIP,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

fn non_negative(params: &HashMap<String, String>, key: &str, default: i64) -> Result<i64, AppError> {
    let Some(raw) = params.get(key) else {
        return Ok(default);
    };
    let n: i64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("{} must be an integer", key)))?;
    if n < 0 {
        return Err(AppError::Validation(format!("{} must be at least 0", key)));
    }
    Ok(n)
}

/// Parse a customer id from a path segment.
///
/// An integer too large for an id cannot name a stored customer, so it is reported as not found.
pub fn parse_id(raw: &str) -> Result<i32, AppError> {
    let trimmed = raw.trim();
    trimmed.parse().map_err(|_| {
        let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            AppError::NotFound(format!("customer with id {}", trimmed))
        } else {
            AppError::Validation(format!("id must be an integer, got '{}'", raw))
        }
    })
}
