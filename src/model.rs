//! Customer entity as persisted, plus the write-side value types the store accepts.

use chrono::{DateTime, Utc};
use serde::Serialize;

pub const CUSTOMERS_TABLE: &str = "customers";

pub const NAME_MAX_LEN: usize = 50;
pub const PHONE_MAX_LEN: usize = 15;
pub const AREA_MAX_LEN: usize = 30;

/// A stored customer row. `id` and `created_at` are assigned by the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub area: String,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when inserting a customer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub area: String,
}

/// Partial merge applied by an update: `None` keeps the stored value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomerChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub area: Option<String>,
}

impl CustomerChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.area.is_none()
    }

    /// Overwrite only the supplied fields of `customer`.
    pub fn apply_to(&self, customer: &mut Customer) {
        if let Some(name) = &self.name {
            customer.name = name.clone();
        }
        if let Some(phone) = &self.phone {
            customer.phone = phone.clone();
        }
        if let Some(area) = &self.area {
            customer.area = area.clone();
        }
    }
}
