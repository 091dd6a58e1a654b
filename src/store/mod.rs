//! Customer persistence behind an injectable handle.
//!
//! [`PgCustomerStore`] is the production store; [`MemoryCustomerStore`] keeps rows in process
//! and enforces the same constraints, so service logic and routes can be exercised without a database.

mod memory;
mod postgres;

pub use memory::MemoryCustomerStore;
pub use postgres::{ensure_customer_table, ensure_database_exists, PgCustomerStore};

use crate::error::AppError;
use crate::model::{Customer, CustomerChanges, NewCustomer};
use async_trait::async_trait;

/// Single-table access to customers. Every method is one round trip to the store.
///
/// Writes that would duplicate a phone number fail with [`AppError::Conflict`] even when the
/// caller skipped its own pre-check.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Insert and return the row with its assigned `id` and `created_at`.
    async fn insert(&self, new: &NewCustomer) -> Result<Customer, AppError>;

    async fn get(&self, id: i32) -> Result<Option<Customer>, AppError>;

    /// Exact match on phone.
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Customer>, AppError>;

    /// Rows in insertion (id) order.
    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Customer>, AppError>;

    /// Case-insensitive substring match on name, in id order.
    async fn search_by_name(&self, term: &str) -> Result<Vec<Customer>, AppError>;

    /// Apply a partial merge. Returns `None` if no row has this id.
    async fn update(&self, id: i32, changes: &CustomerChanges) -> Result<Option<Customer>, AppError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;

    async fn count(&self) -> Result<i64, AppError>;

    /// Cheap liveness check used by the readiness route.
    async fn ping(&self) -> Result<(), AppError>;
}

pub(crate) fn phone_conflict(phone: &str) -> AppError {
    AppError::Conflict(format!("phone number '{}' is already registered", phone))
}
