//! Customer operations over an injected [`CustomerStore`].

use crate::error::AppError;
use crate::model::{Customer, NewCustomer};
use crate::schema::{CustomerCreate, CustomerUpdate, ListParams};
use crate::store::{phone_conflict, CustomerStore};

pub struct CustomerService;

impl CustomerService {
    /// Upper bound applied to any requested page size.
    pub const MAX_LIMIT: i64 = 1000;

    /// Insert a customer after checking that the phone number is unused.
    /// The store's unique constraint still guards against concurrent creators.
    pub async fn create(store: &dyn CustomerStore, input: CustomerCreate) -> Result<Customer, AppError> {
        if store.find_by_phone(&input.phone).await?.is_some() {
            tracing::debug!(phone = %input.phone, "create rejected: phone in use");
            return Err(phone_conflict(&input.phone));
        }
        let customer = store.insert(&NewCustomer::from(input)).await?;
        tracing::info!(id = customer.id, "customer created");
        Ok(customer)
    }

    pub async fn get(store: &dyn CustomerStore, id: i32) -> Result<Customer, AppError> {
        store.get(id).await?.ok_or_else(|| not_found_id(id))
    }

    /// Customers in insertion order. `limit` is capped at [`Self::MAX_LIMIT`].
    pub async fn list(store: &dyn CustomerStore, params: ListParams) -> Result<Vec<Customer>, AppError> {
        let skip = params.skip.max(0);
        let limit = params.limit.clamp(0, Self::MAX_LIMIT);
        store.list(skip, limit).await
    }

    /// Partial merge: only fields present in `input` are written.
    pub async fn update(
        store: &dyn CustomerStore,
        id: i32,
        input: CustomerUpdate,
    ) -> Result<Customer, AppError> {
        let changes = input.into_changes()?;
        let current = store.get(id).await?.ok_or_else(|| not_found_id(id))?;
        if let Some(phone) = changes.phone.as_deref() {
            if phone != current.phone {
                if let Some(other) = store.find_by_phone(phone).await? {
                    if other.id != id {
                        tracing::debug!(id, phone = %phone, "update rejected: phone in use");
                        return Err(phone_conflict(phone));
                    }
                }
            }
        }
        let customer = store
            .update(id, &changes)
            .await?
            .ok_or_else(|| not_found_id(id))?;
        tracing::info!(id, "customer updated");
        Ok(customer)
    }

    pub async fn delete(store: &dyn CustomerStore, id: i32) -> Result<(), AppError> {
        if !store.delete(id).await? {
            return Err(not_found_id(id));
        }
        tracing::info!(id, "customer deleted");
        Ok(())
    }

    pub async fn search_by_phone(store: &dyn CustomerStore, phone: &str) -> Result<Customer, AppError> {
        store
            .find_by_phone(phone)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("customer with phone '{}'", phone)))
    }

    /// Case-insensitive substring search. Zero matches is reported as NotFound, unlike `list`.
    pub async fn search_by_name(store: &dyn CustomerStore, term: &str) -> Result<Vec<Customer>, AppError> {
        let found = store.search_by_name(term).await?;
        if found.is_empty() {
            return Err(AppError::NotFound(format!("customers with name containing '{}'", term)));
        }
        Ok(found)
    }
}

fn not_found_id(id: i32) -> AppError {
    AppError::NotFound(format!("customer with id {}", id))
}
