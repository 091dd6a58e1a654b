//! In-process store. Mirrors the table constraints: ids are never reused and phone is unique.

use super::{phone_conflict, CustomerStore};
use crate::error::AppError;
use crate::model::{Customer, CustomerChanges, NewCustomer};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
pub struct MemoryCustomerStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: i32,
    rows: BTreeMap<i32, Customer>,
}

impl Inner {
    fn phone_taken(&self, phone: &str, except: Option<i32>) -> bool {
        self.rows
            .values()
            .any(|c| c.phone == phone && Some(c.id) != except)
    }
}

impl MemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, AppError> {
        self.inner
            .read()
            .map_err(|_| AppError::Internal("customer store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, AppError> {
        self.inner
            .write()
            .map_err(|_| AppError::Internal("customer store lock poisoned".into()))
    }
}

#[async_trait]
impl CustomerStore for MemoryCustomerStore {
    async fn insert(&self, new: &NewCustomer) -> Result<Customer, AppError> {
        let mut inner = self.write()?;
        if inner.phone_taken(&new.phone, None) {
            return Err(phone_conflict(&new.phone));
        }
        inner.last_id += 1;
        let customer = Customer {
            id: inner.last_id,
            name: new.name.clone(),
            phone: new.phone.clone(),
            area: new.area.clone(),
            created_at: Utc::now(),
        };
        inner.rows.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn get(&self, id: i32) -> Result<Option<Customer>, AppError> {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Customer>, AppError> {
        Ok(self.read()?.rows.values().find(|c| c.phone == phone).cloned())
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Customer>, AppError> {
        let skip = usize::try_from(skip).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .read()?
            .rows
            .values()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn search_by_name(&self, term: &str) -> Result<Vec<Customer>, AppError> {
        let needle = term.to_lowercase();
        Ok(self
            .read()?
            .rows
            .values()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn update(&self, id: i32, changes: &CustomerChanges) -> Result<Option<Customer>, AppError> {
        let mut inner = self.write()?;
        if let Some(phone) = &changes.phone {
            if inner.phone_taken(phone, Some(id)) {
                return Err(phone_conflict(phone));
            }
        }
        Ok(inner.rows.get_mut(&id).map(|c| {
            changes.apply_to(c);
            c.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.write()?.rows.remove(&id).is_some())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.read()?.rows.len() as i64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.read().map(|_| ())
    }
}
