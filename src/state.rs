//! Shared application state for all routes.

use crate::store::CustomerStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Injected at startup; handlers never reach for a global pool.
    pub store: Arc<dyn CustomerStore>,
}

impl AppState {
    pub fn new<S>(store: S) -> Self
    where
        S: CustomerStore + 'static,
    {
        Self {
            store: Arc::new(store),
        }
    }
}
