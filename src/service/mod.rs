//! CustomerService: customer operations against an injected store.

mod customer;
mod validation;
pub use customer::CustomerService;
pub use validation::{FieldRule, Validate};
