//! HTTP handlers for customer records.

pub mod customer;
pub use customer::*;
