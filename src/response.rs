//! Response helpers: status code plus the bare JSON shape.

use crate::model::Customer;
use crate::schema::CustomerResponse;
use axum::{http::StatusCode, Json};
use serde::Serialize;

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn one(customer: Customer) -> CustomerResponse {
    CustomerResponse::from(customer)
}

pub fn many(customers: Vec<Customer>) -> Vec<CustomerResponse> {
    customers.into_iter().map(CustomerResponse::from).collect()
}
