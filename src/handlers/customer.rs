//! Customer handlers: create, read, update, delete, list, search.

use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::response::{created, many, ok, one};
use crate::schema::{parse_id, CustomerCreate, CustomerResponse, CustomerUpdate, ListParams};
use crate::service::CustomerService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::collections::HashMap;

#[utoipa::path(
    post,
    path = "/customers",
    request_body = CustomerCreate,
    responses(
        (status = 201, description = "Customer created", body = CustomerResponse),
        (status = 400, description = "Phone number already registered"),
        (status = 422, description = "Invalid body"),
    ),
    tag = "customers"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CustomerCreate>,
) -> Result<impl IntoResponse, AppError> {
    let customer = CustomerService::create(state.store.as_ref(), body).await?;
    Ok(created(one(customer)))
}

#[utoipa::path(
    get,
    path = "/customers",
    params(
        ("skip" = Option<i64>, Query, description = "Rows to skip, default 0"),
        ("limit" = Option<i64>, Query, description = "Maximum rows, default 100"),
    ),
    responses(
        (status = 200, description = "Customers in insertion order", body = [CustomerResponse]),
        (status = 422, description = "Invalid skip or limit"),
    ),
    tag = "customers"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let params = ListParams::from_query(&params)?;
    let rows = CustomerService::list(state.store.as_ref(), params).await?;
    Ok(ok(many(rows)))
}

#[utoipa::path(
    get,
    path = "/customers/{id}",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer", body = CustomerResponse),
        (status = 404, description = "No customer with this id"),
    ),
    tag = "customers"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let customer = CustomerService::get(state.store.as_ref(), id).await?;
    Ok(ok(one(customer)))
}

#[utoipa::path(
    put,
    path = "/customers/{id}",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = CustomerUpdate,
    responses(
        (status = 200, description = "Customer after applying the supplied fields", body = CustomerResponse),
        (status = 400, description = "Phone number already registered"),
        (status = 404, description = "No customer with this id"),
        (status = 422, description = "Invalid body"),
    ),
    tag = "customers"
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<CustomerUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let customer = CustomerService::update(state.store.as_ref(), id, body).await?;
    Ok(ok(one(customer)))
}

#[utoipa::path(
    delete,
    path = "/customers/{id}",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 404, description = "No customer with this id"),
    ),
    tag = "customers"
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    CustomerService::delete(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/customers/search/by-phone/{phone}",
    params(("phone" = String, Path, description = "Exact phone number")),
    responses(
        (status = 200, description = "Matching customer", body = CustomerResponse),
        (status = 404, description = "No customer with this phone"),
    ),
    tag = "customers"
)]
pub async fn search_by_phone(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let customer = CustomerService::search_by_phone(state.store.as_ref(), &phone).await?;
    Ok(ok(one(customer)))
}

#[utoipa::path(
    get,
    path = "/customers/search/by-name/{name}",
    params(("name" = String, Path, description = "Case-insensitive substring of the name")),
    responses(
        (status = 200, description = "Matching customers", body = [CustomerResponse]),
        (status = 404, description = "No customer name contains the term"),
    ),
    tag = "customers"
)]
pub async fn search_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let rows = CustomerService::search_by_name(state.store.as_ref(), &name).await?;
    Ok(ok(many(rows)))
}
