//! OpenAPI description of the HTTP surface, served at `/openapi.json`.

use crate::handlers::customer;
use crate::routes::common;
use crate::schema::{CustomerCreate, CustomerResponse, CustomerUpdate};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "customer-service", description = "Customer records API"),
    paths(
        common::health,
        customer::create_customer,
        customer::list_customers,
        customer::get_customer,
        customer::update_customer,
        customer::delete_customer,
        customer::search_by_phone,
        customer::search_by_name,
    ),
    components(schemas(CustomerCreate, CustomerUpdate, CustomerResponse, common::HealthBody)),
    tags(
        (name = "customers", description = "Customer records"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;
