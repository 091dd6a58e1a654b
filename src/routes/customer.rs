//! Customer CRUD and search routes.

use crate::handlers::customer::{
    create_customer, delete_customer, get_customer, list_customers, search_by_name, search_by_phone,
    update_customer,
};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn customer_routes(state: AppState) -> Router {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/:id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/customers/search/by-phone/:phone", get(search_by_phone))
        .route("/customers/search/by-name/:name", get(search_by_name))
        .with_state(state)
}
