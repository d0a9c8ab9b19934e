//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auth;
pub mod campaigns;
pub mod expenses;
pub mod health;
pub mod incomes;
pub mod invoices;
pub mod metrics;
pub mod reports;
pub mod roles;
pub mod users;

/// Creates the API router: public health/login plus the protected surface.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(incomes::routes())
        .merge(expenses::routes())
        .merge(invoices::routes())
        .merge(campaigns::routes())
        .merge(metrics::routes())
        .merge(reports::routes())
        .merge(roles::routes())
        .merge(users::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
