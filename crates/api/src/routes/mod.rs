//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auth;
pub mod categories;
pub mod clients;
pub mod health;
pub mod products;
pub mod purchases;
pub mod roles;
pub mod sales;
pub mod suppliers;
pub mod users;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(categories::routes())
        .merge(clients::routes())
        .merge(suppliers::routes())
        .merge(products::routes())
        .merge(purchases::routes())
        .merge(sales::routes())
        .merge(roles::routes())
        .merge(users::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
