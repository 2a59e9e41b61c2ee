use axum::Router;
use axum::middleware::from_fn_with_state;

use crate::{AppState, controllers::home_controller};

pub mod home_routes;
pub mod notifications_routes;

/// Routes without the auth layers, for tests that inject `CurrentUser` themselves.
pub fn api() -> Router<AppState> {
    let router = Router::<AppState>::new();

    let router = home_routes::add_routes(router);
    let router = notifications_routes::add_routes(router);

    router.fallback(home_controller::not_found)
}

pub fn app(state: AppState) -> Router {
    api()
        .layer(from_fn_with_state(state.clone(), crate::auth::require_auth))
        .layer(from_fn_with_state(state.clone(), crate::auth::inject_current_user))
        .with_state(state)
}
