pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;

pub use state::ApiState;

use axum::{Router, middleware as axum_middleware, routing::get};

pub fn build_api_router(state: ApiState) -> Router<ApiState> {
    Router::new()
        .route("/api/posts", get(handlers::list_posts))
        .route(
            "/api/posts/{slug}",
            get(handlers::get_post)
                .put(handlers::create_post)
                .post(handlers::create_post)
                .patch(handlers::update_post),
        )
        .route("/api/catalogs", get(handlers::list_catalogs))
        .layer(axum_middleware::from_fn_with_state(
            state,
            middleware::resolve_caller,
        ))
}
