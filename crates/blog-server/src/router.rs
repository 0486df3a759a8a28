use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use blog_service::Blog;
use tower_http::trace::TraceLayer;

use crate::handler;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub blog: Arc<Blog>,
}

impl AppState {
    pub fn new(blog: Arc<Blog>) -> Self {
        Self { blog }
    }
}

/// Build the axum router with all blog endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handler::health_handler))
        .route("/users/", post(handler::register_handler))
        .route("/token", post(handler::login_handler))
        .route(
            "/posts/",
            get(handler::list_posts_handler).post(handler::create_post_handler),
        )
        .route(
            "/posts/:id",
            get(handler::get_post_handler)
                .put(handler::update_post_handler)
                .delete(handler::delete_post_handler),
        )
        .route(
            "/posts/:id/comments",
            get(handler::list_comments_handler).post(handler::add_comment_handler),
        )
        .route(
            "/posts/:id/like",
            put(handler::like_handler).delete(handler::unlike_handler),
        )
        .route("/posts/:id/likes", get(handler::like_count_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
