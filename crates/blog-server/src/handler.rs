use axum::extract::{Path, Query, State};
use axum::response::Json;
use axum::Form;
use blog_service::AccountService;
use blog_types::{PostId, PostUpdate};
use serde_json::json;

use crate::api::*;
use crate::auth::AuthUser;
use crate::error::{ServerError, ServerResult};
use crate::router::AppState;

/// Run service calls on the blocking pool. They hash passwords, take the
/// store lock, and with a file database write to disk on commit.
pub(crate) async fn blocking<T, F>(f: F) -> ServerResult<T>
where
    F: FnOnce() -> ServerResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
}

pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn register_handler(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ServerResult<Json<UserView>> {
    let role = AccountService::parse_role(&req.role)?;
    let blog = state.blog.clone();
    let user = blocking(move || Ok(blog.accounts.register(&req.username, &req.password, role)?)).await?;
    Ok(Json(user.into()))
}

pub async fn login_handler(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ServerResult<Json<TokenResponse>> {
    let blog = state.blog.clone();
    let token = blocking(move || Ok(blog.accounts.login(&form.username, &form.password)?)).await?;
    Ok(Json(token.into()))
}

pub async fn create_post_handler(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(input): Json<PostInput>,
) -> ServerResult<Json<PostView>> {
    let blog = state.blog.clone();
    let post =
        blocking(move || Ok(blog.posts.create_post(&actor, &input.title, &input.content)?)).await?;
    Ok(Json(post.into()))
}

pub async fn list_posts_handler(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> ServerResult<Json<Vec<PostView>>> {
    let blog = state.blog.clone();
    let posts = blocking(move || Ok(blog.posts.list_posts(page.skip, page.limit)?)).await?;
    Ok(Json(posts.into_iter().map(PostView::from).collect()))
}

pub async fn get_post_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ServerResult<Json<PostView>> {
    let blog = state.blog.clone();
    let post = blocking(move || Ok(blog.posts.get_post(PostId(id))?)).await?;
    Ok(Json(post.into()))
}

pub async fn update_post_handler(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<i64>,
    Json(input): Json<PostInput>,
) -> ServerResult<Json<PostView>> {
    let update = PostUpdate { title: input.title, content: input.content };
    let blog = state.blog.clone();
    let post = blocking(move || Ok(blog.posts.update_post(&actor, PostId(id), update)?)).await?;
    Ok(Json(post.into()))
}

pub async fn delete_post_handler(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<i64>,
) -> ServerResult<Json<Detail>> {
    let blog = state.blog.clone();
    blocking(move || Ok(blog.posts.delete_post(&actor, PostId(id))?)).await?;
    Ok(Json(Detail { detail: "Post deleted".into() }))
}

pub async fn add_comment_handler(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<i64>,
    Json(input): Json<CommentInput>,
) -> ServerResult<Json<CommentView>> {
    let blog = state.blog.clone();
    let comment =
        blocking(move || Ok(blog.engagement.add_comment(&actor, PostId(id), &input.content)?))
            .await?;
    Ok(Json(comment.into()))
}

pub async fn list_comments_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ServerResult<Json<Vec<CommentView>>> {
    let blog = state.blog.clone();
    let comments = blocking(move || Ok(blog.engagement.list_comments(PostId(id))?)).await?;
    Ok(Json(comments.into_iter().map(CommentView::from).collect()))
}

pub async fn like_handler(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<i64>,
) -> ServerResult<Json<LikeView>> {
    let blog = state.blog.clone();
    let status = blocking(move || Ok(blog.engagement.like(&actor, PostId(id))?)).await?;
    Ok(Json(status.into()))
}

pub async fn unlike_handler(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<i64>,
) -> ServerResult<Json<LikeView>> {
    let blog = state.blog.clone();
    let status = blocking(move || Ok(blog.engagement.unlike(&actor, PostId(id))?)).await?;
    Ok(Json(status.into()))
}

pub async fn like_count_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ServerResult<Json<LikeCount>> {
    let blog = state.blog.clone();
    let likes = blocking(move || Ok(blog.engagement.like_count(PostId(id))?)).await?;
    Ok(Json(LikeCount { post_id: PostId(id), likes }))
}
