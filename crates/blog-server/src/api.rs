//! Request and response bodies.

use blog_service::{AccessToken, LikeStatus};
use blog_types::{Comment, CommentId, Post, PostId, Role, User, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub username: String,
    pub role: Role,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self { username: user.username, role: user.role }
    }
}

/// Form-encoded login body.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl From<AccessToken> for TokenResponse {
    fn from(token: AccessToken) -> Self {
        Self { access_token: token.access_token, token_type: token.token_type }
    }
}

#[derive(Debug, Deserialize)]
pub struct PostInput {
    pub title: String,
    pub content: String,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub id: PostId,
    pub title: String,
    pub content: String,
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        Self { id: post.id, title: post.title, content: post.content }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: usize,
    pub limit: Option<usize>,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detail {
    pub detail: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentInput {
    pub content: String,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: CommentId,
    pub post_id: PostId,
    pub user_id: UserId,
    pub content: String,
}

impl From<Comment> for CommentView {
    fn from(c: Comment) -> Self {
        Self { id: c.id, post_id: c.post_id, user_id: c.user_id, content: c.content }
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeView {
    pub post_id: PostId,
    pub liked: bool,
    pub likes: usize,
}

impl From<LikeStatus> for LikeView {
    fn from(s: LikeStatus) -> Self {
        Self { post_id: s.post_id, liked: s.liked, likes: s.likes }
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeCount {
    pub post_id: PostId,
    pub likes: usize,
}
