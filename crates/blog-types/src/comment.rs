use serde::{Deserialize, Serialize};

use crate::ids::{CommentId, PostId, UserId};

/// A comment left on a post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub user_id: UserId,
    pub post_id: PostId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewComment {
    pub content: String,
    pub user_id: UserId,
    pub post_id: PostId,
}

/// Membership of a user in a post's like set. Carries no payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Like {
    pub user_id: UserId,
    pub post_id: PostId,
}

impl Like {
    pub fn new(user_id: UserId, post_id: PostId) -> Self {
        Self { user_id, post_id }
    }
}
