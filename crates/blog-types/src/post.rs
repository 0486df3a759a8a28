use serde::{Deserialize, Serialize};

use crate::ids::{PostId, UserId};

/// A blog post. `owner_id` is fixed at creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub owner_id: UserId,
}

/// Insert payload for a post.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub owner_id: UserId,
}

/// Replacement title and content for an existing post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostUpdate {
    pub title: String,
    pub content: String,
}

impl Post {
    /// Overwrite the mutable fields, leaving id and owner untouched.
    pub fn apply(&mut self, update: PostUpdate) {
        self.title = update.title;
        self.content = update.content;
    }

    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner_id == user
    }
}
