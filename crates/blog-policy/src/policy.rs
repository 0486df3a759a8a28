use std::fmt;

use blog_types::{Actor, Post, Role, UserId};
use serde::{Deserialize, Serialize};

/// Whether `role` may publish a new post.
pub fn can_create(role: Role) -> bool {
    role.can_publish()
}

/// Whether an actor with `role` and `actor_id` may update or delete `post`.
pub fn can_mutate(role: Role, actor_id: UserId, post: &Post) -> bool {
    match role {
        Role::Admin => true,
        Role::Author => post.is_owned_by(actor_id),
        Role::Reader => false,
    }
}

/// An operation on a post, with the post itself where ownership matters.
#[derive(Clone, Copy, Debug)]
pub enum PostAction<'a> {
    Create,
    Read,
    Update(&'a Post),
    Delete(&'a Post),
    Comment(&'a Post),
    Like(&'a Post),
}

impl fmt::Display for PostAction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Read => write!(f, "read"),
            Self::Update(post) => write!(f, "update:{}", post.id),
            Self::Delete(post) => write!(f, "delete:{}", post.id),
            Self::Comment(post) => write!(f, "comment:{}", post.id),
            Self::Like(post) => write!(f, "like:{}", post.id),
        }
    }
}

/// Policy evaluation result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Allow,
    Deny { reason: String },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    fn deny(reason: impl Into<String>) -> Self {
        Self::Deny { reason: reason.into() }
    }
}

/// Evaluate `action` for `actor`.
pub fn authorize(actor: &Actor, action: PostAction<'_>) -> Decision {
    let decision = match action {
        PostAction::Read | PostAction::Comment(_) | PostAction::Like(_) => Decision::Allow,
        PostAction::Create => {
            if can_create(actor.role) {
                Decision::Allow
            } else {
                Decision::deny(format!("role '{}' may not create posts", actor.role))
            }
        }
        PostAction::Update(post) | PostAction::Delete(post) => {
            if can_mutate(actor.role, actor.id, post) {
                Decision::Allow
            } else if actor.role == Role::Author {
                Decision::deny(format!("post {} is owned by another user", post.id))
            } else {
                Decision::deny(format!("role '{}' may not modify posts", actor.role))
            }
        }
    };
    tracing::trace!(actor = %actor.username, %action, allowed = decision.is_allowed(), "policy evaluated");
    decision
}
