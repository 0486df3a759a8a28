use std::sync::Arc;

use blog_policy::{authorize, Decision, PostAction};
use blog_store::{Database, Session};
use blog_types::{Actor, Comment, Like, NewComment, Post, PostId};
use serde::{Deserialize, Serialize};

use crate::error::{Resource, ServiceError, ServiceResult};

/// Like state of a post after a like/unlike.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeStatus {
    pub post_id: PostId,
    /// Whether the acting user now likes the post.
    pub liked: bool,
    pub likes: usize,
}

/// Comments and likes on posts.
pub struct EngagementService {
    db: Arc<dyn Database>,
}

impl EngagementService {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    pub fn add_comment(&self, actor: &Actor, post_id: PostId, content: &str) -> ServiceResult<Comment> {
        if content.trim().is_empty() {
            return Err(ServiceError::validation("comment must not be empty"));
        }
        let mut session = self.db.session()?;
        let post = existing_post(&*session, post_id)?;
        permit(actor, PostAction::Comment(&post))?;

        let comment = session.insert_comment(NewComment {
            content: content.to_string(),
            user_id: actor.id,
            post_id,
        })?;
        session.commit()?;

        tracing::info!(comment_id = %comment.id, %post_id, actor = %actor.username, "comment added");
        Ok(comment)
    }

    /// Comments on a post in insertion order.
    pub fn list_comments(&self, post_id: PostId) -> ServiceResult<Vec<Comment>> {
        let session = self.db.session()?;
        existing_post(&*session, post_id)?;
        Ok(session.list_comments(post_id)?)
    }

    /// Like a post. Liking twice is the same as liking once.
    pub fn like(&self, actor: &Actor, post_id: PostId) -> ServiceResult<LikeStatus> {
        let mut session = self.db.session()?;
        let post = existing_post(&*session, post_id)?;
        permit(actor, PostAction::Like(&post))?;

        let added = session.insert_like(Like::new(actor.id, post_id))?;
        let likes = session.count_likes(post_id)?;
        session.commit()?;

        if added {
            tracing::debug!(%post_id, actor = %actor.username, "post liked");
        }
        Ok(LikeStatus { post_id, liked: true, likes })
    }

    /// Remove a like. Unliking a post that is not liked is a no-op.
    pub fn unlike(&self, actor: &Actor, post_id: PostId) -> ServiceResult<LikeStatus> {
        let mut session = self.db.session()?;
        existing_post(&*session, post_id)?;

        session.delete_like(Like::new(actor.id, post_id))?;
        let likes = session.count_likes(post_id)?;
        session.commit()?;
        Ok(LikeStatus { post_id, liked: false, likes })
    }

    pub fn like_count(&self, post_id: PostId) -> ServiceResult<usize> {
        let session = self.db.session()?;
        existing_post(&*session, post_id)?;
        Ok(session.count_likes(post_id)?)
    }
}

fn existing_post(session: &dyn Session, id: PostId) -> ServiceResult<Post> {
    session.get_post(id)?.ok_or(ServiceError::NotFound(Resource::Post))
}

fn permit(actor: &Actor, action: PostAction<'_>) -> ServiceResult<()> {
    match authorize(actor, action) {
        Decision::Allow => Ok(()),
        Decision::Deny { reason } => Err(ServiceError::Forbidden(reason)),
    }
}
