use std::sync::Arc;

use blog_policy::{authorize, Decision, PostAction};
use blog_store::Database;
use blog_types::{Actor, NewPost, Post, PostId, PostUpdate};
use serde::{Deserialize, Serialize};

use crate::error::{Resource, ServiceError, ServiceResult};

/// Pagination bounds for post listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLimits {
    /// Used when the caller gives no limit.
    pub default_limit: usize,
    /// Larger requested limits are clamped to this.
    pub max_limit: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self { default_limit: 10, max_limit: 100 }
    }
}

/// CRUD over posts, gated by the authorization policy.
pub struct PostService {
    db: Arc<dyn Database>,
    limits: PageLimits,
}

impl PostService {
    pub fn new(db: Arc<dyn Database>, limits: PageLimits) -> Self {
        Self { db, limits }
    }

    pub fn limits(&self) -> PageLimits {
        self.limits
    }

    /// Publish a post owned by `actor`. Requires role `admin` or `author`.
    pub fn create_post(&self, actor: &Actor, title: &str, content: &str) -> ServiceResult<Post> {
        check(actor, PostAction::Create)?;
        if title.trim().is_empty() {
            return Err(ServiceError::validation("title must not be empty"));
        }

        let mut session = self.db.session()?;
        let post = session.insert_post(NewPost {
            title: title.to_string(),
            content: content.to_string(),
            owner_id: actor.id,
        })?;
        session.commit()?;

        tracing::info!(post_id = %post.id, owner = %actor.username, "post created");
        Ok(post)
    }

    /// Posts in insertion order. `limit` of `None` means the default page size.
    pub fn list_posts(&self, skip: usize, limit: Option<usize>) -> ServiceResult<Vec<Post>> {
        let limit = limit.unwrap_or(self.limits.default_limit);
        if limit == 0 {
            return Err(ServiceError::validation("limit must be greater than zero"));
        }
        let limit = limit.min(self.limits.max_limit);
        Ok(self.db.session()?.list_posts(skip, limit)?)
    }

    pub fn get_post(&self, id: PostId) -> ServiceResult<Post> {
        self.db
            .session()?
            .get_post(id)?
            .ok_or(ServiceError::NotFound(Resource::Post))
    }

    /// Replace title and content. Owner and id never change.
    pub fn update_post(&self, actor: &Actor, id: PostId, update: PostUpdate) -> ServiceResult<Post> {
        let mut session = self.db.session()?;
        let post = session.get_post(id)?.ok_or(ServiceError::NotFound(Resource::Post))?;
        check(actor, PostAction::Update(&post))?;
        if update.title.trim().is_empty() {
            return Err(ServiceError::validation("title must not be empty"));
        }

        let updated = session
            .update_post(id, update)?
            .ok_or(ServiceError::NotFound(Resource::Post))?;
        session.commit()?;

        tracing::info!(post_id = %id, actor = %actor.username, "post updated");
        Ok(updated)
    }

    /// Remove a post permanently, together with its comments and likes.
    pub fn delete_post(&self, actor: &Actor, id: PostId) -> ServiceResult<()> {
        let mut session = self.db.session()?;
        let post = session.get_post(id)?.ok_or(ServiceError::NotFound(Resource::Post))?;
        check(actor, PostAction::Delete(&post))?;

        if !session.delete_post(id)? {
            return Err(ServiceError::NotFound(Resource::Post));
        }
        session.commit()?;

        tracing::info!(post_id = %id, actor = %actor.username, "post deleted");
        Ok(())
    }
}

fn check(actor: &Actor, action: PostAction<'_>) -> ServiceResult<()> {
    match authorize(actor, action) {
        Decision::Allow => Ok(()),
        Decision::Deny { reason } => {
            tracing::warn!(actor = %actor.username, %action, %reason, "action denied");
            Err(ServiceError::Forbidden(reason))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{actor, test_blog};
    use blog_types::Role;

    fn update(title: &str, content: &str) -> PostUpdate {
        PostUpdate { title: title.into(), content: content.into() }
    }

    #[test]
    fn reader_cannot_create() {
        let blog = test_blog();
        let rita = actor(&blog, "rita", Role::Reader);
        assert!(matches!(
            blog.posts.create_post(&rita, "t", "c"),
            Err(ServiceError::Forbidden(_))
        ));
        assert!(blog.posts.list_posts(0, None).unwrap().is_empty());
    }

    #[test]
    fn author_and_admin_create_owned_posts() {
        let blog = test_blog();
        for (name, role) in [("alice", Role::Author), ("root", Role::Admin)] {
            let who = actor(&blog, name, role);
            let post = blog.posts.create_post(&who, "Hello", "World").unwrap();
            assert_eq!(post.owner_id, who.id);
            assert_eq!(blog.posts.get_post(post.id).unwrap(), post);
        }
    }

    #[test]
    fn blank_title_rejected() {
        let blog = test_blog();
        let alice = actor(&blog, "alice", Role::Author);
        assert!(matches!(
            blog.posts.create_post(&alice, "   ", "c"),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn get_missing_post() {
        let blog = test_blog();
        assert!(matches!(
            blog.posts.get_post(PostId(1)),
            Err(ServiceError::NotFound(Resource::Post))
        ));
    }

    #[test]
    fn update_missing_post_is_not_found_for_every_role() {
        let blog = test_blog();
        for (name, role) in [("a", Role::Admin), ("b", Role::Author), ("c", Role::Reader)] {
            let who = actor(&blog, name, role);
            assert!(matches!(
                blog.posts.update_post(&who, PostId(42), update("t", "c")),
                Err(ServiceError::NotFound(Resource::Post))
            ));
        }
    }

    #[test]
    fn only_owner_or_admin_may_update() {
        let blog = test_blog();
        let alice = actor(&blog, "alice", Role::Author);
        let bob = actor(&blog, "bob", Role::Author);
        let root = actor(&blog, "root", Role::Admin);
        let post = blog.posts.create_post(&alice, "Hello", "World").unwrap();

        assert!(matches!(
            blog.posts.update_post(&bob, post.id, update("pwned", "x")),
            Err(ServiceError::Forbidden(_))
        ));
        assert_eq!(blog.posts.get_post(post.id).unwrap().title, "Hello");

        let mine = blog.posts.update_post(&alice, post.id, update("Hi", "There")).unwrap();
        assert_eq!((mine.id, mine.owner_id), (post.id, alice.id));
        assert_eq!(mine.title, "Hi");

        let admin_edit = blog.posts.update_post(&root, post.id, update("Mod", "Edit")).unwrap();
        assert_eq!(admin_edit.owner_id, alice.id);
    }

    #[test]
    fn delete_then_get_is_not_found() {
        let blog = test_blog();
        let alice = actor(&blog, "alice", Role::Author);
        let rita = actor(&blog, "rita", Role::Reader);
        let post = blog.posts.create_post(&alice, "Hello", "World").unwrap();

        assert!(matches!(blog.posts.delete_post(&rita, post.id), Err(ServiceError::Forbidden(_))));
        blog.posts.delete_post(&alice, post.id).unwrap();
        assert!(matches!(blog.posts.get_post(post.id), Err(ServiceError::NotFound(_))));
        assert!(matches!(
            blog.posts.delete_post(&alice, post.id),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn list_pages_in_insertion_order() {
        let blog = test_blog();
        let alice = actor(&blog, "alice", Role::Author);
        for i in 0..15 {
            blog.posts.create_post(&alice, &format!("post {i}"), "").unwrap();
        }

        let first = blog.posts.list_posts(0, Some(10)).unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(first[0].title, "post 0");
        assert!(first.windows(2).all(|w| w[0].id < w[1].id));

        let rest = blog.posts.list_posts(10, Some(10)).unwrap();
        assert_eq!(rest.len(), 5);
        assert_eq!(rest[0].title, "post 10");
    }

    #[test]
    fn list_limit_rules() {
        let blog = test_blog();
        assert!(matches!(blog.posts.list_posts(0, Some(0)), Err(ServiceError::Validation(_))));

        let alice = actor(&blog, "alice", Role::Author);
        for i in 0..12 {
            blog.posts.create_post(&alice, &format!("p{i}"), "").unwrap();
        }
        assert_eq!(blog.posts.list_posts(0, None).unwrap().len(), 10);

        let clamped = PostService::new(
            blog.db.clone(),
            PageLimits { default_limit: 2, max_limit: 5 },
        );
        assert_eq!(clamped.list_posts(0, Some(1000)).unwrap().len(), 5);
        assert_eq!(clamped.list_posts(0, None).unwrap().len(), 2);
    }
}
