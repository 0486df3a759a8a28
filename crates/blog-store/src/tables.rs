use std::collections::{BTreeMap, BTreeSet};

use blog_types::{
    Comment, CommentId, Like, NewComment, NewPost, NewUser, Post, PostId, PostUpdate, User,
    UserId,
};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Format version written by [`Tables::to_document`].
pub const DOCUMENT_VERSION: u32 = 1;

/// The four blog tables and their id counters.
///
/// Rows are keyed by id in ordered maps, so iteration order is ascending id
/// order, which is insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tables {
    users: BTreeMap<UserId, User>,
    usernames: BTreeMap<String, UserId>,
    posts: BTreeMap<PostId, Post>,
    comments: BTreeMap<CommentId, Comment>,
    post_likes: BTreeSet<Like>,
    next_user_id: i64,
    next_post_id: i64,
    next_comment_id: i64,
}

/// On-disk shape of [`Tables`].
#[derive(Debug, Serialize, Deserialize)]
pub struct TablesDocument {
    pub version: u32,
    pub next_user_id: i64,
    pub next_post_id: i64,
    pub next_comment_id: i64,
    pub users: Vec<User>,
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
    pub post_likes: Vec<Like>,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            usernames: BTreeMap::new(),
            posts: BTreeMap::new(),
            comments: BTreeMap::new(),
            post_likes: BTreeSet::new(),
            next_user_id: 1,
            next_post_id: 1,
            next_comment_id: 1,
        }
    }
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // users
    // -----------------------------------------------------------------------

    pub fn insert_user(&mut self, new: NewUser) -> StoreResult<User> {
        if self.usernames.contains_key(&new.username) {
            return Err(StoreError::DuplicateUsername(new.username));
        }
        let id = UserId(self.next_user_id);
        self.next_user_id += 1;
        let user = User {
            id,
            username: new.username,
            password_hash: new.password_hash,
            role: new.role,
        };
        self.usernames.insert(user.username.clone(), id);
        self.users.insert(id, user.clone());
        Ok(user)
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.usernames.get(username).and_then(|id| self.users.get(id))
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn delete_user(&mut self, id: UserId) -> StoreResult<bool> {
        if !self.users.contains_key(&id) {
            return Ok(false);
        }
        let posts = self.posts.values().filter(|p| p.owner_id == id).count();
        let comments = self.comments.values().filter(|c| c.user_id == id).count();
        if posts > 0 || comments > 0 {
            return Err(StoreError::UserHasContent { user: id, posts, comments });
        }
        self.post_likes.retain(|like| like.user_id != id);
        if let Some(user) = self.users.remove(&id) {
            self.usernames.remove(&user.username);
        }
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // posts
    // -----------------------------------------------------------------------

    pub fn insert_post(&mut self, new: NewPost) -> StoreResult<Post> {
        if !self.users.contains_key(&new.owner_id) {
            return Err(StoreError::UnknownUser(new.owner_id));
        }
        let id = PostId(self.next_post_id);
        self.next_post_id += 1;
        let post = Post {
            id,
            title: new.title,
            content: new.content,
            owner_id: new.owner_id,
        };
        self.posts.insert(id, post.clone());
        Ok(post)
    }

    pub fn post(&self, id: PostId) -> Option<&Post> {
        self.posts.get(&id)
    }

    pub fn update_post(&mut self, id: PostId, update: PostUpdate) -> Option<Post> {
        let post = self.posts.get_mut(&id)?;
        post.apply(update);
        Some(post.clone())
    }

    pub fn delete_post(&mut self, id: PostId) -> bool {
        if self.posts.remove(&id).is_none() {
            return false;
        }
        self.comments.retain(|_, c| c.post_id != id);
        self.post_likes.retain(|like| like.post_id != id);
        true
    }

    pub fn list_posts(&self, skip: usize, limit: usize) -> Vec<Post> {
        self.posts.values().skip(skip).take(limit).cloned().collect()
    }

    // -----------------------------------------------------------------------
    // comments
    // -----------------------------------------------------------------------

    pub fn insert_comment(&mut self, new: NewComment) -> StoreResult<Comment> {
        if !self.users.contains_key(&new.user_id) {
            return Err(StoreError::UnknownUser(new.user_id));
        }
        if !self.posts.contains_key(&new.post_id) {
            return Err(StoreError::UnknownPost(new.post_id));
        }
        let id = CommentId(self.next_comment_id);
        self.next_comment_id += 1;
        let comment = Comment {
            id,
            content: new.content,
            user_id: new.user_id,
            post_id: new.post_id,
        };
        self.comments.insert(id, comment.clone());
        Ok(comment)
    }

    pub fn comments_for(&self, post: PostId) -> Vec<Comment> {
        self.comments
            .values()
            .filter(|c| c.post_id == post)
            .cloned()
            .collect()
    }

    // -----------------------------------------------------------------------
    // likes
    // -----------------------------------------------------------------------

    pub fn insert_like(&mut self, like: Like) -> StoreResult<bool> {
        if !self.users.contains_key(&like.user_id) {
            return Err(StoreError::UnknownUser(like.user_id));
        }
        if !self.posts.contains_key(&like.post_id) {
            return Err(StoreError::UnknownPost(like.post_id));
        }
        Ok(self.post_likes.insert(like))
    }

    pub fn delete_like(&mut self, like: Like) -> bool {
        self.post_likes.remove(&like)
    }

    pub fn like_count(&self, post: PostId) -> usize {
        self.post_likes.iter().filter(|like| like.post_id == post).count()
    }

    // -----------------------------------------------------------------------
    // documents
    // -----------------------------------------------------------------------

    pub fn to_document(&self) -> TablesDocument {
        TablesDocument {
            version: DOCUMENT_VERSION,
            next_user_id: self.next_user_id,
            next_post_id: self.next_post_id,
            next_comment_id: self.next_comment_id,
            users: self.users.values().cloned().collect(),
            posts: self.posts.values().cloned().collect(),
            comments: self.comments.values().cloned().collect(),
            post_likes: self.post_likes.iter().copied().collect(),
        }
    }

    /// Rebuild tables from a document, re-checking every invariant.
    pub fn from_document(doc: TablesDocument) -> StoreResult<Self> {
        if doc.version != DOCUMENT_VERSION {
            return Err(StoreError::Serialization(format!(
                "unsupported document version {}",
                doc.version
            )));
        }
        let mut tables = Self::new();
        for user in doc.users {
            if tables.usernames.insert(user.username.clone(), user.id).is_some() {
                return Err(StoreError::DuplicateUsername(user.username));
            }
            let id = user.id;
            if tables.users.insert(id, user).is_some() {
                return Err(StoreError::DuplicateId { table: "users", id: id.0 });
            }
        }
        for post in doc.posts {
            if !tables.users.contains_key(&post.owner_id) {
                return Err(StoreError::UnknownUser(post.owner_id));
            }
            let id = post.id;
            if tables.posts.insert(id, post).is_some() {
                return Err(StoreError::DuplicateId { table: "posts", id: id.0 });
            }
        }
        for comment in doc.comments {
            if !tables.users.contains_key(&comment.user_id) {
                return Err(StoreError::UnknownUser(comment.user_id));
            }
            if !tables.posts.contains_key(&comment.post_id) {
                return Err(StoreError::UnknownPost(comment.post_id));
            }
            let id = comment.id;
            if tables.comments.insert(id, comment).is_some() {
                return Err(StoreError::DuplicateId { table: "comments", id: id.0 });
            }
        }
        for like in doc.post_likes {
            if !tables.users.contains_key(&like.user_id) {
                return Err(StoreError::UnknownUser(like.user_id));
            }
            if !tables.posts.contains_key(&like.post_id) {
                return Err(StoreError::UnknownPost(like.post_id));
            }
            tables.post_likes.insert(like);
        }

        // Counters must stay ahead of every stored id.
        let max_user = tables.users.keys().last().map_or(0, |id| id.0);
        let max_post = tables.posts.keys().last().map_or(0, |id| id.0);
        let max_comment = tables.comments.keys().last().map_or(0, |id| id.0);
        tables.next_user_id = doc.next_user_id.max(max_user + 1);
        tables.next_post_id = doc.next_post_id.max(max_post + 1);
        tables.next_comment_id = doc.next_comment_id.max(max_comment + 1);
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_types::Role;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.into(),
            password_hash: "hash".into(),
            role: Role::Author,
        }
    }

    fn new_post(owner: UserId, title: &str) -> NewPost {
        NewPost {
            title: title.into(),
            content: "body".into(),
            owner_id: owner,
        }
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut t = Tables::new();
        let a = t.insert_user(new_user("a")).unwrap();
        let b = t.insert_user(new_user("b")).unwrap();
        assert_eq!(a.id, UserId(1));
        assert_eq!(b.id, UserId(2));
    }

    #[test]
    fn duplicate_username_leaves_first_intact() {
        let mut t = Tables::new();
        let first = t.insert_user(new_user("alice")).unwrap();
        let err = t.insert_user(NewUser { role: Role::Admin, ..new_user("alice") });
        assert!(matches!(err, Err(StoreError::DuplicateUsername(name)) if name == "alice"));
        assert_eq!(t.user_by_username("alice"), Some(&first));
        assert_eq!(t.users().count(), 1);
    }

    #[test]
    fn post_requires_existing_owner() {
        let mut t = Tables::new();
        let err = t.insert_post(new_post(UserId(99), "orphan"));
        assert!(matches!(err, Err(StoreError::UnknownUser(UserId(99)))));
    }

    #[test]
    fn deleted_post_ids_are_not_reused() {
        let mut t = Tables::new();
        let u = t.insert_user(new_user("a")).unwrap();
        let p1 = t.insert_post(new_post(u.id, "one")).unwrap();
        assert!(t.delete_post(p1.id));
        let p2 = t.insert_post(new_post(u.id, "two")).unwrap();
        assert_eq!(p2.id, PostId(2));
    }

    #[test]
    fn list_posts_pages_in_insertion_order() {
        let mut t = Tables::new();
        let u = t.insert_user(new_user("a")).unwrap();
        for i in 0..5 {
            t.insert_post(new_post(u.id, &format!("p{i}"))).unwrap();
        }
        let page: Vec<_> = t.list_posts(1, 2).into_iter().map(|p| p.title).collect();
        assert_eq!(page, vec!["p1", "p2"]);
        assert!(t.list_posts(10, 2).is_empty());
    }

    #[test]
    fn deleting_post_cascades_to_comments_and_likes() {
        let mut t = Tables::new();
        let u = t.insert_user(new_user("a")).unwrap();
        let p = t.insert_post(new_post(u.id, "t")).unwrap();
        t.insert_comment(NewComment { content: "c".into(), user_id: u.id, post_id: p.id })
            .unwrap();
        t.insert_like(Like::new(u.id, p.id)).unwrap();

        assert!(t.delete_post(p.id));
        assert!(t.comments_for(p.id).is_empty());
        assert_eq!(t.like_count(p.id), 0);
    }

    #[test]
    fn user_with_posts_cannot_be_deleted() {
        let mut t = Tables::new();
        let u = t.insert_user(new_user("a")).unwrap();
        t.insert_post(new_post(u.id, "t")).unwrap();
        let err = t.delete_user(u.id);
        assert!(matches!(err, Err(StoreError::UserHasContent { posts: 1, comments: 0, .. })));
        assert!(t.user(u.id).is_some());
    }

    #[test]
    fn deleting_user_removes_likes_and_frees_username() {
        let mut t = Tables::new();
        let owner = t.insert_user(new_user("owner")).unwrap();
        let fan = t.insert_user(new_user("fan")).unwrap();
        let p = t.insert_post(new_post(owner.id, "t")).unwrap();
        t.insert_like(Like::new(fan.id, p.id)).unwrap();

        assert!(t.delete_user(fan.id).unwrap());
        assert_eq!(t.like_count(p.id), 0);
        assert!(t.user_by_username("fan").is_none());
        assert!(!t.delete_user(fan.id).unwrap());
        t.insert_user(new_user("fan")).unwrap();
    }

    #[test]
    fn likes_are_idempotent() {
        let mut t = Tables::new();
        let u = t.insert_user(new_user("a")).unwrap();
        let p = t.insert_post(new_post(u.id, "t")).unwrap();
        assert!(t.insert_like(Like::new(u.id, p.id)).unwrap());
        assert!(!t.insert_like(Like::new(u.id, p.id)).unwrap());
        assert_eq!(t.like_count(p.id), 1);
        assert!(t.delete_like(Like::new(u.id, p.id)));
        assert!(!t.delete_like(Like::new(u.id, p.id)));
    }

    #[test]
    fn document_roundtrip_preserves_counters() {
        let mut t = Tables::new();
        let u = t.insert_user(new_user("a")).unwrap();
        let p = t.insert_post(new_post(u.id, "one")).unwrap();
        t.insert_post(new_post(u.id, "two")).unwrap();
        t.delete_post(p.id);

        let json = serde_json::to_string(&t.to_document()).unwrap();
        let doc: TablesDocument = serde_json::from_str(&json).unwrap();
        let mut restored = Tables::from_document(doc).unwrap();
        assert_eq!(restored, t);
        let p3 = restored.insert_post(new_post(u.id, "three")).unwrap();
        assert_eq!(p3.id, PostId(3));
    }

    #[test]
    fn document_with_dangling_owner_is_rejected() {
        let doc = TablesDocument {
            version: DOCUMENT_VERSION,
            next_user_id: 1,
            next_post_id: 2,
            next_comment_id: 1,
            users: vec![],
            posts: vec![Post {
                id: PostId(1),
                title: "t".into(),
                content: "c".into(),
                owner_id: UserId(7),
            }],
            comments: vec![],
            post_likes: vec![],
        };
        assert!(matches!(Tables::from_document(doc), Err(StoreError::UnknownUser(UserId(7)))));
    }

    fn user_row(id: i64, name: &str) -> User {
        User {
            id: UserId(id),
            username: name.into(),
            password_hash: format!("hash-{name}"),
            role: Role::Author,
        }
    }

    fn document(users: Vec<User>, posts: Vec<Post>, comments: Vec<Comment>) -> TablesDocument {
        TablesDocument {
            version: DOCUMENT_VERSION,
            next_user_id: 1,
            next_post_id: 1,
            next_comment_id: 1,
            users,
            posts,
            comments,
            post_likes: vec![],
        }
    }

    #[test]
    fn document_with_shared_user_id_is_rejected() {
        let doc = document(vec![user_row(1, "alice"), user_row(1, "mallory")], vec![], vec![]);
        assert!(matches!(
            Tables::from_document(doc),
            Err(StoreError::DuplicateId { table: "users", id: 1 })
        ));
    }

    #[test]
    fn document_with_shared_post_or_comment_id_is_rejected() {
        let post = |title: &str| Post {
            id: PostId(1),
            title: title.into(),
            content: "c".into(),
            owner_id: UserId(1),
        };
        let doc = document(vec![user_row(1, "alice")], vec![post("a"), post("b")], vec![]);
        assert!(matches!(
            Tables::from_document(doc),
            Err(StoreError::DuplicateId { table: "posts", id: 1 })
        ));

        let comment = |content: &str| Comment {
            id: CommentId(3),
            content: content.into(),
            user_id: UserId(1),
            post_id: PostId(1),
        };
        let doc = document(
            vec![user_row(1, "alice")],
            vec![post("a")],
            vec![comment("x"), comment("y")],
        );
        assert!(matches!(
            Tables::from_document(doc),
            Err(StoreError::DuplicateId { table: "comments", id: 3 })
        ));
    }

    #[test]
    fn user_with_comments_cannot_be_deleted() {
        let mut t = Tables::new();
        let owner = t.insert_user(new_user("owner")).unwrap();
        let commenter = t.insert_user(new_user("commenter")).unwrap();
        let p = t.insert_post(new_post(owner.id, "t")).unwrap();
        t.insert_comment(NewComment { content: "hi".into(), user_id: commenter.id, post_id: p.id })
            .unwrap();

        let err = t.delete_user(commenter.id);
        assert!(matches!(err, Err(StoreError::UserHasContent { posts: 0, comments: 1, .. })));
        assert!(t.user_by_username("commenter").is_some());
    }
}
