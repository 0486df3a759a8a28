use std::sync::Arc;

use blog_crypto::{CredentialStore, HashCost, SigningKey, TokenIssuer};
use blog_store::MemoryDatabase;
use blog_types::{Actor, Role};

use crate::blog::Blog;
use crate::posts::PageLimits;

pub fn test_blog() -> Blog {
    let credentials = CredentialStore::with_cost(HashCost { memory_kib: 64, iterations: 1 })
        .expect("valid test cost");
    Blog::new(
        Arc::new(MemoryDatabase::new()),
        credentials,
        TokenIssuer::new(SigningKey::generate(), 3600),
        PageLimits::default(),
    )
    .expect("blog builds")
}

/// Register `name` and return the actor their login resolves to.
pub fn actor(blog: &Blog, name: &str, role: Role) -> Actor {
    let token = token_for(blog, name, role);
    blog.identity.resolve(&token).expect("fresh token resolves")
}

pub fn token_for(blog: &Blog, name: &str, role: Role) -> String {
    blog.accounts.register(name, "password", role).expect("register");
    blog.accounts.login(name, "password").expect("login").access_token
}
