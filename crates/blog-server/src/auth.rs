use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use blog_service::ServiceError;
use blog_types::Actor;

use crate::error::ServerError;
use crate::handler::blocking;
use crate::router::AppState;

/// Credential presented with a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    Bearer(String),
    Anonymous,
}

impl Credentials {
    /// Read an `Authorization: Bearer <token>` header. Any other scheme, or no
    /// header at all, is anonymous.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) else {
            return Self::Anonymous;
        };
        match value.trim().split_once(' ') {
            Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => {
                let token = token.trim();
                if token.is_empty() {
                    Self::Anonymous
                } else {
                    Self::Bearer(token.to_string())
                }
            }
            _ => Self::Anonymous,
        }
    }
}

/// Extractor for handlers that require an authenticated caller.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Actor);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match Credentials::from_headers(&parts.headers) {
            Credentials::Bearer(token) => {
                let blog = state.blog.clone();
                let actor = blocking(move || Ok(blog.identity.resolve(&token)?)).await?;
                Ok(Self(actor))
            }
            Credentials::Anonymous => Err(ServiceError::Unauthenticated.into()),
        }
    }
}
