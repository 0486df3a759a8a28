use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use blog_service::ServiceError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("store error: {0}")]
    Store(#[from] blog_store::StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    /// Status code and client-facing detail.
    pub fn status_and_detail(&self) -> (StatusCode, String) {
        match self {
            Self::Service(err) => match err {
                ServiceError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                ServiceError::InvalidCredentials => (
                    StatusCode::BAD_REQUEST,
                    "Incorrect username or password".into(),
                ),
                ServiceError::Unauthenticated => {
                    (StatusCode::UNAUTHORIZED, "Not authenticated".into())
                }
                ServiceError::Forbidden(_) => {
                    (StatusCode::FORBIDDEN, "Not enough permissions".into())
                }
                ServiceError::NotFound(resource) => {
                    (StatusCode::NOT_FOUND, format!("{resource} not found"))
                }
                ServiceError::Store(_) | ServiceError::Password(_) | ServiceError::Token(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
                }
            },
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(json!({ "detail": detail }));
        if status == StatusCode::UNAUTHORIZED {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}
