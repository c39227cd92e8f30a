use axum::extract::Request;
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use sea_orm::{DbErr, SqlErr};

use crate::mason::{ERROR_PROFILE, MASON, MasonBuilder};

/// Unified application error type that maps to Mason error documents.
///
/// Rendered as `{ "resource_url": ..., "@error": { "@message": title, "@messages": [message] } }`.
#[derive(Debug)]
pub enum AppError {
    /// 415 Unsupported Media Type: the body is missing or is not JSON
    UnsupportedMediaType { title: &'static str, message: String },
    /// 400 Bad Request: the JSON document does not match the resource schema
    InvalidDocument(String),
    /// 400 Bad Request
    BadRequest { title: &'static str, message: String },
    /// 404 Not Found
    NotFound { title: &'static str, message: String },
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 409 Conflict: a uniqueness constraint rejected the write
    Conflict { title: &'static str, message: String },
    /// 500 Internal Server Error (wraps any error, logs details, returns generic message)
    Internal(anyhow::Error),
}

impl AppError {
    pub fn wrong_content_type() -> Self {
        Self::UnsupportedMediaType {
            title: "Wrong content type",
            message: "Request content type must be JSON".to_string(),
        }
    }

    pub fn bad_request(title: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            title,
            message: message.into(),
        }
    }

    pub fn not_found(title: &'static str, message: impl Into<String>) -> Self {
        Self::NotFound {
            title,
            message: message.into(),
        }
    }

    pub fn conflict(title: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            title,
            message: message.into(),
        }
    }

    /// Map a failed write: uniqueness violations become `on_conflict()`, the rest
    /// goes through [`AppError::from_write`].
    pub fn from_db(err: DbErr, on_conflict: impl FnOnce() -> Self) -> Self {
        if is_unique_violation(&err) {
            on_conflict()
        } else {
            Self::from_write(err)
        }
    }

    /// Map a failed write: dangling foreign keys become `400 Invalid reference`,
    /// anything else is internal.
    pub fn from_write(err: DbErr) -> Self {
        if matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_))) {
            tracing::debug!(%err, "write rejected by foreign key");
            Self::bad_request("Invalid reference", "A referenced resource does not exist")
        } else {
            Self::Internal(err.into())
        }
    }

    #[must_use]
    pub const fn method_not_allowed() -> Self {
        Self::MethodNotAllowed
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::InvalidDocument(_) | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Whether a database error is a unique-constraint violation.
#[must_use]
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Title and message of a rendered error, stashed in the response extensions so
/// [`attach_resource_url`] can re-render the document with the request path.
#[derive(Debug, Clone)]
pub struct ErrorDocument {
    pub title: String,
    pub message: String,
}

impl ErrorDocument {
    #[must_use]
    pub fn render(&self, resource_url: Option<&str>) -> MasonBuilder {
        let mut doc = MasonBuilder::new();
        if let Some(url) = resource_url {
            doc.put("resource_url", url);
        }
        doc.add_error(&self.title, &self.message)
            .add_control("profile", ERROR_PROFILE);
        doc
    }

    fn respond(self, status: StatusCode, resource_url: Option<&str>) -> Response {
        let body = self.render(resource_url).into_value().to_string();
        let mut response = (status, [(header::CONTENT_TYPE, MASON)], body).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (title, message) = match self {
            Self::UnsupportedMediaType { title, message }
            | Self::BadRequest { title, message }
            | Self::NotFound { title, message }
            | Self::Conflict { title, message } => (title, message),
            Self::InvalidDocument(message) => ("Invalid JSON document", message),
            Self::MethodNotAllowed => (
                "Method not allowed",
                "The resource does not support this method".to_string(),
            ),
            Self::Internal(err) => {
                tracing::error!("Internal server error: {err:#}");
                (
                    "Internal server error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        ErrorDocument {
            title: title.to_string(),
            message,
        }
        .respond(status, None)
    }
}

/// Allow `?` to automatically convert any `anyhow::Error` into `AppError::Internal`.
impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}

/// Middleware filling in `resource_url` on error documents with the request path.
pub async fn attach_resource_url(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let response = next.run(request).await;

    match response.extensions().get::<ErrorDocument>().cloned() {
        Some(document) => document.respond(response.status(), Some(&path)),
        None => response,
    }
}
