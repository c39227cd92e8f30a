use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde_json::Value;

use crate::error::AppError;

/// A JSON request body.
///
/// Anything that is not a parseable JSON document sent with a JSON content type
/// is rejected with `415 Unsupported Media Type`.
#[derive(Debug, Clone)]
pub struct MasonJson(pub Value);

impl MasonJson {
    /// Treat empty documents (`{}`, `[]`, `null`, `""`, `0`, `false`) as a missing body.
    ///
    /// # Errors
    ///
    /// Returns a `415` error for empty documents.
    pub fn non_empty(self) -> Result<Value, AppError> {
        let empty = match &self.0 {
            Value::Null => true,
            Value::Bool(flag) => !flag,
            Value::Number(number) => number.as_f64() == Some(0.0),
            Value::String(text) => text.is_empty(),
            Value::Array(list) => list.is_empty(),
            Value::Object(map) => map.is_empty(),
        };
        if empty {
            Err(AppError::wrong_content_type())
        } else {
            Ok(self.0)
        }
    }

    #[must_use]
    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl<S> FromRequest<S> for MasonJson
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(%rejection, "rejected request body");
                Err(AppError::wrong_content_type())
            }
        }
    }
}

/// Numeric id taken from the last path segment of an item URL.
///
/// Ids that do not parse cannot name a stored row, so they answer `404` like
/// any other unknown id.
#[derive(Debug, Clone, Copy)]
pub struct ItemId(pub i32);

impl<S> FromRequestParts<S> for ItemId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<i32>::from_request_parts(parts, state)
            .await
            .map(|Path(id)| Self(id))
            .map_err(|_| AppError::not_found("Not found", format!("No resource at {}", parts.uri.path())))
    }
}

/// Item id for handlers that must inspect the request body before the id.
///
/// Never rejects: an unparseable id becomes `None`, which the handler reports
/// as an unknown resource once the body has been validated.
#[derive(Debug, Clone, Copy)]
pub struct MaybeItemId(pub Option<i32>);

impl<S> FromRequestParts<S> for MaybeItemId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            Path::<i32>::from_request_parts(parts, state)
                .await
                .ok()
                .map(|Path(id)| id),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_documents_count_as_missing() {
        for doc in [json!({}), json!([]), json!(null), json!(""), json!(0), json!(false)] {
            assert!(MasonJson(doc).non_empty().is_err());
        }
    }

    #[test]
    fn populated_document_passes() {
        let doc = json!({ "name": "Chess" });
        assert_eq!(MasonJson(doc.clone()).non_empty().ok(), Some(doc));
    }
}
