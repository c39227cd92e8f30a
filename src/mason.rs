//! Mason hypermedia documents.
//!
//! A Mason document is a plain JSON object whose reserved keys (`@controls`,
//! `@namespaces`, `@error`) describe links and actions available to the client.
//! [`MasonBuilder`] assembles those objects in insertion order and [`Mason`]
//! turns them into responses carrying the `application/vnd.mason+json` media type.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Map, Value};

/// Media type of every response body produced by the API.
pub const MASON: &str = "application/vnd.mason+json";

/// Prefix of the custom link relations (`gamsco:games-all`, ...).
pub const NAMESPACE: &str = "gamsco";
pub const LINK_RELATIONS_URL: &str = "/gamescores/link-relations/";

pub const GAME_PROFILE: &str = "/profiles/game/";
pub const PERSON_PROFILE: &str = "/profiles/person/";
pub const MATCH_PROFILE: &str = "/profiles/match/";
pub const ERROR_PROFILE: &str = "/profiles/error/";

/// A single hypermedia control.
///
/// Only `href` is mandatory; mutating controls also carry the HTTP method and,
/// for requests with a body, the JSON encoding and the schema the body must match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Control {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

impl Control {
    #[must_use]
    pub fn link(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            title: None,
            method: None,
            encoding: None,
            schema: None,
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub const fn method(mut self, method: &'static str) -> Self {
        self.method = Some(method);
        self
    }

    /// Mark the control as taking a JSON body validated against `schema`.
    #[must_use]
    pub fn json_schema(mut self, schema: Value) -> Self {
        self.encoding = Some("json");
        self.schema = Some(schema);
        self
    }
}

/// Insertion-ordered builder for Mason documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MasonBuilder {
    doc: Map<String, Value>,
    error: Option<Value>,
    controls: Map<String, Value>,
    namespaces: Map<String, Value>,
}

impl MasonBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a collection document with an empty `items` list.
    #[must_use]
    pub fn collection() -> Self {
        let mut builder = Self::new();
        builder.doc.insert("items".into(), Value::Array(Vec::new()));
        builder
    }

    /// Set a plain (non-hypermedia) field.
    pub fn put(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.doc.insert(key.to_owned(), value.into());
        self
    }

    /// Append a sub-document to `items`, creating the list if needed.
    pub fn push_item(&mut self, item: Self) -> &mut Self {
        let items = self
            .doc
            .entry("items")
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(list) = items {
            list.push(item.into_value());
        }
        self
    }

    /// Declare a namespace so that `<ns>:<relation>` control names resolve to `uri`.
    pub fn add_namespace(&mut self, ns: &str, uri: &str) -> &mut Self {
        let mut entry = Map::new();
        entry.insert("name".into(), Value::String(uri.to_owned()));
        self.namespaces.insert(ns.to_owned(), Value::Object(entry));
        self
    }

    /// Add a plain link control.
    pub fn add_control(&mut self, name: &str, href: impl Into<String>) -> &mut Self {
        self.add_control_with(name, Control::link(href))
    }

    pub fn add_control_with(&mut self, name: &str, control: Control) -> &mut Self {
        let value = serde_json::to_value(control).unwrap_or(Value::Null);
        self.controls.insert(name.to_owned(), value);
        self
    }

    /// Add a `POST` control for creating a new item in a collection.
    pub fn add_control_post(
        &mut self,
        name: &str,
        title: &str,
        href: impl Into<String>,
        schema: Value,
    ) -> &mut Self {
        self.add_control_with(
            name,
            Control::link(href)
                .title(title)
                .method("POST")
                .json_schema(schema),
        )
    }

    /// Add the `edit` control (`PUT` with a full replacement body).
    pub fn add_control_put(
        &mut self,
        title: &str,
        href: impl Into<String>,
        schema: Value,
    ) -> &mut Self {
        self.add_control_with(
            "edit",
            Control::link(href)
                .title(title)
                .method("PUT")
                .json_schema(schema),
        )
    }

    /// Add the namespaced `delete` control.
    pub fn add_control_delete(&mut self, title: &str, href: impl Into<String>) -> &mut Self {
        self.add_control_with(
            &format!("{NAMESPACE}:delete"),
            Control::link(href).title(title).method("DELETE"),
        )
    }

    /// Attach an `@error` block: `title` becomes `@message`, `details` the `@messages` list.
    pub fn add_error(&mut self, title: &str, details: &str) -> &mut Self {
        let mut error = Map::new();
        error.insert("@message".into(), Value::String(title.to_owned()));
        error.insert(
            "@messages".into(),
            Value::Array(vec![Value::String(details.to_owned())]),
        );
        self.error = Some(Value::Object(error));
        self
    }

    /// Finish the document. Hypermedia sections follow the plain fields.
    #[must_use]
    pub fn into_value(self) -> Value {
        let mut doc = self.doc;
        if let Some(error) = self.error {
            doc.insert("@error".into(), error);
        }
        if !self.controls.is_empty() {
            doc.insert("@controls".into(), Value::Object(self.controls));
        }
        if !self.namespaces.is_empty() {
            doc.insert("@namespaces".into(), Value::Object(self.namespaces));
        }
        Value::Object(doc)
    }
}

/// A response with the Mason media type.
///
/// Bodies are optional: `201 Created` and `204 No Content` answers carry only
/// headers, but still advertise the Mason content type.
#[derive(Debug)]
pub struct Mason {
    status: StatusCode,
    body: Option<Value>,
    location: Option<String>,
}

impl Mason {
    /// `200 OK` with `doc` as body.
    #[must_use]
    pub fn ok(doc: MasonBuilder) -> Self {
        Self::with_status(StatusCode::OK, doc)
    }

    #[must_use]
    pub fn with_status(status: StatusCode, doc: MasonBuilder) -> Self {
        Self {
            status,
            body: Some(doc.into_value()),
            location: None,
        }
    }

    /// `201 Created` pointing at the new resource, with an empty body.
    #[must_use]
    pub fn created(location: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CREATED,
            body: None,
            location: Some(location.into()),
        }
    }

    /// `204 No Content`.
    #[must_use]
    pub const fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            body: None,
            location: None,
        }
    }
}

impl IntoResponse for Mason {
    fn into_response(self) -> Response {
        let body = self.body.map(|doc| doc.to_string()).unwrap_or_default();
        let mut response = (self.status, [(header::CONTENT_TYPE, MASON)], body).into_response();

        if let Some(location) = self.location {
            match location.parse() {
                Ok(value) => {
                    response.headers_mut().insert(header::LOCATION, value);
                }
                Err(err) => tracing::warn!(%location, %err, "invalid Location header"),
            }
        }

        response
    }
}
