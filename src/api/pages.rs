//! View plumbing shared by the catalog handlers.
//!
//! A `Page` is a view name plus a data bag. It is sent as JSON so any
//! template front end can render it; redirects and errors are plain HTTP.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::domain::{DomainError, EntityKind, FieldError};

/// Path prefix the catalog router is mounted under
pub const CATALOG_ROOT: &str = "/catalog";

fn segment(entity: EntityKind) -> &'static str {
    match entity {
        EntityKind::Author => "author",
        EntityKind::Genre => "genre",
        EntityKind::Book => "book",
        EntityKind::BookInstance => "bookinstance",
    }
}

pub fn detail_url(entity: EntityKind, id: i32) -> String {
    format!("{}/{}/{}", CATALOG_ROOT, segment(entity), id)
}

pub fn list_url(entity: EntityKind) -> String {
    format!("{}/{}/list", CATALOG_ROOT, segment(entity))
}

/// A rendered view: template name, page title and the values it displays
#[derive(Debug, Clone)]
pub struct Page {
    view: &'static str,
    title: String,
    data: Map<String, Value>,
}

impl Page {
    pub fn new(view: &'static str, title: impl Into<String>) -> Self {
        Self {
            view,
            title: title.into(),
            data: Map::new(),
        }
    }

    /// Add a value to the data bag
    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or_else(|e| {
            tracing::error!("Failed to serialize '{}' for {}: {}", key, self.view, e);
            Value::Null
        });
        self.data.insert(key.to_string(), value);
        self
    }

    /// A form page, pre-filled with `form` and listing `errors`
    pub fn form(
        view: &'static str,
        title: impl Into<String>,
        form: impl Serialize,
        errors: &[FieldError],
    ) -> Self {
        Self::new(view, title).with("form", form).with("errors", errors)
    }
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        let mut body = self.data;
        body.insert("view".to_string(), Value::from(self.view));
        body.insert("title".to_string(), Value::from(self.title));
        (StatusCode::OK, Json(Value::Object(body))).into_response()
    }
}

/// Body of the `POST /E/delete` forms
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteForm {
    pub id: String,
}

impl DeleteForm {
    pub fn id(&self) -> Option<i32> {
        crate::validation::rules::parse_id(self.id.trim())
    }
}

/// Failures that end a request with an error page
#[derive(Debug)]
pub struct AppError(pub DomainError);

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            DomainError::NotFound { .. } => {
                tracing::warn!("{}", self.0);
                (StatusCode::NOT_FOUND, self.0.to_string())
            }
            DomainError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.0.to_string()),
            DomainError::Blocked { .. } | DomainError::Constraint(_) => {
                tracing::warn!("{}", self.0);
                (StatusCode::CONFLICT, self.0.to_string())
            }
            DomainError::Database(_) => {
                tracing::error!("{}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = match &self.0 {
            DomainError::NotFound { entity, id } => {
                json!({ "error": message, "entity": entity, "id": id })
            }
            _ => json!({ "error": message }),
        };
        (status, Json(body)).into_response()
    }
}
