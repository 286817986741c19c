//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.
//! Every workflow operation returns `Result<T, DomainError>`, so callers branch
//! on one tagged outcome instead of ad hoc sentinels.

use std::fmt;

use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

use super::{BookInstance, BookSummary};

/// Catalog entities, used to say which lookup of a cascading fetch failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Author,
    Genre,
    Book,
    BookInstance,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Author => "Author",
            EntityKind::Genre => "Genre",
            EntityKind::Book => "Book",
            EntityKind::BookInstance => "BookInstance",
        };
        f.write_str(name)
    }
}

/// A single rejected form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Records that prevent a delete
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum Dependents {
    Books(Vec<BookSummary>),
    BookInstances(Vec<BookInstance>),
}

impl Dependents {
    pub fn len(&self) -> usize {
        match self {
            Dependents::Books(books) => books.len(),
            Dependents::BookInstances(copies) => copies.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    /// The entity did not resolve
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: i32 },

    /// Form input rejected, with every violation collected
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Delete refused while dependents exist
    #[error("{entity} {id} is still referenced by {} record(s)", .dependents.len())]
    Blocked {
        entity: EntityKind,
        id: i32,
        dependents: Dependents,
    },

    /// A store-level constraint the caller did not pre-check
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Database/persistence error
    #[error("Database error: {0}")]
    Database(String),
}

impl DomainError {
    pub fn not_found(entity: EntityKind, id: i32) -> Self {
        DomainError::NotFound { entity, id }
    }

    /// True for unique or foreign-key violations raised by the store
    pub fn is_constraint(&self) -> bool {
        matches!(self, DomainError::Constraint(_))
    }
}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg))
            | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => DomainError::Constraint(msg),
            _ => DomainError::Database(e.to_string()),
        }
    }
}
