//! Services Layer
//!
//! The catalog workflows: validate, check natural keys and dependents, call
//! the repositories, and report one `Result<_, DomainError>` per operation.
//! HTTP handlers only translate that result into a page or a redirect.

pub mod author_service;
pub mod book_instance_service;
pub mod book_service;
pub mod catalog_service;
pub mod genre_service;

use crate::domain::{
    AuthorRepository, BookInstanceRepository, BookRepository, DomainError, FieldError,
    GenreRepository,
};

/// Borrowed handles on the four repositories a workflow may need
#[derive(Clone, Copy)]
pub struct Catalog<'a> {
    pub authors: &'a dyn AuthorRepository,
    pub genres: &'a dyn GenreRepository,
    pub books: &'a dyn BookRepository,
    pub instances: &'a dyn BookInstanceRepository,
}

/// Result of a create workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Saved {
    /// A new row was inserted
    Created(i32),
    /// The natural key already existed; nothing was inserted
    Existing(i32),
}

impl Saved {
    pub fn id(&self) -> i32 {
        match self {
            Saved::Created(id) | Saved::Existing(id) => *id,
        }
    }
}

/// Fail with every collected error, or pass when there are none
pub(crate) fn reject_invalid(errors: Vec<FieldError>) -> Result<(), DomainError> {
    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!("Form rejected: {:?}", errors);
        Err(DomainError::Validation(errors))
    }
}

// Re-export for convenience
pub use author_service::AuthorDetail;
pub use book_instance_service::{BookInstanceDetail, BookInstanceFormOptions};
pub use book_service::{BookDetail, BookFormOptions};
pub use catalog_service::CatalogSummary;
pub use genre_service::GenreDetail;
