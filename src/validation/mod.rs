//! Form validation
//!
//! Forms declare their rules with `garde`; every rule runs and every
//! violation is reported as a `FieldError`.

pub mod forms;
pub mod rules;

use garde::Validate;

use crate::domain::FieldError;

pub use forms::{AuthorForm, BookForm, BookInstanceForm, GenreForm};

/// Validate `form` and flatten the report into field errors
pub fn collect<T>(form: &T) -> Vec<FieldError>
where
    T: Validate<Context = ()>,
{
    match form.validate() {
        Ok(()) => Vec::new(),
        Err(report) => report
            .iter()
            .map(|(path, error)| FieldError::new(path.to_string(), error.to_string()))
            .collect(),
    }
}
