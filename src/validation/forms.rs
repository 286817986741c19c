//! Form payloads for the create and update pages.
//!
//! The structs hold the raw strings a browser submits so a rejected form can
//! be rendered back exactly as typed. `normalized` trims a copy for the rules
//! and for persistence.

use garde::Validate;
use serde::{Deserialize, Serialize};

use super::rules::{self, parse_id, parse_iso_date};
use crate::domain::{BookStatus, FieldError, NewAuthor, NewBook, NewBookInstance};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AuthorForm {
    #[garde(custom(rules::required), custom(rules::alphabetic), length(chars, max = 100))]
    pub first_name: String,
    #[garde(custom(rules::required), custom(rules::alphabetic), length(chars, max = 100))]
    pub family_name: String,
    #[garde(custom(rules::iso_date))]
    pub date_of_birth: String,
    #[garde(custom(rules::iso_date))]
    pub date_of_death: String,
}

impl AuthorForm {
    pub fn normalized(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            family_name: self.family_name.trim().to_string(),
            date_of_birth: self.date_of_birth.trim().to_string(),
            date_of_death: self.date_of_death.trim().to_string(),
        }
    }

    /// Run every rule, including the birth/death ordering check
    pub fn check(&self) -> Vec<FieldError> {
        let mut errors = super::collect(self);
        if let (Some(birth), Some(death)) = (
            parse_iso_date(&self.date_of_birth),
            parse_iso_date(&self.date_of_death),
        ) {
            if death < birth {
                errors.push(FieldError::new(
                    "date_of_death",
                    "must not be before the date of birth",
                ));
            }
        }
        errors
    }

    /// Convert a normalized form that passed `check`
    pub fn to_input(&self) -> NewAuthor {
        NewAuthor {
            first_name: self.first_name.clone(),
            family_name: self.family_name.clone(),
            date_of_birth: parse_iso_date(&self.date_of_birth),
            date_of_death: parse_iso_date(&self.date_of_death),
        }
    }
}

impl From<&crate::domain::Author> for AuthorForm {
    fn from(author: &crate::domain::Author) -> Self {
        let date = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
        Self {
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            date_of_birth: date(author.date_of_birth),
            date_of_death: date(author.date_of_death),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GenreForm {
    #[garde(custom(rules::required), length(chars, min = 3, max = 100))]
    pub name: String,
}

impl GenreForm {
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
        }
    }

    pub fn check(&self) -> Vec<FieldError> {
        super::collect(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BookForm {
    #[garde(custom(rules::required), length(chars, max = 200))]
    pub title: String,
    /// Author id as submitted by the select box
    #[garde(custom(rules::required), custom(rules::id))]
    pub author: String,
    #[garde(custom(rules::required))]
    pub summary: String,
    #[garde(custom(rules::required), custom(rules::isbn13))]
    pub isbn: String,
    /// Genre id as submitted by the select box
    #[garde(custom(rules::required), custom(rules::id))]
    pub genre: String,
}

impl BookForm {
    pub fn normalized(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            summary: self.summary.trim().to_string(),
            isbn: self.isbn.trim().to_string(),
            genre: self.genre.trim().to_string(),
        }
    }

    pub fn check(&self) -> Vec<FieldError> {
        super::collect(self)
    }

    pub fn author_id(&self) -> Option<i32> {
        parse_id(&self.author)
    }

    pub fn genre_id(&self) -> Option<i32> {
        parse_id(&self.genre)
    }

    /// Convert a normalized form that passed `check`
    pub fn to_input(&self) -> Option<NewBook> {
        Some(NewBook {
            title: self.title.clone(),
            summary: self.summary.clone(),
            isbn: self.isbn.clone(),
            author_id: self.author_id()?,
            genre_id: self.genre_id()?,
        })
    }
}

impl From<&crate::domain::Book> for BookForm {
    fn from(book: &crate::domain::Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author_id.to_string(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genre: book.genre_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BookInstanceForm {
    /// Book id as submitted by the select box
    #[garde(custom(rules::required), custom(rules::id))]
    pub book: String,
    #[garde(custom(rules::required), custom(rules::book_status))]
    pub status: String,
    #[garde(custom(rules::iso_date))]
    pub due_back: String,
}

impl BookInstanceForm {
    pub fn normalized(&self) -> Self {
        Self {
            book: self.book.trim().to_string(),
            status: self.status.trim().to_string(),
            due_back: self.due_back.trim().to_string(),
        }
    }

    pub fn check(&self) -> Vec<FieldError> {
        super::collect(self)
    }

    pub fn book_id(&self) -> Option<i32> {
        parse_id(&self.book)
    }

    /// Convert a normalized form that passed `check`.
    ///
    /// The due-back date is kept only for statuses that imply a loan.
    pub fn to_input(&self) -> Option<NewBookInstance> {
        let status: BookStatus = self.status.parse().ok()?;
        let due_back = if status.implies_loan() {
            parse_iso_date(&self.due_back)
        } else {
            None
        };

        Some(NewBookInstance {
            book_id: self.book_id()?,
            status,
            due_back,
        })
    }
}

impl From<&crate::domain::BookInstance> for BookInstanceForm {
    fn from(copy: &crate::domain::BookInstance) -> Self {
        Self {
            book: copy.book_id.to_string(),
            status: copy.status.as_str().to_string(),
            due_back: copy.due_back.map(|d| d.to_string()).unwrap_or_default(),
        }
    }
}
