//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::DomainError;

/// Author data for views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// "Family, First", the way catalogs file authors
    pub fn name(&self) -> String {
        format!("{}, {}", self.family_name, self.first_name)
    }

    pub fn lifespan(&self) -> String {
        let fmt = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
        match (self.date_of_birth, self.date_of_death) {
            (None, None) => String::new(),
            (birth, death) => format!("{} - {}", fmt(birth), fmt(death)),
        }
    }

    /// Whole years lived, up to the date of death or `today`
    pub fn age(&self, today: NaiveDate) -> Option<u32> {
        let birth = self.date_of_birth?;
        self.date_of_death.unwrap_or(today).years_since(birth)
    }
}

/// Fields for creating or updating an author
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuthor {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author_id: i32,
    pub genre_id: i32,
}

/// Fields for creating or updating a book
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author_id: i32,
    pub genre_id: i32,
}

/// Short book row shown under an author or genre
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub summary: String,
}

/// Book list row with the names of its author and genre
#[derive(Debug, Clone, Serialize)]
pub struct BookListing {
    #[serde(flatten)]
    pub book: Book,
    pub author_name: Option<String>,
    pub genre_name: Option<String>,
}

/// Availability of a physical copy.
///
/// The set is closed; `ALL` is its display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookStatus {
    Available,
    OnLoan,
    Maintenance,
    Reserved,
}

impl BookStatus {
    pub const ALL: [BookStatus; 4] = [
        BookStatus::Available,
        BookStatus::OnLoan,
        BookStatus::Maintenance,
        BookStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "AVAILABLE",
            BookStatus::OnLoan => "ON_LOAN",
            BookStatus::Maintenance => "MAINTENANCE",
            BookStatus::Reserved => "RESERVED",
        }
    }

    /// Statuses for which a due-back date is meaningful
    pub fn implies_loan(&self) -> bool {
        matches!(self, BookStatus::OnLoan | BookStatus::Reserved)
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown book status: {}", s))
    }
}

/// A physical copy of a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookInstance {
    pub id: i32,
    pub book_id: i32,
    pub status: BookStatus,
    pub due_back: Option<NaiveDate>,
}

/// Fields for creating or updating a copy
#[derive(Debug, Clone, PartialEq)]
pub struct NewBookInstance {
    pub book_id: i32,
    pub status: BookStatus,
    pub due_back: Option<NaiveDate>,
}

/// Copy list row with its book title
#[derive(Debug, Clone, Serialize)]
pub struct BookInstanceListing {
    #[serde(flatten)]
    pub instance: BookInstance,
    pub book_title: Option<String>,
}

/// Repository trait for Author entity
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Find all authors, ascending by first name
    async fn find_all(&self) -> Result<Vec<Author>, DomainError>;

    /// Find an author by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Author>, DomainError>;

    /// Case-insensitive lookup on (first name, family name)
    async fn find_by_name(
        &self,
        first_name: &str,
        family_name: &str,
    ) -> Result<Option<Author>, DomainError>;

    /// Create a new author
    async fn create(&self, input: NewAuthor) -> Result<Author, DomainError>;

    /// Overwrite every field of an existing author
    async fn update(&self, id: i32, input: NewAuthor) -> Result<Author, DomainError>;

    /// Delete an author by ID
    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}

/// Repository trait for Genre entity
#[async_trait]
pub trait GenreRepository: Send + Sync {
    /// Find all genres, ascending by name
    async fn find_all(&self) -> Result<Vec<Genre>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Genre>, DomainError>;

    /// Case-insensitive lookup on the genre name
    async fn find_by_name(&self, name: &str) -> Result<Option<Genre>, DomainError>;

    async fn create(&self, name: String) -> Result<Genre, DomainError>;

    async fn update(&self, id: i32, name: String) -> Result<Genre, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}

/// Repository trait for Book entity
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Find all books with author and genre names, ascending by title
    async fn find_all(&self) -> Result<Vec<BookListing>, DomainError>;

    /// Find a single book by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError>;

    /// Exact lookup on (isbn, title, summary)
    async fn find_by_natural_key(
        &self,
        isbn: &str,
        title: &str,
        summary: &str,
    ) -> Result<Option<Book>, DomainError>;

    /// Books written by an author, in insertion order
    async fn find_by_author(&self, author_id: i32) -> Result<Vec<BookSummary>, DomainError>;

    /// Books filed under a genre, in insertion order
    async fn find_by_genre(&self, genre_id: i32) -> Result<Vec<BookSummary>, DomainError>;

    /// Create a new book
    async fn create(&self, input: NewBook) -> Result<Book, DomainError>;

    /// Update an existing book
    async fn update(&self, id: i32, input: NewBook) -> Result<Book, DomainError>;

    /// Delete a book by ID
    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}

/// Repository trait for BookInstance entity
#[async_trait]
pub trait BookInstanceRepository: Send + Sync {
    /// Find all copies with book titles
    async fn find_all(&self) -> Result<Vec<BookInstanceListing>, DomainError>;

    /// Find a copy by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<BookInstance>, DomainError>;

    /// Find copies for a specific book
    async fn find_by_book(&self, book_id: i32) -> Result<Vec<BookInstance>, DomainError>;

    /// Create a new copy
    async fn create(&self, input: NewBookInstance) -> Result<BookInstance, DomainError>;

    /// Update a copy
    async fn update(&self, id: i32, input: NewBookInstance) -> Result<BookInstance, DomainError>;

    /// Delete a copy
    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;

    async fn count_by_status(&self, status: BookStatus) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn asimov() -> Author {
        Author {
            id: 1,
            first_name: "Isaac".to_string(),
            family_name: "Asimov".to_string(),
            date_of_birth: Some(date(1920, 1, 2)),
            date_of_death: Some(date(1992, 4, 6)),
        }
    }

    #[test]
    fn status_round_trips_through_its_wire_name() {
        for status in BookStatus::ALL {
            assert_eq!(status.as_str().parse::<BookStatus>(), Ok(status));
        }
        assert!("LOST".parse::<BookStatus>().is_err());
    }

    #[test]
    fn only_loan_statuses_carry_due_dates() {
        assert!(BookStatus::OnLoan.implies_loan());
        assert!(BookStatus::Reserved.implies_loan());
        assert!(!BookStatus::Available.implies_loan());
        assert!(!BookStatus::Maintenance.implies_loan());
    }

    #[test]
    fn age_stops_at_date_of_death() {
        let author = asimov();
        assert_eq!(author.age(date(2026, 1, 1)), Some(72));
        assert_eq!(author.name(), "Asimov, Isaac");
        assert_eq!(author.lifespan(), "1920-01-02 - 1992-04-06");
    }

    #[test]
    fn living_author_ages_until_today() {
        let author = Author {
            date_of_death: None,
            ..asimov()
        };
        assert_eq!(author.age(date(2020, 1, 1)), Some(99));
        assert_eq!(author.lifespan(), "1920-01-02 - ");
    }

    #[test]
    fn age_unknown_without_birth_date() {
        let author = Author {
            date_of_birth: None,
            date_of_death: None,
            ..asimov()
        };
        assert_eq!(author.age(date(2020, 1, 1)), None);
        assert_eq!(author.lifespan(), "");
    }
}
