//! Book workflows
//!
//! Books reference an author and a genre. Create and update check both
//! references alongside the form rules, so a bad id is reported with the
//! other field errors instead of as a store failure.

use serde::Serialize;

use super::{Catalog, Saved, reject_invalid};
use crate::domain::{
    Author, Book, BookInstance, BookListing, Dependents, DomainError, EntityKind, FieldError,
    Genre, NewBook,
};
use crate::validation::BookForm;

/// A book with everything its detail page shows
#[derive(Debug, Clone, Serialize)]
pub struct BookDetail {
    pub book: Book,
    pub author: Author,
    pub genre: Genre,
    pub copies: Vec<BookInstance>,
}

/// Choices for the author and genre select boxes
#[derive(Debug, Clone, Serialize)]
pub struct BookFormOptions {
    pub authors: Vec<Author>,
    pub genres: Vec<Genre>,
}

/// All books with author and genre names, ascending by title
pub async fn list_books(catalog: &Catalog<'_>) -> Result<Vec<BookListing>, DomainError> {
    catalog.books.find_all().await
}

pub async fn get_book(catalog: &Catalog<'_>, id: i32) -> Result<Book, DomainError> {
    catalog
        .books
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::Book, id))
}

/// Cascading fetch: book, then its author and genre, then its copies.
///
/// A dangling author or genre reference is reported as that entity missing.
pub async fn book_detail(catalog: &Catalog<'_>, id: i32) -> Result<BookDetail, DomainError> {
    let book = get_book(catalog, id).await?;

    let author = catalog
        .authors
        .find_by_id(book.author_id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::Author, book.author_id))?;

    let genre = catalog
        .genres
        .find_by_id(book.genre_id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::Genre, book.genre_id))?;

    let copies = catalog.instances.find_by_book(book.id).await?;

    Ok(BookDetail {
        book,
        author,
        genre,
        copies,
    })
}

pub async fn form_options(catalog: &Catalog<'_>) -> Result<BookFormOptions, DomainError> {
    let (authors, genres) =
        futures::try_join!(catalog.authors.find_all(), catalog.genres.find_all())?;

    Ok(BookFormOptions { authors, genres })
}

/// Field errors for an author or genre id that does not resolve
async fn missing_references(
    catalog: &Catalog<'_>,
    form: &BookForm,
) -> Result<Vec<FieldError>, DomainError> {
    let mut errors = Vec::new();

    if let Some(author_id) = form.author_id() {
        if catalog.authors.find_by_id(author_id).await?.is_none() {
            errors.push(FieldError::new("author", "author does not exist"));
        }
    }
    if let Some(genre_id) = form.genre_id() {
        if catalog.genres.find_by_id(genre_id).await?.is_none() {
            errors.push(FieldError::new("genre", "genre does not exist"));
        }
    }

    Ok(errors)
}

/// Rule errors plus author/genre existence, all collected together
async fn validated_input(catalog: &Catalog<'_>, form: &BookForm) -> Result<NewBook, DomainError> {
    let mut errors = form.check();
    errors.extend(missing_references(catalog, form).await?);

    reject_invalid(errors)?;
    form.to_input().ok_or_else(|| {
        DomainError::Validation(vec![FieldError::new("author", "is not a valid id")])
    })
}

/// Validate, return the existing book on an (isbn, title, summary) match, else insert
pub async fn create_book(catalog: &Catalog<'_>, form: &BookForm) -> Result<Saved, DomainError> {
    let form = form.normalized();
    let input = validated_input(catalog, &form).await?;

    if let Some(existing) = catalog
        .books
        .find_by_natural_key(&input.isbn, &input.title, &input.summary)
        .await?
    {
        tracing::info!("Book '{}' already exists (id {})", input.title, existing.id);
        return Ok(Saved::Existing(existing.id));
    }

    let (isbn, title, summary) = (input.isbn.clone(), input.title.clone(), input.summary.clone());
    match catalog.books.create(input).await {
        Ok(book) => {
            tracing::info!("Created book {} ('{}')", book.id, book.title);
            Ok(Saved::Created(book.id))
        }
        Err(e) if e.is_constraint() => catalog
            .books
            .find_by_natural_key(&isbn, &title, &summary)
            .await?
            .map(|existing| Saved::Existing(existing.id))
            .ok_or(e),
        Err(e) => Err(e),
    }
}

pub async fn update_book(
    catalog: &Catalog<'_>,
    id: i32,
    form: &BookForm,
) -> Result<Book, DomainError> {
    let form = form.normalized();
    let input = validated_input(catalog, &form).await?;

    match catalog.books.update(id, input).await {
        Ok(book) => {
            tracing::info!("Updated book {}", book.id);
            Ok(book)
        }
        // Either the natural key collided or a reference vanished after the check
        Err(DomainError::Constraint(_)) => {
            let missing = missing_references(catalog, &form).await?;
            if missing.is_empty() {
                Err(DomainError::Validation(vec![FieldError::new(
                    "isbn",
                    "another book already has this isbn, title and summary",
                )]))
            } else {
                Err(DomainError::Validation(missing))
            }
        }
        Err(e) => Err(e),
    }
}

/// Book plus copies, for the delete confirmation page
pub async fn delete_preview(
    catalog: &Catalog<'_>,
    id: i32,
) -> Result<(Book, Vec<BookInstance>), DomainError> {
    let book = get_book(catalog, id).await?;
    let copies = catalog.instances.find_by_book(book.id).await?;

    Ok((book, copies))
}

/// Delete a book unless copies of it remain
pub async fn delete_book(catalog: &Catalog<'_>, id: i32) -> Result<(), DomainError> {
    let (_, copies) = delete_preview(catalog, id).await?;
    if !copies.is_empty() {
        tracing::warn!(
            "Refusing to delete book {}: {} copy(ies) remain",
            id,
            copies.len()
        );
        return Err(blocked(id, copies));
    }

    match catalog.books.delete(id).await {
        Ok(()) => {
            tracing::info!("Deleted book {}", id);
            Ok(())
        }
        Err(e) if e.is_constraint() => {
            let copies = catalog.instances.find_by_book(id).await?;
            Err(blocked(id, copies))
        }
        Err(e) => Err(e),
    }
}

fn blocked(id: i32, copies: Vec<BookInstance>) -> DomainError {
    DomainError::Blocked {
        entity: EntityKind::Book,
        id,
        dependents: Dependents::BookInstances(copies),
    }
}
