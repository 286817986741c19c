//! Book instance (physical copy) workflows

use serde::Serialize;

use super::{Catalog, Saved, reject_invalid};
use crate::domain::{
    Author, Book, BookInstance, BookInstanceListing, BookListing, BookStatus, DomainError,
    EntityKind, FieldError, NewBookInstance,
};
use crate::validation::BookInstanceForm;

/// A copy with the book it belongs to and that book's author
#[derive(Debug, Clone, Serialize)]
pub struct BookInstanceDetail {
    pub instance: BookInstance,
    pub book: Book,
    pub author: Author,
}

/// Choices for the book select box and the status list
#[derive(Debug, Clone, Serialize)]
pub struct BookInstanceFormOptions {
    pub books: Vec<BookListing>,
    pub statuses: Vec<BookStatus>,
}

pub async fn list_instances(
    catalog: &Catalog<'_>,
) -> Result<Vec<BookInstanceListing>, DomainError> {
    catalog.instances.find_all().await
}

pub async fn get_instance(catalog: &Catalog<'_>, id: i32) -> Result<BookInstance, DomainError> {
    catalog
        .instances
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::BookInstance, id))
}

/// Cascading fetch: copy, then its book, then the book's author.
///
/// Each step fails with its own entity kind, so a copy whose book vanished
/// reports `Book` missing rather than `BookInstance`.
pub async fn instance_detail(
    catalog: &Catalog<'_>,
    id: i32,
) -> Result<BookInstanceDetail, DomainError> {
    let instance = get_instance(catalog, id).await?;

    let book = catalog
        .books
        .find_by_id(instance.book_id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::Book, instance.book_id))?;

    let author = catalog
        .authors
        .find_by_id(book.author_id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::Author, book.author_id))?;

    Ok(BookInstanceDetail {
        instance,
        book,
        author,
    })
}

pub async fn form_options(catalog: &Catalog<'_>) -> Result<BookInstanceFormOptions, DomainError> {
    Ok(BookInstanceFormOptions {
        books: catalog.books.find_all().await?,
        statuses: BookStatus::ALL.to_vec(),
    })
}

async fn validated_input(
    catalog: &Catalog<'_>,
    form: &BookInstanceForm,
) -> Result<NewBookInstance, DomainError> {
    let mut errors = form.check();

    if let Some(book_id) = form.book_id() {
        if catalog.books.find_by_id(book_id).await?.is_none() {
            errors.push(FieldError::new("book", "book does not exist"));
        }
    }

    reject_invalid(errors)?;
    form.to_input()
        .ok_or_else(|| DomainError::Validation(vec![FieldError::new("book", "is not a valid id")]))
}

/// Copies have no natural key: every valid submission adds a copy
pub async fn create_instance(
    catalog: &Catalog<'_>,
    form: &BookInstanceForm,
) -> Result<Saved, DomainError> {
    let form = form.normalized();
    let input = validated_input(catalog, &form).await?;

    let instance = catalog.instances.create(input).await?;
    tracing::info!(
        "Created book instance {} of book {} ({})",
        instance.id,
        instance.book_id,
        instance.status
    );

    Ok(Saved::Created(instance.id))
}

pub async fn update_instance(
    catalog: &Catalog<'_>,
    id: i32,
    form: &BookInstanceForm,
) -> Result<BookInstance, DomainError> {
    let form = form.normalized();
    let input = validated_input(catalog, &form).await?;

    let instance = catalog.instances.update(id, input).await?;
    tracing::info!("Updated book instance {} ({})", instance.id, instance.status);

    Ok(instance)
}

/// Nothing references a copy, so a delete only needs the copy to exist
pub async fn delete_instance(catalog: &Catalog<'_>, id: i32) -> Result<(), DomainError> {
    let instance = get_instance(catalog, id).await?;
    catalog.instances.delete(instance.id).await?;
    tracing::info!("Deleted book instance {}", id);

    Ok(())
}
