//! Author workflows

use serde::Serialize;

use super::{Catalog, Saved, reject_invalid};
use crate::domain::{Author, BookSummary, Dependents, DomainError, EntityKind, FieldError};
use crate::validation::AuthorForm;

/// An author with the books they wrote
#[derive(Debug, Clone, Serialize)]
pub struct AuthorDetail {
    pub author: Author,
    pub books: Vec<BookSummary>,
}

/// All authors, ascending by first name
pub async fn list_authors(catalog: &Catalog<'_>) -> Result<Vec<Author>, DomainError> {
    catalog.authors.find_all().await
}

pub async fn get_author(catalog: &Catalog<'_>, id: i32) -> Result<Author, DomainError> {
    catalog
        .authors
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::Author, id))
}

/// Author plus books; also backs the delete confirmation page
pub async fn author_detail(catalog: &Catalog<'_>, id: i32) -> Result<AuthorDetail, DomainError> {
    let author = get_author(catalog, id).await?;
    let books = catalog.books.find_by_author(author.id).await?;

    Ok(AuthorDetail { author, books })
}

/// Validate, return the existing author on a name match, else insert
pub async fn create_author(catalog: &Catalog<'_>, form: &AuthorForm) -> Result<Saved, DomainError> {
    let form = form.normalized();
    reject_invalid(form.check())?;

    if let Some(existing) = catalog
        .authors
        .find_by_name(&form.first_name, &form.family_name)
        .await?
    {
        tracing::info!(
            "Author {} {} already exists (id {})",
            form.first_name,
            form.family_name,
            existing.id
        );
        return Ok(Saved::Existing(existing.id));
    }

    match catalog.authors.create(form.to_input()).await {
        Ok(author) => {
            tracing::info!("Created author {} ({})", author.id, author.name());
            Ok(Saved::Created(author.id))
        }
        // Lost a race with a concurrent create of the same name
        Err(e) if e.is_constraint() => catalog
            .authors
            .find_by_name(&form.first_name, &form.family_name)
            .await?
            .map(|existing| Saved::Existing(existing.id))
            .ok_or(e),
        Err(e) => Err(e),
    }
}

/// Validate and overwrite the author's fields; the id never changes
pub async fn update_author(
    catalog: &Catalog<'_>,
    id: i32,
    form: &AuthorForm,
) -> Result<Author, DomainError> {
    let form = form.normalized();
    reject_invalid(form.check())?;

    match catalog.authors.update(id, form.to_input()).await {
        Ok(author) => {
            tracing::info!("Updated author {}", author.id);
            Ok(author)
        }
        Err(DomainError::Constraint(_)) => Err(DomainError::Validation(vec![FieldError::new(
            "family_name",
            "another author already has this name",
        )])),
        Err(e) => Err(e),
    }
}

/// Delete an author unless books still reference them
pub async fn delete_author(catalog: &Catalog<'_>, id: i32) -> Result<(), DomainError> {
    let detail = author_detail(catalog, id).await?;
    if !detail.books.is_empty() {
        tracing::warn!(
            "Refusing to delete author {}: {} book(s) remain",
            id,
            detail.books.len()
        );
        return Err(blocked(id, detail.books));
    }

    match catalog.authors.delete(id).await {
        Ok(()) => {
            tracing::info!("Deleted author {}", id);
            Ok(())
        }
        // A book was added after the dependents check
        Err(e) if e.is_constraint() => {
            let books = catalog.books.find_by_author(id).await?;
            Err(blocked(id, books))
        }
        Err(e) => Err(e),
    }
}

fn blocked(id: i32, books: Vec<BookSummary>) -> DomainError {
    DomainError::Blocked {
        entity: EntityKind::Author,
        id,
        dependents: Dependents::Books(books),
    }
}
