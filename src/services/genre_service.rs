//! Genre workflows

use serde::Serialize;

use super::{Catalog, Saved, reject_invalid};
use crate::domain::{BookSummary, Dependents, DomainError, EntityKind, FieldError, Genre};
use crate::validation::GenreForm;

#[derive(Debug, Clone, Serialize)]
pub struct GenreDetail {
    pub genre: Genre,
    pub books: Vec<BookSummary>,
}

/// All genres, ascending by name
pub async fn list_genres(catalog: &Catalog<'_>) -> Result<Vec<Genre>, DomainError> {
    catalog.genres.find_all().await
}

pub async fn get_genre(catalog: &Catalog<'_>, id: i32) -> Result<Genre, DomainError> {
    catalog
        .genres
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::Genre, id))
}

pub async fn genre_detail(catalog: &Catalog<'_>, id: i32) -> Result<GenreDetail, DomainError> {
    let genre = get_genre(catalog, id).await?;
    let books = catalog.books.find_by_genre(genre.id).await?;

    Ok(GenreDetail { genre, books })
}

pub async fn create_genre(catalog: &Catalog<'_>, form: &GenreForm) -> Result<Saved, DomainError> {
    let form = form.normalized();
    reject_invalid(form.check())?;

    if let Some(existing) = catalog.genres.find_by_name(&form.name).await? {
        tracing::info!("Genre '{}' already exists (id {})", form.name, existing.id);
        return Ok(Saved::Existing(existing.id));
    }

    match catalog.genres.create(form.name.clone()).await {
        Ok(genre) => {
            tracing::info!("Created genre {} ({})", genre.id, genre.name);
            Ok(Saved::Created(genre.id))
        }
        Err(e) if e.is_constraint() => catalog
            .genres
            .find_by_name(&form.name)
            .await?
            .map(|existing| Saved::Existing(existing.id))
            .ok_or(e),
        Err(e) => Err(e),
    }
}

pub async fn update_genre(
    catalog: &Catalog<'_>,
    id: i32,
    form: &GenreForm,
) -> Result<Genre, DomainError> {
    let form = form.normalized();
    reject_invalid(form.check())?;

    match catalog.genres.update(id, form.name).await {
        Ok(genre) => {
            tracing::info!("Updated genre {}", genre.id);
            Ok(genre)
        }
        Err(DomainError::Constraint(_)) => Err(DomainError::Validation(vec![FieldError::new(
            "name",
            "another genre already has this name",
        )])),
        Err(e) => Err(e),
    }
}

/// Delete a genre unless books are still filed under it
pub async fn delete_genre(catalog: &Catalog<'_>, id: i32) -> Result<(), DomainError> {
    let detail = genre_detail(catalog, id).await?;
    if !detail.books.is_empty() {
        tracing::warn!(
            "Refusing to delete genre {}: {} book(s) remain",
            id,
            detail.books.len()
        );
        return Err(blocked(id, detail.books));
    }

    match catalog.genres.delete(id).await {
        Ok(()) => {
            tracing::info!("Deleted genre {}", id);
            Ok(())
        }
        Err(e) if e.is_constraint() => {
            let books = catalog.books.find_by_genre(id).await?;
            Err(blocked(id, books))
        }
        Err(e) => Err(e),
    }
}

fn blocked(id: i32, books: Vec<BookSummary>) -> DomainError {
    DomainError::Blocked {
        entity: EntityKind::Genre,
        id,
        dependents: Dependents::Books(books),
    }
}
