//! Catalog home page counts

use serde::Serialize;

use super::Catalog;
use crate::domain::{BookStatus, DomainError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub book_count: u64,
    pub book_instance_count: u64,
    pub book_instance_available_count: u64,
    pub author_count: u64,
    pub genre_count: u64,
}

pub async fn summary(catalog: &Catalog<'_>) -> Result<CatalogSummary, DomainError> {
    let (
        book_count,
        book_instance_count,
        book_instance_available_count,
        author_count,
        genre_count,
    ) = futures::try_join!(
        catalog.books.count(),
        catalog.instances.count(),
        catalog.instances.count_by_status(BookStatus::Available),
        catalog.authors.count(),
        catalog.genres.count(),
    )?;

    Ok(CatalogSummary {
        book_count,
        book_instance_count,
        book_instance_available_count,
        author_count,
        genre_count,
    })
}
