//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{AuthorRepository, BookInstanceRepository, BookRepository, GenreRepository};
use crate::infrastructure::{
    SeaOrmAuthorRepository, SeaOrmBookInstanceRepository, SeaOrmBookRepository,
    SeaOrmGenreRepository,
};
use crate::services::Catalog;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// The process-wide connection pool the repositories share
    db: DatabaseConnection,
    pub author_repo: Arc<dyn AuthorRepository>,
    pub genre_repo: Arc<dyn GenreRepository>,
    pub book_repo: Arc<dyn BookRepository>,
    pub instance_repo: Arc<dyn BookInstanceRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        let author_repo = Arc::new(SeaOrmAuthorRepository::new(db.clone()));
        let genre_repo = Arc::new(SeaOrmGenreRepository::new(db.clone()));
        let book_repo = Arc::new(SeaOrmBookRepository::new(db.clone()));
        let instance_repo = Arc::new(SeaOrmBookInstanceRepository::new(db.clone()));

        Self {
            db,
            author_repo,
            genre_repo,
            book_repo,
            instance_repo,
        }
    }

    /// Borrow the repositories for one workflow call
    pub fn catalog(&self) -> Catalog<'_> {
        Catalog {
            authors: self.author_repo.as_ref(),
            genres: self.genre_repo.as_ref(),
            books: self.book_repo.as_ref(),
            instances: self.instance_repo.as_ref(),
        }
    }

    /// Get the database connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
