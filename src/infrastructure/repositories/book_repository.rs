//! SeaORM implementation of BookRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{
    Author, Book, BookListing, BookRepository, BookSummary, DomainError, EntityKind, NewBook,
};
use crate::models::author::Entity as AuthorEntity;
use crate::models::book::{ActiveModel, Column, Entity as BookEntity};
use crate::models::genre::Entity as GenreEntity;

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn summaries(&self, column: Column, id: i32) -> Result<Vec<BookSummary>, DomainError> {
        let books = BookEntity::find()
            .filter(column.eq(id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(books.into_iter().map(BookSummary::from).collect())
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_all(&self) -> Result<Vec<BookListing>, DomainError> {
        let books_with_authors = BookEntity::find()
            .order_by_asc(Column::Title)
            .find_also_related(AuthorEntity)
            .all(&self.db)
            .await?;

        let genre_names: HashMap<i32, String> = GenreEntity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|g| (g.id, g.name))
            .collect();

        Ok(books_with_authors
            .into_iter()
            .map(|(book, author)| BookListing {
                genre_name: genre_names.get(&book.genre_id).cloned(),
                author_name: author.map(|a| Author::from(a).name()),
                book: Book::from(book),
            })
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
        let book = BookEntity::find_by_id(id).one(&self.db).await?;

        Ok(book.map(Book::from))
    }

    async fn find_by_natural_key(
        &self,
        isbn: &str,
        title: &str,
        summary: &str,
    ) -> Result<Option<Book>, DomainError> {
        let book = BookEntity::find()
            .filter(Column::Isbn.eq(isbn))
            .filter(Column::Title.eq(title))
            .filter(Column::Summary.eq(summary))
            .one(&self.db)
            .await?;

        Ok(book.map(Book::from))
    }

    async fn find_by_author(&self, author_id: i32) -> Result<Vec<BookSummary>, DomainError> {
        self.summaries(Column::AuthorId, author_id).await
    }

    async fn find_by_genre(&self, genre_id: i32) -> Result<Vec<BookSummary>, DomainError> {
        self.summaries(Column::GenreId, genre_id).await
    }

    async fn create(&self, input: NewBook) -> Result<Book, DomainError> {
        let result = ActiveModel::from(input).insert(&self.db).await?;

        Ok(Book::from(result))
    }

    async fn update(&self, id: i32, input: NewBook) -> Result<Book, DomainError> {
        let existing = BookEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Book, id))?;

        let mut active: ActiveModel = existing.into();
        active.title = Set(input.title);
        active.summary = Set(input.summary);
        active.isbn = Set(input.isbn);
        active.author_id = Set(input.author_id);
        active.genre_id = Set(input.genre_id);

        let result = active.update(&self.db).await?;

        Ok(Book::from(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = BookEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found(EntityKind::Book, id));
        }

        Ok(())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(BookEntity::find().count(&self.db).await?)
    }
}
