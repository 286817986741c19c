//! SeaORM implementation of BookInstanceRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{
    BookInstance, BookInstanceListing, BookInstanceRepository, BookStatus, DomainError,
    EntityKind, NewBookInstance,
};
use crate::models::book::Entity as BookEntity;
use crate::models::book_instance::{ActiveModel, Column, Entity as BookInstanceEntity};

/// SeaORM-based implementation of BookInstanceRepository
pub struct SeaOrmBookInstanceRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookInstanceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookInstanceRepository for SeaOrmBookInstanceRepository {
    async fn find_all(&self) -> Result<Vec<BookInstanceListing>, DomainError> {
        let copies_with_books = BookInstanceEntity::find()
            .order_by_asc(Column::Id)
            .find_also_related(BookEntity)
            .all(&self.db)
            .await?;

        copies_with_books
            .into_iter()
            .map(|(copy, book)| {
                Ok(BookInstanceListing {
                    instance: BookInstance::try_from(copy)?,
                    book_title: book.map(|b| b.title),
                })
            })
            .collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<BookInstance>, DomainError> {
        BookInstanceEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(BookInstance::try_from)
            .transpose()
    }

    async fn find_by_book(&self, book_id: i32) -> Result<Vec<BookInstance>, DomainError> {
        BookInstanceEntity::find()
            .filter(Column::BookId.eq(book_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(BookInstance::try_from)
            .collect()
    }

    async fn create(&self, input: NewBookInstance) -> Result<BookInstance, DomainError> {
        let new_copy = ActiveModel {
            book_id: Set(input.book_id),
            status: Set(input.status.as_str().to_string()),
            due_back: Set(input.due_back),
            ..Default::default()
        };

        let result = new_copy.insert(&self.db).await?;

        BookInstance::try_from(result)
    }

    async fn update(&self, id: i32, input: NewBookInstance) -> Result<BookInstance, DomainError> {
        let existing = BookInstanceEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::BookInstance, id))?;

        let mut active: ActiveModel = existing.into();
        active.book_id = Set(input.book_id);
        active.status = Set(input.status.as_str().to_string());
        active.due_back = Set(input.due_back);

        let result = active.update(&self.db).await?;

        BookInstance::try_from(result)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = BookInstanceEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found(EntityKind::BookInstance, id));
        }

        Ok(())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(BookInstanceEntity::find().count(&self.db).await?)
    }

    async fn count_by_status(&self, status: BookStatus) -> Result<u64, DomainError> {
        Ok(BookInstanceEntity::find()
            .filter(Column::Status.eq(status.as_str()))
            .count(&self.db)
            .await?)
    }
}
