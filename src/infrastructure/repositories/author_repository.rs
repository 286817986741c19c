//! SeaORM implementation of AuthorRepository

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::domain::{Author, AuthorRepository, DomainError, EntityKind, NewAuthor};
use crate::models::author::{ActiveModel, Column, Entity as AuthorEntity};

/// SeaORM-based implementation of AuthorRepository
pub struct SeaOrmAuthorRepository {
    db: DatabaseConnection,
}

impl SeaOrmAuthorRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuthorRepository for SeaOrmAuthorRepository {
    async fn find_all(&self) -> Result<Vec<Author>, DomainError> {
        let authors = AuthorEntity::find()
            .order_by_asc(Column::FirstName)
            .order_by_asc(Column::FamilyName)
            .all(&self.db)
            .await?;

        Ok(authors.into_iter().map(Author::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Author>, DomainError> {
        let author = AuthorEntity::find_by_id(id).one(&self.db).await?;

        Ok(author.map(Author::from))
    }

    async fn find_by_name(
        &self,
        first_name: &str,
        family_name: &str,
    ) -> Result<Option<Author>, DomainError> {
        let author = AuthorEntity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(Column::FirstName)))
                    .eq(Func::lower(Expr::val(first_name))),
            )
            .filter(
                Expr::expr(Func::lower(Expr::col(Column::FamilyName)))
                    .eq(Func::lower(Expr::val(family_name))),
            )
            .one(&self.db)
            .await?;

        Ok(author.map(Author::from))
    }

    async fn create(&self, input: NewAuthor) -> Result<Author, DomainError> {
        let author = ActiveModel {
            first_name: Set(input.first_name),
            family_name: Set(input.family_name),
            date_of_birth: Set(input.date_of_birth),
            date_of_death: Set(input.date_of_death),
            ..Default::default()
        };

        let result = author.insert(&self.db).await?;

        Ok(Author::from(result))
    }

    async fn update(&self, id: i32, input: NewAuthor) -> Result<Author, DomainError> {
        let existing = AuthorEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Author, id))?;

        let mut active: ActiveModel = existing.into();
        active.first_name = Set(input.first_name);
        active.family_name = Set(input.family_name);
        active.date_of_birth = Set(input.date_of_birth);
        active.date_of_death = Set(input.date_of_death);

        let result = active.update(&self.db).await?;

        Ok(Author::from(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = AuthorEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found(EntityKind::Author, id));
        }

        Ok(())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(AuthorEntity::find().count(&self.db).await?)
    }
}
