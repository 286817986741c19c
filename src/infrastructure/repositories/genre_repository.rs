//! SeaORM implementation of GenreRepository

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::domain::{DomainError, EntityKind, Genre, GenreRepository};
use crate::models::genre::{ActiveModel, Column, Entity as GenreEntity};

/// SeaORM-based implementation of GenreRepository
pub struct SeaOrmGenreRepository {
    db: DatabaseConnection,
}

impl SeaOrmGenreRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GenreRepository for SeaOrmGenreRepository {
    async fn find_all(&self) -> Result<Vec<Genre>, DomainError> {
        let genres = GenreEntity::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;

        Ok(genres.into_iter().map(Genre::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Genre>, DomainError> {
        let genre = GenreEntity::find_by_id(id).one(&self.db).await?;

        Ok(genre.map(Genre::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Genre>, DomainError> {
        let genre = GenreEntity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(Column::Name))).eq(Func::lower(Expr::val(name))),
            )
            .one(&self.db)
            .await?;

        Ok(genre.map(Genre::from))
    }

    async fn create(&self, name: String) -> Result<Genre, DomainError> {
        let genre = ActiveModel {
            name: Set(name),
            ..Default::default()
        };

        let result = genre.insert(&self.db).await?;

        Ok(Genre::from(result))
    }

    async fn update(&self, id: i32, name: String) -> Result<Genre, DomainError> {
        let existing = GenreEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Genre, id))?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(name);

        let result = active.update(&self.db).await?;

        Ok(Genre::from(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = GenreEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found(EntityKind::Genre, id));
        }

        Ok(())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(GenreEntity::find().count(&self.db).await?)
    }
}
