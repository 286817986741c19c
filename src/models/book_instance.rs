use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{self, BookStatus, DomainError};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "book_instances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub book_id: i32,
    /// Availability status of this physical copy.
    /// Stored as the wire name of a `BookStatus`:
    /// `AVAILABLE`, `ON_LOAN`, `MAINTENANCE` or `RESERVED`.
    pub status: String,
    /// Only set while the status implies a loan.
    pub due_back: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id"
    )]
    Book,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for domain::BookInstance {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status: BookStatus = model.status.parse().map_err(DomainError::Database)?;

        Ok(Self {
            id: model.id,
            book_id: model.book_id,
            status,
            due_back: model.due_back,
        })
    }
}
