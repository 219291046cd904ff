use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: Option<ChronoDateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::work_log_entries::Entity")]
    WorkLogEntries,
    #[sea_orm(has_many = "super::todo_items::Entity")]
    TodoItems,
    #[sea_orm(has_many = "super::todo_comments::Entity")]
    TodoComments,
}

impl Related<super::work_log_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkLogEntries.def()
    }
}

impl Related<super::todo_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TodoItems.def()
    }
}

impl Related<super::todo_comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TodoComments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
