use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

// `status` and `priority` hold the integer discriminants of
// `common_types::{TodoStatus, TodoPriority}`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "todo_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub category_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<ChronoDateTimeUtc>,
    pub status: i32,
    pub priority: i32,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: Option<ChronoDateTimeUtc>,
    pub completed_at: Option<ChronoDateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::todo_categories::Entity",
        from = "Column::CategoryId",
        to = "super::todo_categories::Column::Id"
    )]
    TodoCategories,
    #[sea_orm(has_many = "super::todo_sub_tasks::Entity")]
    TodoSubTasks,
    #[sea_orm(has_many = "super::todo_comments::Entity")]
    TodoComments,
    #[sea_orm(has_many = "super::todo_attachments::Entity")]
    TodoAttachments,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::todo_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TodoCategories.def()
    }
}

impl Related<super::todo_sub_tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TodoSubTasks.def()
    }
}

impl Related<super::todo_comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TodoComments.def()
    }
}

impl Related<super::todo_attachments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TodoAttachments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
