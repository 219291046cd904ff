use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "todo_attachments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub todo_item_id: i32,
    pub file_name: String,
    pub file_size: i64,
    pub content_type: String,
    pub file_data: Vec<u8>,
    pub uploaded_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::todo_items::Entity",
        from = "Column::TodoItemId",
        to = "super::todo_items::Column::Id"
    )]
    TodoItems,
}

impl Related<super::todo_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TodoItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
