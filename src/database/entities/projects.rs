use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub is_active: bool,
    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::work_log_entries::Entity")]
    WorkLogEntries,
}

impl Related<super::work_log_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkLogEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
