use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

// Junction row; identity is the (entry, department) pair.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_log_departments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub work_log_entry_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub department_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::work_log_entries::Entity",
        from = "Column::WorkLogEntryId",
        to = "super::work_log_entries::Column::Id"
    )]
    WorkLogEntries,
    #[sea_orm(
        belongs_to = "super::departments::Entity",
        from = "Column::DepartmentId",
        to = "super::departments::Column::Id"
    )]
    Departments,
}

impl Related<super::work_log_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkLogEntries.def()
    }
}

impl Related<super::departments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Departments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
