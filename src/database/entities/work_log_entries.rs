use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_log_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub project_id: i32,
    pub process_status_id: i32,
    pub title: String,
    pub content: String,
    pub record_date: ChronoDate,
    pub work_hours: f64,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: Option<ChronoDateTimeUtc>,
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
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Projects,
    #[sea_orm(
        belongs_to = "super::process_statuses::Entity",
        from = "Column::ProcessStatusId",
        to = "super::process_statuses::Column::Id"
    )]
    ProcessStatuses,
    #[sea_orm(has_many = "super::work_log_departments::Entity")]
    WorkLogDepartments,
    #[sea_orm(has_many = "super::work_log_work_types::Entity")]
    WorkLogWorkTypes,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl Related<super::process_statuses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProcessStatuses.def()
    }
}

impl Related<super::work_log_departments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkLogDepartments.def()
    }
}

impl Related<super::work_log_work_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkLogWorkTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
