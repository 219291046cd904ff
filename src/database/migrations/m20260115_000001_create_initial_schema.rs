use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .default("User"),
                    )
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp())
                    .to_owned(),
            )
            .await?;

        // Shared lookup tables; names are unique per category so import
        // reconciliation has a store-level backstop
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Projects::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Projects::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Projects::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Projects::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Departments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Departments::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Departments::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Departments::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkTypes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WorkTypes::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(WorkTypes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(WorkTypes::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProcessStatuses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProcessStatuses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProcessStatuses::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ProcessStatuses::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ProcessStatuses::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // Create work_log_entries table
        manager
            .create_table(
                Table::create()
                    .table(WorkLogEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkLogEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WorkLogEntries::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(WorkLogEntries::ProjectId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkLogEntries::ProcessStatusId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkLogEntries::Title).string().not_null())
                    .col(ColumnDef::new(WorkLogEntries::Content).text().not_null())
                    .col(
                        ColumnDef::new(WorkLogEntries::RecordDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkLogEntries::WorkHours)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkLogEntries::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkLogEntries::UpdatedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_log_entries_user_id")
                            .from(WorkLogEntries::Table, WorkLogEntries::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_log_entries_project_id")
                            .from(WorkLogEntries::Table, WorkLogEntries::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_log_entries_process_status_id")
                            .from(WorkLogEntries::Table, WorkLogEntries::ProcessStatusId)
                            .to(ProcessStatuses::Table, ProcessStatuses::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create work_log_departments junction table
        manager
            .create_table(
                Table::create()
                    .table(WorkLogDepartments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkLogDepartments::WorkLogEntryId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkLogDepartments::DepartmentId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(WorkLogDepartments::WorkLogEntryId)
                            .col(WorkLogDepartments::DepartmentId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_log_departments_entry_id")
                            .from(
                                WorkLogDepartments::Table,
                                WorkLogDepartments::WorkLogEntryId,
                            )
                            .to(WorkLogEntries::Table, WorkLogEntries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_log_departments_department_id")
                            .from(WorkLogDepartments::Table, WorkLogDepartments::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create work_log_work_types junction table
        manager
            .create_table(
                Table::create()
                    .table(WorkLogWorkTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkLogWorkTypes::WorkLogEntryId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkLogWorkTypes::WorkTypeId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(WorkLogWorkTypes::WorkLogEntryId)
                            .col(WorkLogWorkTypes::WorkTypeId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_log_work_types_entry_id")
                            .from(WorkLogWorkTypes::Table, WorkLogWorkTypes::WorkLogEntryId)
                            .to(WorkLogEntries::Table, WorkLogEntries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_log_work_types_work_type_id")
                            .from(WorkLogWorkTypes::Table, WorkLogWorkTypes::WorkTypeId)
                            .to(WorkTypes::Table, WorkTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkLogWorkTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WorkLogDepartments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WorkLogEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProcessStatuses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WorkTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    Name,
    IsActive,
    SortOrder,
}

#[derive(DeriveIden)]
enum Departments {
    Table,
    Id,
    Name,
    IsActive,
    SortOrder,
}

#[derive(DeriveIden)]
enum WorkTypes {
    Table,
    Id,
    Name,
    IsActive,
    SortOrder,
}

#[derive(DeriveIden)]
enum ProcessStatuses {
    Table,
    Id,
    Name,
    IsActive,
    SortOrder,
}

#[derive(DeriveIden)]
enum WorkLogEntries {
    Table,
    Id,
    UserId,
    ProjectId,
    ProcessStatusId,
    Title,
    Content,
    RecordDate,
    WorkHours,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum WorkLogDepartments {
    Table,
    WorkLogEntryId,
    DepartmentId,
}

#[derive(DeriveIden)]
enum WorkLogWorkTypes {
    Table,
    WorkLogEntryId,
    WorkTypeId,
}
