use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create todo_categories table
        manager
            .create_table(
                Table::create()
                    .table(TodoCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TodoCategories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TodoCategories::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(TodoCategories::ColorCode)
                            .string()
                            .not_null()
                            .default("#808080"),
                    )
                    .col(
                        ColumnDef::new(TodoCategories::Icon)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(TodoCategories::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(TodoCategories::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // Create todo_items table
        manager
            .create_table(
                Table::create()
                    .table(TodoItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TodoItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TodoItems::UserId).integer().not_null())
                    .col(ColumnDef::new(TodoItems::CategoryId).integer())
                    .col(ColumnDef::new(TodoItems::Title).string().not_null())
                    .col(ColumnDef::new(TodoItems::Description).text())
                    .col(ColumnDef::new(TodoItems::DueDate).timestamp())
                    .col(
                        ColumnDef::new(TodoItems::Status)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TodoItems::Priority)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(TodoItems::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(TodoItems::UpdatedAt).timestamp())
                    .col(ColumnDef::new(TodoItems::CompletedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_todo_items_user_id")
                            .from(TodoItems::Table, TodoItems::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_todo_items_category_id")
                            .from(TodoItems::Table, TodoItems::CategoryId)
                            .to(TodoCategories::Table, TodoCategories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create todo_sub_tasks table
        manager
            .create_table(
                Table::create()
                    .table(TodoSubTasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TodoSubTasks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TodoSubTasks::TodoItemId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TodoSubTasks::Title).string().not_null())
                    .col(
                        ColumnDef::new(TodoSubTasks::IsCompleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(TodoSubTasks::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TodoSubTasks::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_todo_sub_tasks_todo_item_id")
                            .from(TodoSubTasks::Table, TodoSubTasks::TodoItemId)
                            .to(TodoItems::Table, TodoItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create todo_comments table
        manager
            .create_table(
                Table::create()
                    .table(TodoComments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TodoComments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TodoComments::TodoItemId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TodoComments::UserId).integer().not_null())
                    .col(ColumnDef::new(TodoComments::Content).text().not_null())
                    .col(
                        ColumnDef::new(TodoComments::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TodoComments::UpdatedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_todo_comments_todo_item_id")
                            .from(TodoComments::Table, TodoComments::TodoItemId)
                            .to(TodoItems::Table, TodoItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_todo_comments_user_id")
                            .from(TodoComments::Table, TodoComments::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create todo_attachments table
        manager
            .create_table(
                Table::create()
                    .table(TodoAttachments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TodoAttachments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TodoAttachments::TodoItemId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TodoAttachments::FileName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TodoAttachments::FileSize)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TodoAttachments::ContentType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TodoAttachments::FileData)
                            .binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TodoAttachments::UploadedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_todo_attachments_todo_item_id")
                            .from(TodoAttachments::Table, TodoAttachments::TodoItemId)
                            .to(TodoItems::Table, TodoItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TodoAttachments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TodoComments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TodoSubTasks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TodoItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TodoCategories::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum TodoCategories {
    Table,
    Id,
    Name,
    ColorCode,
    Icon,
    IsActive,
    SortOrder,
}

#[derive(DeriveIden)]
enum TodoItems {
    Table,
    Id,
    UserId,
    CategoryId,
    Title,
    Description,
    DueDate,
    Status,
    Priority,
    CreatedAt,
    UpdatedAt,
    CompletedAt,
}

#[derive(DeriveIden)]
enum TodoSubTasks {
    Table,
    Id,
    TodoItemId,
    Title,
    IsCompleted,
    SortOrder,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TodoComments {
    Table,
    Id,
    TodoItemId,
    UserId,
    Content,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TodoAttachments {
    Table,
    Id,
    TodoItemId,
    FileName,
    FileSize,
    ContentType,
    FileData,
    UploadedAt,
}
