use anyhow::Result;
use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Database, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Set,
};
use sea_orm_migration::MigratorTrait;

use worklog::archive::manifest::{
    AttachmentRecord, FullExportManifest, ReferenceData, ReferenceItem, SubTaskRecord,
    TodoCategoryItem, TodoRecord, WorkLogRecord, FORMAT_VERSION,
};
use worklog::archive::{attachment_entry_path, write_archive};
use worklog::database::entities::common_types::{TodoPriority, TodoStatus};
use worklog::database::entities::{
    departments, process_statuses, projects, todo_attachments, todo_categories, todo_comments,
    todo_items, todo_sub_tasks, users, work_log_departments, work_log_entries,
    work_log_work_types, work_types,
};
use worklog::database::migrations::Migrator;
use worklog::services::{ExportService, ImportService};

async fn setup_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

async fn create_user(db: &DatabaseConnection, username: &str) -> Result<users::Model> {
    let user = users::ActiveModel {
        id: NotSet,
        username: Set(username.to_string()),
        email: Set(format!("{}@example.com", username)),
        password_hash: Set(String::new()),
        role: Set("User".to_string()),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    }
    .insert(db)
    .await?;
    Ok(user)
}

async fn create_project(db: &DatabaseConnection, name: &str) -> Result<projects::Model> {
    Ok(projects::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        is_active: Set(true),
        sort_order: Set(0),
    }
    .insert(db)
    .await?)
}

async fn create_department(db: &DatabaseConnection, name: &str) -> Result<departments::Model> {
    Ok(departments::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        is_active: Set(true),
        sort_order: Set(0),
    }
    .insert(db)
    .await?)
}

async fn create_work_type(db: &DatabaseConnection, name: &str) -> Result<work_types::Model> {
    Ok(work_types::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        is_active: Set(true),
        sort_order: Set(0),
    }
    .insert(db)
    .await?)
}

async fn create_process_status(
    db: &DatabaseConnection,
    name: &str,
) -> Result<process_statuses::Model> {
    Ok(process_statuses::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        is_active: Set(true),
        sort_order: Set(0),
    }
    .insert(db)
    .await?)
}

async fn create_todo_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<todo_categories::Model> {
    Ok(todo_categories::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        color_code: Set("#336699".to_string()),
        icon: Set("tag".to_string()),
        is_active: Set(true),
        sort_order: Set(0),
    }
    .insert(db)
    .await?)
}

#[tokio::test]
async fn system_data_reimport_skips_every_reference_row() -> Result<()> {
    let source = setup_db().await?;
    let admin = create_user(&source, "admin").await?;
    create_project(&source, "Atlas").await?;
    create_project(&source, "Beacon").await?;
    create_department(&source, "Engineering").await?;
    create_work_type(&source, "Development").await?;
    create_process_status(&source, "Open").await?;
    create_todo_category(&source, "Chores").await?;

    let export_service = ExportService::new(source.clone());
    let manifest = export_service.export_system_data(admin.id).await?;
    let archive_bytes = export_service.build_system_archive(&manifest)?;

    let target = setup_db().await?;
    let importer = create_user(&target, "importer").await?;
    let import_service = ImportService::new(target.clone());

    let first = import_service
        .import_system_data(importer.id, &archive_bytes)
        .await;
    assert!(first.success, "first import should succeed: {:?}", first.errors);
    assert_eq!(first.statistics.projects_created, 2);
    assert_eq!(first.statistics.departments_created, 1);
    assert_eq!(first.statistics.work_types_created, 1);
    assert_eq!(first.statistics.process_statuses_created, 1);
    assert_eq!(first.statistics.todo_categories_created, 1);

    let second = import_service
        .import_system_data(importer.id, &archive_bytes)
        .await;
    assert!(second.success);
    assert_eq!(second.statistics.projects_created, 0, "names match, nothing new");
    assert_eq!(second.statistics.projects_skipped, 2);
    assert_eq!(second.statistics.departments_skipped, 1);
    assert_eq!(second.statistics.work_types_skipped, 1);
    assert_eq!(second.statistics.process_statuses_skipped, 1);
    assert_eq!(second.statistics.todo_categories_skipped, 1);

    assert_eq!(projects::Entity::find().count(&target).await?, 2);
    assert_eq!(todo_categories::Entity::find().count(&target).await?, 1);
    Ok(())
}

#[tokio::test]
async fn full_archive_double_import_duplicates_rows_but_not_lookups() -> Result<()> {
    let source = setup_db().await?;
    let alice = create_user(&source, "alice").await?;
    let project = create_project(&source, "Atlas").await?;
    let status = create_process_status(&source, "Open").await?;
    let department = create_department(&source, "Engineering").await?;
    create_todo_category(&source, "Chores").await?;

    for (day, title) in [(10, "Planning"), (11, "Implementation")] {
        let entry = work_log_entries::ActiveModel {
            id: NotSet,
            user_id: Set(alice.id),
            project_id: Set(project.id),
            process_status_id: Set(status.id),
            title: Set(title.to_string()),
            content: Set(format!("{} notes", title)),
            record_date: Set(NaiveDate::from_ymd_opt(2026, 1, day).unwrap()),
            work_hours: Set(4.0),
            created_at: Set(Utc.with_ymd_and_hms(2026, 1, day, 18, 0, 0).unwrap()),
            updated_at: Set(None),
        }
        .insert(&source)
        .await?;
        work_log_departments::ActiveModel {
            work_log_entry_id: Set(entry.id),
            department_id: Set(department.id),
        }
        .insert(&source)
        .await?;
    }

    let todo = todo_items::ActiveModel {
        id: NotSet,
        user_id: Set(alice.id),
        category_id: Set(None),
        title: Set("Ship the release".to_string()),
        description: Set(None),
        due_date: Set(None),
        status: Set(TodoStatus::Pending.into()),
        priority: Set(TodoPriority::Medium.into()),
        created_at: Set(Utc.with_ymd_and_hms(2026, 1, 12, 9, 0, 0).unwrap()),
        updated_at: Set(None),
        completed_at: Set(None),
    }
    .insert(&source)
    .await?;
    todo_sub_tasks::ActiveModel {
        id: NotSet,
        todo_item_id: Set(todo.id),
        title: Set("Write changelog".to_string()),
        is_completed: Set(false),
        sort_order: Set(1),
        created_at: Set(Utc.with_ymd_and_hms(2026, 1, 12, 9, 5, 0).unwrap()),
    }
    .insert(&source)
    .await?;

    let export_service = ExportService::new(source.clone());
    let manifest = export_service.export_full(alice.id, None, None, false).await?;
    let archive_bytes = export_service.build_full_archive(&manifest, None)?;

    let target = setup_db().await?;
    let bob = create_user(&target, "bob").await?;
    let import_service = ImportService::new(target.clone());

    let first = import_service.import_full(bob.id, &archive_bytes).await;
    assert!(first.success, "{:?}", first.errors);
    assert_eq!(first.statistics.work_logs_imported, 2);
    assert_eq!(first.statistics.todos_imported, 1);

    let lookups_after_first = projects::Entity::find().count(&target).await?;

    let second = import_service.import_full(bob.id, &archive_bytes).await;
    assert!(second.success, "{:?}", second.errors);
    assert_eq!(second.statistics.work_logs_imported, 2);
    assert_eq!(second.statistics.projects_skipped, 1);
    assert_eq!(second.statistics.projects_created, 0);

    // Work logs and todos have no natural key and duplicate freely;
    // reference rows reconcile by name and do not
    assert_eq!(work_log_entries::Entity::find().count(&target).await?, 4);
    assert_eq!(todo_items::Entity::find().count(&target).await?, 2);
    assert_eq!(todo_sub_tasks::Entity::find().count(&target).await?, 2);
    assert_eq!(projects::Entity::find().count(&target).await?, lookups_after_first);
    Ok(())
}

#[tokio::test]
async fn work_log_import_skips_rows_with_unresolvable_references() -> Result<()> {
    let source = setup_db().await?;
    let alice = create_user(&source, "alice").await?;
    let atlas = create_project(&source, "Atlas").await?;
    let beacon = create_project(&source, "Beacon").await?;
    let status = create_process_status(&source, "Open").await?;

    for (project_id, title) in [(atlas.id, "Kept entry"), (beacon.id, "Dropped entry")] {
        work_log_entries::ActiveModel {
            id: NotSet,
            user_id: Set(alice.id),
            project_id: Set(project_id),
            process_status_id: Set(status.id),
            title: Set(title.to_string()),
            content: Set("content".to_string()),
            record_date: Set(NaiveDate::from_ymd_opt(2026, 2, 2).unwrap()),
            work_hours: Set(1.5),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&source)
        .await?;
    }

    let export_service = ExportService::new(source.clone());
    let manifest = export_service
        .export_work_log_data(alice.id, None, None, false)
        .await?;
    let archive_bytes = export_service.build_work_log_archive(&manifest, None)?;

    // The target knows "Atlas" and "Open" but has never heard of "Beacon";
    // the work-log shape never creates missing reference rows
    let target = setup_db().await?;
    let carol = create_user(&target, "carol").await?;
    create_project(&target, "Atlas").await?;
    create_process_status(&target, "Open").await?;

    let import_service = ImportService::new(target.clone());
    let result = import_service
        .import_work_log_data(carol.id, &archive_bytes)
        .await;

    assert!(result.success, "row-level failure must not fail the import");
    assert_eq!(result.statistics.work_logs_imported, 1);
    assert_eq!(result.statistics.work_logs_failed, 1);
    assert_eq!(result.errors.len(), 1);
    assert!(
        result.errors[0].contains("Beacon"),
        "error should name the missing project: {}",
        result.errors[0]
    );

    let imported = work_log_entries::Entity::find().all(&target).await?;
    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].title, "Kept entry");
    assert_eq!(projects::Entity::find().count(&target).await?, 1);
    Ok(())
}

#[tokio::test]
async fn todo_with_unknown_category_imports_uncategorized() -> Result<()> {
    let source = setup_db().await?;
    let alice = create_user(&source, "alice").await?;
    let category = create_todo_category(&source, "Deep Work").await?;

    todo_items::ActiveModel {
        id: NotSet,
        user_id: Set(alice.id),
        category_id: Set(Some(category.id)),
        title: Set("Quarterly review".to_string()),
        description: Set(Some("prep notes".to_string())),
        due_date: Set(None),
        status: Set(TodoStatus::InProgress.into()),
        priority: Set(TodoPriority::High.into()),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
        completed_at: Set(None),
    }
    .insert(&source)
    .await?;

    let export_service = ExportService::new(source.clone());
    let manifest = export_service
        .export_work_log_data(alice.id, None, None, false)
        .await?;
    let archive_bytes = export_service.build_work_log_archive(&manifest, None)?;

    // Target has no "Deep Work" category
    let target = setup_db().await?;
    let carol = create_user(&target, "carol").await?;
    let import_service = ImportService::new(target.clone());
    let result = import_service
        .import_work_log_data(carol.id, &archive_bytes)
        .await;

    assert!(result.success, "{:?}", result.errors);
    assert_eq!(result.statistics.todos_imported, 1);
    assert!(result.errors.is_empty(), "missing category is not an error");

    let imported = todo_items::Entity::find().one(&target).await?.unwrap();
    assert_eq!(imported.category_id, None);
    assert_eq!(imported.title, "Quarterly review");
    assert_eq!(todo_categories::Entity::find().count(&target).await?, 0);
    Ok(())
}

#[tokio::test]
async fn mixed_validity_full_import_counts_failures_and_still_commits() -> Result<()> {
    // Hand-built manifest: 3 work logs (one referencing a process status the
    // reference block does not carry) and 2 valid todos
    let reference_item = |id: i32, name: &str| ReferenceItem {
        original_id: id,
        name: name.to_string(),
        is_active: true,
        sort_order: 0,
    };
    let created = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

    let work_log = |id: i32, title: &str, status_id: i32, status_name: &str| WorkLogRecord {
        original_id: id,
        title: title.to_string(),
        content: "notes".to_string(),
        record_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        work_hours: 2.0,
        created_at: created,
        updated_at: None,
        project_id: 1,
        project_name: "Atlas".to_string(),
        process_status_id: status_id,
        process_status_name: status_name.to_string(),
        departments: vec![],
        work_types: vec![],
    };

    let attachment_payload = b"attached bytes".to_vec();
    let manifest = FullExportManifest {
        version: FORMAT_VERSION.to_string(),
        exported_at: created,
        username: "alice".to_string(),
        start_date: None,
        end_date: None,
        includes_attachments: true,
        reference_data: ReferenceData {
            projects: vec![reference_item(1, "Atlas")],
            departments: vec![],
            work_types: vec![],
            process_statuses: vec![reference_item(2, "Open")],
            todo_categories: vec![TodoCategoryItem {
                original_id: 3,
                name: "Chores".to_string(),
                is_active: true,
                sort_order: 0,
                color_code: Some("#808080".to_string()),
                icon: None,
            }],
        },
        work_logs: vec![
            work_log(10, "Valid one", 2, "Open"),
            work_log(11, "Valid two", 2, "Open"),
            work_log(12, "Orphaned", 99, "Ghost"),
        ],
        todos: vec![
            TodoRecord {
                original_id: 20,
                title: "With children".to_string(),
                description: None,
                due_date: None,
                status: TodoStatus::Pending,
                priority: TodoPriority::Medium,
                created_at: created,
                updated_at: None,
                completed_at: None,
                category_id: Some(3),
                category_name: Some("Chores".to_string()),
                sub_tasks: vec![
                    SubTaskRecord {
                        original_id: 30,
                        title: "First".to_string(),
                        is_completed: true,
                        sort_order: 1,
                        created_at: created,
                    },
                    SubTaskRecord {
                        original_id: 31,
                        title: "Second".to_string(),
                        is_completed: false,
                        sort_order: 2,
                        created_at: created,
                    },
                ],
                comments: vec![],
                attachments: vec![AttachmentRecord {
                    original_id: 40,
                    file_name: "notes.txt".to_string(),
                    file_size: attachment_payload.len() as i64,
                    content_type: "text/plain".to_string(),
                    uploaded_at: created,
                    file_path: Some(attachment_entry_path(40, "notes.txt")),
                }],
            },
            TodoRecord {
                original_id: 21,
                title: "Bare".to_string(),
                description: None,
                due_date: None,
                status: TodoStatus::Completed,
                priority: TodoPriority::Low,
                created_at: created,
                updated_at: None,
                completed_at: Some(created),
                category_id: None,
                category_name: None,
                sub_tasks: vec![],
                comments: vec![],
                attachments: vec![],
            },
        ],
    };

    let manifest_json = serde_json::to_vec_pretty(&manifest)?;
    let mut entries = indexmap::IndexMap::new();
    entries.insert(
        attachment_entry_path(40, "notes.txt"),
        attachment_payload.clone(),
    );
    let archive_bytes = write_archive(&manifest_json, &entries)?;

    let target = setup_db().await?;
    let importer = create_user(&target, "importer").await?;
    let import_service = ImportService::new(target.clone());
    let result = import_service.import_full(importer.id, &archive_bytes).await;

    assert!(result.success, "row failures alone never roll back: {:?}", result.errors);
    assert_eq!(result.statistics.work_logs_imported, 2);
    assert_eq!(result.statistics.work_logs_failed, 1);
    assert_eq!(result.statistics.todos_imported, 2);
    assert_eq!(result.statistics.sub_tasks_imported, 2);
    assert_eq!(result.statistics.attachments_imported, 1);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("Ghost"), "{}", result.errors[0]);

    // The transaction committed: rows from the valid records are live
    assert_eq!(work_log_entries::Entity::find().count(&target).await?, 2);
    assert_eq!(todo_items::Entity::find().count(&target).await?, 2);
    let attachment = todo_attachments::Entity::find().one(&target).await?.unwrap();
    assert_eq!(attachment.file_data, attachment_payload);
    Ok(())
}

#[tokio::test]
async fn corrupt_archive_fails_validation_with_no_store_mutation() -> Result<()> {
    let target = setup_db().await?;
    let importer = create_user(&target, "importer").await?;
    let import_service = ImportService::new(target.clone());

    let garbage = b"this is not a zip container at all".to_vec();
    let result = import_service.import_full(importer.id, &garbage).await;

    assert!(!result.success);
    assert!(
        result.errors.iter().any(|e| e.contains("Malformed archive")),
        "expected a malformed-archive error, got {:?}",
        result.errors
    );
    assert_eq!(result.statistics, Default::default());

    assert_eq!(work_log_entries::Entity::find().count(&target).await?, 0);
    assert_eq!(todo_items::Entity::find().count(&target).await?, 0);
    assert_eq!(projects::Entity::find().count(&target).await?, 0);
    Ok(())
}

#[tokio::test]
async fn full_round_trip_into_empty_system_preserves_content() -> Result<()> {
    let source = setup_db().await?;
    let alice = create_user(&source, "alice").await?;
    let bob = create_user(&source, "bob").await?;
    let project = create_project(&source, "Atlas").await?;
    let status = create_process_status(&source, "In Review").await?;
    let engineering = create_department(&source, "Engineering").await?;
    let design = create_department(&source, "Design").await?;
    let work_type = create_work_type(&source, "Development").await?;
    let category = create_todo_category(&source, "Deep Work").await?;

    let entry = work_log_entries::ActiveModel {
        id: NotSet,
        user_id: Set(alice.id),
        project_id: Set(project.id),
        process_status_id: Set(status.id),
        title: Set("版本規劃".to_string()),
        content: Set("整理下一版的需求".to_string()),
        record_date: Set(NaiveDate::from_ymd_opt(2026, 4, 7).unwrap()),
        work_hours: Set(6.5),
        created_at: Set(Utc.with_ymd_and_hms(2026, 4, 7, 17, 45, 0).unwrap()),
        updated_at: Set(None),
    }
    .insert(&source)
    .await?;
    for department_id in [engineering.id, design.id] {
        work_log_departments::ActiveModel {
            work_log_entry_id: Set(entry.id),
            department_id: Set(department_id),
        }
        .insert(&source)
        .await?;
    }
    work_log_work_types::ActiveModel {
        work_log_entry_id: Set(entry.id),
        work_type_id: Set(work_type.id),
    }
    .insert(&source)
    .await?;

    let todo = todo_items::ActiveModel {
        id: NotSet,
        user_id: Set(alice.id),
        category_id: Set(Some(category.id)),
        title: Set("Prepare workshop".to_string()),
        description: Set(Some("Slides and exercises".to_string())),
        due_date: Set(Some(Utc.with_ymd_and_hms(2026, 4, 20, 9, 0, 0).unwrap())),
        status: Set(TodoStatus::InProgress.into()),
        priority: Set(TodoPriority::High.into()),
        created_at: Set(Utc.with_ymd_and_hms(2026, 4, 8, 8, 0, 0).unwrap()),
        updated_at: Set(None),
        completed_at: Set(None),
    }
    .insert(&source)
    .await?;
    todo_sub_tasks::ActiveModel {
        id: NotSet,
        todo_item_id: Set(todo.id),
        title: Set("Draft outline".to_string()),
        is_completed: Set(true),
        sort_order: Set(1),
        created_at: Set(Utc.with_ymd_and_hms(2026, 4, 8, 8, 10, 0).unwrap()),
    }
    .insert(&source)
    .await?;
    todo_comments::ActiveModel {
        id: NotSet,
        todo_item_id: Set(todo.id),
        user_id: Set(bob.id),
        content: Set("Happy to review the slides".to_string()),
        created_at: Set(Utc.with_ymd_and_hms(2026, 4, 8, 10, 0, 0).unwrap()),
        updated_at: Set(None),
    }
    .insert(&source)
    .await?;
    let payload = vec![1u8, 2, 3, 4, 5];
    todo_attachments::ActiveModel {
        id: NotSet,
        todo_item_id: Set(todo.id),
        file_name: Set("outline.md".to_string()),
        file_size: Set(payload.len() as i64),
        content_type: Set("text/markdown".to_string()),
        file_data: Set(payload.clone()),
        uploaded_at: Set(Utc.with_ymd_and_hms(2026, 4, 8, 8, 20, 0).unwrap()),
    }
    .insert(&source)
    .await?;

    let export_service = ExportService::new(source.clone());
    let manifest = export_service.export_full(alice.id, None, None, true).await?;
    assert_eq!(manifest.todos[0].comments[0].username, "bob");

    let files = export_service.collect_attachment_files(&manifest.todos).await?;
    let archive_bytes = export_service.build_full_archive(&manifest, Some(&files))?;

    let target = setup_db().await?;
    let carol = create_user(&target, "carol").await?;
    let import_service = ImportService::new(target.clone());
    let result = import_service.import_full(carol.id, &archive_bytes).await;
    assert!(result.success, "{:?}", result.errors);

    // Same shape as the source system, new local ids
    assert_eq!(work_log_entries::Entity::find().count(&target).await?, 1);
    assert_eq!(todo_items::Entity::find().count(&target).await?, 1);
    assert_eq!(todo_sub_tasks::Entity::find().count(&target).await?, 1);
    assert_eq!(todo_comments::Entity::find().count(&target).await?, 1);
    assert_eq!(todo_attachments::Entity::find().count(&target).await?, 1);
    assert_eq!(work_log_departments::Entity::find().count(&target).await?, 2);
    assert_eq!(work_log_work_types::Entity::find().count(&target).await?, 1);

    let imported_entry = work_log_entries::Entity::find().one(&target).await?.unwrap();
    assert_eq!(imported_entry.title, "版本規劃");
    assert_eq!(imported_entry.content, "整理下一版的需求");
    assert_eq!(imported_entry.work_hours, 6.5);
    assert_eq!(
        imported_entry.record_date,
        NaiveDate::from_ymd_opt(2026, 4, 7).unwrap()
    );
    assert_eq!(imported_entry.created_at, entry.created_at, "timestamps survive");
    assert_eq!(imported_entry.user_id, carol.id);

    let imported_project = projects::Entity::find()
        .filter(projects::Column::Name.eq("Atlas"))
        .one(&target)
        .await?
        .unwrap();
    assert_eq!(imported_entry.project_id, imported_project.id);

    let imported_comment = todo_comments::Entity::find().one(&target).await?.unwrap();
    assert_eq!(
        imported_comment.user_id, carol.id,
        "comments are re-attributed to the importing user"
    );

    let imported_attachment = todo_attachments::Entity::find().one(&target).await?.unwrap();
    assert_eq!(imported_attachment.file_data, payload);
    assert_eq!(imported_attachment.file_name, "outline.md");
    Ok(())
}
