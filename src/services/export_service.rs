//! Export assembler: queries the store for a user's data (or the shared
//! lookup tables) and serializes it into one of the three manifest shapes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::info;

use crate::archive::manifest::{
    AttachmentRecord, CommentRecord, ExportKind, FullExportManifest, ReferenceData, ReferenceItem,
    SubTaskRecord, SystemDataManifest, TodoCategoryItem, TodoRecord, WorkLogDataManifest,
    WorkLogRecord, FORMAT_VERSION,
};
use crate::archive::{attachment_entry_path, write_archive};
use crate::database::entities::{
    departments, process_statuses, projects, todo_attachments, todo_categories, todo_comments,
    todo_items, todo_sub_tasks, users, work_log_entries, work_log_departments,
    work_log_work_types, work_types,
};
use crate::errors::{ImportExportError, Result};

pub struct ExportService {
    db: DatabaseConnection,
}

impl ExportService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Full backup: reference data + the user's work logs and todos.
    pub async fn export_full(
        &self,
        user_id: i32,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        include_attachments: bool,
    ) -> Result<FullExportManifest> {
        info!(
            "Exporting full data for user {} (attachments: {})",
            user_id, include_attachments
        );

        let user = self.load_user(user_id).await?;

        let manifest = FullExportManifest {
            version: FORMAT_VERSION.to_string(),
            exported_at: Utc::now(),
            username: user.username,
            start_date,
            end_date,
            includes_attachments: include_attachments,
            reference_data: self.export_reference_data().await?,
            work_logs: self.export_work_logs(user_id, start_date, end_date).await?,
            todos: self
                .export_todos(user_id, start_date, end_date, include_attachments)
                .await?,
        };

        info!(
            "Export complete: {} work logs, {} todos",
            manifest.work_logs.len(),
            manifest.todos.len()
        );
        Ok(manifest)
    }

    /// Work-log backup: the user's work logs and todos without the
    /// reference-data block.
    pub async fn export_work_log_data(
        &self,
        user_id: i32,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        include_attachments: bool,
    ) -> Result<WorkLogDataManifest> {
        info!(
            "Exporting work log data for user {} (attachments: {})",
            user_id, include_attachments
        );

        let user = self.load_user(user_id).await?;

        let manifest = WorkLogDataManifest {
            version: FORMAT_VERSION.to_string(),
            export_type: ExportKind::WorkLogData.to_string(),
            exported_at: Utc::now(),
            username: user.username,
            start_date,
            end_date,
            includes_attachments: include_attachments,
            work_logs: self.export_work_logs(user_id, start_date, end_date).await?,
            todos: self
                .export_todos(user_id, start_date, end_date, include_attachments)
                .await?,
        };

        info!(
            "Work log export complete: {} work logs, {} todos",
            manifest.work_logs.len(),
            manifest.todos.len()
        );
        Ok(manifest)
    }

    /// System administration backup: the shared lookup tables only.
    /// Privilege checking belongs to the caller's authorization layer.
    pub async fn export_system_data(&self, user_id: i32) -> Result<SystemDataManifest> {
        info!("Exporting system data (requested by user {})", user_id);

        let user = self.load_user(user_id).await?;

        let manifest = SystemDataManifest {
            version: FORMAT_VERSION.to_string(),
            export_type: ExportKind::SystemData.to_string(),
            exported_at: Utc::now(),
            username: user.username,
            reference_data: self.export_reference_data().await?,
        };

        info!("System data export complete");
        Ok(manifest)
    }

    /// Bulk-load attachment payload bytes for every attachment a manifest's
    /// todos embed. The assembler itself only carries metadata; payload bytes
    /// travel through this side channel keyed by original attachment id.
    pub async fn collect_attachment_files(
        &self,
        todos: &[TodoRecord],
    ) -> Result<HashMap<i32, Vec<u8>>> {
        let attachment_ids: Vec<i32> = todos
            .iter()
            .flat_map(|t| t.attachments.iter())
            .filter(|a| a.file_path.is_some())
            .map(|a| a.original_id)
            .collect();

        let mut files = HashMap::new();
        if attachment_ids.is_empty() {
            return Ok(files);
        }

        let rows = todo_attachments::Entity::find()
            .filter(todo_attachments::Column::Id.is_in(attachment_ids))
            .all(&self.db)
            .await?;
        for row in rows {
            files.insert(row.id, row.file_data);
        }
        Ok(files)
    }

    /// Serialize a full manifest plus attachment payloads into archive bytes.
    pub fn build_full_archive(
        &self,
        manifest: &FullExportManifest,
        attachment_files: Option<&HashMap<i32, Vec<u8>>>,
    ) -> Result<Vec<u8>> {
        let manifest_json = serde_json::to_vec_pretty(manifest)?;
        let entries = payload_entries(&manifest.todos, attachment_files);
        write_archive(&manifest_json, &entries)
    }

    /// Serialize a work-log manifest plus attachment payloads.
    pub fn build_work_log_archive(
        &self,
        manifest: &WorkLogDataManifest,
        attachment_files: Option<&HashMap<i32, Vec<u8>>>,
    ) -> Result<Vec<u8>> {
        let manifest_json = serde_json::to_vec_pretty(manifest)?;
        let entries = payload_entries(&manifest.todos, attachment_files);
        write_archive(&manifest_json, &entries)
    }

    /// Serialize a system-data manifest. System archives never carry payloads.
    pub fn build_system_archive(&self, manifest: &SystemDataManifest) -> Result<Vec<u8>> {
        let manifest_json = serde_json::to_vec_pretty(manifest)?;
        write_archive(&manifest_json, &IndexMap::new())
    }

    async fn load_user(&self, user_id: i32) -> Result<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(ImportExportError::UserNotFound(user_id))
    }

    /// Every row of every lookup category, active or not; callers sort
    /// downstream.
    async fn export_reference_data(&self) -> Result<ReferenceData> {
        let projects = projects::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| ReferenceItem {
                original_id: p.id,
                name: p.name,
                is_active: p.is_active,
                sort_order: p.sort_order,
            })
            .collect();

        let departments = departments::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|d| ReferenceItem {
                original_id: d.id,
                name: d.name,
                is_active: d.is_active,
                sort_order: d.sort_order,
            })
            .collect();

        let work_types = work_types::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|w| ReferenceItem {
                original_id: w.id,
                name: w.name,
                is_active: w.is_active,
                sort_order: w.sort_order,
            })
            .collect();

        let process_statuses = process_statuses::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|s| ReferenceItem {
                original_id: s.id,
                name: s.name,
                is_active: s.is_active,
                sort_order: s.sort_order,
            })
            .collect();

        let todo_categories = todo_categories::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| TodoCategoryItem {
                original_id: c.id,
                name: c.name,
                is_active: c.is_active,
                sort_order: c.sort_order,
                color_code: Some(c.color_code),
                icon: Some(c.icon),
            })
            .collect();

        Ok(ReferenceData {
            projects,
            departments,
            work_types,
            process_statuses,
            todo_categories,
        })
    }

    /// Work logs filter on `record_date` (the day the work happened), not on
    /// `created_at` — todos filter differently, see `export_todos`.
    async fn export_work_logs(
        &self,
        user_id: i32,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<Vec<WorkLogRecord>> {
        let mut query = work_log_entries::Entity::find()
            .filter(work_log_entries::Column::UserId.eq(user_id));
        if let Some(start) = start_date {
            query = query.filter(work_log_entries::Column::RecordDate.gte(start.date_naive()));
        }
        if let Some(end) = end_date {
            query = query.filter(work_log_entries::Column::RecordDate.lte(end.date_naive()));
        }
        let entries = query
            .order_by_asc(work_log_entries::Column::RecordDate)
            .all(&self.db)
            .await?;

        // Lookup tables are small; resolve names through in-memory maps
        let projects_by_id: HashMap<i32, projects::Model> = projects::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let statuses_by_id: HashMap<i32, process_statuses::Model> = process_statuses::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            let project = projects_by_id.get(&entry.project_id).ok_or_else(|| {
                ImportExportError::ExportFailed(format!(
                    "Work log {} references unknown project {}",
                    entry.id, entry.project_id
                ))
            })?;
            let status = statuses_by_id.get(&entry.process_status_id).ok_or_else(|| {
                ImportExportError::ExportFailed(format!(
                    "Work log {} references unknown process status {}",
                    entry.id, entry.process_status_id
                ))
            })?;

            let departments = work_log_departments::Entity::find()
                .filter(work_log_departments::Column::WorkLogEntryId.eq(entry.id))
                .find_also_related(departments::Entity)
                .all(&self.db)
                .await?
                .into_iter()
                .filter_map(|(_, dept)| dept)
                .map(|d| ReferenceItem {
                    original_id: d.id,
                    name: d.name,
                    is_active: d.is_active,
                    sort_order: d.sort_order,
                })
                .collect();

            let work_types = work_log_work_types::Entity::find()
                .filter(work_log_work_types::Column::WorkLogEntryId.eq(entry.id))
                .find_also_related(work_types::Entity)
                .all(&self.db)
                .await?
                .into_iter()
                .filter_map(|(_, wt)| wt)
                .map(|w| ReferenceItem {
                    original_id: w.id,
                    name: w.name,
                    is_active: w.is_active,
                    sort_order: w.sort_order,
                })
                .collect();

            records.push(WorkLogRecord {
                original_id: entry.id,
                title: entry.title,
                content: entry.content,
                record_date: entry.record_date,
                work_hours: entry.work_hours,
                created_at: entry.created_at,
                updated_at: entry.updated_at,
                project_id: entry.project_id,
                project_name: project.name.clone(),
                process_status_id: entry.process_status_id,
                process_status_name: status.name.clone(),
                departments,
                work_types,
            });
        }
        Ok(records)
    }

    /// Todos filter on `created_at`, not on any completion or due date. This
    /// differs from the work-log filter field on purpose; both are
    /// long-standing observable behavior.
    async fn export_todos(
        &self,
        user_id: i32,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        include_attachments: bool,
    ) -> Result<Vec<TodoRecord>> {
        let mut query = todo_items::Entity::find().filter(todo_items::Column::UserId.eq(user_id));
        if let Some(start) = start_date {
            query = query.filter(todo_items::Column::CreatedAt.gte(start));
        }
        if let Some(end) = end_date {
            query = query.filter(todo_items::Column::CreatedAt.lte(end));
        }
        let todos = query
            .order_by_asc(todo_items::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let category_names: HashMap<i32, String> = todo_categories::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let mut records = Vec::with_capacity(todos.len());
        for todo in todos {
            let sub_tasks = todo_sub_tasks::Entity::find()
                .filter(todo_sub_tasks::Column::TodoItemId.eq(todo.id))
                .order_by_asc(todo_sub_tasks::Column::SortOrder)
                .all(&self.db)
                .await?
                .into_iter()
                .map(|st| SubTaskRecord {
                    original_id: st.id,
                    title: st.title,
                    is_completed: st.is_completed,
                    sort_order: st.sort_order,
                    created_at: st.created_at,
                })
                .collect();

            let comments = todo_comments::Entity::find()
                .filter(todo_comments::Column::TodoItemId.eq(todo.id))
                .find_also_related(users::Entity)
                .all(&self.db)
                .await?
                .into_iter()
                .map(|(comment, author)| CommentRecord {
                    original_id: comment.id,
                    content: comment.content,
                    created_at: comment.created_at,
                    updated_at: comment.updated_at,
                    username: author.map(|u| u.username).unwrap_or_default(),
                })
                .collect();

            let attachments = todo_attachments::Entity::find()
                .filter(todo_attachments::Column::TodoItemId.eq(todo.id))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|a| AttachmentRecord {
                    original_id: a.id,
                    file_path: include_attachments
                        .then(|| attachment_entry_path(a.id, &a.file_name)),
                    file_name: a.file_name,
                    file_size: a.file_size,
                    content_type: a.content_type,
                    uploaded_at: a.uploaded_at,
                })
                .collect();

            records.push(TodoRecord {
                original_id: todo.id,
                title: todo.title,
                description: todo.description,
                due_date: todo.due_date,
                status: todo.status.try_into().unwrap_or_default(),
                priority: todo.priority.try_into().unwrap_or_default(),
                created_at: todo.created_at,
                updated_at: todo.updated_at,
                completed_at: todo.completed_at,
                category_id: todo.category_id,
                category_name: todo
                    .category_id
                    .and_then(|id| category_names.get(&id).cloned()),
                sub_tasks,
                comments,
                attachments,
            });
        }
        Ok(records)
    }
}

/// Archive entries for every attachment whose metadata names an embedded
/// payload and whose bytes the caller actually supplied.
fn payload_entries(
    todos: &[TodoRecord],
    attachment_files: Option<&HashMap<i32, Vec<u8>>>,
) -> IndexMap<String, Vec<u8>> {
    let mut entries = IndexMap::new();
    let Some(files) = attachment_files else {
        return entries;
    };
    for todo in todos {
        for attachment in &todo.attachments {
            if let Some(path) = &attachment.file_path {
                if let Some(bytes) = files.get(&attachment.original_id) {
                    entries.insert(path.clone(), bytes.clone());
                }
            }
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_utils::setup_test_db;
    use sea_orm::ActiveModelTrait;

    #[tokio::test]
    async fn test_export_requires_existing_user() {
        // The caller id comes from an authenticated session; a missing row
        // is an invariant violation, not a user-facing validation error
        let db = setup_test_db().await;
        let service = ExportService::new(db);
        let err = service
            .export_full(99, None, None, false)
            .await
            .expect_err("unknown user must not export");
        assert_eq!(err.error_code(), "USER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_system_export_of_empty_store_is_empty() {
        let db = setup_test_db().await;
        let user = crate::database::entities::users::ActiveModel {
            username: sea_orm::Set("admin".to_string()),
            email: sea_orm::Set("admin@example.com".to_string()),
            password_hash: sea_orm::Set(String::new()),
            role: sea_orm::Set("Admin".to_string()),
            is_active: sea_orm::Set(true),
            created_at: sea_orm::Set(chrono::Utc::now()),
            updated_at: sea_orm::Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let service = ExportService::new(db);
        let manifest = service.export_system_data(user.id).await.unwrap();
        assert_eq!(manifest.username, "admin");
        assert_eq!(manifest.version, FORMAT_VERSION);
        assert!(manifest.reference_data.projects.is_empty());
        assert!(manifest.reference_data.todo_categories.is_empty());
    }
}
