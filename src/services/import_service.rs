//! Import assembler: validation, identity resolution and transactional
//! re-creation of archived data.
//!
//! Identity of a lookup row is its *name*. Every import call builds a
//! call-scoped original-id → local-id mapping from names, then rewrites the
//! foreign keys of dependent rows through it. Error handling is two-tier and
//! deliberately asymmetric:
//!
//! * row-level failures ([`RecordError`]) are recorded in the result and the
//!   loop continues — the transaction still commits;
//! * everything that escapes the per-record scope (reference reconciliation,
//!   archive decoding, the store connection itself) rolls back the whole
//!   transaction, discarding rows that had individually succeeded.
//!
//! Do not unify the tiers; reimport tooling depends on both behaviors.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::Cursor;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use zip::ZipArchive;

use crate::archive::manifest::{
    ExportKind, FullExportManifest, ReferenceData, SystemDataManifest, TodoRecord,
    WorkLogDataManifest, WorkLogRecord, FORMAT_VERSION,
};
use crate::archive::{open_archive, read_manifest_bytes, try_read_entry_bytes};
use crate::database::entities::{
    departments, process_statuses, projects, todo_attachments, todo_categories, todo_comments,
    todo_items, todo_sub_tasks, work_log_departments, work_log_entries, work_log_work_types,
    work_types,
};
use crate::errors::Result;

/// The five shared lookup categories reconciled by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupKind {
    Project,
    Department,
    WorkType,
    ProcessStatus,
    TodoCategory,
}

/// Per-category row counters, accumulated only. One instance per import
/// call, owned exclusively by that call's result.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStatistics {
    pub projects_created: u32,
    pub projects_skipped: u32,
    pub departments_created: u32,
    pub departments_skipped: u32,
    pub work_types_created: u32,
    pub work_types_skipped: u32,
    pub process_statuses_created: u32,
    pub process_statuses_skipped: u32,
    pub todo_categories_created: u32,
    pub todo_categories_skipped: u32,

    pub work_logs_imported: u32,
    pub work_logs_failed: u32,

    pub todos_imported: u32,
    pub todos_failed: u32,
    pub sub_tasks_imported: u32,
    pub comments_imported: u32,
    pub attachments_imported: u32,
}

impl ImportStatistics {
    fn lookup_created(&mut self, kind: LookupKind) {
        match kind {
            LookupKind::Project => self.projects_created += 1,
            LookupKind::Department => self.departments_created += 1,
            LookupKind::WorkType => self.work_types_created += 1,
            LookupKind::ProcessStatus => self.process_statuses_created += 1,
            LookupKind::TodoCategory => self.todo_categories_created += 1,
        }
    }

    fn lookup_skipped(&mut self, kind: LookupKind) {
        match kind {
            LookupKind::Project => self.projects_skipped += 1,
            LookupKind::Department => self.departments_skipped += 1,
            LookupKind::WorkType => self.work_types_skipped += 1,
            LookupKind::ProcessStatus => self.process_statuses_skipped += 1,
            LookupKind::TodoCategory => self.todo_categories_skipped += 1,
        }
    }
}

/// Structured outcome of a validate or import call. Public operations never
/// return `Err`; every failure is folded in here.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub success: bool,
    pub message: String,
    pub statistics: ImportStatistics,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Original-id → local-id mappings for one import call. Never outlives the
/// call and never shared: concurrent imports must not see each other's
/// mappings.
#[derive(Debug, Default)]
struct ReferenceIdMappings {
    projects: HashMap<i32, i32>,
    departments: HashMap<i32, i32>,
    work_types: HashMap<i32, i32>,
    process_statuses: HashMap<i32, i32>,
    todo_categories: HashMap<i32, i32>,
}

/// Row-level failure. Recorded and skipped by the surrounding loop; never
/// aborts the transaction.
#[derive(Debug)]
enum RecordError {
    /// A referenced lookup name has no mapping in the target store
    UnresolvedReference(String),
    /// The store rejected the row or one of its children
    Creation(sea_orm::DbErr),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::UnresolvedReference(detail) => write!(f, "{}", detail),
            RecordError::Creation(err) => write!(f, "{}", err),
        }
    }
}

pub struct ImportService {
    db: DatabaseConnection,
}

impl ImportService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Pre-flight check; see [`validate_archive`].
    pub fn validate(&self, archive_bytes: &[u8], expected: ExportKind) -> ImportResult {
        validate_archive(archive_bytes, expected)
    }

    /// Import a full backup archive into the importing user's account.
    pub async fn import_full(&self, user_id: i32, archive_bytes: &[u8]) -> ImportResult {
        let validation = self.validate(archive_bytes, ExportKind::Full);
        if !validation.success {
            return validation;
        }

        let mut result = ImportResult::default();
        match self.import_full_inner(user_id, archive_bytes, &mut result).await {
            Ok(()) => {
                result.success = true;
                result.message = "Import completed successfully".to_string();
                info!(
                    "Import complete: {} work logs, {} todos",
                    result.statistics.work_logs_imported, result.statistics.todos_imported
                );
            }
            Err(err) => {
                error!("Import failed, rolling back: {}", err);
                result.success = false;
                result.errors.push(format!("Import failed: {}", err));
            }
        }
        result
    }

    /// Import a work-log backup archive. The manifest carries no reference
    /// data; lookup ids resolve against rows that already exist in this
    /// store, and nothing is created for names that do not.
    pub async fn import_work_log_data(&self, user_id: i32, archive_bytes: &[u8]) -> ImportResult {
        let validation = self.validate(archive_bytes, ExportKind::WorkLogData);
        if !validation.success {
            return validation;
        }

        let mut result = ImportResult::default();
        match self
            .import_work_log_inner(user_id, archive_bytes, &mut result)
            .await
        {
            Ok(()) => {
                result.success = true;
                result.message = "Import completed successfully".to_string();
                info!(
                    "Work log import complete: {} work logs, {} todos",
                    result.statistics.work_logs_imported, result.statistics.todos_imported
                );
            }
            Err(err) => {
                error!("Work log import failed, rolling back: {}", err);
                result.success = false;
                result.errors.push(format!("Import failed: {}", err));
            }
        }
        result
    }

    /// Import a system administration archive: reconcile the shared lookup
    /// tables and nothing else.
    pub async fn import_system_data(&self, user_id: i32, archive_bytes: &[u8]) -> ImportResult {
        let validation = self.validate(archive_bytes, ExportKind::SystemData);
        if !validation.success {
            return validation;
        }

        let mut result = ImportResult::default();
        match self
            .import_system_inner(user_id, archive_bytes, &mut result)
            .await
        {
            Ok(()) => {
                result.success = true;
                result.message = "System data import completed successfully".to_string();
                info!("System data import complete");
            }
            Err(err) => {
                error!("System data import failed, rolling back: {}", err);
                result.success = false;
                result.errors.push(format!("Import failed: {}", err));
            }
        }
        result
    }

    async fn import_full_inner(
        &self,
        user_id: i32,
        archive_bytes: &[u8],
        result: &mut ImportResult,
    ) -> Result<()> {
        info!("Importing full archive for user {}", user_id);

        let mut archive = open_archive(archive_bytes)?;
        let manifest_bytes = read_manifest_bytes(&mut archive)?;
        let manifest: FullExportManifest = serde_json::from_slice(&manifest_bytes)?;

        let attachment_files = buffer_attachment_payloads(
            &mut archive,
            manifest.includes_attachments,
            &manifest.todos,
        )?;

        let txn = self.db.begin().await?;
        let outcome = async {
            let mappings =
                import_reference_data(&txn, &manifest.reference_data, &mut result.statistics)
                    .await?;
            import_work_logs(&txn, user_id, &manifest.work_logs, &mappings, result).await?;
            import_todos(
                &txn,
                user_id,
                &manifest.todos,
                &mappings,
                &attachment_files,
                result,
            )
            .await?;
            Ok(())
        }
        .await;

        match outcome {
            Ok(()) => {
                txn.commit().await?;
                Ok(())
            }
            Err(err) => {
                txn.rollback().await?;
                Err(err)
            }
        }
    }

    async fn import_work_log_inner(
        &self,
        user_id: i32,
        archive_bytes: &[u8],
        result: &mut ImportResult,
    ) -> Result<()> {
        info!("Importing work log archive for user {}", user_id);

        let mut archive = open_archive(archive_bytes)?;
        let manifest_bytes = read_manifest_bytes(&mut archive)?;
        let manifest: WorkLogDataManifest = serde_json::from_slice(&manifest_bytes)?;

        let attachment_files = buffer_attachment_payloads(
            &mut archive,
            manifest.includes_attachments,
            &manifest.todos,
        )?;

        let txn = self.db.begin().await?;
        let outcome = async {
            let mappings =
                build_reference_id_mappings(&txn, &manifest.work_logs, &manifest.todos).await?;
            import_work_logs(&txn, user_id, &manifest.work_logs, &mappings, result).await?;
            import_todos(
                &txn,
                user_id,
                &manifest.todos,
                &mappings,
                &attachment_files,
                result,
            )
            .await?;
            Ok(())
        }
        .await;

        match outcome {
            Ok(()) => {
                txn.commit().await?;
                Ok(())
            }
            Err(err) => {
                txn.rollback().await?;
                Err(err)
            }
        }
    }

    async fn import_system_inner(
        &self,
        user_id: i32,
        archive_bytes: &[u8],
        result: &mut ImportResult,
    ) -> Result<()> {
        info!("Importing system data archive (requested by user {})", user_id);

        let mut archive = open_archive(archive_bytes)?;
        let manifest_bytes = read_manifest_bytes(&mut archive)?;
        let manifest: SystemDataManifest = serde_json::from_slice(&manifest_bytes)?;

        let txn = self.db.begin().await?;
        let outcome =
            import_reference_data(&txn, &manifest.reference_data, &mut result.statistics).await;

        match outcome {
            Ok(_) => {
                txn.commit().await?;
                Ok(())
            }
            Err(err) => {
                txn.rollback().await?;
                Err(err)
            }
        }
    }
}

/// Pre-flight check: container readable, manifest present and parseable,
/// version and export type sane. Warnings never block an import; only errors
/// do. Touches no database state and never panics or errors — every failure
/// folds into the returned report.
pub fn validate_archive(archive_bytes: &[u8], expected: ExportKind) -> ImportResult {
    let mut result = ImportResult {
        success: true,
        ..Default::default()
    };
    if let Err(err) = validate_manifest(archive_bytes, expected, &mut result) {
        error!("Archive validation failed: {}", err);
        result.success = false;
        result.errors.push(err.to_string());
    }
    result
}

fn validate_manifest(
    archive_bytes: &[u8],
    expected: ExportKind,
    result: &mut ImportResult,
) -> Result<()> {
    let mut archive = open_archive(archive_bytes)?;
    let manifest_bytes = read_manifest_bytes(&mut archive)?;

    match expected {
        ExportKind::Full => {
            let manifest: FullExportManifest = serde_json::from_slice(&manifest_bytes)?;
            check_version(&manifest.version, result);
            result.message = format!(
                "Validation succeeded. Archive contains {} work logs and {} todos",
                manifest.work_logs.len(),
                manifest.todos.len()
            );
        }
        ExportKind::WorkLogData => {
            let manifest: WorkLogDataManifest = serde_json::from_slice(&manifest_bytes)?;
            check_version(&manifest.version, result);
            if manifest.export_type != "WorkLogData" {
                result.warnings.push(format!(
                    "Export type is {}; this may not be a work log backup archive",
                    manifest.export_type
                ));
            }
            result.message = format!(
                "Validation succeeded. Archive contains {} work logs and {} todos",
                manifest.work_logs.len(),
                manifest.todos.len()
            );
        }
        ExportKind::SystemData => {
            let manifest: SystemDataManifest = serde_json::from_slice(&manifest_bytes)?;
            check_version(&manifest.version, result);
            if manifest.export_type != "SystemData" {
                result.warnings.push(format!(
                    "Export type is {}; this may not be a system data backup archive",
                    manifest.export_type
                ));
            }
            let reference = &manifest.reference_data;
            result.message = format!(
                "Validation succeeded. Archive contains {} projects, {} departments, {} work types, {} process statuses and {} todo categories",
                reference.projects.len(),
                reference.departments.len(),
                reference.work_types.len(),
                reference.process_statuses.len(),
                reference.todo_categories.len()
            );
        }
    }
    Ok(())
}

fn check_version(version: &str, result: &mut ImportResult) {
    if version != FORMAT_VERSION {
        result.warnings.push(format!(
            "Export version {} may not be compatible with this system",
            version
        ));
    }
}

/// Pull every embedded attachment payload into memory, keyed by original
/// attachment id. Runs before the transaction opens; a payload entry that is
/// missing from the archive is simply absent from the map.
fn buffer_attachment_payloads(
    archive: &mut ZipArchive<Cursor<Vec<u8>>>,
    includes_attachments: bool,
    todos: &[TodoRecord],
) -> Result<HashMap<i32, Vec<u8>>> {
    let mut files = HashMap::new();
    if !includes_attachments {
        return Ok(files);
    }
    for todo in todos {
        for attachment in &todo.attachments {
            if let Some(path) = &attachment.file_path {
                if let Some(bytes) = try_read_entry_bytes(archive, path)? {
                    files.insert(attachment.original_id, bytes);
                }
            }
        }
    }
    Ok(files)
}

/// Reconcile an explicit reference-data block, category by category. Each
/// row is persisted individually, so a duplicate name later in the same
/// payload finds the row created moments before. Failures here are
/// infrastructure-tier: they abort the whole import.
async fn import_reference_data<C: ConnectionTrait>(
    conn: &C,
    reference_data: &ReferenceData,
    statistics: &mut ImportStatistics,
) -> Result<ReferenceIdMappings> {
    let mut mappings = ReferenceIdMappings::default();

    for item in &reference_data.projects {
        let existing = projects::Entity::find()
            .filter(projects::Column::Name.eq(item.name.as_str()))
            .one(conn)
            .await?;
        match existing {
            Some(row) => {
                mappings.projects.insert(item.original_id, row.id);
                statistics.lookup_skipped(LookupKind::Project);
            }
            None => {
                let row = projects::ActiveModel {
                    name: Set(item.name.clone()),
                    is_active: Set(item.is_active),
                    sort_order: Set(item.sort_order),
                    ..Default::default()
                }
                .insert(conn)
                .await?;
                mappings.projects.insert(item.original_id, row.id);
                statistics.lookup_created(LookupKind::Project);
            }
        }
    }

    for item in &reference_data.departments {
        let existing = departments::Entity::find()
            .filter(departments::Column::Name.eq(item.name.as_str()))
            .one(conn)
            .await?;
        match existing {
            Some(row) => {
                mappings.departments.insert(item.original_id, row.id);
                statistics.lookup_skipped(LookupKind::Department);
            }
            None => {
                let row = departments::ActiveModel {
                    name: Set(item.name.clone()),
                    is_active: Set(item.is_active),
                    sort_order: Set(item.sort_order),
                    ..Default::default()
                }
                .insert(conn)
                .await?;
                mappings.departments.insert(item.original_id, row.id);
                statistics.lookup_created(LookupKind::Department);
            }
        }
    }

    for item in &reference_data.work_types {
        let existing = work_types::Entity::find()
            .filter(work_types::Column::Name.eq(item.name.as_str()))
            .one(conn)
            .await?;
        match existing {
            Some(row) => {
                mappings.work_types.insert(item.original_id, row.id);
                statistics.lookup_skipped(LookupKind::WorkType);
            }
            None => {
                let row = work_types::ActiveModel {
                    name: Set(item.name.clone()),
                    is_active: Set(item.is_active),
                    sort_order: Set(item.sort_order),
                    ..Default::default()
                }
                .insert(conn)
                .await?;
                mappings.work_types.insert(item.original_id, row.id);
                statistics.lookup_created(LookupKind::WorkType);
            }
        }
    }

    for item in &reference_data.process_statuses {
        let existing = process_statuses::Entity::find()
            .filter(process_statuses::Column::Name.eq(item.name.as_str()))
            .one(conn)
            .await?;
        match existing {
            Some(row) => {
                mappings.process_statuses.insert(item.original_id, row.id);
                statistics.lookup_skipped(LookupKind::ProcessStatus);
            }
            None => {
                let row = process_statuses::ActiveModel {
                    name: Set(item.name.clone()),
                    is_active: Set(item.is_active),
                    sort_order: Set(item.sort_order),
                    ..Default::default()
                }
                .insert(conn)
                .await?;
                mappings.process_statuses.insert(item.original_id, row.id);
                statistics.lookup_created(LookupKind::ProcessStatus);
            }
        }
    }

    for item in &reference_data.todo_categories {
        let existing = todo_categories::Entity::find()
            .filter(todo_categories::Column::Name.eq(item.name.as_str()))
            .one(conn)
            .await?;
        match existing {
            Some(row) => {
                mappings.todo_categories.insert(item.original_id, row.id);
                statistics.lookup_skipped(LookupKind::TodoCategory);
            }
            None => {
                let row = todo_categories::ActiveModel {
                    name: Set(item.name.clone()),
                    color_code: Set(item.color_code.clone().unwrap_or_default()),
                    icon: Set(item.icon.clone().unwrap_or_default()),
                    is_active: Set(item.is_active),
                    sort_order: Set(item.sort_order),
                    ..Default::default()
                }
                .insert(conn)
                .await?;
                mappings.todo_categories.insert(item.original_id, row.id);
                statistics.lookup_created(LookupKind::TodoCategory);
            }
        }
    }

    Ok(mappings)
}

/// Derive mappings for a manifest that carries no reference-data block: scan
/// the records for every referenced name, bulk-fetch matching local rows and
/// pair them up. Never creates missing rows — an absent mapping entry later
/// surfaces as a per-row resolution failure.
async fn build_reference_id_mappings<C: ConnectionTrait>(
    conn: &C,
    work_logs: &[WorkLogRecord],
    todos: &[TodoRecord],
) -> Result<ReferenceIdMappings> {
    let mut mappings = ReferenceIdMappings::default();

    let project_names: HashSet<&str> =
        work_logs.iter().map(|w| w.project_name.as_str()).collect();
    let status_names: HashSet<&str> = work_logs
        .iter()
        .map(|w| w.process_status_name.as_str())
        .collect();
    let department_names: HashSet<&str> = work_logs
        .iter()
        .flat_map(|w| w.departments.iter().map(|d| d.name.as_str()))
        .collect();
    let work_type_names: HashSet<&str> = work_logs
        .iter()
        .flat_map(|w| w.work_types.iter().map(|t| t.name.as_str()))
        .collect();
    let category_names: HashSet<&str> = todos
        .iter()
        .filter_map(|t| t.category_name.as_deref())
        .collect();

    let projects_by_name: HashMap<String, i32> = projects::Entity::find()
        .filter(projects::Column::Name.is_in(project_names.iter().copied()))
        .all(conn)
        .await?
        .into_iter()
        .map(|p| (p.name, p.id))
        .collect();
    let statuses_by_name: HashMap<String, i32> = process_statuses::Entity::find()
        .filter(process_statuses::Column::Name.is_in(status_names.iter().copied()))
        .all(conn)
        .await?
        .into_iter()
        .map(|s| (s.name, s.id))
        .collect();
    let departments_by_name: HashMap<String, i32> = departments::Entity::find()
        .filter(departments::Column::Name.is_in(department_names.iter().copied()))
        .all(conn)
        .await?
        .into_iter()
        .map(|d| (d.name, d.id))
        .collect();
    let work_types_by_name: HashMap<String, i32> = work_types::Entity::find()
        .filter(work_types::Column::Name.is_in(work_type_names.iter().copied()))
        .all(conn)
        .await?
        .into_iter()
        .map(|t| (t.name, t.id))
        .collect();
    let categories_by_name: HashMap<String, i32> = todo_categories::Entity::find()
        .filter(todo_categories::Column::Name.is_in(category_names.iter().copied()))
        .all(conn)
        .await?
        .into_iter()
        .map(|c| (c.name, c.id))
        .collect();

    for work_log in work_logs {
        if let Some(&id) = projects_by_name.get(&work_log.project_name) {
            mappings.projects.insert(work_log.project_id, id);
        }
        if let Some(&id) = statuses_by_name.get(&work_log.process_status_name) {
            mappings.process_statuses.insert(work_log.process_status_id, id);
        }
        for department in &work_log.departments {
            if let Some(&id) = departments_by_name.get(&department.name) {
                mappings.departments.insert(department.original_id, id);
            }
        }
        for work_type in &work_log.work_types {
            if let Some(&id) = work_types_by_name.get(&work_type.name) {
                mappings.work_types.insert(work_type.original_id, id);
            }
        }
    }

    for todo in todos {
        if let (Some(category_id), Some(category_name)) = (todo.category_id, &todo.category_name) {
            if let Some(&id) = categories_by_name.get(category_name) {
                mappings.todo_categories.insert(category_id, id);
            }
        }
    }

    Ok(mappings)
}

/// Re-create work-log rows through the mapping. Row-level failures are
/// recorded and skipped; the loop always runs to completion.
async fn import_work_logs<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    work_logs: &[WorkLogRecord],
    mappings: &ReferenceIdMappings,
    result: &mut ImportResult,
) -> Result<()> {
    for record in work_logs {
        match import_work_log_record(conn, user_id, record, mappings).await {
            Ok(()) => result.statistics.work_logs_imported += 1,
            Err(err) => {
                warn!("Failed to import work log '{}': {}", record.title, err);
                result
                    .errors
                    .push(format!("Work log '{}': {}", record.title, err));
                result.statistics.work_logs_failed += 1;
            }
        }
    }
    Ok(())
}

async fn import_work_log_record<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    record: &WorkLogRecord,
    mappings: &ReferenceIdMappings,
) -> std::result::Result<(), RecordError> {
    let project_id = mappings
        .projects
        .get(&record.project_id)
        .copied()
        .ok_or_else(|| {
            RecordError::UnresolvedReference(format!(
                "project '{}' not found",
                record.project_name
            ))
        })?;
    let process_status_id = mappings
        .process_statuses
        .get(&record.process_status_id)
        .copied()
        .ok_or_else(|| {
            RecordError::UnresolvedReference(format!(
                "process status '{}' not found",
                record.process_status_name
            ))
        })?;

    // Timestamps are preserved from the export, not reset to import time
    let entry = work_log_entries::ActiveModel {
        user_id: Set(user_id),
        project_id: Set(project_id),
        process_status_id: Set(process_status_id),
        title: Set(record.title.clone()),
        content: Set(record.content.clone()),
        record_date: Set(record.record_date),
        work_hours: Set(record.work_hours),
        created_at: Set(record.created_at),
        updated_at: Set(record.updated_at),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(RecordError::Creation)?;

    // Junction members whose lookup did not resolve are dropped silently
    for department in &record.departments {
        if let Some(&department_id) = mappings.departments.get(&department.original_id) {
            work_log_departments::ActiveModel {
                work_log_entry_id: Set(entry.id),
                department_id: Set(department_id),
            }
            .insert(conn)
            .await
            .map_err(RecordError::Creation)?;
        }
    }
    for work_type in &record.work_types {
        if let Some(&work_type_id) = mappings.work_types.get(&work_type.original_id) {
            work_log_work_types::ActiveModel {
                work_log_entry_id: Set(entry.id),
                work_type_id: Set(work_type_id),
            }
            .insert(conn)
            .await
            .map_err(RecordError::Creation)?;
        }
    }

    Ok(())
}

/// Re-create todo rows and their children through the mapping. A failure
/// anywhere in one todo's scope fails that todo only; child counters
/// incremented before the failure stay incremented, matching the original
/// system's accounting.
async fn import_todos<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    todos: &[TodoRecord],
    mappings: &ReferenceIdMappings,
    attachment_files: &HashMap<i32, Vec<u8>>,
    result: &mut ImportResult,
) -> Result<()> {
    for record in todos {
        match import_todo_record(
            conn,
            user_id,
            record,
            mappings,
            attachment_files,
            &mut result.statistics,
        )
        .await
        {
            Ok(()) => result.statistics.todos_imported += 1,
            Err(err) => {
                warn!("Failed to import todo '{}': {}", record.title, err);
                result
                    .errors
                    .push(format!("Todo '{}': {}", record.title, err));
                result.statistics.todos_failed += 1;
            }
        }
    }
    Ok(())
}

async fn import_todo_record<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    record: &TodoRecord,
    mappings: &ReferenceIdMappings,
    attachment_files: &HashMap<i32, Vec<u8>>,
    statistics: &mut ImportStatistics,
) -> std::result::Result<(), RecordError> {
    // An unmapped category is not an error; the todo imports uncategorized
    let category_id = record
        .category_id
        .and_then(|id| mappings.todo_categories.get(&id).copied());

    let todo = todo_items::ActiveModel {
        user_id: Set(user_id),
        category_id: Set(category_id),
        title: Set(record.title.clone()),
        description: Set(record.description.clone()),
        due_date: Set(record.due_date),
        status: Set(record.status.into()),
        priority: Set(record.priority.into()),
        created_at: Set(record.created_at),
        updated_at: Set(record.updated_at),
        completed_at: Set(record.completed_at),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(RecordError::Creation)?;

    for sub_task in &record.sub_tasks {
        todo_sub_tasks::ActiveModel {
            todo_item_id: Set(todo.id),
            title: Set(sub_task.title.clone()),
            is_completed: Set(sub_task.is_completed),
            sort_order: Set(sub_task.sort_order),
            created_at: Set(sub_task.created_at),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(RecordError::Creation)?;
        statistics.sub_tasks_imported += 1;
    }

    for comment in &record.comments {
        // Re-attributed to the importing user; `comment.username` names the
        // original author and is deliberately not restored here
        todo_comments::ActiveModel {
            todo_item_id: Set(todo.id),
            user_id: Set(user_id),
            content: Set(comment.content.clone()),
            created_at: Set(comment.created_at),
            updated_at: Set(comment.updated_at),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(RecordError::Creation)?;
        statistics.comments_imported += 1;
    }

    for attachment in &record.attachments {
        // Zero-length payload when the archive carried metadata only
        let file_data = attachment_files
            .get(&attachment.original_id)
            .cloned()
            .unwrap_or_default();
        todo_attachments::ActiveModel {
            todo_item_id: Set(todo.id),
            file_name: Set(attachment.file_name.clone()),
            file_size: Set(attachment.file_size),
            content_type: Set(attachment.content_type.clone()),
            file_data: Set(file_data),
            uploaded_at: Set(attachment.uploaded_at),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(RecordError::Creation)?;
        statistics.attachments_imported += 1;
    }

    Ok(())
}
