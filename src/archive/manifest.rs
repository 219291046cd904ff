//! Wire records for the export archive manifest.
//!
//! Everything here is camelCase on the wire and tolerant of unknown fields.
//! Records carry the exporting system's row id as `original_id` plus, for
//! every lookup reference, the human-readable name — the name is the only
//! identity that survives the move between two systems. The manifest root
//! structs additionally accept PascalCase spellings of their fields so
//! archives produced by tooling with a PascalCase property policy still
//! parse; nested records are always machine-written camelCase.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::database::entities::common_types::{TodoPriority, TodoStatus};

/// Archive format version stamped into every manifest.
pub const FORMAT_VERSION: &str = "1.0";

fn format_version() -> String {
    FORMAT_VERSION.to_string()
}

/// The three manifest shapes an archive can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportKind {
    /// Reference data + work logs + todos
    Full,
    /// Work logs + todos, no reference-data block
    WorkLogData,
    /// Reference data only
    SystemData,
}

impl std::fmt::Display for ExportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportKind::Full => write!(f, "Full"),
            ExportKind::WorkLogData => write!(f, "WorkLogData"),
            ExportKind::SystemData => write!(f, "SystemData"),
        }
    }
}

/// One row of a shared lookup category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceItem {
    pub original_id: i32,
    pub name: String,
    pub is_active: bool,
    pub sort_order: i32,
}

/// Todo category row; a [`ReferenceItem`] plus presentation fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoCategoryItem {
    pub original_id: i32,
    pub name: String,
    pub is_active: bool,
    pub sort_order: i32,
    pub color_code: Option<String>,
    pub icon: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceData {
    #[serde(default)]
    pub projects: Vec<ReferenceItem>,
    #[serde(default)]
    pub departments: Vec<ReferenceItem>,
    #[serde(default)]
    pub work_types: Vec<ReferenceItem>,
    #[serde(default)]
    pub process_statuses: Vec<ReferenceItem>,
    #[serde(default)]
    pub todo_categories: Vec<TodoCategoryItem>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogRecord {
    pub original_id: i32,
    pub title: String,
    pub content: String,
    pub record_date: NaiveDate,
    pub work_hours: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,

    // Referenced lookups travel as id + name; the id keys the per-call
    // mapping, the name is what actually reconciles
    pub project_id: i32,
    pub project_name: String,
    pub process_status_id: i32,
    pub process_status_name: String,

    #[serde(default)]
    pub departments: Vec<ReferenceItem>,
    #[serde(default)]
    pub work_types: Vec<ReferenceItem>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoRecord {
    pub original_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: TodoStatus,
    #[serde(default)]
    pub priority: TodoPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,

    pub category_id: Option<i32>,
    pub category_name: Option<String>,

    #[serde(default)]
    pub sub_tasks: Vec<SubTaskRecord>,
    #[serde(default)]
    pub comments: Vec<CommentRecord>,
    #[serde(default)]
    pub attachments: Vec<AttachmentRecord>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTaskRecord {
    pub original_id: i32,
    pub title: String,
    pub is_completed: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    pub original_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Username of the original commenter. Informational only: the import
    /// re-attributes comments to the importing user.
    pub username: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRecord {
    pub original_id: i32,
    pub file_name: String,
    pub file_size: i64,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
    /// Relative path of the payload inside the archive; set only when the
    /// attachment bytes are embedded, otherwise the record is metadata-only.
    pub file_path: Option<String>,
}

/// Full backup manifest: reference data + work logs + todos.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullExportManifest {
    #[serde(default = "format_version", alias = "Version")]
    pub version: String,
    #[serde(alias = "ExportedAt")]
    pub exported_at: DateTime<Utc>,
    #[serde(default, alias = "Username")]
    pub username: String,
    #[serde(alias = "StartDate")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(alias = "EndDate")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, alias = "IncludesAttachments")]
    pub includes_attachments: bool,
    #[serde(default, alias = "ReferenceData")]
    pub reference_data: ReferenceData,
    #[serde(default, alias = "WorkLogs")]
    pub work_logs: Vec<WorkLogRecord>,
    #[serde(default, alias = "Todos")]
    pub todos: Vec<TodoRecord>,
}

/// Work-log backup manifest: work logs + todos, no reference-data block.
/// Lookup reconciliation on import scans the records themselves.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogDataManifest {
    #[serde(default = "format_version", alias = "Version")]
    pub version: String,
    #[serde(default = "WorkLogDataManifest::type_tag", alias = "ExportType")]
    pub export_type: String,
    #[serde(alias = "ExportedAt")]
    pub exported_at: DateTime<Utc>,
    #[serde(default, alias = "Username")]
    pub username: String,
    #[serde(alias = "StartDate")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(alias = "EndDate")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, alias = "IncludesAttachments")]
    pub includes_attachments: bool,
    #[serde(default, alias = "WorkLogs")]
    pub work_logs: Vec<WorkLogRecord>,
    #[serde(default, alias = "Todos")]
    pub todos: Vec<TodoRecord>,
}

impl WorkLogDataManifest {
    fn type_tag() -> String {
        "WorkLogData".to_string()
    }
}

/// System administration manifest: the shared lookup tables only.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemDataManifest {
    #[serde(default = "format_version", alias = "Version")]
    pub version: String,
    #[serde(default = "SystemDataManifest::type_tag", alias = "ExportType")]
    pub export_type: String,
    #[serde(alias = "ExportedAt")]
    pub exported_at: DateTime<Utc>,
    #[serde(default, alias = "Username")]
    pub username: String,
    #[serde(default, alias = "ReferenceData")]
    pub reference_data: ReferenceData,
}

impl SystemDataManifest {
    fn type_tag() -> String {
        "SystemData".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_todo_json() -> serde_json::Value {
        serde_json::json!({
            "originalId": 7,
            "title": "寫季度報告",
            "description": null,
            "dueDate": null,
            "status": 1,
            "priority": 2,
            "createdAt": "2026-01-10T08:00:00Z",
            "updatedAt": null,
            "completedAt": null,
            "categoryId": 3,
            "categoryName": "工作",
            "subTasks": [],
            "comments": [],
            "attachments": []
        })
    }

    #[test]
    fn test_todo_record_wire_shape() {
        let record: TodoRecord = serde_json::from_value(sample_todo_json()).unwrap();
        assert_eq!(record.original_id, 7);
        assert_eq!(record.title, "寫季度報告");
        assert_eq!(record.status, TodoStatus::InProgress);
        assert_eq!(record.priority, TodoPriority::High);
        assert_eq!(record.category_name.as_deref(), Some("工作"));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["status"], 1, "status must stay an integer on the wire");
        assert_eq!(value["categoryName"], "工作");
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let mut json = sample_todo_json();
        json["somethingFromTheFuture"] = serde_json::json!({"nested": true});
        let record: TodoRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.original_id, 7);
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let manifest: FullExportManifest = serde_json::from_str(
            r#"{"version":"1.0","exportedAt":"2026-02-01T00:00:00Z","username":"amy"}"#,
        )
        .unwrap();
        assert!(manifest.work_logs.is_empty());
        assert!(manifest.todos.is_empty());
        assert!(manifest.reference_data.projects.is_empty());
        assert!(!manifest.includes_attachments);
    }

    #[test]
    fn test_manifest_root_accepts_pascal_case() {
        let manifest: SystemDataManifest = serde_json::from_str(
            r#"{"Version":"1.0","ExportType":"SystemData","ExportedAt":"2026-02-01T00:00:00Z","Username":"admin"}"#,
        )
        .unwrap();
        assert_eq!(manifest.export_type, "SystemData");
        assert_eq!(manifest.username, "admin");
    }

    #[test]
    fn test_missing_export_type_defaults_to_shape_tag() {
        let manifest: WorkLogDataManifest = serde_json::from_str(
            r#"{"exportedAt":"2026-02-01T00:00:00Z","username":"amy"}"#,
        )
        .unwrap();
        assert_eq!(manifest.export_type, "WorkLogData");
        assert_eq!(manifest.version, FORMAT_VERSION);
    }

    #[test]
    fn test_work_log_record_round_trip_preserves_dates() {
        let record = WorkLogRecord {
            original_id: 11,
            title: "Incident follow-up".to_string(),
            content: "Wrote the postmortem".to_string(),
            record_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            work_hours: 2.5,
            created_at: Utc.with_ymd_and_hms(2026, 1, 15, 18, 30, 0).unwrap(),
            updated_at: None,
            project_id: 4,
            project_name: "Atlas".to_string(),
            process_status_id: 2,
            process_status_name: "Done".to_string(),
            departments: vec![],
            work_types: vec![],
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: WorkLogRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.record_date, record.record_date);
        assert_eq!(back.created_at, record.created_at);
        assert_eq!(back.work_hours, 2.5);
        assert!(json.contains("\"recordDate\":\"2026-01-15\""));
    }
}
