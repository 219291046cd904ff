//! Error types for the archive export/import subsystem.
//!
//! Archive-level faults (unreadable container, missing manifest) are
//! recoverable and surface as validation failures; database faults inside an
//! import abort the whole transaction. The classification helpers here are
//! what the import pipeline uses to decide which tier a failure belongs to.

use thiserror::Error;

/// Export and import operation errors
#[derive(Error, Debug)]
pub enum ImportExportError {
    /// Archive container unreadable or not a ZIP file
    #[error("Malformed archive: {0}")]
    MalformedArchive(String),

    /// Archive is readable but carries no `data.json` manifest entry
    #[error("Archive is missing the {0} entry")]
    MissingManifest(&'static str),

    /// Manifest JSON decoding failed
    #[error("Failed to parse manifest: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Export requested for a user id that does not exist
    #[error("User {0} not found")]
    UserNotFound(i32),

    /// Export operation failed
    #[error("Export failed: {0}")]
    ExportFailed(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImportExportError {
    /// Faults the caller can fix by supplying a different archive. These are
    /// reported through `ImportResult.errors` and never abort a transaction
    /// (no transaction has been opened yet when they occur).
    pub fn is_archive_fault(&self) -> bool {
        matches!(
            self,
            ImportExportError::MalformedArchive(_)
                | ImportExportError::MissingManifest(_)
                | ImportExportError::Serialization(_)
        )
    }

    /// Error code for API/CLI result rendering
    pub fn error_code(&self) -> &'static str {
        match self {
            ImportExportError::MalformedArchive(_) => "MALFORMED_ARCHIVE",
            ImportExportError::MissingManifest(_) => "MISSING_MANIFEST",
            ImportExportError::Serialization(_) => "SERIALIZATION_ERROR",
            ImportExportError::UserNotFound(_) => "USER_NOT_FOUND",
            ImportExportError::ExportFailed(_) => "EXPORT_FAILED",
            ImportExportError::Database(_) => "DATABASE_ERROR",
            ImportExportError::Io(_) => "IO_ERROR",
        }
    }
}

impl From<zip::result::ZipError> for ImportExportError {
    fn from(err: zip::result::ZipError) -> Self {
        ImportExportError::MalformedArchive(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_archive() {
        let err = ImportExportError::MalformedArchive("invalid Zip archive".to_string());
        assert_eq!(err.to_string(), "Malformed archive: invalid Zip archive");
        assert!(err.is_archive_fault());
        assert_eq!(err.error_code(), "MALFORMED_ARCHIVE");
    }

    #[test]
    fn test_missing_manifest() {
        let err = ImportExportError::MissingManifest("data.json");
        assert_eq!(err.to_string(), "Archive is missing the data.json entry");
        assert!(err.is_archive_fault());
        assert_eq!(err.error_code(), "MISSING_MANIFEST");
    }

    #[test]
    fn test_user_not_found() {
        let err = ImportExportError::UserNotFound(42);
        assert_eq!(err.to_string(), "User 42 not found");
        assert!(!err.is_archive_fault());
        assert_eq!(err.error_code(), "USER_NOT_FOUND");
    }

    #[test]
    fn test_serialization_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = ImportExportError::from(json_err);
        assert!(err.is_archive_fault());
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_zip_error_maps_to_malformed_archive() {
        let err = ImportExportError::from(zip::result::ZipError::FileNotFound);
        assert_eq!(err.error_code(), "MALFORMED_ARCHIVE");
    }
}
