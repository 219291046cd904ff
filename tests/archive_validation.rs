use std::io::Write as _;

use anyhow::Result;
use chrono::{TimeZone, Utc};
use indexmap::IndexMap;
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

use worklog::archive::manifest::{ExportKind, ReferenceData, SystemDataManifest, FORMAT_VERSION};
use worklog::archive::write_archive;
use worklog::services::validate_archive;

fn system_manifest(version: &str) -> SystemDataManifest {
    SystemDataManifest {
        version: version.to_string(),
        export_type: "SystemData".to_string(),
        exported_at: Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap(),
        username: "admin".to_string(),
        reference_data: ReferenceData::default(),
    }
}

fn archive_for(manifest: &SystemDataManifest) -> Vec<u8> {
    let manifest_json = serde_json::to_vec_pretty(manifest).unwrap();
    write_archive(&manifest_json, &IndexMap::new()).unwrap()
}

#[test]
fn validation_reports_missing_manifest_entry() {
    // A well-formed zip that simply has no data.json
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut cursor);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file("attachments/1_x.bin", options).unwrap();
        zip.write_all(b"bytes").unwrap();
        zip.finish().unwrap();
    }

    let result = validate_archive(&cursor.into_inner(), ExportKind::Full);
    assert!(!result.success);
    assert!(
        result.errors.iter().any(|e| e.contains("data.json")),
        "{:?}",
        result.errors
    );
}

#[test]
fn validation_warns_on_version_mismatch_but_passes() {
    let bytes = archive_for(&system_manifest("0.9"));
    let result = validate_archive(&bytes, ExportKind::SystemData);

    assert!(result.success, "version drift warns, never fails");
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("0.9"), "{}", result.warnings[0]);
}

#[test]
fn validation_warns_on_export_type_mismatch() {
    // A system archive handed to the work-log import surface
    let bytes = archive_for(&system_manifest(FORMAT_VERSION));
    let result = validate_archive(&bytes, ExportKind::WorkLogData);

    assert!(result.success);
    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.contains("SystemData")),
        "{:?}",
        result.warnings
    );
}

#[test]
fn validation_summarizes_counts_on_success() {
    let bytes = archive_for(&system_manifest(FORMAT_VERSION));
    let result = validate_archive(&bytes, ExportKind::SystemData);

    assert!(result.success);
    assert!(result.warnings.is_empty());
    assert!(
        result.message.contains("0 projects"),
        "message should summarize category counts: {}",
        result.message
    );
}

#[test]
fn archive_survives_a_trip_through_disk() -> Result<()> {
    let bytes = archive_for(&system_manifest(FORMAT_VERSION));

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("system-export.zip");
    std::fs::write(&path, &bytes)?;

    let read_back = std::fs::read(&path)?;
    let result = validate_archive(&read_back, ExportKind::SystemData);
    assert!(result.success, "{:?}", result.errors);
    Ok(())
}
