//! Archive container codec.
//!
//! An export archive is a ZIP file with exactly one `data.json` entry (the
//! UTF-8 JSON manifest) and zero or more attachment payload entries at
//! `attachments/{originalId}_{fileName}`. Reading is tolerant: a missing
//! payload entry is `None`, a missing manifest or an unreadable container is
//! an [`ImportExportError`] the caller folds into its validation report.

pub mod manifest;

use std::io::{Cursor, Read, Write};

use indexmap::IndexMap;
use zip::{result::ZipError, write::FileOptions, CompressionMethod, ZipArchive, ZipWriter};

use crate::errors::{ImportExportError, Result};

/// Name of the mandatory manifest entry.
pub const MANIFEST_ENTRY: &str = "data.json";

/// Archive-relative path for an attachment payload.
pub fn attachment_entry_path(original_id: i32, file_name: &str) -> String {
    format!("attachments/{}_{}", original_id, file_name)
}

/// Serialize a manifest plus attachment payloads into archive bytes.
///
/// `attachments` maps archive-relative paths to payload bytes; insertion
/// order is preserved so archives are byte-stable for identical input.
pub fn write_archive(
    manifest_json: &[u8],
    attachments: &IndexMap<String, Vec<u8>>,
) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut cursor);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file(MANIFEST_ENTRY, options)
            .map_err(|e| ImportExportError::ExportFailed(format!("Failed to add manifest entry: {}", e)))?;
        zip.write_all(manifest_json)
            .map_err(|e| ImportExportError::ExportFailed(format!("Failed to write manifest entry: {}", e)))?;

        for (path, bytes) in attachments {
            zip.start_file(path.as_str(), options)
                .map_err(|e| ImportExportError::ExportFailed(format!("Failed to add {}: {}", path, e)))?;
            zip.write_all(bytes)
                .map_err(|e| ImportExportError::ExportFailed(format!("Failed to write {}: {}", path, e)))?;
        }

        zip.finish()
            .map_err(|e| ImportExportError::ExportFailed(format!("Failed to finalize archive: {}", e)))?;
    }
    Ok(cursor.into_inner())
}

/// Open archive bytes for reading. Fails with `MalformedArchive` when the
/// container is not a readable ZIP file.
pub fn open_archive(bytes: &[u8]) -> Result<ZipArchive<Cursor<Vec<u8>>>> {
    ZipArchive::new(Cursor::new(bytes.to_vec()))
        .map_err(|e| ImportExportError::MalformedArchive(e.to_string()))
}

/// Read the manifest entry out of an opened archive.
pub fn read_manifest_bytes(archive: &mut ZipArchive<Cursor<Vec<u8>>>) -> Result<Vec<u8>> {
    match archive.by_name(MANIFEST_ENTRY) {
        Ok(mut file) => {
            let mut buffer = Vec::new();
            file.read_to_end(&mut buffer)?;
            Ok(buffer)
        }
        Err(ZipError::FileNotFound) => Err(ImportExportError::MissingManifest(MANIFEST_ENTRY)),
        Err(e) => Err(e.into()),
    }
}

/// Read an attachment payload entry, `None` when the entry is absent.
pub fn try_read_entry_bytes(
    archive: &mut ZipArchive<Cursor<Vec<u8>>>,
    path: &str,
) -> Result<Option<Vec<u8>>> {
    match archive.by_name(path) {
        Ok(mut file) => {
            let mut buffer = Vec::new();
            file.read_to_end(&mut buffer)?;
            Ok(Some(buffer))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read_round_trip() {
        let manifest = serde_json::json!({
            "version": "1.0",
            "username": "王小明",
            "todos": [{"title": "翻譯文件"}]
        });
        let manifest_json = serde_json::to_vec_pretty(&manifest).unwrap();

        let mut attachments = IndexMap::new();
        attachments.insert(
            attachment_entry_path(9, "spec.pdf"),
            vec![0xde, 0xad, 0xbe, 0xef],
        );

        let bytes = write_archive(&manifest_json, &attachments).unwrap();
        let mut archive = open_archive(&bytes).unwrap();

        let read_back = read_manifest_bytes(&mut archive).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&read_back).unwrap();
        assert_eq!(value["username"], "王小明", "unicode must survive the container");

        let payload = try_read_entry_bytes(&mut archive, "attachments/9_spec.pdf").unwrap();
        assert_eq!(payload, Some(vec![0xde, 0xad, 0xbe, 0xef]));
    }

    #[test]
    fn test_missing_attachment_entry_is_none() {
        let bytes = write_archive(b"{}", &IndexMap::new()).unwrap();
        let mut archive = open_archive(&bytes).unwrap();
        let payload = try_read_entry_bytes(&mut archive, "attachments/1_gone.bin").unwrap();
        assert!(payload.is_none());
    }

    #[test]
    fn test_archive_without_manifest_entry() {
        // Hand-roll a zip that carries only an attachment entry
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut cursor);
            let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
            zip.start_file("attachments/1_a.bin", options).unwrap();
            zip.write_all(b"payload").unwrap();
            zip.finish().unwrap();
        }
        let mut archive = open_archive(&cursor.into_inner()).unwrap();
        let err = read_manifest_bytes(&mut archive).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_MANIFEST");
    }

    #[test]
    fn test_corrupt_container_is_malformed() {
        let err = open_archive(b"definitely not a zip file").unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_ARCHIVE");
    }
}
