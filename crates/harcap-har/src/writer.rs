//! Archive serialization to disk.
//!
//! The write happens exactly once, after recording has stopped; nothing
//! here is on the event-delivery path.

use std::fs;
use std::path::Path;

use crate::error::ArchiveError;
use crate::model::{Creator, Entry, Har};

/// Serialize `entries` as a HAR 1.2 document at `path`.
///
/// Entries are written in the order given (terminal-event order, not
/// re-sorted by time). The destination directory is created if missing
/// and the document is pretty-printed for human inspection.
pub fn write_archive(
    path: &Path,
    creator: Creator,
    entries: Vec<Entry>,
) -> Result<(), ArchiveError> {
    let entry_count = entries.len();
    let har = Har::new(creator, entries);
    let json = serde_json::to_string_pretty(&har)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| ArchiveError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    fs::write(path, json).map_err(|source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        entries = entry_count,
        "wrote traffic archive"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn writes_valid_har_document() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("capture.har");

        let entry = Entry::started("r1", Utc::now());
        write_archive(&path, Creator::default(), vec![entry]).expect("write");

        let text = fs::read_to_string(&path).expect("read back");
        let json: serde_json::Value = serde_json::from_str(&text).expect("valid JSON");
        assert_eq!(json["log"]["version"], "1.2");
        assert_eq!(json["log"]["entries"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn creates_missing_directories() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("deeper").join("capture.har");

        write_archive(&path, Creator::default(), Vec::new()).expect("write");
        assert!(path.exists());
    }

    #[test]
    fn output_is_indented() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("capture.har");

        write_archive(&path, Creator::default(), Vec::new()).expect("write");
        let text = fs::read_to_string(&path).expect("read back");
        assert!(text.contains("\n  "), "expected pretty-printed output");
    }

    #[test]
    fn empty_entry_list_still_writes() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("empty.har");

        write_archive(&path, Creator::default(), Vec::new()).expect("write");
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["log"]["entries"], serde_json::json!([]));
    }
}
