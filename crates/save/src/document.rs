//! JSON document I/O shared by the registry and the payload store.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::SaveError;

/// Read and decode a document, or `None` if it is missing or unreadable.
///
/// Missing files are expected (fresh install, empty slot); anything else is
/// logged before the caller substitutes defaults.
pub(crate) fn read_document<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "document not found");
            return None;
        }
        Err(err) => {
            warn!("Failed to read {}: {err}. Using defaults", path.display());
            return None;
        }
    };

    match serde_json::from_str(&contents) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("Failed to parse {}: {err}. Using defaults", path.display());
            None
        }
    }
}

/// Encode and write a document, replacing the previous version in one rename.
pub(crate) fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<(), SaveError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| SaveError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    write_text_atomic(path, &json).map_err(|source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = json.len(), "wrote document");
    Ok(())
}

/// Delete a document; an already-missing file is not an error.
pub(crate) fn remove_document(path: &Path) -> Result<(), SaveError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(SaveError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_text_atomic(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = temp_path_for(path);
    fs::write(&tmp_path, text)?;
    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("document.json");
    let tmp_name = format!("{file_name}.tmp");
    match path.parent() {
        Some(parent) => parent.join(tmp_name),
        None => PathBuf::from(tmp_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    #[test]
    fn write_then_read_round_trips_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.json");
        let mut value = BTreeMap::new();
        value.insert("noise".to_string(), 7u32);

        write_document(&path, &value).expect("write succeeds");
        let read: BTreeMap<String, u32> = read_document(&path).expect("document readable");
        assert_eq!(read, value);
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn missing_and_corrupt_documents_read_as_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");

        assert!(read_document::<BTreeMap<String, u32>>(&path).is_none());
        fs::write(&path, "{\"noise\": ").unwrap();
        assert!(read_document::<BTreeMap<String, u32>>(&path).is_none());
    }

    #[test]
    fn removing_missing_document_is_ok() {
        let dir = tempdir().unwrap();
        assert!(remove_document(&dir.path().join("absent.json")).is_ok());
    }
}
