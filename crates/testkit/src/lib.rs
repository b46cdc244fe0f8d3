#![warn(missing_docs)]
//! Shared fixtures for save-directory tests: throwaway roots, raw document
//! writers for hand-crafted or corrupt files, and JSON snapshots.

mod snapshot;

use anyhow::{Context, Result};
use holdfast_core::SlotIndex;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub use snapshot::*;

/// A save root laid out like an install directory, removed on drop.
#[derive(Debug)]
pub struct TempRoot {
    dir: TempDir,
}

impl TempRoot {
    /// Create a fresh empty root. `tag` prefixes the directory name so
    /// leftovers are easy to identify.
    pub fn new(tag: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("holdfast-{tag}-"))
            .tempdir()
            .context("creating temp root")?;
        Ok(Self { dir })
    }

    /// Root directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// `<root>/saves`.
    pub fn saves_dir(&self) -> PathBuf {
        self.path().join("saves")
    }

    /// `<root>/saves/meta.json`.
    pub fn meta_path(&self) -> PathBuf {
        self.saves_dir().join("meta.json")
    }

    /// `<root>/saves/save_slot{N}.json`.
    pub fn slot_path(&self, slot: SlotIndex) -> PathBuf {
        self.saves_dir().join(format!("save_slot{slot}.json"))
    }

    /// `<root>/save.json`.
    pub fn legacy_path(&self) -> PathBuf {
        self.path().join("save.json")
    }

    /// Write `contents` verbatim to `relative`, creating parent directories.
    pub fn write_raw(&self, relative: impl AsRef<Path>, contents: &str) -> Result<PathBuf> {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }

    /// Write a single-save file in the pre-slot layout.
    pub fn write_legacy_save(&self, document: &Value) -> Result<PathBuf> {
        self.write_raw("save.json", &serde_json::to_string_pretty(document)?)
    }

    /// Write a slot payload document directly, bypassing the registry.
    pub fn write_slot_document(&self, slot: SlotIndex, document: &Value) -> Result<PathBuf> {
        self.write_raw(
            format!("saves/save_slot{slot}.json"),
            &serde_json::to_string_pretty(document)?,
        )
    }

    /// Parse a JSON document under the root.
    pub fn read_json(&self, relative: impl AsRef<Path>) -> Result<Value> {
        let path = self.path().join(relative);
        let text =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Names of the files directly under `<root>/saves`, sorted.
    pub fn saves_listing(&self) -> Result<Vec<String>> {
        let dir = self.saves_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&dir).with_context(|| format!("listing {}", dir.display()))? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn roots_are_unique_and_cleaned_up() {
        let first = TempRoot::new("unit").unwrap();
        let second = TempRoot::new("unit").unwrap();
        assert_ne!(first.path(), second.path());

        let kept = first.path().to_path_buf();
        first.write_legacy_save(&json!({"inventory": []})).unwrap();
        assert!(kept.join("save.json").exists());
        drop(first);
        assert!(!kept.exists());
    }

    #[test]
    fn slot_documents_land_in_saves_dir() {
        let root = TempRoot::new("unit").unwrap();
        let slot = SlotIndex::new(2, 3).unwrap();
        root.write_slot_document(slot, &json!({"raid": {"noise": 4}}))
            .unwrap();
        assert_eq!(root.saves_listing().unwrap(), vec!["save_slot2.json"]);
        assert_eq!(
            root.read_json("saves/save_slot2.json").unwrap()["raid"]["noise"],
            4
        );
    }
}
