use holdfast_core::SlotIndexError;
use holdfast_world::ActionError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A save document could not be written.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Filesystem failure (disk full, permission denied, ...).
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        /// Document being written or removed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Serialization failure.
    #[error("failed to encode {}: {source}", .path.display())]
    Encode {
        /// Document being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// Slot index not valid for this storage.
    #[error(transparent)]
    Slot(#[from] SlotIndexError),
}

/// Failure of a write-through gameplay action.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The action was refused; nothing changed.
    #[error(transparent)]
    Refused(#[from] ActionError),
    /// The in-memory change happened but could not be saved.
    #[error(transparent)]
    Save(#[from] SaveError),
}

impl SessionError {
    /// The refusal reason, if this was a refused action.
    pub fn refusal(&self) -> Option<&ActionError> {
        match self {
            SessionError::Refused(err) => Some(err),
            SessionError::Save(_) => None,
        }
    }
}
