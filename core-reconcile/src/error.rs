use bridge_traits::BridgeError;
use core_index::IndexError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcileError {
    /// The checksum index failed. Fatal for the run: degrading this into
    /// "not found" would cause redundant downloads.
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    /// A parent directory could not be prepared. Scoped to one item; other
    /// items continue.
    #[error("Failed to prepare directory {path}: {source}")]
    Placement {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An external collaborator (listing or transfer) failed.
    #[error("Collaborator error: {0}")]
    Collaborator(#[from] BridgeError),
}

impl ReconcileError {
    /// Whether this error must abort the whole run rather than one item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ReconcileError::Index(_))
    }
}

pub type Result<T> = std::result::Result<T, ReconcileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_errors_are_fatal() {
        let err = ReconcileError::Index(IndexError::Migration("boom".to_string()));
        assert!(err.is_fatal());
    }

    #[test]
    fn placement_errors_are_item_scoped() {
        let err = ReconcileError::Placement {
            path: PathBuf::from("/course/week1"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!err.is_fatal());
    }
}
