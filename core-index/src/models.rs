//! Persisted models for the checksum index.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::path::PathBuf;

/// Identifier of an owning group (e.g. a course), assigned by the portal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct GroupId(pub i64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for GroupId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// One persisted checksum record.
///
/// `(checksum, group_id)` is the primary key; identical content in two
/// different groups is two independent records. `local_path` and
/// `source_locator` track where the content currently lives and under which
/// URL it was last listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ChecksumRecord {
    /// Hex-encoded content checksum.
    pub checksum: String,
    /// Owning group.
    pub group_id: GroupId,
    /// Where the content was last materialized.
    pub local_path: String,
    /// URL the content was last listed under.
    pub source_locator: String,
    /// When the record was first created (epoch seconds).
    pub recorded_at: i64,
    /// When the record was last refreshed (epoch seconds).
    pub updated_at: i64,
}

impl ChecksumRecord {
    /// The recorded location as a path.
    pub fn path(&self) -> PathBuf {
        PathBuf::from(&self.local_path)
    }
}
