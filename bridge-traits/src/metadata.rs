//! Remote Metadata Contracts
//!
//! Defines the raw item record handed over by the remote-metadata collaborator
//! and the trait that collaborator implements. The reconciliation core never
//! talks to the portal directly; it consumes these records in whatever order
//! the collaborator produces them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One remote media item as listed by the portal.
///
/// Everything except `source_locator` and `group_id` is optional or a hint.
/// Empty strings in the optional fields are semantically equivalent to absent
/// values; consumers normalize them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteItemRecord {
    /// URL or equivalent remote address. Identifies the item within its
    /// group for this listing, but is not stable across listings.
    pub source_locator: String,

    /// Owning group (e.g. a course) as assigned by the portal.
    pub group_id: i64,

    /// Portal-declared media category ("document", "video", ...).
    pub category_hint: String,

    /// Human-readable name, when the portal supplies one.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Secondary grouping hint such as a week or module label.
    #[serde(default)]
    pub organizational_label: Option<String>,

    /// Caller-supplied override path fragment, lowest placement priority.
    #[serde(default)]
    pub relative_location_hint: Option<String>,
}

/// Remote-metadata collaborator.
///
/// Implementations enumerate the media items of a group and, when the portal
/// declares content identity up front (size/etag derived), surface a checksum
/// without any byte transfer.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// List the media items of a group.
    ///
    /// Order is not meaningful.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote listing fails.
    async fn list_items(&self, group_id: i64) -> Result<Vec<RemoteItemRecord>>;

    /// Content checksum declared by the portal for an item, if any.
    ///
    /// `Ok(None)` means the checksum can only be known after a download.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote metadata query fails.
    async fn declared_checksum(&self, item: &RemoteItemRecord) -> Result<Option<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_roundtrips_through_serde() {
        let record = RemoteItemRecord {
            source_locator: "https://portal.example/file/42".to_string(),
            group_id: 7,
            category_hint: "document".to_string(),
            display_name: Some("slides.pdf".to_string()),
            organizational_label: Some("Week 1".to_string()),
            relative_location_hint: None,
        };

        let json = serde_json::to_string(&record).unwrap();
        let parsed: RemoteItemRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn optional_fields_default_to_absent() {
        let json = r#"{
            "source_locator": "https://portal.example/file/42",
            "group_id": 7,
            "category_hint": "video"
        }"#;

        let parsed: RemoteItemRecord = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.display_name, None);
        assert_eq!(parsed.organizational_label, None);
        assert_eq!(parsed.relative_location_hint, None);
    }
}
