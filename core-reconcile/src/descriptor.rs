//! Media descriptors.
//!
//! A [`MediaDescriptor`] is the run-scoped record produced for each remote
//! item: identity (locator, owning group), classification (category), and the
//! resolved local location. Resolution happens exactly once, at construction;
//! by the time a descriptor exists its parent directory exists too.

use crate::config::ReconcileConfig;
use crate::error::Result;
use crate::placement::{ensure_dir, placement_dir};
use crate::sanitize::sanitize;
use bridge_traits::RemoteItemRecord;
use core_index::GroupId;
use std::fmt;
use std::path::{Path, PathBuf};

// =============================================================================
// Group
// =============================================================================

/// An owning organizational unit, e.g. a course.
///
/// Immutable for the lifetime of a sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Portal-assigned identity.
    pub id: GroupId,
    /// Display name as listed by the portal.
    pub name: String,
    /// Root storage directory for this group's items.
    pub root: PathBuf,
}

impl Group {
    /// Create a group whose root is `base_dir / sanitize(name)`.
    pub fn new(id: impl Into<GroupId>, name: impl Into<String>, base_dir: &Path) -> Self {
        let name = name.into();
        let root = base_dir.join(sanitize(&name, true));
        Self {
            id: id.into(),
            name,
            root,
        }
    }
}

// =============================================================================
// MediaCategory
// =============================================================================

/// Closed classification of a remote item's type.
///
/// Each variant carries the canonical directory name used as the fallback
/// grouping label when no organizational label applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaCategory {
    Document,
    Video,
    ExternalLink,
}

impl MediaCategory {
    /// Canonical fallback directory name.
    pub fn dir_name(&self) -> &'static str {
        match self {
            MediaCategory::Document => "Documents",
            MediaCategory::Video => "Videos",
            MediaCategory::ExternalLink => "External Links",
        }
    }

    /// Map a portal-declared category hint onto the closed enum.
    ///
    /// Unknown hints are an input anomaly, not an error; they fall back to
    /// `Document`.
    pub fn from_hint(hint: &str) -> Self {
        match hint.trim().to_ascii_lowercase().as_str() {
            "video" | "stream" => MediaCategory::Video,
            "extern" | "external" | "external-link" | "link" | "url" => MediaCategory::ExternalLink,
            _ => MediaCategory::Document,
        }
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaCategory::Document => "document",
            MediaCategory::Video => "video",
            MediaCategory::ExternalLink => "external-link",
        };
        write!(f, "{name}")
    }
}

// =============================================================================
// MediaDescriptor
// =============================================================================

/// One remote item, resolved to its canonical local location.
///
/// Transient and run-scoped; does not outlive the group it borrows.
#[derive(Debug)]
pub struct MediaDescriptor<'a> {
    /// Remote address of the item. Identity within the group for this run,
    /// not stable across runs.
    pub source_locator: String,
    /// Owning group.
    pub group: &'a Group,
    /// Item classification.
    pub category: MediaCategory,
    /// Optional human label. Absent is valid, not an error.
    pub display_name: Option<String>,
    /// Optional secondary grouping hint (e.g. a week label).
    pub organizational_label: Option<String>,
    /// Optional caller-supplied override path fragment, lowest priority.
    pub relative_location_hint: Option<String>,
    /// Resolved parent directory; set once at construction, exists on disk.
    resolved_parent: PathBuf,
}

impl<'a> MediaDescriptor<'a> {
    /// Resolve a descriptor.
    ///
    /// Computes the parent directory per the placement policy and creates it.
    /// Idempotent: repeated construction with identical inputs yields the
    /// same parent and reuses the existing directory.
    ///
    /// # Errors
    ///
    /// Returns a placement error if the parent directory cannot be created;
    /// this is scoped to the single item.
    pub async fn resolve(
        group: &'a Group,
        source_locator: impl Into<String>,
        category: MediaCategory,
        display_name: Option<String>,
        organizational_label: Option<String>,
        relative_location_hint: Option<String>,
        config: &ReconcileConfig,
    ) -> Result<MediaDescriptor<'a>> {
        let display_name = none_if_blank(display_name);
        let organizational_label = none_if_blank(organizational_label);
        let relative_location_hint = none_if_blank(relative_location_hint);

        let resolved_parent = placement_dir(
            &group.root,
            category,
            organizational_label.as_deref(),
            relative_location_hint.as_deref(),
            config.make_subdirs,
        );
        ensure_dir(&resolved_parent).await?;

        Ok(Self {
            source_locator: source_locator.into(),
            group,
            category,
            display_name,
            organizational_label,
            relative_location_hint,
            resolved_parent,
        })
    }

    /// Resolve a descriptor straight from a raw remote item record.
    ///
    /// # Errors
    ///
    /// Returns a placement error if the parent directory cannot be created.
    pub async fn from_record(
        record: &RemoteItemRecord,
        group: &'a Group,
        config: &ReconcileConfig,
    ) -> Result<MediaDescriptor<'a>> {
        Self::resolve(
            group,
            record.source_locator.clone(),
            MediaCategory::from_hint(&record.category_hint),
            record.display_name.clone(),
            record.organizational_label.clone(),
            record.relative_location_hint.clone(),
            config,
        )
        .await
    }

    /// The resolved parent directory. Exists on disk.
    pub fn parent_path(&self) -> &Path {
        &self.resolved_parent
    }

    /// Sanitized file name for this item.
    ///
    /// Prefers the display name; falls back to the last path segment of the
    /// locator.
    pub fn file_name(&self) -> String {
        if let Some(name) = self.display_name.as_deref() {
            return sanitize(name, false);
        }

        let trimmed = self
            .source_locator
            .split(['?', '#'])
            .next()
            .unwrap_or("")
            .trim_end_matches('/');
        let last = trimmed.rsplit('/').next().unwrap_or("");
        sanitize(last, false)
    }

    /// Full target path: resolved parent joined with the file name.
    pub fn target_path(&self) -> PathBuf {
        self.resolved_parent.join(self.file_name())
    }
}

/// Normalize "present but blank" optionals: an empty or whitespace-only
/// string is semantically equivalent to absent.
fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ReconcileConfig {
        ReconcileConfig::default()
    }

    fn test_group(base: &Path) -> Group {
        Group::new(12345, "Test Course", base)
    }

    #[test]
    fn group_root_is_sanitized_name_under_base() {
        let group = Group::new(1, "Systems: Intro / Basics", Path::new("/data"));
        assert_eq!(group.root, Path::new("/data").join("Systems Intro Basics"));
    }

    #[test]
    fn category_hints_parse_leniently() {
        assert_eq!(MediaCategory::from_hint("video"), MediaCategory::Video);
        assert_eq!(MediaCategory::from_hint("  VIDEO "), MediaCategory::Video);
        assert_eq!(MediaCategory::from_hint("url"), MediaCategory::ExternalLink);
        assert_eq!(MediaCategory::from_hint("pdf"), MediaCategory::Document);
        assert_eq!(MediaCategory::from_hint(""), MediaCategory::Document);
    }

    #[tokio::test]
    async fn descriptor_with_label_resolves_under_label() {
        let tmp = tempfile::tempdir().unwrap();
        let group = test_group(tmp.path());

        let descriptor = MediaDescriptor::resolve(
            &group,
            "https://portal.example/file.pdf",
            MediaCategory::Document,
            Some("test_file.pdf".to_string()),
            Some("Week 1 - Introduction".to_string()),
            None,
            &test_config(),
        )
        .await
        .unwrap();

        assert_eq!(
            descriptor.parent_path(),
            group.root.join("Week 1 - Introduction")
        );
        assert!(descriptor.parent_path().is_dir());
    }

    #[tokio::test]
    async fn descriptor_without_label_uses_category_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let group = test_group(tmp.path());

        let descriptor = MediaDescriptor::resolve(
            &group,
            "https://portal.example/file.pdf",
            MediaCategory::Document,
            None,
            None,
            None,
            &test_config(),
        )
        .await
        .unwrap();

        assert_eq!(descriptor.parent_path(), group.root.join("Documents"));
    }

    #[tokio::test]
    async fn empty_label_is_treated_as_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let group = test_group(tmp.path());

        let descriptor = MediaDescriptor::resolve(
            &group,
            "https://portal.example/file.pdf",
            MediaCategory::Document,
            None,
            Some(String::new()),
            None,
            &test_config(),
        )
        .await
        .unwrap();

        assert_eq!(descriptor.parent_path(), group.root.join("Documents"));
        assert_eq!(descriptor.organizational_label, None);
    }

    #[tokio::test]
    async fn flat_config_resolves_to_group_root() {
        let tmp = tempfile::tempdir().unwrap();
        let group = test_group(tmp.path());
        let config = ReconcileConfig {
            make_subdirs: false,
            ..ReconcileConfig::default()
        };

        let descriptor = MediaDescriptor::resolve(
            &group,
            "https://portal.example/file.pdf",
            MediaCategory::Video,
            None,
            Some("Week 1 - Introduction".to_string()),
            None,
            &config,
        )
        .await
        .unwrap();

        assert_eq!(descriptor.parent_path(), group.root.as_path());
    }

    #[tokio::test]
    async fn repeated_resolution_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let group = test_group(tmp.path());

        let first = MediaDescriptor::resolve(
            &group,
            "https://portal.example/a.pdf",
            MediaCategory::Document,
            None,
            Some("Week 6 - New Topic".to_string()),
            None,
            &test_config(),
        )
        .await
        .unwrap();
        let second = MediaDescriptor::resolve(
            &group,
            "https://portal.example/b.pdf",
            MediaCategory::Video,
            None,
            Some("Week 6 - New Topic".to_string()),
            None,
            &test_config(),
        )
        .await
        .unwrap();

        assert_eq!(first.parent_path(), second.parent_path());
        assert!(first.parent_path().is_dir());
    }

    #[tokio::test]
    async fn file_name_prefers_display_name() {
        let tmp = tempfile::tempdir().unwrap();
        let group = test_group(tmp.path());

        let descriptor = MediaDescriptor::resolve(
            &group,
            "https://portal.example/download/99",
            MediaCategory::Document,
            Some("lecture: notes.pdf".to_string()),
            None,
            None,
            &test_config(),
        )
        .await
        .unwrap();

        assert_eq!(descriptor.file_name(), "lecture notes.pdf");
        assert_eq!(
            descriptor.target_path(),
            group.root.join("Documents").join("lecture notes.pdf")
        );
    }

    #[tokio::test]
    async fn file_name_falls_back_to_locator_segment() {
        let tmp = tempfile::tempdir().unwrap();
        let group = test_group(tmp.path());

        let descriptor = MediaDescriptor::resolve(
            &group,
            "https://portal.example/files/slides.pdf?token=abc",
            MediaCategory::Document,
            None,
            None,
            None,
            &test_config(),
        )
        .await
        .unwrap();

        assert_eq!(descriptor.file_name(), "slides.pdf");
    }

    #[tokio::test]
    async fn from_record_maps_all_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let group = test_group(tmp.path());
        let record = RemoteItemRecord {
            source_locator: "https://portal.example/video.mp4".to_string(),
            group_id: group.id.0,
            category_hint: "video".to_string(),
            display_name: Some("lecture.mp4".to_string()),
            organizational_label: Some("Week 2 - Data Structures".to_string()),
            relative_location_hint: None,
        };

        let descriptor = MediaDescriptor::from_record(&record, &group, &test_config())
            .await
            .unwrap();

        assert_eq!(descriptor.category, MediaCategory::Video);
        assert_eq!(
            descriptor.parent_path(),
            group.root.join("Week 2 - Data Structures")
        );
    }
}
