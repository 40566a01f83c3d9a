//! Path resolution policy.
//!
//! Decides the canonical parent directory for a media item and guarantees the
//! directory exists. The decision itself is a pure, ordered rule list
//! ([`placement_dir`]); the filesystem side effect is isolated in
//! [`ensure_dir`] so each rule can be tested without touching disk.

use crate::error::{ReconcileError, Result};
use crate::sanitize::sanitize;
use crate::MediaCategory;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Compute the parent directory for an item. First matching rule wins:
///
/// 1. Subdirectories disabled: the group root, flat. Labels and category
///    grouping are ignored entirely.
/// 2. Non-empty organizational label: `root / sanitize(label)`.
/// 3. Usable relative-location hint: the hint's segments, each sanitized,
///    under the root. A hint is usable only when it is relative and free of
///    parent-directory components.
/// 4. Fallback: `root / sanitize(category directory name)`.
///
/// An explicit label always beats a hint; a hint beats the bare category
/// default.
pub fn placement_dir(
    root: &Path,
    category: MediaCategory,
    organizational_label: Option<&str>,
    relative_location_hint: Option<&str>,
    make_subdirs: bool,
) -> PathBuf {
    if !make_subdirs {
        return root.to_path_buf();
    }

    if let Some(label) = organizational_label.map(str::trim).filter(|l| !l.is_empty()) {
        return root.join(sanitize(label, true));
    }

    if let Some(segments) = relative_location_hint.and_then(hint_segments) {
        let mut dir = root.to_path_buf();
        for segment in segments {
            dir.push(segment);
        }
        return dir;
    }

    root.join(sanitize(category.dir_name(), true))
}

/// Sanitized segments of a relative-location hint, or `None` when the hint
/// is empty, absolute, or attempts traversal.
fn hint_segments(hint: &str) -> Option<Vec<String>> {
    let hint = hint.trim();
    if hint.is_empty() {
        return None;
    }

    let path = Path::new(hint);
    if path.is_absolute() {
        return None;
    }

    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => {
                segments.push(sanitize(&part.to_string_lossy(), true));
            }
            Component::CurDir => {}
            // Traversal or root-ish components disqualify the whole hint.
            _ => return None,
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}

/// Create `path` if it is absent.
///
/// Safe under concurrent resolution of descriptors sharing a parent: an
/// already existing directory is success, never an error. Failure is scoped
/// to the item being placed.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| ReconcileError::Placement {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), "Parent directory ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> PathBuf {
        PathBuf::from("/data/Test Course")
    }

    #[test]
    fn flat_layout_ignores_everything() {
        let dir = placement_dir(
            &root(),
            MediaCategory::Video,
            Some("Week 1 - Introduction"),
            Some("custom/path"),
            false,
        );
        assert_eq!(dir, root());
    }

    #[test]
    fn label_beats_category() {
        let dir = placement_dir(&root(), MediaCategory::Video, Some("Week 1"), None, true);
        assert_eq!(dir, root().join("Week 1"));
    }

    #[test]
    fn label_beats_hint() {
        let dir = placement_dir(
            &root(),
            MediaCategory::Document,
            Some("Week 4 - Testing"),
            Some("custom/path"),
            true,
        );
        assert_eq!(dir, root().join("Week 4 - Testing"));
    }

    #[test]
    fn blank_label_falls_through_to_category() {
        for label in [None, Some(""), Some("   ")] {
            let dir = placement_dir(&root(), MediaCategory::Document, label, None, true);
            assert_eq!(dir, root().join("Documents"));
        }
    }

    #[test]
    fn hint_beats_category_when_label_absent() {
        let dir = placement_dir(
            &root(),
            MediaCategory::Document,
            None,
            Some("custom/path"),
            true,
        );
        assert_eq!(dir, root().join("custom").join("path"));
    }

    #[test]
    fn label_is_sanitized() {
        let dir = placement_dir(
            &root(),
            MediaCategory::Document,
            Some("Week 1: Introduction / Overview"),
            None,
            true,
        );
        assert_eq!(dir, root().join("Week 1 Introduction Overview"));
    }

    #[test]
    fn traversal_hints_are_rejected() {
        for hint in ["../outside", "a/../../b", "/absolute/path"] {
            let dir = placement_dir(&root(), MediaCategory::Document, None, Some(hint), true);
            assert_eq!(dir, root().join("Documents"), "hint {hint:?} must not be honored");
        }
    }

    #[test]
    fn hint_segments_are_sanitized_individually() {
        let dir = placement_dir(
            &root(),
            MediaCategory::Document,
            None,
            Some("extra: material/set *1*"),
            true,
        );
        assert_eq!(dir, root().join("extra material").join("set 1"));
    }

    #[tokio::test]
    async fn ensure_dir_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("Week 1");

        ensure_dir(&target).await.unwrap();
        ensure_dir(&target).await.unwrap();
        assert!(target.is_dir());
    }

    #[tokio::test]
    async fn ensure_dir_is_safe_under_concurrency() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("Week 5 - Final Project");

        let results = futures::future::join_all((0..8).map(|_| ensure_dir(&target))).await;
        for result in results {
            result.unwrap();
        }
        assert!(target.is_dir());
    }
}
