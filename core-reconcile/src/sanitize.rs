//! Filesystem-safe name sanitization.
//!
//! Remote-supplied text (course names, week labels, file names) becomes a
//! path segment through [`sanitize`]. The function is total and pure: any
//! input, including empty or hostile ones, maps deterministically to a
//! non-empty segment safe on common filesystems.

/// Characters rejected by at least one target filesystem.
const INVALID_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Windows device names that cannot be used as a file or directory stem.
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

const MAX_SEGMENT_CHARS: usize = 128;

/// Fallback for inputs that sanitize down to nothing.
const PLACEHOLDER: &str = "unnamed";

/// Turn arbitrary remote-supplied text into a single filesystem-safe segment.
///
/// Illegal characters and control characters become spaces, whitespace runs
/// collapse, trailing dots and spaces are trimmed, reserved device names are
/// escaped, and over-long segments are truncated on a char boundary.
/// Directory segments additionally shed leading dots so a label can never
/// produce a hidden or relative traversal segment. Empty or whitespace-only
/// input yields a placeholder, never an empty string.
pub fn sanitize(raw: &str, is_directory: bool) -> String {
    let collapsed: String = raw
        .chars()
        .map(|c| {
            if INVALID_CHARS.contains(&c) || c.is_control() {
                ' '
            } else {
                c
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let mut cleaned = collapsed.trim_end_matches(['.', ' ']).to_string();
    if is_directory {
        cleaned = cleaned.trim_start_matches(['.', ' ']).to_string();
    }

    if cleaned.chars().count() > MAX_SEGMENT_CHARS {
        cleaned = cleaned.chars().take(MAX_SEGMENT_CHARS).collect();
        cleaned = cleaned.trim_end_matches(['.', ' ']).to_string();
    }

    if cleaned.is_empty() {
        return PLACEHOLDER.to_string();
    }

    let stem = cleaned.split('.').next().unwrap_or("");
    if RESERVED_NAMES
        .iter()
        .any(|r| r.eq_ignore_ascii_case(stem))
    {
        return format!("_{cleaned}");
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_and_illegal_chars_are_replaced() {
        let out = sanitize("Week 1: Introduction / Overview", true);
        assert!(!out.contains('/'));
        assert!(!out.contains(':'));
        assert_eq!(out, "Week 1 Introduction Overview");
    }

    #[test]
    fn sanitization_is_deterministic() {
        let label = "Week 1: Introduction / Overview";
        assert_eq!(sanitize(label, true), sanitize(label, true));
    }

    #[test]
    fn empty_input_maps_to_placeholder() {
        assert_eq!(sanitize("", true), PLACEHOLDER);
        assert_eq!(sanitize("   ", true), PLACEHOLDER);
        assert_eq!(sanitize("\t\n", false), PLACEHOLDER);
    }

    #[test]
    fn illegal_only_input_maps_to_placeholder() {
        assert_eq!(sanitize("///\\\\***", true), PLACEHOLDER);
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(sanitize("Week   5  -   Final Project", true), "Week 5 - Final Project");
    }

    #[test]
    fn trailing_dots_and_spaces_are_trimmed() {
        assert_eq!(sanitize("notes. ", false), "notes");
        assert_eq!(sanitize("archive...", true), "archive");
    }

    #[test]
    fn directories_shed_leading_dots() {
        assert_eq!(sanitize("..hidden", true), "hidden");
        // Files may keep a leading dot.
        assert_eq!(sanitize(".profile", false), ".profile");
    }

    #[test]
    fn reserved_device_names_are_escaped() {
        assert_eq!(sanitize("CON", false), "_CON");
        assert_eq!(sanitize("con.pdf", false), "_con.pdf");
        assert_eq!(sanitize("lpt1", true), "_lpt1");
        // Only full stems count.
        assert_eq!(sanitize("console.pdf", false), "console.pdf");
    }

    #[test]
    fn control_characters_are_stripped() {
        assert_eq!(sanitize("a\0b\rc", false), "a b c");
    }

    #[test]
    fn long_segments_are_truncated_on_char_boundary() {
        let long = "ä".repeat(500);
        let out = sanitize(&long, true);
        assert_eq!(out.chars().count(), MAX_SEGMENT_CHARS);
    }

    #[test]
    fn unicode_passes_through() {
        assert_eq!(sanitize("Einführung in C++", true), "Einführung in C++");
    }
}
