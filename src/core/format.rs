use crate::core::mime::{LINK_MIME, MimeRegistry};
use crate::core::model::{ContentDisplayItem, ContentRecord};

const ELLIPSIS: &str = "...";

/// Formats a raw pooled-content record into a display item. Total function:
/// unrecognized MIME types fall back to the registry's "other" entry and a
/// missing byte length leaves the size empty.
///
/// `width_px` is the pixel budget for the name column; `glyph_width_px`
/// converts it into a character budget so the same inputs always truncate to
/// the same string.
pub fn format_content_item(
    raw: &ContentRecord,
    registry: &MimeRegistry,
    width_px: u32,
    glyph_width_px: u32,
) -> ContentDisplayItem {
    let descriptor = raw
        .mime_type
        .as_deref()
        .and_then(|mime| registry.descriptor(mime))
        .unwrap_or_else(|| registry.fallback());

    // Strip the trailing extension, except for links which have none worth
    // stripping. Only the segment after the final dot counts.
    let is_link = raw.mime_type.as_deref() == Some(LINK_MIME);
    let name = match raw.filename.rfind('.') {
        Some(idx) if !is_link => &raw.filename[..idx],
        _ => raw.filename.as_str(),
    };

    let size = match raw.size_bytes {
        Some(len) if len > 0 => format!("({})", human_readable_size(len)),
        _ => String::new(),
    };

    ContentDisplayItem {
        name: truncate_to_width(name, width_px, glyph_width_px),
        path: format!("/p/{}", raw.content_id),
        type_label: descriptor.label.clone(),
        type_icon: descriptor.icon.clone(),
        size,
    }
}

/// Single-line truncation against a pixel budget. Word boundaries are
/// preferred but not required; an ellipsis marks any cut.
pub fn truncate_to_width(name: &str, width_px: u32, glyph_width_px: u32) -> String {
    let budget = (width_px / glyph_width_px.max(1)) as usize;
    let total = name.chars().count();
    if total <= budget {
        return name.to_string();
    }

    let keep = budget.saturating_sub(ELLIPSIS.chars().count());
    let prefix: String = name.chars().take(keep).collect();

    // Break at the last word boundary in the kept region unless that would
    // discard more than half of it.
    let cut = match prefix.rfind(' ') {
        Some(idx) if idx > keep / 2 => &prefix[..idx],
        _ => prefix.as_str(),
    };

    format!("{}{}", cut.trim_end(), ELLIPSIS)
}

/// Renders a byte count the way the panel shows file sizes: whole bytes under
/// one KB, one decimal above.
pub fn human_readable_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(filename: &str, mime: Option<&str>, size: Option<u64>) -> ContentRecord {
        ContentRecord {
            filename: filename.to_string(),
            content_id: "c1".to_string(),
            mime_type: mime.map(|m| m.to_string()),
            size_bytes: size,
            created_for: Some("u1".to_string()),
            last_modified: Utc::now(),
        }
    }

    fn format(raw: &ContentRecord) -> ContentDisplayItem {
        format_content_item(raw, &MimeRegistry::with_defaults(), 280, 7)
    }

    // --- MIME Category Tests ---

    #[test]
    fn test_recognized_mime_uses_registered_label_and_icon() {
        let item = format(&record("report.pdf", Some("application/pdf"), None));
        assert_eq!(item.type_label, "PDF document");
        assert_eq!(item.type_icon, "/img/mimetypes/pdf.png");
    }

    #[test]
    fn test_unrecognized_mime_falls_back_to_other() {
        let registry = MimeRegistry::with_defaults();
        let item = format(&record("blob.bin", Some("application/x-unknown"), None));
        assert_eq!(item.type_label, registry.fallback().label);
        assert_eq!(item.type_icon, registry.fallback().icon);
    }

    #[test]
    fn test_missing_mime_falls_back_to_other() {
        let registry = MimeRegistry::with_defaults();
        let item = format(&record("blob", None, None));
        assert_eq!(item.type_label, registry.fallback().label);
    }

    // --- Extension Stripping Tests ---

    #[test]
    fn test_extension_is_stripped() {
        let item = format(&record("report.pdf", Some("application/pdf"), None));
        assert_eq!(item.name, "report");
    }

    #[test]
    fn test_only_last_segment_is_treated_as_extension() {
        let item = format(&record("archive.tar.gz", None, None));
        assert_eq!(item.name, "archive.tar");
    }

    #[test]
    fn test_filename_without_dot_is_unchanged() {
        let item = format(&record("README", Some("text/plain"), None));
        assert_eq!(item.name, "README");
    }

    #[test]
    fn test_link_keeps_full_filename() {
        let item = format(&record("example.com", Some(LINK_MIME), None));
        assert_eq!(item.name, "example.com");
        assert_eq!(item.type_label, "Link");
    }

    // --- Path Tests ---

    #[test]
    fn test_path_is_derived_from_content_id() {
        let item = format(&record("report.pdf", None, None));
        assert_eq!(item.path, "/p/c1");
    }

    // --- Size Tests ---

    #[test]
    fn test_missing_size_is_empty() {
        let item = format(&record("report.pdf", None, None));
        assert_eq!(item.size, "");
    }

    #[test]
    fn test_zero_size_is_empty() {
        let item = format(&record("report.pdf", None, Some(0)));
        assert_eq!(item.size, "");
    }

    #[test]
    fn test_positive_size_is_parenthesised() {
        let item = format(&record("report.pdf", None, Some(12595)));
        assert_eq!(item.size, "(12.3 KB)");
    }

    #[test]
    fn test_human_readable_size_units() {
        assert_eq!(human_readable_size(500), "500 B");
        assert_eq!(human_readable_size(1024), "1.0 KB");
        assert_eq!(human_readable_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(human_readable_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    // --- Truncation Tests ---

    #[test]
    fn test_short_name_is_untouched() {
        assert_eq!(truncate_to_width("notes", 280, 7), "notes");
    }

    #[test]
    fn test_long_name_is_cut_with_ellipsis() {
        let truncated = truncate_to_width("a".repeat(120).as_str(), 70, 7);
        assert!(truncated.ends_with(ELLIPSIS));
        assert_eq!(truncated.chars().count(), 10, "Budget is 70px / 7px = 10 chars");
    }

    #[test]
    fn test_truncation_prefers_word_boundary() {
        // Budget 12 chars, keep 9: "plan of r" breaks back to "plan of".
        let truncated = truncate_to_width("plan of record 2026", 84, 7);
        assert_eq!(truncated, "plan of...");
    }

    #[test]
    fn test_truncation_is_deterministic() {
        let name = "quarterly financial review draft v3";
        let a = truncate_to_width(name, 140, 7);
        let b = truncate_to_width(name, 140, 7);
        assert_eq!(a, b, "Same input and width must produce the same string");
    }

    #[test]
    fn test_truncation_allows_mid_word_break() {
        // No space lands in the kept region, so the cut is mid-word.
        let truncated = truncate_to_width("supercalifragilistic", 70, 7);
        assert_eq!(truncated, "superca...");
    }
}
