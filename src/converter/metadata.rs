//! Page metadata: timestamp formatting and web-URL resolution.

use crate::core::record::{PageMetadata, PageRecord};
use chrono::{DateTime, NaiveDateTime, Utc};

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Formats a server timestamp for display, or `None` when it cannot be parsed.
///
/// Accepts RFC 3339 (`2024-01-02T03:04:05.000Z`, `...+08:00`), offsets without
/// a colon (`+0800`) and offset-less timestamps, which are taken as UTC.
pub fn format_timestamp(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let parsed = DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc())
        })
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.and_utc()));

    match parsed {
        Ok(dt) => Some(dt.format(DISPLAY_FORMAT).to_string()),
        Err(err) => {
            tracing::debug!(raw, error = %err, "unparseable timestamp omitted");
            None
        }
    }
}

/// Joins the configured base URL with a (usually relative) web link.
pub fn resolve_web_url(base_url: &str, link: &str) -> String {
    let link = link.trim();
    if link.starts_with("http://") || link.starts_with("https://") {
        return link.to_string();
    }

    let base = base_url.trim().trim_end_matches('/');
    match (base.is_empty(), link.is_empty()) {
        (true, _) => link.to_string(),
        (false, true) => base.to_string(),
        (false, false) if link.starts_with('/') => format!("{}{}", base, link),
        (false, false) => format!("{}/{}", base, link),
    }
}

pub fn build_metadata(page: &PageRecord, base_url: &str) -> PageMetadata {
    let editor = page.editor.trim();
    PageMetadata {
        id: page.id.clone(),
        title: page.title.clone(),
        space_key: page.space_key.clone(),
        space_name: page.space_name.clone(),
        version: page.version,
        last_updated: format_timestamp(&page.last_modified),
        updated_by: (!editor.is_empty()).then(|| editor.to_string()),
        web_url: resolve_web_url(base_url, &page.web_link),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rfc3339_variants() {
        assert_eq!(
            format_timestamp("2024-01-02T03:04:05.000Z").as_deref(),
            Some("2024-01-02 03:04:05 UTC")
        );
        assert_eq!(
            format_timestamp("2024-01-02T11:04:05.000+08:00").as_deref(),
            Some("2024-01-02 03:04:05 UTC")
        );
        assert_eq!(
            format_timestamp("2024-01-02T11:04:05+0800").as_deref(),
            Some("2024-01-02 03:04:05 UTC")
        );
        assert_eq!(
            format_timestamp("2024-01-02T03:04:05").as_deref(),
            Some("2024-01-02 03:04:05 UTC")
        );
    }

    #[test]
    fn test_unparseable_timestamp_is_none() {
        assert_eq!(format_timestamp(""), None);
        assert_eq!(format_timestamp("   "), None);
        assert_eq!(format_timestamp("yesterday"), None);
    }

    #[test]
    fn test_resolve_web_url() {
        assert_eq!(
            resolve_web_url("https://wiki.example.com/", "/pages/viewpage.action?pageId=1"),
            "https://wiki.example.com/pages/viewpage.action?pageId=1"
        );
        assert_eq!(
            resolve_web_url("https://wiki.example.com", "spaces/DOC"),
            "https://wiki.example.com/spaces/DOC"
        );
        assert_eq!(
            resolve_web_url("https://wiki.example.com", "https://other/x"),
            "https://other/x"
        );
        assert_eq!(resolve_web_url("", "/x"), "/x");
        assert_eq!(resolve_web_url("https://w", ""), "https://w");
    }

    #[test]
    fn test_build_metadata_omits_blank_editor() {
        let page = PageRecord {
            id: "7".to_string(),
            title: "T".to_string(),
            editor: "  ".to_string(),
            last_modified: "bad".to_string(),
            web_link: "/x".to_string(),
            ..Default::default()
        };
        let meta = build_metadata(&page, "https://w");
        assert_eq!(meta.updated_by, None);
        assert_eq!(meta.last_updated, None);
        assert_eq!(meta.web_url, "https://w/x");
    }
}
