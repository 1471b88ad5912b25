//! Document assembler - stitches page body, comments and metadata together.

use crate::core::record::PageMetadata;
use crate::localization::{Label, LocalizationStrategy};
use crate::render::tidy;

/// A comment whose body has already been rendered.
#[derive(Debug, Clone, Default)]
pub struct RenderedComment {
    pub author: Option<String>,
    pub created: Option<String>,
    pub body: String,
}

pub struct DocumentAssembler<'a> {
    localization: &'a dyn LocalizationStrategy,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(localization: &'a dyn LocalizationStrategy) -> Self {
        Self { localization }
    }

    /// Lays out title, metadata, page content and comments in that order.
    pub fn assemble(
        &self,
        metadata: &PageMetadata,
        body: &str,
        comments: &[RenderedComment],
    ) -> String {
        let mut out = String::new();

        out.push_str(&format!("# {}\n\n", metadata.title.trim()));

        out.push_str(&format!("## {}\n\n", self.label(Label::PageInformation)));
        self.push_field(&mut out, Label::Id, Some(metadata.id.as_str()));
        self.push_field(
            &mut out,
            Label::Space,
            format_space(&metadata.space_name, &metadata.space_key).as_deref(),
        );
        let version = (metadata.version > 0).then(|| metadata.version.to_string());
        self.push_field(&mut out, Label::Version, version.as_deref());
        self.push_field(&mut out, Label::LastUpdated, metadata.last_updated.as_deref());
        self.push_field(&mut out, Label::UpdatedBy, metadata.updated_by.as_deref());
        self.push_field(&mut out, Label::Link, Some(metadata.web_url.as_str()));
        out.push('\n');

        out.push_str(&format!("## {}\n\n", self.label(Label::PageContent)));
        out.push_str(body);
        out.push_str("\n\n");

        if !comments.is_empty() {
            out.push_str(&format!(
                "## {} ({})\n\n",
                self.label(Label::Comments),
                comments.len()
            ));
            for (index, comment) in comments.iter().enumerate() {
                out.push_str(&format!(
                    "### {} {}\n\n",
                    self.label(Label::Comment),
                    index + 1
                ));
                self.push_field(&mut out, Label::Author, comment.author.as_deref());
                self.push_field(&mut out, Label::Created, comment.created.as_deref());
                out.push('\n');
                out.push_str(&comment.body);
                out.push_str("\n\n");
            }
        }

        tidy(&out)
    }

    fn label(&self, label: Label) -> &'static str {
        self.localization.label(label)
    }

    /// Writes a `- **Label:** value` line; absent or blank values are skipped.
    fn push_field(&self, out: &mut String, label: Label, value: Option<&str>) {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return;
        };
        out.push_str(&format!("- **{}:** {}\n", self.label(label), value));
    }
}

fn format_space(name: &str, key: &str) -> Option<String> {
    match (name.trim(), key.trim()) {
        ("", "") => None,
        (name, "") => Some(name.to_string()),
        ("", key) => Some(key.to_string()),
        (name, key) => Some(format!("{} ({})", name, key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localization::{ChineseLocalization, DefaultLocalization};
    use pretty_assertions::assert_eq;

    fn metadata() -> PageMetadata {
        PageMetadata {
            id: "123".to_string(),
            title: "Release Plan".to_string(),
            space_key: "ENG".to_string(),
            space_name: "Engineering".to_string(),
            version: 4,
            last_updated: Some("2024-01-02 03:04:05 UTC".to_string()),
            updated_by: Some("Alice".to_string()),
            web_url: "https://wiki/x".to_string(),
        }
    }

    #[test]
    fn test_layout_without_comments() {
        let out = DocumentAssembler::new(&DefaultLocalization).assemble(&metadata(), "Body", &[]);
        assert_eq!(
            out,
            "# Release Plan\n\n\
             ## Page Information\n\n\
             - **ID:** 123\n\
             - **Space:** Engineering (ENG)\n\
             - **Version:** 4\n\
             - **Last Updated:** 2024-01-02 03:04:05 UTC\n\
             - **Updated By:** Alice\n\
             - **Link:** https://wiki/x\n\n\
             ## Page Content\n\n\
             Body"
        );
    }

    #[test]
    fn test_comment_fields_are_omitted_when_absent() {
        let comments = vec![RenderedComment {
            author: Some("Bob".to_string()),
            created: None,
            body: "hi".to_string(),
        }];
        let out =
            DocumentAssembler::new(&DefaultLocalization).assemble(&metadata(), "Body", &comments);
        assert!(out.ends_with("## Comments (1)\n\n### Comment 1\n\n- **Author:** Bob\n\nhi"));
        assert!(!out.contains("Created"));
    }

    #[test]
    fn test_missing_metadata_lines_are_omitted() {
        let meta = PageMetadata {
            space_key: String::new(),
            space_name: String::new(),
            version: 0,
            last_updated: None,
            updated_by: None,
            ..metadata()
        };
        let out = DocumentAssembler::new(&DefaultLocalization).assemble(&meta, "", &[]);
        assert!(!out.contains("Space"));
        assert!(!out.contains("Version"));
        assert!(!out.contains("Updated"));
        assert!(out.ends_with("## Page Content"));
    }

    #[test]
    fn test_chinese_labels() {
        let comments = vec![RenderedComment {
            body: "x".to_string(),
            ..Default::default()
        }];
        let out =
            DocumentAssembler::new(&ChineseLocalization).assemble(&metadata(), "B", &comments);
        assert!(out.contains("## 页面信息"));
        assert!(out.contains("- **空间:** Engineering (ENG)"));
        assert!(out.contains("## 评论 (1)"));
        assert!(out.contains("### 评论 1"));
    }

    #[test]
    fn test_space_formatting() {
        assert_eq!(format_space("N", "K").as_deref(), Some("N (K)"));
        assert_eq!(format_space("", "K").as_deref(), Some("K"));
        assert_eq!(format_space("N", " ").as_deref(), Some("N"));
        assert_eq!(format_space("", ""), None);
    }
}
