//! Localization strategy for labels and placeholders in the output.

/// Fixed labels used by the document assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    PageInformation,
    Id,
    Space,
    Version,
    LastUpdated,
    UpdatedBy,
    Link,
    PageContent,
    Comments,
    Comment,
    Author,
    Created,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmonitionKind {
    Info,
    Warning,
}

/// Strategy for language-specific wording of generated Markdown.
pub trait LocalizationStrategy: Send + Sync {
    /// Text of a fixed label.
    fn label(&self, label: Label) -> &'static str;

    /// Glyph and label that open an admonition blockquote.
    fn admonition(&self, kind: AdmonitionKind) -> &'static str;

    /// Placeholder emitted in place of a table.
    fn table_placeholder(&self) -> String;

    /// Placeholder naming a structured macro that could not be converted.
    fn unsupported_macro(&self, name: &str) -> String;

    /// Placeholder for markup that could not be parsed.
    fn unconverted(&self, raw: &str) -> String;
}

/// English wording.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultLocalization;

impl LocalizationStrategy for DefaultLocalization {
    fn label(&self, label: Label) -> &'static str {
        match label {
            Label::PageInformation => "Page Information",
            Label::Id => "ID",
            Label::Space => "Space",
            Label::Version => "Version",
            Label::LastUpdated => "Last Updated",
            Label::UpdatedBy => "Updated By",
            Label::Link => "Link",
            Label::PageContent => "Page Content",
            Label::Comments => "Comments",
            Label::Comment => "Comment",
            Label::Author => "Author",
            Label::Created => "Created",
        }
    }

    fn admonition(&self, kind: AdmonitionKind) -> &'static str {
        match kind {
            AdmonitionKind::Info => "ℹ️ **Info:**",
            AdmonitionKind::Warning => "⚠️ **Warning:**",
        }
    }

    fn table_placeholder(&self) -> String {
        "*[Table omitted: manual formatting required]*".to_string()
    }

    fn unsupported_macro(&self, name: &str) -> String {
        format!("*[Unsupported macro: {}]*", name)
    }

    fn unconverted(&self, raw: &str) -> String {
        format!("*[Unconverted content: {}]*", crate::render::code_span(raw))
    }
}

/// Simplified Chinese wording, matching the labels of the original tool output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChineseLocalization;

impl LocalizationStrategy for ChineseLocalization {
    fn label(&self, label: Label) -> &'static str {
        match label {
            Label::PageInformation => "页面信息",
            Label::Id => "ID",
            Label::Space => "空间",
            Label::Version => "版本",
            Label::LastUpdated => "最后修改",
            Label::UpdatedBy => "修改者",
            Label::Link => "链接",
            Label::PageContent => "页面内容",
            Label::Comments => "评论",
            Label::Comment => "评论",
            Label::Author => "创建者",
            Label::Created => "创建时间",
        }
    }

    fn admonition(&self, kind: AdmonitionKind) -> &'static str {
        match kind {
            AdmonitionKind::Info => "ℹ️ **信息:**",
            AdmonitionKind::Warning => "⚠️ **警告:**",
        }
    }

    fn table_placeholder(&self) -> String {
        "*[表格内容：需要手动格式化]*".to_string()
    }

    fn unsupported_macro(&self, name: &str) -> String {
        format!("*[不支持的宏: {}]*", name)
    }

    fn unconverted(&self, raw: &str) -> String {
        format!("*[未转换的内容: {}]*", crate::render::code_span(raw))
    }
}

/// Selects a built-in localization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    English,
    Chinese,
}

impl Language {
    pub fn strategy(self) -> &'static dyn LocalizationStrategy {
        match self {
            Language::English => &DefaultLocalization,
            Language::Chinese => &ChineseLocalization,
        }
    }

    /// Parses a language tag such as `en` or `zh-CN`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let lower = tag.to_ascii_lowercase();
        match lower.split(['-', '_']).next().unwrap_or_default() {
            "en" => Some(Language::English),
            "zh" => Some(Language::Chinese),
            _ => None,
        }
    }
}
