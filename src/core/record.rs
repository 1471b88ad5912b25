//! Records exchanged with the transport layer and the conversion result.

use serde::{Deserialize, Serialize};

/// An already-fetched page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub space_key: String,
    #[serde(default)]
    pub space_name: String,
    #[serde(default)]
    pub version: u32,
    /// Raw last-modified timestamp as delivered by the server.
    #[serde(default)]
    pub last_modified: String,
    /// Display name of the last editor; empty when unknown.
    #[serde(default)]
    pub editor: String,
    /// Web link, usually relative to the site base URL.
    #[serde(default)]
    pub web_link: String,
    /// Body in storage format.
    #[serde(default)]
    pub body: String,
}

/// A single comment attached to a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub body: String,
}

/// Page plus comments, as read by the CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageBundle {
    pub page: PageRecord,
    #[serde(default)]
    pub comments: Vec<CommentRecord>,
}

impl PageBundle {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub id: String,
    pub title: String,
    pub space_key: String,
    pub space_name: String,
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    /// Absolute web URL.
    pub web_url: String,
}

/// Output of one conversion call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub metadata: PageMetadata,
    pub content: String,
}

impl ConversionResult {
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_from_json_defaults_missing_fields() {
        let json = r#"{
            "page": { "id": "42", "title": "Hello", "body": "<p>x</p>" },
            "comments": [ { "author": "bob", "body": "<p>hi</p>" } ]
        }"#;
        let bundle = PageBundle::from_json(json).expect("bundle should parse");
        assert_eq!(bundle.page.id, "42");
        assert_eq!(bundle.page.version, 0);
        assert!(bundle.page.editor.is_empty());
        assert_eq!(bundle.comments.len(), 1);
        assert!(bundle.comments[0].timestamp.is_empty());
    }

    #[test]
    fn test_bundle_from_json_rejects_garbage() {
        assert!(matches!(
            PageBundle::from_json("{not json"),
            Err(crate::Error::Json(_))
        ));
    }

    #[test]
    fn test_result_json_omits_absent_metadata() {
        let result = ConversionResult {
            metadata: PageMetadata {
                id: "1".to_string(),
                title: "T".to_string(),
                space_key: "K".to_string(),
                space_name: "N".to_string(),
                version: 2,
                last_updated: None,
                updated_by: None,
                web_url: "https://wiki/x".to_string(),
            },
            content: "# T".to_string(),
        };
        let json = result.to_json().expect("serialize");
        assert!(!json.contains("last_updated"));
        assert!(!json.contains("updated_by"));
        assert!(json.contains("\"web_url\": \"https://wiki/x\""));
    }
}
