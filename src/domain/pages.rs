//! Page documents: the four editable collections and their entry shapes.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::blocks::{ContentBlock, DownloadFile};
use crate::domain::error::DomainError;

/// The collections the editor can open a preview for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Home,
    Curatorial,
    Press,
    Custom,
}

impl PageKind {
    pub fn from_collection(slug: &str) -> Result<Self, DomainError> {
        match slug {
            "home" => Ok(Self::Home),
            "curatorial" => Ok(Self::Curatorial),
            "press" => Ok(Self::Press),
            "custom_pages" => Ok(Self::Custom),
            other => Err(DomainError::validation(format!(
                "unknown collection `{other}`"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Curatorial => "curatorial",
            Self::Press => "press",
            Self::Custom => "custom_pages",
        }
    }
}

/// One editor entry: collection, structured front matter, markdown body.
#[derive(Debug, Clone)]
pub struct PageDocument {
    pub kind: PageKind,
    pub data: Value,
    pub body: String,
}

impl PageDocument {
    /// Parse a markdown file with a leading `---` YAML front-matter fence.
    /// A file without a fence is all body with empty data.
    pub fn from_markdown(kind: PageKind, raw: &str) -> Result<Self, DomainError> {
        let (front, body) = split_front_matter(raw);
        let data = match front {
            Some(yaml) => serde_yaml::from_str::<Value>(yaml)
                .map_err(|err| DomainError::validation(format!("front matter: {err}")))?,
            None => Value::Null,
        };
        Ok(Self {
            kind,
            data,
            body: body.to_string(),
        })
    }

    /// Build a document from the entry JSON the editor posts. The markdown
    /// body travels inside the entry under `body`.
    pub fn from_entry(kind: PageKind, entry: Value) -> Self {
        let body = entry
            .get("body")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Self {
            kind,
            data: entry,
            body,
        }
    }

    /// Sections list from the front matter, parsed leniently.
    pub fn sections(&self) -> Vec<ContentBlock> {
        parse_sections(&self.data)
    }
}

fn split_front_matter(raw: &str) -> (Option<&str>, &str) {
    let Some(rest) = raw.strip_prefix("---\n").or_else(|| raw.strip_prefix("---\r\n")) else {
        return (None, raw);
    };
    match rest.find("\n---") {
        Some(end) => {
            let front = &rest[..end];
            let after = &rest[end + 4..];
            let body = after.strip_prefix('\n').unwrap_or(after);
            (Some(front), body)
        }
        None => (None, raw),
    }
}

/// Parse the `sections` list of an entry. Missing or non-list values mean
/// no sections; individual entries degrade per [`ContentBlock::from_value`].
pub fn parse_sections(data: &Value) -> Vec<ContentBlock> {
    data.get("sections")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(ContentBlock::from_value).collect())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CuratorInfo {
    pub name: Option<String>,
    pub title: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeaturedImage {
    pub src: Option<String>,
    pub alt: Option<String>,
    pub caption: Option<String>,
}

/// Front matter of the curatorial essay entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CuratorialEntry {
    pub article_type: Option<String>,
    pub article_title: Option<String>,
    pub author: Option<String>,
    pub read_time: Option<String>,
    pub publish_date: Option<String>,
    pub curator: Option<CuratorInfo>,
    pub featured_image: Option<FeaturedImage>,
    pub pull_quote: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PressHero {
    pub label: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PressOverview {
    pub about_title: Option<String>,
    pub about_text: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KeyFact {
    pub label: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PressImage {
    pub src: Option<String>,
    pub alt: Option<String>,
    pub label: Option<String>,
    pub dimensions: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PressGallery {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub images: Vec<PressImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PressQuote {
    pub text: Option<String>,
    pub attribution: Option<String>,
    pub link: Option<String>,
    pub link_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PressContact {
    pub title: Option<String>,
    pub email: Option<String>,
    pub response_promise: Option<String>,
    pub urgent_label: Option<String>,
    pub phone: Option<String>,
}

/// Front matter of the press page entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PressEntry {
    pub hero: Option<PressHero>,
    pub downloads: Vec<DownloadFile>,
    pub overview: Option<PressOverview>,
    pub key_facts: Vec<KeyFact>,
    pub gallery: Option<PressGallery>,
    pub curatorial_quote: Option<PressQuote>,
    pub contact: Option<PressContact>,
}

/// Front matter of a custom page entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomPageEntry {
    pub title: Option<String>,
    pub layout: Option<String>,
    pub show_header: Option<bool>,
    pub show_footer: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_front_matter_and_body() {
        let raw = "---\ntitle: Visit\nshow_header: false\n---\nBody **text**\n";
        let doc = PageDocument::from_markdown(PageKind::Custom, raw).unwrap();
        assert_eq!(doc.data["title"], "Visit");
        assert_eq!(doc.data["show_header"], false);
        assert_eq!(doc.body, "Body **text**\n");
    }

    #[test]
    fn no_fence_means_empty_data() {
        let doc = PageDocument::from_markdown(PageKind::Home, "just markdown").unwrap();
        assert!(doc.data.is_null());
        assert_eq!(doc.body, "just markdown");
    }

    #[test]
    fn sections_parse_from_front_matter() {
        let raw = "---\nsections:\n  - type: hero\n    headline: ZYBORN\n  - type: marquee\n---\n";
        let doc = PageDocument::from_markdown(PageKind::Home, raw).unwrap();
        let sections = doc.sections();
        assert_eq!(sections.len(), 2);
        assert!(matches!(sections[0], ContentBlock::Known(_)));
        assert!(matches!(sections[1], ContentBlock::Unknown { .. }));
    }

    #[test]
    fn entry_json_carries_body_inline() {
        let entry = serde_json::json!({
            "title": "Visit",
            "body": "See you *there*",
        });
        let doc = PageDocument::from_entry(PageKind::Custom, entry);
        assert_eq!(doc.body, "See you *there*");
        assert_eq!(doc.data["title"], "Visit");
    }

    #[test]
    fn unknown_collection_is_rejected() {
        assert!(PageKind::from_collection("posts").is_err());
        assert_eq!(PageKind::from_collection("press").unwrap(), PageKind::Press);
    }
}
