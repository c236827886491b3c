//! Shared content types used across all pipeline stages.
//!
//! These mirror the JSON written by the scraper and read back by the format,
//! split and content stages, so field names follow the on-disk format.

use serde::{Deserialize, Serialize};

/// A taxonomy term (category or tag) as stored on a content item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    pub slug: String,
    pub name: String,
}

impl Term {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Post,
    Page,
}

/// One scraped post or page.
///
/// The body is read from either `content_html` (raw scrape) or `seo_html`
/// (formatted output) and always written back as `content_html`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: ContentType,
    pub slug: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default, alias = "seo_html")]
    pub content_html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_image: Option<String>,
    #[serde(default)]
    pub categories: Vec<Term>,
    #[serde(default)]
    pub tags: Vec<Term>,
}

impl ContentItem {
    /// Slug of the first category, which decides where a post is filed.
    pub fn primary_category(&self) -> Option<&Term> {
        self.categories.first()
    }

    pub fn is_post(&self) -> bool {
        self.kind == ContentType::Post
    }
}

/// Site-relative URL of a category page: `/<category>/`.
pub fn category_url(category: &str) -> String {
    format!("/{category}/")
}

/// Site-relative URL of an article: `/<category>/<slug>/`.
pub fn article_url(category: &str, slug: &str) -> String {
    format!("/{category}/{slug}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seo_html_is_read_as_content_html() {
        let json = r#"{"id": 3, "type": "page", "slug": "rosa", "seo_html": "<p>x</p>"}"#;
        let item: ContentItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.content_html, "<p>x</p>");
        assert_eq!(item.kind, ContentType::Page);
        assert!(item.categories.is_empty());
    }

    #[test]
    fn type_field_serializes_lowercase() {
        let item = ContentItem {
            id: 1,
            kind: ContentType::Post,
            slug: "a".into(),
            date: String::new(),
            title: String::new(),
            excerpt: String::new(),
            content_html: String::new(),
            featured_image: None,
            main_image: None,
            categories: vec![],
            tags: vec![],
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "post");
        assert!(json.get("featured_image").is_none());
    }

    #[test]
    fn urls() {
        assert_eq!(category_url("rosa"), "/rosa/");
        assert_eq!(article_url("rosa", "banksiae"), "/rosa/banksiae/");
    }
}
