//! Splitting the flat content array into per-category files.
//!
//! Second stage of the pipeline. The formatted array mixes posts and pages;
//! the site reads them from separate files:
//!
//! ```text
//! <content_dir>/
//! ├── pages.json            # every page
//! ├── posts.json            # every post, for reference
//! └── posts/
//!     ├── rosa.json         # posts whose first category is `rosa`
//!     ├── tomate.json
//!     └── sin-categoria.json  # posts with no category
//! ```
//!
//! A post is filed only under its first category.

use crate::types::ContentItem;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Bucket for posts that carry no category.
pub const UNCATEGORIZED: &str = "sin-categoria";

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The partitioned content.
#[derive(Debug, Default)]
pub struct SplitContent {
    pub pages: Vec<ContentItem>,
    pub posts: Vec<ContentItem>,
    pub by_category: BTreeMap<String, Vec<ContentItem>>,
}

impl SplitContent {
    /// `(category, post count)` pairs, largest first, ties by name.
    pub fn category_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = self
            .by_category
            .iter()
            .map(|(slug, posts)| (slug.clone(), posts.len()))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }
}

/// Partition items into pages, posts and posts-by-first-category.
pub fn split(items: Vec<ContentItem>) -> SplitContent {
    let mut out = SplitContent::default();
    for item in items {
        if item.is_post() {
            let bucket = item
                .primary_category()
                .map(|c| c.slug.clone())
                .unwrap_or_else(|| UNCATEGORIZED.to_string());
            out.by_category.entry(bucket).or_default().push(item.clone());
            out.posts.push(item);
        } else {
            out.pages.push(item);
        }
    }
    out
}

/// Write the split files under `output_dir`, creating directories as needed.
pub fn write_split(content: &SplitContent, output_dir: &Path) -> Result<(), SplitError> {
    let posts_dir = output_dir.join("posts");
    std::fs::create_dir_all(&posts_dir)?;

    std::fs::write(
        output_dir.join("pages.json"),
        serde_json::to_string_pretty(&content.pages)?,
    )?;
    std::fs::write(
        output_dir.join("posts.json"),
        serde_json::to_string_pretty(&content.posts)?,
    )?;
    for (slug, posts) in &content.by_category {
        let path = posts_dir.join(format!("{slug}.json"));
        std::fs::write(&path, serde_json::to_string_pretty(posts)?)?;
        log::debug!("wrote {} posts to {}", posts.len(), path.display());
    }
    Ok(())
}

/// Read a flat content array from `input` and split it into `output_dir`.
///
/// `input` may live inside `output_dir` (the scraper writes `pages.json`
/// with everything in it); it is fully read before anything is written.
pub fn split_file(input: &Path, output_dir: &Path) -> Result<SplitContent, SplitError> {
    let raw = std::fs::read_to_string(input)?;
    let items: Vec<ContentItem> = serde_json::from_str(&raw)?;
    let content = split(items);
    write_split(&content, output_dir)?;
    log::info!(
        "split {} posts and {} pages into {} categories",
        content.posts.len(),
        content.pages.len(),
        content.by_category.len()
    );
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentType, Term};
    use tempfile::TempDir;

    fn item(id: u64, kind: ContentType, slug: &str, cats: &[&str]) -> ContentItem {
        ContentItem {
            id,
            kind,
            slug: slug.into(),
            date: "2024-03-01T10:00:00".into(),
            title: slug.into(),
            excerpt: String::new(),
            content_html: String::new(),
            featured_image: None,
            main_image: None,
            categories: cats.iter().map(|c| Term::new(*c, *c)).collect(),
            tags: vec![],
        }
    }

    #[test]
    fn posts_filed_under_first_category_only() {
        let content = split(vec![
            item(1, ContentType::Post, "banksiae", &["rosa", "trepadoras"]),
            item(2, ContentType::Post, "cherry", &["tomate"]),
        ]);
        assert_eq!(content.by_category.len(), 2);
        assert_eq!(content.by_category["rosa"][0].slug, "banksiae");
        assert!(!content.by_category.contains_key("trepadoras"));
    }

    #[test]
    fn uncategorized_posts_get_their_own_bucket() {
        let content = split(vec![item(1, ContentType::Post, "suelta", &[])]);
        assert_eq!(content.by_category[UNCATEGORIZED].len(), 1);
    }

    #[test]
    fn pages_are_separated() {
        let content = split(vec![
            item(1, ContentType::Page, "rosa", &[]),
            item(2, ContentType::Post, "banksiae", &["rosa"]),
        ]);
        assert_eq!(content.pages.len(), 1);
        assert_eq!(content.posts.len(), 1);
        assert!(!content.by_category.contains_key(UNCATEGORIZED));
    }

    #[test]
    fn category_counts_sorted_by_size() {
        let content = split(vec![
            item(1, ContentType::Post, "a", &["albahaca"]),
            item(2, ContentType::Post, "b", &["tomate"]),
            item(3, ContentType::Post, "c", &["tomate"]),
        ]);
        assert_eq!(
            content.category_counts(),
            vec![("tomate".to_string(), 2), ("albahaca".to_string(), 1)]
        );
    }

    #[test]
    fn split_file_overwrites_mixed_pages_json() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("pages.json");
        let mixed = vec![
            item(1, ContentType::Page, "rosa", &[]),
            item(2, ContentType::Post, "banksiae", &["rosa"]),
        ];
        std::fs::write(&input, serde_json::to_string(&mixed).unwrap()).unwrap();

        split_file(&input, tmp.path()).unwrap();

        let pages: Vec<ContentItem> =
            serde_json::from_str(&std::fs::read_to_string(&input).unwrap()).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].kind, ContentType::Page);
        assert!(tmp.path().join("posts/rosa.json").exists());
        assert!(tmp.path().join("posts.json").exists());
    }
}
