//! Read access to the split content files.
//!
//! The content store is the read side of [`crate::split`]: it loads
//! `pages.json` and `posts/<category>.json` and projects them into the
//! collections the site and the calendar need (plants, category pages,
//! categories with counts, static paths).
//!
//! Reads happen on every call; the files are small and the pipeline is a
//! one-shot build. [`ContentStore::index`] takes a snapshot for callers that
//! look things up repeatedly, such as the calendar resolver.

use crate::calendar::{ArticleIndex, ArticleRef};
use crate::text::{capitalize_first, plain_description};
use crate::types::ContentItem;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Category slug used for plants without any category.
pub const FALLBACK_CATEGORY: &str = "plantas";

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A category as shown on the site: one per `posts/<slug>.json` file.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub slug: String,
    pub name: String,
    pub posts_count: usize,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStat {
    pub slug: String,
    pub name: String,
    pub count: usize,
}

/// Static route for one plant article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlantPath {
    pub category: String,
    pub plant: String,
}

/// File-backed content collections rooted at the content directory.
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

fn read_items(path: &Path) -> Result<Vec<ContentItem>, ContentError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ContentError::Json {
        path: path.to_path_buf(),
        source,
    })
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn posts_dir(&self) -> PathBuf {
        self.root.join("posts")
    }

    /// Every page in `pages.json`.
    pub fn pages(&self) -> Result<Vec<ContentItem>, ContentError> {
        read_items(&self.root.join("pages.json"))
    }

    /// Pages double as category landing pages, matched by slug.
    pub fn category_pages(&self) -> Result<Vec<ContentItem>, ContentError> {
        self.pages()
    }

    /// `(category slug, file path)` for every `posts/*.json`, sorted by slug.
    fn category_files(&self) -> Result<Vec<(String, PathBuf)>, ContentError> {
        let dir = self.posts_dir();
        let mut files = Vec::new();
        if !dir.is_dir() {
            log::warn!("no posts directory at {}", dir.display());
            return Ok(files);
        }
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| ContentError::Io {
                path: dir.clone(),
                source: e.into(),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("json")
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                files.push((stem.to_string(), path.to_path_buf()));
            }
        }
        files.sort();
        Ok(files)
    }

    /// Category slugs that have a posts file.
    pub fn available_categories(&self) -> Result<Vec<String>, ContentError> {
        Ok(self
            .category_files()?
            .into_iter()
            .map(|(slug, _)| slug)
            .collect())
    }

    /// Every post across all category files.
    pub fn plants(&self) -> Result<Vec<ContentItem>, ContentError> {
        let mut all = Vec::new();
        for (_, path) in self.category_files()? {
            all.extend(read_items(&path)?);
        }
        Ok(all)
    }

    /// Posts of one category. A missing or unreadable file yields an empty
    /// list with a warning.
    pub fn plants_by_category(&self, category: &str) -> Vec<ContentItem> {
        if category.trim().is_empty() {
            log::warn!("invalid category slug: {category:?}");
            return Vec::new();
        }
        let path = self.posts_dir().join(format!("{category}.json"));
        if !path.exists() {
            log::warn!("no posts file for category: {category}");
            return Vec::new();
        }
        match read_items(&path) {
            Ok(items) => items,
            Err(e) => {
                log::error!("error reading category {category}: {e}");
                Vec::new()
            }
        }
    }

    /// Find a plant by slug, searching only `category` when given.
    pub fn plant_by_slug(
        &self,
        slug: &str,
        category: Option<&str>,
    ) -> Result<Option<ContentItem>, ContentError> {
        let candidates = match category {
            Some(cat) => self.plants_by_category(cat),
            None => self.plants()?,
        };
        Ok(candidates.into_iter().find(|p| p.slug == slug))
    }

    /// One entry per posts file, enriched with its category page if present.
    pub fn categories(&self) -> Result<Vec<Category>, ContentError> {
        let pages = self.category_pages()?;
        let mut categories = Vec::new();

        for (slug, path) in self.category_files()? {
            let posts = read_items(&path)?;
            let name = posts
                .first()
                .and_then(|p| p.primary_category())
                .map(|c| c.name.clone())
                .unwrap_or_else(|| capitalize_first(&slug));
            let mut category = Category {
                description: format!(
                    "Descubre todo sobre {}. Guías completas de cultivo, cuidados y consejos.",
                    name.to_lowercase()
                ),
                slug,
                name,
                posts_count: posts.len(),
                content: None,
                main_image: None,
            };
            if let Some(page) = pages.iter().find(|p| p.slug == category.slug) {
                category.content = Some(page.content_html.clone());
                category.main_image = page.main_image.clone();
                if !page.excerpt.is_empty() {
                    category.description = plain_description(&page.excerpt);
                }
            }
            categories.push(category);
        }
        Ok(categories)
    }

    /// Category post counts, largest first.
    pub fn category_stats(&self) -> Result<Vec<CategoryStat>, ContentError> {
        let mut stats: Vec<CategoryStat> = self
            .categories()?
            .into_iter()
            .map(|c| CategoryStat {
                slug: c.slug,
                name: c.name,
                count: c.posts_count,
            })
            .collect();
        stats.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(stats)
    }

    /// Static routes for every plant article.
    pub fn plant_paths(&self) -> Result<Vec<PlantPath>, ContentError> {
        Ok(self
            .plants()?
            .into_iter()
            .map(|plant| PlantPath {
                category: plant
                    .primary_category()
                    .map(|c| c.slug.clone())
                    .unwrap_or_else(|| FALLBACK_CATEGORY.to_string()),
                plant: plant.slug,
            })
            .collect())
    }

    /// Static routes for every category page.
    pub fn category_paths(&self) -> Result<Vec<String>, ContentError> {
        Ok(self.categories()?.into_iter().map(|c| c.slug).collect())
    }

    /// Snapshot of plants and category pages for repeated lookups.
    ///
    /// Read failures are logged and leave the corresponding half empty, so
    /// link resolution degrades to "no link" instead of failing.
    pub fn index(&self) -> ContentIndex {
        let plants = self.plants().unwrap_or_else(|e| {
            log::error!("could not load plants for link resolution: {e}");
            Vec::new()
        });
        let pages = self.category_pages().unwrap_or_else(|e| {
            log::error!("could not load category pages for link resolution: {e}");
            Vec::new()
        });
        ContentIndex::new(plants, &pages)
    }
}

/// In-memory lookup over plants and category pages.
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    plants: Vec<ContentItem>,
    by_slug: BTreeMap<String, usize>,
    category_pages: HashSet<String>,
}

impl ContentIndex {
    pub fn new(plants: Vec<ContentItem>, category_pages: &[ContentItem]) -> Self {
        let mut by_slug = BTreeMap::new();
        for (i, plant) in plants.iter().enumerate() {
            by_slug.entry(plant.slug.clone()).or_insert(i);
        }
        Self {
            plants,
            by_slug,
            category_pages: category_pages.iter().map(|p| p.slug.clone()).collect(),
        }
    }

    pub fn plant(&self, slug: &str) -> Option<&ContentItem> {
        self.by_slug.get(slug).map(|&i| &self.plants[i])
    }

    /// Plant with `slug` filed under `category`.
    pub fn plant_in_category(&self, category: &str, slug: &str) -> Option<&ContentItem> {
        self.plants.iter().find(|p| {
            p.slug == slug && p.primary_category().is_some_and(|c| c.slug == category)
        })
    }

    pub fn plants(&self) -> &[ContentItem] {
        &self.plants
    }

    /// Item a calendar `key` refers to: exact slug first, then
    /// `<first category>-<slug>`.
    pub fn find_item(&self, key: &str) -> Option<&ContentItem> {
        self.plant(key).or_else(|| {
            self.plants.iter().find(|item| {
                item.primary_category()
                    .is_some_and(|c| format!("{}-{}", c.slug, item.slug) == key)
            })
        })
    }
}

impl ArticleIndex for ContentIndex {
    fn find_article(&self, key: &str) -> Option<ArticleRef> {
        self.find_item(key).map(|item| ArticleRef {
            category: item.primary_category().map(|c| c.slug.clone()),
            slug: item.slug.clone(),
        })
    }

    fn has_category_page(&self, category: &str) -> bool {
        self.category_pages.contains(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn plants_reads_every_category_file() {
        let tmp = setup_fixtures();
        let store = ContentStore::new(content_dir(tmp.path()));
        let plants = store.plants().unwrap();
        assert_eq!(find_plant(&plants, "banksiae").title, "rosa banksiae");
        assert_eq!(find_plant(&plants, "tomate-cherry").categories[0].slug, "tomate");
    }

    #[test]
    fn available_categories_sorted() {
        let tmp = setup_fixtures();
        let store = ContentStore::new(content_dir(tmp.path()));
        assert_eq!(
            store.available_categories().unwrap(),
            vec!["albahaca", "rosa", "tomate"]
        );
    }

    #[test]
    fn plants_by_category_missing_file_is_empty() {
        let tmp = setup_fixtures();
        let store = ContentStore::new(content_dir(tmp.path()));
        assert!(store.plants_by_category("cactus").is_empty());
        assert!(store.plants_by_category("").is_empty());
    }

    #[test]
    fn plants_by_category_malformed_file_is_empty() {
        let tmp = setup_fixtures();
        let dir = content_dir(tmp.path());
        std::fs::write(dir.join("posts/roto.json"), "{ not json").unwrap();
        let store = ContentStore::new(dir);
        assert!(store.plants_by_category("roto").is_empty());
        assert!(matches!(store.plants(), Err(ContentError::Json { .. })));
    }

    #[test]
    fn plant_by_slug_with_and_without_category() {
        let tmp = setup_fixtures();
        let store = ContentStore::new(content_dir(tmp.path()));
        assert!(store.plant_by_slug("banksiae", Some("rosa")).unwrap().is_some());
        assert!(store.plant_by_slug("banksiae", Some("tomate")).unwrap().is_none());
        assert!(store.plant_by_slug("banksiae", None).unwrap().is_some());
    }

    #[test]
    fn categories_use_page_excerpt_for_description() {
        let tmp = setup_fixtures();
        let store = ContentStore::new(content_dir(tmp.path()));
        let categories = store.categories().unwrap();

        let rosa = find_category(&categories, "rosa");
        assert_eq!(rosa.name, "Rosa");
        assert_eq!(rosa.posts_count, 2);
        assert_eq!(rosa.description, "Todo sobre rosales y sus variedades.");
        assert!(rosa.content.is_some());

        let albahaca = find_category(&categories, "albahaca");
        assert!(albahaca.description.starts_with("Descubre todo sobre albahaca."));
        assert!(albahaca.content.is_none());
    }

    #[test]
    fn category_stats_largest_first() {
        let tmp = setup_fixtures();
        let store = ContentStore::new(content_dir(tmp.path()));
        let stats = store.category_stats().unwrap();
        assert_eq!(stats[0].slug, "rosa");
        assert_eq!(stats[0].count, 2);
    }

    #[test]
    fn plant_paths_use_first_category() {
        let tmp = setup_fixtures();
        let store = ContentStore::new(content_dir(tmp.path()));
        let paths = store.plant_paths().unwrap();
        assert!(paths.contains(&PlantPath {
            category: "rosa".into(),
            plant: "banksiae".into()
        }));
    }

    #[test]
    fn index_finds_exact_and_category_prefixed_keys() {
        let tmp = setup_fixtures();
        let index = ContentStore::new(content_dir(tmp.path())).index();

        let exact = index.find_article("tomate-cherry").unwrap();
        assert_eq!(exact.slug, "tomate-cherry");
        assert_eq!(exact.category.as_deref(), Some("tomate"));

        let prefixed = index.find_article("rosa-banksiae").unwrap();
        assert_eq!(prefixed.slug, "banksiae");
        assert_eq!(prefixed.category.as_deref(), Some("rosa"));

        assert!(index.find_article("no-existe").is_none());
        assert!(index.has_category_page("rosa"));
        assert!(!index.has_category_page("albahaca"));
    }

    #[test]
    fn index_of_missing_directory_is_empty() {
        let tmp = tempfile::TempDir::new().unwrap();
        let index = ContentStore::new(tmp.path().join("nada")).index();
        assert!(index.plants().is_empty());
        assert!(!index.has_category_page("rosa"));
    }
}
