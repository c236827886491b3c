//! Shared test utilities.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let store = ContentStore::new(content_dir(tmp.path()));
//! let plants = store.plants().unwrap();
//! let banksiae = find_plant(&plants, "banksiae");
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::calendar::resolver::PlantCalendar;
use crate::content::Category;
use crate::types::ContentItem;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Split content directory inside a fixture copy.
pub fn content_dir(root: &Path) -> PathBuf {
    root.join("public/data")
}

/// Calendar tiers inside a fixture copy.
pub fn calendar_dir(root: &Path) -> PathBuf {
    root.join("public/data/calendar")
}

// =========================================================================
// Lookups; each panics with a clear message on miss
// =========================================================================

/// Find a content item by slug. Panics if not found.
pub fn find_plant<'a>(items: &'a [ContentItem], slug: &str) -> &'a ContentItem {
    items.iter().find(|p| p.slug == slug).unwrap_or_else(|| {
        let slugs: Vec<&str> = items.iter().map(|p| p.slug.as_str()).collect();
        panic!("plant '{slug}' not found. Available: {slugs:?}")
    })
}

/// Find a category by slug. Panics if not found.
pub fn find_category<'a>(categories: &'a [Category], slug: &str) -> &'a Category {
    categories
        .iter()
        .find(|c| c.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = categories.iter().map(|c| c.slug.as_str()).collect();
            panic!("category '{slug}' not found. Available: {slugs:?}")
        })
}

/// Find a resolved plant by `category/slug`. Panics if not found.
pub fn find_calendar<'a>(plants: &'a [PlantCalendar], category: &str, slug: &str) -> &'a PlantCalendar {
    plants
        .iter()
        .find(|p| p.category == category && p.slug == slug)
        .unwrap_or_else(|| {
            let ids: Vec<String> = plants
                .iter()
                .map(|p| format!("{}/{}", p.category, p.slug))
                .collect();
            panic!("calendar '{category}/{slug}' not found. Available: {ids:?}")
        })
}

/// `category/slug` ids of resolved plants, in order.
pub fn calendar_ids(plants: &[PlantCalendar]) -> Vec<String> {
    plants
        .iter()
        .map(|p| format!("{}/{}", p.category, p.slug))
        .collect()
}
