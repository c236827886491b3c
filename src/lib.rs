//! # Vivero
//!
//! Content and planting-calendar engine for a gardening site. Scraped posts
//! and pages are formatted and split into per-category JSON files; a
//! three-tier calendar (global → category → plant) is resolved on top of
//! them and answers month, activity, companion and collection queries.
//!
//! # Architecture: Two Data Trees
//!
//! ```text
//! scrape.json ──format──► formatted.json ──split──► public/data/
//!                                                   ├── pages.json
//!                                                   ├── posts.json
//!                                                   ├── posts/<category>.json
//!                                                   ├── collections.json
//!                                                   └── calendar/
//!                                                       ├── global-config.json
//!                                                       └── <category>/{index,<plant>}.json
//! ```
//!
//! The content tree is produced by the pipeline stages; the calendar tree is
//! hand-curated. The two meet when a calendar entry's `key` is looked up in
//! the content index to find the article it links to.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`format`] | Stage 1: link rewriting and HTML cleanup of scraped bodies |
//! | [`split`] | Stage 2: pages, posts and posts-by-category files |
//! | [`content`] | Read side of the split files: plants, categories, static paths |
//! | [`calendar`] | Tier resolution, hemisphere shifts, month/activity queries, companions |
//! | [`collections`] | Curated plant lists filtered over resolved calendars |
//! | [`random`] | Random plant or category pick |
//! | [`storage`] | Key-value store behind favorites and preferences |
//! | [`favorites`] | Capped, versioned favorite list |
//! | [`preferences`] | Hemisphere and debug-country preferences |
//! | [`config`] | `vivero.toml` loading, merging and validation |
//! | [`types`] | Content item model shared by all stages |
//! | [`text`] | HTML-to-text and capitalization helpers |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Degrade, Don't Fail
//!
//! Reads that feed the site never abort a build over one bad file. A missing
//! or malformed calendar tier resolves as empty, a broken global config falls
//! back to built-in defaults, and an unreadable favorites entry reads as an
//! empty list. Each case is logged. Hard errors are kept for the pipeline
//! stages, where a bad input file means there is nothing to write.
//!
//! ## JSON Values for Calendar Data
//!
//! Calendar tiers are free-form: each category adds its own activities and
//! sub-types (`sowing.indoor`, `harvesting.early`). The resolver keeps them as
//! `serde_json::Value` and only types the parts it interprets: month lists,
//! care tasks, growing conditions and the global config.
//!
//! ## Hemisphere as a View
//!
//! Calendars are authored in northern months. The southern view shifts every
//! month list and task month by the configured offset when displayed, and
//! month queries shift the other way, so the data is never duplicated.

pub mod calendar;
pub mod collections;
pub mod config;
pub mod content;
pub mod favorites;
pub mod format;
pub mod output;
pub mod preferences;
pub mod random;
pub mod split;
pub mod storage;
pub mod text;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
