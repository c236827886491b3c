//! Curated plant collections.
//!
//! `<content_dir>/collections.json` lists collections as a slug, a title and
//! a set of filters over resolved calendars:
//!
//! ```json
//! [{"slug": "faciles", "title": "Plantas fáciles",
//!   "filters": {"difficulty": ["beginner"], "limit": 12}}]
//! ```
//!
//! Every filter present must match. Matching plants become cards joined with
//! their content article; a plant without an article is left out. The plant
//! slug `comun` stands for the category itself and joins with the category
//! page.

use crate::calendar::resolver::PlantCalendar;
use crate::content::ContentIndex;
use crate::text::{capitalize_first, strip_tags};
use crate::types::{ContentItem, article_url, category_url};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const COLLECTIONS_FILENAME: &str = "collections.json";

/// Plant slug that stands for the category's base entry.
pub const BASE_PLANT: &str = "comun";

const MAX_BADGES: usize = 2;

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid collections file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Collection not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub filters: CollectionFilters,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_needs: Option<Vec<String>>,
    /// Minimum upper bound of `temperature_range`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drought_tolerance: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    /// Any one tag is enough.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_suitable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_requirements: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// A plant as shown in a collection grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlantCard {
    pub slug: String,
    pub name: String,
    pub category: String,
    pub image: String,
    pub description: String,
    pub difficulty: String,
    pub water_needs: String,
    pub link: String,
    pub badges: Vec<String>,
}

pub fn load_collections(path: &Path) -> Result<Vec<Collection>, CollectionError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CollectionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CollectionError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn find_collection(collections: Vec<Collection>, slug: &str) -> Result<Collection, CollectionError> {
    collections
        .into_iter()
        .find(|c| c.slug == slug)
        .ok_or_else(|| CollectionError::NotFound(slug.to_string()))
}

fn section<'a>(data: &'a Map<String, Value>, name: &str, field: &str) -> Option<&'a Value> {
    data.get(name).and_then(|s| s.get(field))
}

fn section_str<'a>(data: &'a Map<String, Value>, name: &str, field: &str) -> Option<&'a str> {
    section(data, name, field).and_then(Value::as_str)
}

fn difficulty(data: &Map<String, Value>) -> &str {
    section_str(data, "plant_info", "difficulty").unwrap_or("intermediate")
}

fn water_needs(data: &Map<String, Value>) -> &str {
    section_str(data, "growing_conditions", "water_needs").unwrap_or("moderate")
}

fn max_temperature(data: &Map<String, Value>) -> Option<f64> {
    section(data, "growing_conditions", "temperature_range")
        .and_then(Value::as_array)
        .and_then(|range| range.get(1))
        .and_then(Value::as_f64)
}

fn container_suitable(data: &Map<String, Value>) -> Option<bool> {
    let notes = section(data, "cultivation_notes", "container_suitable").and_then(Value::as_bool);
    if notes == Some(true) {
        return notes;
    }
    section(data, "growing_conditions", "container_suitable")
        .and_then(Value::as_bool)
        .or(notes)
}

fn strings(value: Option<&Value>) -> Vec<&str> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn mentions_containers(data: &Map<String, Value>) -> bool {
    strings(data.get("garden_use"))
        .into_iter()
        .chain(strings(data.get("special_purposes")))
        .any(|usage| usage.to_lowercase().contains("container"))
}

fn listed(allowed: &[String], value: &str) -> bool {
    allowed.iter().any(|a| a == value)
}

/// Whether a resolved plant passes every filter that is set.
pub fn plant_matches(plant: &PlantCalendar, filters: &CollectionFilters) -> bool {
    let data = &plant.calendar.data;

    if let Some(allowed) = &filters.difficulty {
        if !listed(allowed, difficulty(data)) {
            return false;
        }
    }
    if let Some(allowed) = &filters.water_needs {
        if !listed(allowed, water_needs(data)) {
            return false;
        }
    }
    if let Some(min) = filters.temperature_max {
        if !max_temperature(data).is_some_and(|max| max >= min) {
            return false;
        }
    }
    if let Some(allowed) = &filters.drought_tolerance {
        let tolerance = section_str(data, "growing_conditions", "drought_tolerance");
        if !tolerance.is_some_and(|t| listed(allowed, t)) {
            return false;
        }
    }
    if let Some(allowed) = &filters.categories {
        if !listed(allowed, &plant.category) {
            return false;
        }
    }
    if let Some(wanted) = &filters.tags {
        let tags = strings(data.get("tags"));
        if !wanted.iter().any(|t| tags.contains(&t.as_str())) {
            return false;
        }
    }
    if let Some(wanted) = filters.container_suitable {
        if container_suitable(data) != Some(wanted) {
            return false;
        }
    }
    if let Some(allowed) = &filters.space_requirements {
        let space = section_str(data, "growing_conditions", "space_requirements");
        if !space.is_some_and(|s| listed(allowed, s)) && !mentions_containers(data) {
            return false;
        }
    }
    true
}

/// Up to two short Spanish badges describing a plant.
pub fn plant_badges(data: &Map<String, Value>) -> Vec<String> {
    let mut badges = Vec::new();
    if section_str(data, "plant_info", "difficulty") == Some("beginner") {
        badges.push("Fácil");
    }
    match section_str(data, "growing_conditions", "water_needs") {
        Some("low") => badges.push("Poco riego"),
        Some("moderate") => badges.push("Riego moderado"),
        _ => {}
    }
    match section_str(data, "plant_info", "type") {
        Some("annual") => badges.push("Anual"),
        Some("perennial") => badges.push("Perenne"),
        _ => {}
    }
    if matches!(
        section_str(data, "growing_conditions", "drought_tolerance"),
        Some("high" | "very_high")
    ) {
        badges.push("Resistente sequía");
    }
    if max_temperature(data).is_some_and(|max| max >= 35.0) {
        badges.push("Calor extremo");
    }
    if matches!(
        section_str(data, "growing_conditions", "sun_requirements"),
        Some("full_shade" | "partial_shade")
    ) {
        badges.push("Sombra");
    }
    if container_suitable(data) == Some(true) {
        badges.push("Apta macetas");
    }
    badges.truncate(MAX_BADGES);
    badges.into_iter().map(str::to_string).collect()
}

/// Display name of a category slug, restoring accents the slugs drop.
pub fn category_display_name(category: &str) -> String {
    match category {
        "pina" => "Piña".to_string(),
        "tulipan" => "Tulipán".to_string(),
        "oregano" => "Orégano".to_string(),
        "curcuma" => "Cúrcuma".to_string(),
        "platano" => "Plátano".to_string(),
        "azafran" => "Azafrán".to_string(),
        other => capitalize_first(&other.replace('_', " ")),
    }
}

fn plant_display_name(slug: &str) -> String {
    slug.split('-')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Content article for a calendar plant: by slug within its category, then
/// through the plant's `key`.
fn plant_article<'a>(plant: &PlantCalendar, index: &'a ContentIndex) -> Option<&'a ContentItem> {
    if let Some(item) = index.plant_in_category(&plant.category, &plant.slug) {
        return Some(item);
    }
    let key = plant.calendar.data.get("key").and_then(Value::as_str)?;
    index.find_item(key)
}

fn card(plant: &PlantCalendar, item: &ContentItem, link: String, name: String) -> PlantCard {
    let data = &plant.calendar.data;
    let description = if item.excerpt.is_empty() {
        format!("Cultivo de {name} - información completa sobre cuidados y calendario de siembra.")
    } else {
        strip_tags(&item.excerpt)
    };
    PlantCard {
        slug: plant.slug.clone(),
        category: plant.category.clone(),
        image: item
            .main_image
            .clone()
            .or_else(|| item.featured_image.clone())
            .unwrap_or_else(|| {
                format!("/wp-content/uploads/2017/07/{}-{}.webp", plant.category, plant.slug)
            }),
        description,
        difficulty: difficulty(data).to_string(),
        water_needs: water_needs(data).to_string(),
        link,
        badges: plant_badges(data),
        name,
    }
}

/// Cards for every plant matching `filters`, in calendar order.
pub fn plants_by_filters(
    plants: &[PlantCalendar],
    index: &ContentIndex,
    pages: &[ContentItem],
    filters: &CollectionFilters,
) -> Vec<PlantCard> {
    let limit = filters.limit.unwrap_or(usize::MAX);
    plants
        .iter()
        .filter(|p| plant_matches(p, filters))
        .filter_map(|plant| {
            let category_name = category_display_name(&plant.category);
            if plant.slug == BASE_PLANT {
                let page = pages.iter().find(|p| p.slug == plant.category)?;
                let name = if page.title.is_empty() {
                    category_name
                } else {
                    page.title.clone()
                };
                Some(card(plant, page, category_url(&plant.category), name))
            } else {
                let item = plant_article(plant, index)?;
                let name = if item.title.is_empty() {
                    format!("{category_name} {}", plant_display_name(&plant.slug))
                } else {
                    item.title.clone()
                };
                let item_category = item
                    .primary_category()
                    .map(|c| c.slug.as_str())
                    .unwrap_or(&plant.category);
                Some(card(plant, item, article_url(item_category, &item.slug), name))
            }
        })
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarResolver;
    use crate::content::ContentStore;
    use crate::test_helpers::*;
    use serde_json::json;

    fn plant(category: &str, slug: &str, data: Value) -> PlantCalendar {
        let resolver = CalendarResolver::new("/nonexistent", crate::calendar::NoArticles);
        let mut calendar = resolver.resolve(category, slug);
        calendar.data = data.as_object().cloned().unwrap_or_default();
        PlantCalendar {
            category: category.into(),
            slug: slug.into(),
            calendar,
        }
    }

    #[test]
    fn difficulty_defaults_to_intermediate() {
        let p = plant("menta", "piperita", json!({}));
        let filters = CollectionFilters {
            difficulty: Some(vec!["intermediate".into()]),
            ..Default::default()
        };
        assert!(plant_matches(&p, &filters));
    }

    #[test]
    fn temperature_filter_needs_range() {
        let hot = plant(
            "pimiento",
            "habanero",
            json!({"growing_conditions": {"temperature_range": [18, 38]}}),
        );
        let unknown = plant("pimiento", "morron", json!({}));
        let filters = CollectionFilters {
            temperature_max: Some(35.0),
            ..Default::default()
        };
        assert!(plant_matches(&hot, &filters));
        assert!(!plant_matches(&unknown, &filters));
    }

    #[test]
    fn tags_need_one_match() {
        let p = plant("lavanda", "angustifolia", json!({"tags": ["aromatica", "melifera"]}));
        let any = CollectionFilters {
            tags: Some(vec!["melifera".into(), "trepadora".into()]),
            ..Default::default()
        };
        let none = CollectionFilters {
            tags: Some(vec!["trepadora".into()]),
            ..Default::default()
        };
        assert!(plant_matches(&p, &any));
        assert!(!plant_matches(&p, &none));
    }

    #[test]
    fn container_flag_from_either_section() {
        let notes = plant("fresa", "alpina", json!({"cultivation_notes": {"container_suitable": true}}));
        let conditions = plant(
            "fresa",
            "gigante",
            json!({"growing_conditions": {"container_suitable": false}}),
        );
        let wants = CollectionFilters {
            container_suitable: Some(true),
            ..Default::default()
        };
        assert!(plant_matches(&notes, &wants));
        assert!(!plant_matches(&conditions, &wants));
    }

    #[test]
    fn space_requirement_falls_back_to_container_mentions() {
        let p = plant("tomate", "balcon", json!({"garden_use": ["Containers and balconies"]}));
        let filters = CollectionFilters {
            space_requirements: Some(vec!["small".into()]),
            ..Default::default()
        };
        assert!(plant_matches(&p, &filters));
        let q = plant("calabaza", "gigante", json!({"growing_conditions": {"space_requirements": "large"}}));
        assert!(!plant_matches(&q, &filters));
    }

    #[test]
    fn badges_capped_at_two() {
        let data = json!({
            "plant_info": {"difficulty": "beginner", "type": "annual"},
            "growing_conditions": {"water_needs": "low", "drought_tolerance": "high"}
        });
        assert_eq!(
            plant_badges(data.as_object().unwrap()),
            vec!["Fácil", "Poco riego"]
        );
        let shade = json!({"growing_conditions": {"sun_requirements": "partial_shade", "temperature_range": [5, 36]}});
        assert_eq!(
            plant_badges(shade.as_object().unwrap()),
            vec!["Calor extremo", "Sombra"]
        );
    }

    #[test]
    fn display_names() {
        assert_eq!(category_display_name("pina"), "Piña");
        assert_eq!(category_display_name("arboles_frutales"), "Arboles frutales");
        assert_eq!(plant_display_name("rosa-de-pitiminí"), "Rosa De Pitiminí");
    }

    fn post(category: &str, slug: &str, title: &str) -> ContentItem {
        serde_json::from_value(json!({
            "id": 1,
            "type": "post",
            "slug": slug,
            "title": title,
            "categories": [{"slug": category, "name": category}]
        }))
        .unwrap()
    }

    #[test]
    fn keyed_article_keeps_its_own_category() {
        let index = ContentIndex::new(
            vec![
                post("rosa", "banksiae", "Rosa banksiae"),
                post("trepadoras", "banksiae", "Banksiae trepadora"),
            ],
            &[],
        );
        let p = plant("jardin", "muro", json!({"key": "trepadoras-banksiae"}));
        let cards = plants_by_filters(&[p], &index, &[], &CollectionFilters::default());
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].link, "/trepadoras/banksiae/");
        assert_eq!(cards[0].name, "Banksiae trepadora");
    }

    #[test]
    fn fixture_collections() {
        let tmp = setup_fixtures();
        let store = ContentStore::new(content_dir(tmp.path()));
        let index = store.index();
        let pages = store.category_pages().unwrap();
        let resolver = CalendarResolver::new(calendar_dir(tmp.path()), index.clone());
        let plants = resolver.all_plants();
        let collections =
            load_collections(&content_dir(tmp.path()).join(COLLECTIONS_FILENAME)).unwrap();

        let faciles = find_collection(collections.clone(), "faciles").unwrap();
        let cards = plants_by_filters(&plants, &index, &pages, &faciles.filters);
        let slugs: Vec<&str> = cards.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, vec!["genovesa", "cherry"]);
        assert_eq!(cards[0].link, "/albahaca/albahaca-genovesa/");
        assert_eq!(cards[0].badges, vec!["Fácil", "Riego moderado"]);

        let mut all = faciles.filters.clone();
        all.limit = None;
        let cards = plants_by_filters(&plants, &index, &pages, &all);
        let comun = cards.iter().find(|c| c.slug == BASE_PLANT).unwrap();
        assert_eq!(comun.link, "/tomate/");
        assert_eq!(comun.name, "Tomate");

        let macetas = find_collection(collections.clone(), "macetas").unwrap();
        let cards = plants_by_filters(&plants, &index, &pages, &macetas.filters);
        assert_eq!(cards.len(), 1);
        assert!(cards[0].badges.contains(&"Fácil".to_string()));

        assert!(matches!(
            find_collection(collections, "nada"),
            Err(CollectionError::NotFound(_))
        ));
    }
}
