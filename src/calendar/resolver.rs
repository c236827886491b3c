//! Three-tier calendar resolution.
//!
//! ```text
//! <calendar_dir>/
//! ├── global-config.json     # reference tier, attached to every result
//! ├── rosa/
//! │   ├── index.json         # category tier
//! │   └── banksiae.json      # plant tier, overrides the category
//! └── tomate/
//!     ├── index.json
//!     └── cherry.json
//! ```
//!
//! Resolution merges category ← plant (see [`deep_merge`](super::deep_merge)), records which
//! tiers were present, and links the result to a content article through the
//! plant's `key`. Missing or malformed files are logged and treated as empty;
//! resolution itself never fails.
//!
//! Whole-site queries (`find_plants_by_month`, `monthly_tasks`, ...) resolve
//! every plant, fanning out per category on the rayon pool.

use super::companions::CompanionGuide;
use super::global::{GLOBAL_CONFIG_FILENAME, GlobalCalendarConfig};
use super::hemisphere::{Hemisphere, adjust_month, apply_hemisphere};
use super::labels::{ACTIVITIES, activity_to_slug};
use super::merge::merge_tiers;
use super::ui::{DEFAULT_LANGUAGE, UiHelpers};
use crate::types::{article_url, category_url};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use walkdir::WalkDir;

/// File holding a category's base calendar.
pub const CATEGORY_INDEX: &str = "index.json";

/// First path segment of calendar pages.
pub const CALENDAR_ROUTE: &str = "calendario";

/// Keys the resolver adds to a resolved calendar.
const RESERVED_KEYS: &[&str] = &["_inheritance", "_global_config", "_article_links"];

const MONTH_LIST_KEYS: &[&str] = &["best_months", "alternative_months", "peak_months"];

/// A content article a calendar entry can link to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRef {
    /// First category of the article, if it has one.
    pub category: Option<String>,
    pub slug: String,
}

/// Lookup of content articles for link resolution.
pub trait ArticleIndex: Sync {
    /// Find the article a plant config's `key` refers to.
    fn find_article(&self, key: &str) -> Option<ArticleRef>;

    /// Whether a category landing page exists for `category`.
    fn has_category_page(&self, category: &str) -> bool;
}

/// Index with no articles; every calendar resolves without links.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoArticles;

impl ArticleIndex for NoArticles {
    fn find_article(&self, _key: &str) -> Option<ArticleRef> {
        None
    }

    fn has_category_page(&self, _category: &str) -> bool {
        false
    }
}

/// Which tiers contributed to a resolved calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inheritance {
    pub has_global: bool,
    pub has_category: bool,
    pub has_plant_specific: bool,
    pub category: String,
    pub plant_slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArticleLinks {
    pub plant_article: Option<String>,
    pub category_article: Option<String>,
    pub resolved_link: Option<String>,
}

/// Category config overridden by plant config, plus provenance.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedPlantCalendar {
    #[serde(flatten)]
    pub data: Map<String, Value>,
    #[serde(rename = "_inheritance")]
    pub inheritance: Inheritance,
    #[serde(rename = "_global_config")]
    pub global_config: Arc<GlobalCalendarConfig>,
    #[serde(rename = "_article_links")]
    pub article_links: ArticleLinks,
}

impl ResolvedPlantCalendar {
    fn fallback(
        category: &str,
        plant: &str,
        error: String,
        global_config: Arc<GlobalCalendarConfig>,
    ) -> Self {
        Self {
            data: Map::new(),
            inheritance: Inheritance {
                has_global: false,
                has_category: false,
                has_plant_specific: false,
                category: category.to_string(),
                plant_slug: plant.to_string(),
                error: Some(error),
            },
            global_config,
            article_links: ArticleLinks::default(),
        }
    }

    pub fn calendar_data(&self) -> Option<&Map<String, Value>> {
        self.data.get("calendar_data").and_then(Value::as_object)
    }

    /// Tasks listed for `month` (northern numbering) in the care calendar.
    pub fn tasks_for_month(&self, month: i64) -> Vec<String> {
        self.calendar_data()
            .and_then(|d| d.get("care_calendar"))
            .and_then(|c| c.get("monthly_tasks"))
            .and_then(|t| t.get(month.to_string()))
            .and_then(Value::as_array)
            .map(|tasks| {
                tasks
                    .iter()
                    .filter_map(|t| t.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Copy with every month shifted for `hemisphere`.
    pub fn for_hemisphere(&self, hemisphere: Hemisphere) -> Self {
        let offset = self.global_config.month_offset(hemisphere);
        let mut adjusted = self.clone();
        let data = Value::Object(std::mem::take(&mut adjusted.data));
        if let Value::Object(map) = apply_hemisphere(&data, offset) {
            adjusted.data = map;
        }
        adjusted
    }

    pub fn ui(&self) -> UiHelpers<'_> {
        UiHelpers::new(&self.global_config)
    }
}

/// One resolved plant, as returned by the whole-site queries.
#[derive(Debug, Clone, Serialize)]
pub struct PlantCalendar {
    pub category: String,
    pub slug: String,
    pub calendar: ResolvedPlantCalendar,
}

/// Months an activity happens in, after the hemisphere shift.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivityMonths {
    pub best: Vec<i64>,
    pub alternative: Vec<i64>,
    pub peak: Vec<i64>,
    /// Per sub-type best months, e.g. `indoor` / `outdoor` sowing.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub subtypes: BTreeMap<String, Vec<i64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityMatch {
    pub category: String,
    pub slug: String,
    pub activity: String,
    pub data: Value,
    pub months: ActivityMonths,
    pub calendar: ResolvedPlantCalendar,
}

/// Tasks grouped by category, then plant.
pub type MonthlyTasks = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// Everything a month page shows.
#[derive(Debug, Clone, Serialize)]
pub struct MonthOverview {
    pub month: i64,
    pub month_name: String,
    pub tasks: MonthlyTasks,
    pub seasonal_tips: Option<Value>,
}

fn month_values(value: Option<&Value>) -> Vec<i64> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_i64).collect())
        .unwrap_or_default()
}

fn contains_month(data: &Value, key: &str, month: i64) -> bool {
    month_values(data.get(key)).contains(&month)
}

fn dedup(months: Vec<i64>) -> Vec<i64> {
    let mut seen = Vec::with_capacity(months.len());
    for m in months {
        if !seen.contains(&m) {
            seen.push(m);
        }
    }
    seen
}

/// Whether `calendar` schedules `activity` in `month` (northern numbering).
///
/// Looks at the activity's own `best_months` / `alternative_months`, then at
/// the same lists on each sub-type. The pseudo-activity `care` matches any
/// month with care tasks.
pub fn has_activity_in_month(calendar: &ResolvedPlantCalendar, month: i64, activity: &str) -> bool {
    if activity == "care" && !calendar.tasks_for_month(month).is_empty() {
        return true;
    }
    let Some(data) = calendar.calendar_data().and_then(|d| d.get(activity)) else {
        return false;
    };
    if contains_month(data, "best_months", month) || contains_month(data, "alternative_months", month)
    {
        return true;
    }
    data.as_object().is_some_and(|subtypes| {
        subtypes.values().any(|sub| {
            sub.is_object()
                && (contains_month(sub, "best_months", month)
                    || contains_month(sub, "alternative_months", month))
        })
    })
}

/// Months for one activity's data, shifted by `offset`.
///
/// Sub-type best months are folded into `best` as well as kept under
/// `subtypes`. All lists are deduplicated, first occurrence wins.
pub fn activity_months(data: &Value, offset: i64) -> ActivityMonths {
    let shift = |ms: Vec<i64>| -> Vec<i64> { ms.into_iter().map(|m| adjust_month(m, offset)).collect() };
    let mut months = ActivityMonths {
        best: shift(month_values(data.get("best_months"))),
        alternative: shift(month_values(data.get("alternative_months"))),
        peak: shift(month_values(data.get("peak_months"))),
        subtypes: BTreeMap::new(),
    };
    if let Some(map) = data.as_object() {
        for (subtype, sub) in map {
            if MONTH_LIST_KEYS.contains(&subtype.as_str()) {
                continue;
            }
            if let Some(best) = sub.get("best_months").filter(|b| b.is_array()) {
                let adjusted = shift(month_values(Some(best)));
                months.best.extend(adjusted.iter().copied());
                months.subtypes.insert(subtype.clone(), adjusted);
            }
        }
    }
    months.best = dedup(months.best);
    months.alternative = dedup(months.alternative);
    months.peak = dedup(months.peak);
    months
}

/// Check a plant config against the vocabularies of the global config.
///
/// Returns one message per problem. Vocabularies the global config does not
/// define are not checked.
pub fn validate_plant_config(config: &Map<String, Value>, global: &GlobalCalendarConfig) -> Vec<String> {
    let mut errors = Vec::new();
    let conditions = config.get("growing_conditions");
    let checks = [
        ("soil_type", &global.soil_types),
        ("sun_requirements", &global.sun_requirements),
        ("water_needs", &global.water_needs),
    ];
    for (field, allowed) in checks {
        let (Some(value), Some(allowed)) = (
            conditions.and_then(|c| c.get(field)).and_then(Value::as_str),
            allowed,
        ) else {
            continue;
        };
        if !allowed.iter().any(|a| a == value) {
            errors.push(format!("Invalid {field}: {value}"));
        }
    }

    let monthly = config
        .get("calendar_data")
        .and_then(|d| d.get("care_calendar"))
        .and_then(|c| c.get("monthly_tasks"))
        .and_then(Value::as_object);
    if let Some(monthly) = monthly {
        for (month, tasks) in monthly {
            for task in tasks.as_array().into_iter().flatten() {
                let name = match task.as_str() {
                    Some(s) => s.to_string(),
                    None => task.to_string(),
                };
                if !global.is_known_task(&name) {
                    errors.push(format!("Invalid task '{name}' in month {month}"));
                }
            }
        }
    }
    errors
}

/// Read one tier file. Anything but a JSON object yields an empty tier.
fn read_tier(path: &Path, label: &str) -> Map<String, Value> {
    if !path.exists() {
        log::warn!("no {label} configuration at {}", path.display());
        return Map::new();
    }
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|raw| serde_json::from_str::<Value>(&raw).map_err(|e| e.to_string()));
    match parsed {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            log::error!("{label} configuration at {} is not an object", path.display());
            Map::new()
        }
        Err(e) => {
            log::error!("error parsing {label} configuration {}: {e}", path.display());
            Map::new()
        }
    }
}

/// Resolves calendars under one calendar directory.
#[derive(Debug)]
pub struct CalendarResolver<I> {
    calendar_dir: PathBuf,
    index: I,
    language: String,
    global: OnceLock<Arc<GlobalCalendarConfig>>,
}

impl<I: ArticleIndex> CalendarResolver<I> {
    pub fn new(calendar_dir: impl Into<PathBuf>, index: I) -> Self {
        Self {
            calendar_dir: calendar_dir.into(),
            index,
            language: DEFAULT_LANGUAGE.to_string(),
            global: OnceLock::new(),
        }
    }

    /// Name months and month routes in `language` instead of the default.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn calendar_dir(&self) -> &Path {
        &self.calendar_dir
    }

    /// The global config, loaded on first use.
    pub fn global_config(&self) -> Arc<GlobalCalendarConfig> {
        self.global
            .get_or_init(|| {
                Arc::new(GlobalCalendarConfig::load(
                    &self.calendar_dir.join(GLOBAL_CONFIG_FILENAME),
                ))
            })
            .clone()
    }

    pub fn category_config(&self, category: &str) -> Map<String, Value> {
        if category.trim().is_empty() {
            log::warn!("invalid category name: {category:?}");
            return Map::new();
        }
        read_tier(
            &self.calendar_dir.join(category).join(CATEGORY_INDEX),
            &format!("category '{category}'"),
        )
    }

    pub fn plant_config(&self, category: &str, plant: &str) -> Map<String, Value> {
        if category.trim().is_empty() || plant.trim().is_empty() {
            log::warn!("invalid plant reference: {category:?}/{plant:?}");
            return Map::new();
        }
        read_tier(
            &self.calendar_dir.join(category).join(format!("{plant}.json")),
            &format!("plant '{category}/{plant}'"),
        )
    }

    fn article_links(&self, category: &str, plant_config: &Map<String, Value>) -> ArticleLinks {
        let mut links = ArticleLinks::default();
        let key = plant_config
            .get("key")
            .and_then(Value::as_str)
            .filter(|k| !k.is_empty());
        if let Some(article) = key.and_then(|k| self.index.find_article(k)) {
            let article_category = article.category.as_deref().unwrap_or(category);
            let url = article_url(article_category, &article.slug);
            links.plant_article = Some(url.clone());
            links.resolved_link = Some(url);
        }
        if links.resolved_link.is_none() && self.index.has_category_page(category) {
            let url = category_url(category);
            links.category_article = Some(url.clone());
            links.resolved_link = Some(url);
        }
        links
    }

    /// Resolve one plant: category ← plant, with provenance and links.
    pub fn resolve(&self, category: &str, plant: &str) -> ResolvedPlantCalendar {
        let global = self.global_config();
        if category.trim().is_empty() || plant.trim().is_empty() {
            let error = format!("invalid parameters: category={category:?}, plant={plant:?}");
            log::error!("cannot resolve calendar: {error}");
            return ResolvedPlantCalendar::fallback(category, plant, error, global);
        }

        let category_config = self.category_config(category);
        let plant_config = self.plant_config(category, plant);
        let article_links = self.article_links(category, &plant_config);

        let merged = merge_tiers([
            Value::Object(category_config.clone()),
            Value::Object(plant_config.clone()),
        ]);
        let mut data = match merged {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for key in RESERVED_KEYS {
            data.remove(*key);
        }

        ResolvedPlantCalendar {
            data,
            inheritance: Inheritance {
                has_global: true,
                has_category: !category_config.is_empty(),
                has_plant_specific: !plant_config.is_empty(),
                category: category.to_string(),
                plant_slug: plant.to_string(),
                error: None,
            },
            global_config: global,
            article_links,
        }
    }

    /// Categories with a calendar directory, sorted.
    pub fn available_categories(&self) -> Vec<String> {
        if !self.calendar_dir.is_dir() {
            return Vec::new();
        }
        let mut categories: Vec<String> = WalkDir::new(&self.calendar_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_dir())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .collect();
        categories.sort();
        categories
    }

    /// Plant slugs of a category: every `*.json` except the category index.
    pub fn plant_slugs(&self, category: &str) -> Vec<String> {
        let dir = self.calendar_dir.join(category);
        if category.trim().is_empty() || !dir.is_dir() {
            return Vec::new();
        }
        let mut slugs: Vec<String> = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .filter(|name| name.ends_with(".json") && name != CATEGORY_INDEX)
            .map(|name| name.trim_end_matches(".json").to_string())
            .collect();
        slugs.sort();
        slugs
    }

    /// Every plant of a category, resolved.
    pub fn category_plants(&self, category: &str) -> Vec<PlantCalendar> {
        self.plant_slugs(category)
            .into_iter()
            .map(|slug| PlantCalendar {
                calendar: self.resolve(category, &slug),
                category: category.to_string(),
                slug,
            })
            .collect()
    }

    /// Every plant of every category, resolved in parallel per category.
    pub fn all_plants(&self) -> Vec<PlantCalendar> {
        // Load once up front so workers share it.
        self.global_config();
        self.available_categories()
            .par_iter()
            .map(|category| self.category_plants(category))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }

    /// Northern-numbered month for a month as seen from `hemisphere`.
    fn source_month(&self, month: i64, hemisphere: Hemisphere) -> i64 {
        adjust_month(month, 12 - self.global_config().month_offset(hemisphere))
    }

    /// Plants doing `activity` in `month`, as seen from `hemisphere`.
    pub fn find_plants_by_month(
        &self,
        month: i64,
        activity: &str,
        hemisphere: Hemisphere,
    ) -> Vec<PlantCalendar> {
        let source = self.source_month(month, hemisphere);
        self.all_plants()
            .into_iter()
            .filter(|p| has_activity_in_month(&p.calendar, source, activity))
            .collect()
    }

    /// Care tasks for `month` across all plants; plants without tasks are left out.
    pub fn monthly_tasks(&self, month: i64, hemisphere: Hemisphere) -> MonthlyTasks {
        let source = self.source_month(month, hemisphere);
        let mut tasks = MonthlyTasks::new();
        for plant in self.all_plants() {
            let plant_tasks = plant.calendar.tasks_for_month(source);
            if !plant_tasks.is_empty() {
                tasks
                    .entry(plant.category)
                    .or_default()
                    .insert(plant.slug, plant_tasks);
            }
        }
        tasks
    }

    /// Tasks plus month name and seasonal tips for a month page.
    pub fn month_overview(&self, month: i64, hemisphere: Hemisphere) -> MonthOverview {
        let global = self.global_config();
        let ui = UiHelpers::new(&global).with_language(&self.language);
        MonthOverview {
            month,
            month_name: ui.month_label(month),
            tasks: self.monthly_tasks(month, hemisphere),
            seasonal_tips: ui.seasonal_tips(month).cloned(),
        }
    }

    /// Main activities present in at least one plant, in display order.
    pub fn available_activities(&self) -> Vec<String> {
        let plants = self.all_plants();
        ACTIVITIES
            .iter()
            .filter(|activity| {
                plants.iter().any(|p| {
                    p.calendar
                        .calendar_data()
                        .is_some_and(|d| d.contains_key(**activity))
                })
            })
            .map(|a| a.to_string())
            .collect()
    }

    /// Plants with `activity`, with its months shifted for `hemisphere`.
    pub fn find_plants_by_activity(&self, activity: &str, hemisphere: Hemisphere) -> Vec<ActivityMatch> {
        let offset = self.global_config().month_offset(hemisphere);
        self.all_plants()
            .into_iter()
            .filter_map(|p| {
                let data = p.calendar.calendar_data()?.get(activity)?.clone();
                Some(ActivityMatch {
                    months: activity_months(&data, offset),
                    activity: activity.to_string(),
                    data,
                    category: p.category,
                    slug: p.slug,
                    calendar: p.calendar,
                })
            })
            .collect()
    }

    /// Companion lookups linked against this calendar's categories.
    pub fn companion_guide(&self) -> CompanionGuide {
        CompanionGuide::new(self.global_config(), self.available_categories())
    }

    /// `(category, plant)` pairs for every plant calendar page.
    pub fn plant_paths(&self) -> Vec<(String, String)> {
        self.all_plants()
            .into_iter()
            .map(|p| (p.category, p.slug))
            .collect()
    }

    /// Every calendar route under `/calendario/`: index, months, activities,
    /// categories and plants.
    pub fn calendar_routes(&self) -> Vec<String> {
        let global = self.global_config();
        let ui = UiHelpers::new(&global);
        let mut routes = vec![format!("/{CALENDAR_ROUTE}/")];
        routes.extend(
            (1..=12)
                .filter_map(|m| ui.month_slug(m, &self.language))
                .map(|slug| format!("/{CALENDAR_ROUTE}/mes/{slug}/")),
        );
        routes.extend(
            self.available_activities()
                .iter()
                .map(|a| format!("/{CALENDAR_ROUTE}/actividad/{}/", activity_to_slug(a))),
        );
        routes.extend(
            self.available_categories()
                .iter()
                .map(|c| format!("/{CALENDAR_ROUTE}/categoria/{c}/")),
        );
        routes.extend(
            self.plant_paths()
                .iter()
                .map(|(c, p)| format!("/{CALENDAR_ROUTE}/{c}/{p}/")),
        );
        routes
    }
}
