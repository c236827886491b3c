//! Site-wide calendar configuration (`global-config.json`).
//!
//! The global file is the reference tier: it defines month names, the task
//! vocabulary, UI lookups and hemisphere offsets, and is attached to every
//! resolved calendar. It does not take part in the category/plant merge.
//!
//! Loading never fails. A missing or unreadable file falls back to the
//! built-in defaults below; a file that lacks `ui_config`, `month_names` or
//! `task_definitions` keeps what it has and takes the missing top-level
//! sections from the defaults.

use super::hemisphere::Hemisphere;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::path::Path;

pub const GLOBAL_CONFIG_FILENAME: &str = "global-config.json";

/// Sections whose absence is reported when loading.
const REQUIRED_SECTIONS: &[&str] = &["ui_config", "month_names", "task_definitions"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalCalendarConfig {
    pub metadata: Value,
    pub month_names: BTreeMap<String, Vec<String>>,
    pub month_slugs: BTreeMap<String, Vec<String>>,
    pub task_definitions: Vec<String>,
    pub ui_config: UiConfig,
    pub hemispheres: BTreeMap<String, HemisphereOffset>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub companion_plants: BTreeMap<String, CompanionSet>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub seasonal_tips: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soil_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sun_requirements: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_needs: Option<Vec<String>>,
    /// Sections this crate does not interpret, kept for consumers.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Lookup tables used by [`super::UiHelpers`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub category_icons: BTreeMap<String, String>,
    #[serde(default)]
    pub task_icons: BTreeMap<String, String>,
    #[serde(default)]
    pub task_priorities: BTreeMap<String, String>,
    #[serde(default)]
    pub activity_colors: BTreeMap<String, String>,
    #[serde(default)]
    pub translation_strings: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HemisphereOffset {
    pub month_offset: i64,
}

/// Companion lists for one category, by relationship.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanionSet {
    #[serde(default)]
    pub beneficial: Vec<String>,
    #[serde(default)]
    pub neutral: Vec<String>,
    #[serde(default)]
    pub avoid: Vec<String>,
}

impl GlobalCalendarConfig {
    /// Load from `path`, degrading to defaults on any problem.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::warn!(
                "global calendar config not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|raw| Self::from_json(&raw).map_err(|e| e.to_string()));
        match parsed {
            Ok(config) => config,
            Err(e) => {
                log::error!("error parsing global calendar config: {e}, using defaults");
                Self::default()
            }
        }
    }

    /// Parse a global config document, filling missing sections from defaults.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(raw)?;
        let missing: Vec<&str> = REQUIRED_SECTIONS
            .iter()
            .copied()
            .filter(|key| value.get(key).is_none())
            .collect();
        if !missing.is_empty() {
            log::warn!("global calendar config missing {missing:?}, merging with defaults");
        }
        serde_json::from_value(value)
    }

    /// Month offset for `hemisphere`, from `hemispheres` or the built-in value.
    ///
    /// Always in `0..12`.
    pub fn month_offset(&self, hemisphere: Hemisphere) -> i64 {
        self.hemispheres
            .get(hemisphere.as_str())
            .map(|h| h.month_offset)
            .unwrap_or_else(|| hemisphere.default_offset())
            .rem_euclid(12)
    }

    pub fn is_known_task(&self, task: &str) -> bool {
        self.task_definitions.iter().any(|t| t == task)
    }
}

fn table(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for GlobalCalendarConfig {
    fn default() -> Self {
        let today = chrono::Utc::now().date_naive().to_string();
        Self {
            metadata: json!({"version": "1.0.0", "last_updated": today}),
            month_names: BTreeMap::from([(
                "es".to_string(),
                strings(&[
                    "Enero",
                    "Febrero",
                    "Marzo",
                    "Abril",
                    "Mayo",
                    "Junio",
                    "Julio",
                    "Agosto",
                    "Septiembre",
                    "Octubre",
                    "Noviembre",
                    "Diciembre",
                ]),
            )]),
            month_slugs: BTreeMap::from([(
                "es".to_string(),
                strings(&[
                    "enero",
                    "febrero",
                    "marzo",
                    "abril",
                    "mayo",
                    "junio",
                    "julio",
                    "agosto",
                    "septiembre",
                    "octubre",
                    "noviembre",
                    "diciembre",
                ]),
            )]),
            task_definitions: strings(&[
                "prepare_seedbeds",
                "transplant",
                "moderate_watering",
                "fertilize",
                "pest_monitoring",
                "harvest_early",
                "harvest_main",
                "harvest_late",
                "plant_cleanup",
            ]),
            ui_config: UiConfig::stock(),
            hemispheres: BTreeMap::from([
                ("northern".to_string(), HemisphereOffset { month_offset: 0 }),
                ("southern".to_string(), HemisphereOffset { month_offset: 6 }),
            ]),
            companion_plants: BTreeMap::new(),
            seasonal_tips: BTreeMap::new(),
            soil_types: None,
            sun_requirements: None,
            water_needs: None,
            extra: BTreeMap::new(),
        }
    }
}

impl UiConfig {
    /// The built-in icon, priority and colour tables.
    pub fn stock() -> Self {
        Self {
            category_icons: table(&[
                ("tomate", "🍅"),
                ("rosa", "🌹"),
                ("albahaca", "🌿"),
                ("default", "🌱"),
            ]),
            task_icons: table(&[
                ("prepare_seedbeds", "🌱"),
                ("transplant", "🌿"),
                ("moderate_watering", "💧"),
                ("fertilize", "🧪"),
                ("harvest_main", "🌾"),
                ("harvest_early", "🌾"),
                ("harvest_late", "🌾"),
                ("pest_monitoring", "🔍"),
                ("plant_cleanup", "🧹"),
                ("sowing", "🌱"),
                ("planting", "🌳"),
                ("pruning", "✂️"),
                ("watering", "💧"),
                ("deadheading", "🌸"),
                ("mulching", "🍃"),
                ("flowering", "🌸"),
                ("transplanting", "🌿"),
                ("harvesting", "🌾"),
                ("monitor_growth", "📈"),
                ("remove_mulch", "🧹"),
                ("fertilize_light", "💊"),
                ("water_moderately", "💧"),
                ("enjoy_blooms", "🌺"),
                ("deadhead_spent", "🥀"),
                ("allow_foliage_yellow", "🍂"),
                ("lift_bulbs_optional", "⬆️"),
                ("store_dry", "📦"),
                ("prepare_beds", "🌱"),
                ("mulch_protection", "🛡️"),
                ("reduce_watering", "💧"),
                ("fertilize_seedlings", "🧪"),
                ("water_regularly", "💧"),
                ("water_content", "📊"),
                ("enjoy_fragrance", "👃"),
                ("lift_tubers", "⬆️"),
                ("lifting_time", "⏰"),
                ("prepare_winter", "❄️"),
                ("store_tubers_cool_dry", "🧊"),
                ("mulch", "🍃"),
                ("remove_old_leaves", "🍂"),
                ("remove_runners", "✂️"),
                ("deadhead_daily", "🌸"),
                ("minimal_water", "💧"),
                ("prepare_supports", "🏗️"),
                ("mulch_for_winter", "❄️"),
                ("water_establishment", "💧"),
                ("enjoy_color_changes", "🎨"),
                ("monitor_flower_development", "🌸"),
                ("prepare_coastal_beds", "🏖️"),
                ("prepare_wet_beds", "💧"),
                ("water_garden", "🌊"),
                ("water_lightly", "💧"),
                ("minimal_watering", "💧"),
                ("remove_spent", "🗑️"),
                ("water_base_only", "💧"),
                ("water_carefully", "⚠️"),
                ("fertilize_orchid", "🌺"),
                ("increase_watering", "💧"),
                ("monitor_pods", "🫘"),
                ("prepare_soil", "🌱"),
                ("store_cool_dark", "🧊"),
                ("store_properly", "📦"),
                ("water_deeply", "💧"),
                ("prepare_outdoor", "🌤️"),
                ("low_water_content", "📉"),
                ("default", "•"),
            ]),
            task_priorities: table(&[
                ("harvest_main", "high"),
                ("harvest_early", "high"),
                ("harvest_late", "medium"),
                ("transplant", "high"),
                ("prepare_seedbeds", "high"),
                ("fertilize", "medium"),
                ("moderate_watering", "medium"),
                ("pest_monitoring", "medium"),
                ("watering", "medium"),
                ("plant_cleanup", "low"),
                ("deadheading", "low"),
                ("mulching", "low"),
                ("flowering", "medium"),
                ("monitor_growth", "medium"),
                ("remove_mulch", "medium"),
                ("fertilize_light", "medium"),
                ("water_moderately", "medium"),
                ("enjoy_blooms", "low"),
                ("deadhead_spent", "medium"),
                ("allow_foliage_yellow", "low"),
                ("lift_bulbs_optional", "low"),
                ("store_dry", "high"),
                ("prepare_beds", "high"),
                ("mulch_protection", "medium"),
                ("reduce_watering", "medium"),
                ("fertilize_seedlings", "high"),
                ("water_regularly", "medium"),
                ("water_content", "low"),
                ("enjoy_fragrance", "low"),
                ("lift_tubers", "high"),
                ("lifting_time", "high"),
                ("prepare_winter", "high"),
                ("store_tubers_cool_dry", "high"),
                ("mulch", "medium"),
                ("remove_old_leaves", "low"),
                ("remove_runners", "medium"),
                ("deadhead_daily", "medium"),
                ("minimal_water", "low"),
                ("prepare_supports", "high"),
                ("mulch_for_winter", "high"),
                ("water_establishment", "high"),
                ("enjoy_color_changes", "low"),
                ("monitor_flower_development", "medium"),
                ("prepare_coastal_beds", "high"),
                ("prepare_wet_beds", "high"),
                ("water_garden", "high"),
                ("water_lightly", "low"),
                ("minimal_watering", "low"),
                ("remove_spent", "low"),
                ("water_base_only", "medium"),
                ("water_carefully", "medium"),
                ("fertilize_orchid", "medium"),
                ("increase_watering", "medium"),
                ("monitor_pods", "medium"),
                ("prepare_soil", "high"),
                ("store_cool_dark", "high"),
                ("store_properly", "high"),
                ("water_deeply", "medium"),
                ("prepare_outdoor", "high"),
                ("low_water_content", "low"),
            ]),
            activity_colors: table(&[
                ("sowing", "#48bb78"),
                ("transplanting", "#4299e1"),
                ("harvesting", "#ed8936"),
                ("flowering", "#d53f8c"),
                ("pruning", "#48bb78"),
                ("planting", "#38b2ac"),
                ("care", "#48bb78"),
                ("watering", "#4299e1"),
                ("fertilizing", "#48bb78"),
                ("pest_monitoring", "#f56565"),
                ("maintenance", "#718096"),
                ("monitor_growth", "#48bb78"),
                ("remove_mulch", "#f6ad55"),
                ("fertilize_light", "#48bb78"),
                ("water_moderately", "#4299e1"),
                ("enjoy_blooms", "#d53f8c"),
                ("deadhead_spent", "#ed8936"),
                ("allow_foliage_yellow", "#f6ad55"),
                ("lift_bulbs_optional", "#9f7aea"),
                ("store_dry", "#805ad5"),
                ("prepare_beds", "#48bb78"),
                ("mulch_protection", "#38b2ac"),
                ("reduce_watering", "#4299e1"),
                ("fertilize_seedlings", "#48bb78"),
                ("water_regularly", "#4299e1"),
                ("water_content", "#4299e1"),
                ("enjoy_fragrance", "#d53f8c"),
                ("lift_tubers", "#9f7aea"),
                ("lifting_time", "#805ad5"),
                ("prepare_winter", "#38b2ac"),
                ("store_tubers_cool_dry", "#805ad5"),
                ("mulch", "#38b2ac"),
                ("remove_old_leaves", "#f6ad55"),
                ("remove_runners", "#ed8936"),
                ("deadhead_daily", "#ed8936"),
                ("minimal_water", "#4299e1"),
                ("prepare_supports", "#48bb78"),
                ("mulch_for_winter", "#38b2ac"),
                ("water_establishment", "#4299e1"),
                ("enjoy_color_changes", "#d53f8c"),
                ("monitor_flower_development", "#d53f8c"),
                ("prepare_coastal_beds", "#48bb78"),
                ("prepare_wet_beds", "#4299e1"),
                ("water_garden", "#4299e1"),
                ("water_lightly", "#4299e1"),
                ("minimal_watering", "#4299e1"),
                ("remove_spent", "#f6ad55"),
                ("water_base_only", "#4299e1"),
                ("water_carefully", "#4299e1"),
                ("fertilize_orchid", "#48bb78"),
                ("increase_watering", "#4299e1"),
                ("monitor_pods", "#48bb78"),
                ("prepare_soil", "#48bb78"),
                ("store_cool_dark", "#805ad5"),
                ("store_properly", "#805ad5"),
                ("water_deeply", "#4299e1"),
                ("prepare_outdoor", "#48bb78"),
                ("low_water_content", "#4299e1"),
            ]),
            translation_strings: BTreeMap::from([(
                "es".to_string(),
                table(&[
                    ("full_sun", "Sol directo"),
                    ("moderate", "Moderado"),
                    ("beginner", "Principiante"),
                    ("sowing", "Siembra"),
                    ("harvesting", "Cosecha"),
                    ("transplanting", "Trasplante"),
                ]),
            )]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_have_spanish_months_and_offsets() {
        let config = GlobalCalendarConfig::default();
        assert_eq!(config.month_names["es"].len(), 12);
        assert_eq!(config.month_slugs["es"][8], "septiembre");
        assert_eq!(config.month_offset(Hemisphere::Northern), 0);
        assert_eq!(config.month_offset(Hemisphere::Southern), 6);
        assert_eq!(config.ui_config.task_icons["default"], "•");
    }

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = GlobalCalendarConfig::load(&tmp.path().join(GLOBAL_CONFIG_FILENAME));
        assert_eq!(config.task_definitions, GlobalCalendarConfig::default().task_definitions);
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(GLOBAL_CONFIG_FILENAME);
        std::fs::write(&path, "{ \"month_names\": ").unwrap();
        let config = GlobalCalendarConfig::load(&path);
        assert_eq!(config.month_names["es"][0], "Enero");
    }

    #[test]
    fn missing_sections_filled_shallowly() {
        let config = GlobalCalendarConfig::from_json(
            r#"{"month_names": {"en": ["January"]}, "soil_types": ["clay"]}"#,
        )
        .unwrap();
        // Present sections replace the default wholesale.
        assert!(!config.month_names.contains_key("es"));
        assert_eq!(config.month_names["en"], vec!["January"]);
        // Missing sections come from defaults.
        assert_eq!(config.ui_config.category_icons["rosa"], "🌹");
        assert!(config.is_known_task("harvest_main"));
        assert_eq!(config.soil_types, Some(vec!["clay".to_string()]));
    }

    #[test]
    fn present_ui_config_is_not_filled_per_table() {
        let config =
            GlobalCalendarConfig::from_json(r#"{"ui_config": {"task_icons": {"mulch": "M"}}}"#)
                .unwrap();
        assert_eq!(config.ui_config.task_icons["mulch"], "M");
        assert!(config.ui_config.category_icons.is_empty());
    }

    #[test]
    fn unknown_sections_round_trip() {
        let config = GlobalCalendarConfig::from_json(
            r#"{"pest_database": {"pulgon": "aphid"}, "hemispheres": {"southern": {"month_offset": 5}}}"#,
        )
        .unwrap();
        assert_eq!(config.extra["pest_database"]["pulgon"], "aphid");
        assert_eq!(config.month_offset(Hemisphere::Southern), 5);
        // Northern entry missing from the file: built-in offset.
        assert_eq!(config.month_offset(Hemisphere::Northern), 0);

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["pest_database"]["pulgon"], "aphid");
    }

    #[test]
    fn companion_sets_parse() {
        let config = GlobalCalendarConfig::from_json(
            r#"{"companion_plants": {"tomate": {"beneficial": ["albahaca"]}}}"#,
        )
        .unwrap();
        let tomate = &config.companion_plants["tomate"];
        assert_eq!(tomate.beneficial, vec!["albahaca"]);
        assert!(tomate.avoid.is_empty());
    }
}
