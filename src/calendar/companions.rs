//! Companion planting lookups over `companion_plants` in the global config.

use super::global::{CompanionSet, GlobalCalendarConfig};
use super::ui::UiHelpers;
use crate::types::category_url;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Beneficial,
    Neutral,
    Avoid,
}

impl Relationship {
    pub const ALL: [Relationship; 3] = [
        Relationship::Beneficial,
        Relationship::Neutral,
        Relationship::Avoid,
    ];

    fn generic_description(self) -> &'static str {
        match self {
            Relationship::Beneficial => "Relación beneficiosa",
            Relationship::Neutral => "Relación neutral",
            Relationship::Avoid => "Evitar plantar juntos",
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Relationship::Beneficial => "beneficial",
            Relationship::Neutral => "neutral",
            Relationship::Avoid => "avoid",
        };
        f.write_str(s)
    }
}

/// Description of why `plant` is a companion of the given kind.
pub fn companion_description(plant: &str, relationship: Relationship) -> &'static str {
    let specific = match (relationship, plant) {
        (Relationship::Beneficial, "albahaca") => Some("Repele insectos y mejora el sabor"),
        (Relationship::Beneficial, "manzanilla") => Some("Atrae insectos beneficiosos"),
        (Relationship::Beneficial, "lavanda") => Some("Repele plagas y atrae polinizadores"),
        (Relationship::Beneficial, "tomillo") => Some("Control natural de plagas"),
        (Relationship::Beneficial, "ajo") => Some("Repele áfidos y otros insectos"),
        (Relationship::Beneficial, "cebolla") => Some("Protege contra plagas del suelo"),
        (Relationship::Neutral, "lechuga") => Some("No interfiere con el crecimiento"),
        (Relationship::Neutral, "zanahoria") => Some("Uso eficiente del espacio"),
        (Relationship::Neutral, "espinaca") => Some("Compatibilidad de cultivo"),
        (Relationship::Avoid, "hinojo") => Some("Inhibe el crecimiento"),
        (Relationship::Avoid, "nogal") => Some("Produce sustancias alelopáticas"),
        (Relationship::Avoid, "brócoli") => Some("Compite por los mismos nutrientes"),
        _ => None,
    };
    specific.unwrap_or_else(|| relationship.generic_description())
}

/// A companion plant and, when one matches, the calendar category it links to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Companion {
    pub name: String,
    pub has_link: bool,
    pub category_slug: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Companions {
    pub beneficial: Vec<Companion>,
    pub neutral: Vec<Companion>,
    pub avoid: Vec<Companion>,
}

impl Companions {
    pub fn get(&self, relationship: Relationship) -> &[Companion] {
        match relationship {
            Relationship::Beneficial => &self.beneficial,
            Relationship::Neutral => &self.neutral,
            Relationship::Avoid => &self.avoid,
        }
    }

    pub fn len(&self) -> usize {
        self.beneficial.len() + self.neutral.len() + self.avoid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanionDetail {
    #[serde(flatten)]
    pub companion: Companion,
    pub icon: String,
    pub relationship: Relationship,
    pub description: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompanionDetails {
    pub beneficial: Vec<CompanionDetail>,
    pub neutral: Vec<CompanionDetail>,
    pub avoid: Vec<CompanionDetail>,
    pub total_count: usize,
}

/// Companion relationships, linked against the calendar's categories.
#[derive(Debug, Clone)]
pub struct CompanionGuide {
    config: Arc<GlobalCalendarConfig>,
    categories: Vec<String>,
}

impl CompanionGuide {
    pub fn new(config: Arc<GlobalCalendarConfig>, categories: Vec<String>) -> Self {
        Self { config, categories }
    }

    /// First calendar category equal to, containing, or contained in `name`.
    fn matching_category(&self, name: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|cat| cat.as_str() == name || cat.contains(name) || name.contains(cat.as_str()))
            .map(String::as_str)
    }

    fn link_all(&self, names: &[String]) -> Vec<Companion> {
        names
            .iter()
            .filter(|name| !name.trim().is_empty())
            .map(|name| {
                let category_slug = self.matching_category(name).map(str::to_string);
                Companion {
                    name: name.clone(),
                    has_link: category_slug.is_some(),
                    category_slug,
                }
            })
            .collect()
    }

    fn set(&self, category: &str) -> Option<&CompanionSet> {
        self.config.companion_plants.get(category)
    }

    /// Companions of `category`; an unknown category has none.
    pub fn companions(&self, category: &str) -> Companions {
        match self.set(category) {
            Some(set) => Companions {
                beneficial: self.link_all(&set.beneficial),
                neutral: self.link_all(&set.neutral),
                avoid: self.link_all(&set.avoid),
            },
            None => Companions::default(),
        }
    }

    /// Companions with icon, description and page link.
    pub fn companions_with_details(&self, category: &str) -> CompanionDetails {
        let companions = self.companions(category);
        let ui = UiHelpers::new(&self.config);
        let detail = |relationship: Relationship| -> Vec<CompanionDetail> {
            companions
                .get(relationship)
                .iter()
                .map(|c| CompanionDetail {
                    icon: ui
                        .category_icon(c.category_slug.as_deref().unwrap_or(&c.name))
                        .to_string(),
                    relationship,
                    description: companion_description(&c.name, relationship).to_string(),
                    link: c.category_slug.as_deref().map(category_url),
                    companion: c.clone(),
                })
                .collect()
        };
        CompanionDetails {
            beneficial: detail(Relationship::Beneficial),
            neutral: detail(Relationship::Neutral),
            avoid: detail(Relationship::Avoid),
            total_count: companions.len(),
        }
    }

    pub fn bulk_companions(&self, categories: &[String]) -> BTreeMap<String, Companions> {
        categories
            .iter()
            .map(|c| (c.clone(), self.companions(c)))
            .collect()
    }

    /// Beneficial companions that list `category` as beneficial in return.
    pub fn mutual_companions(&self, category: &str) -> Vec<String> {
        let Some(set) = self.set(category) else {
            return Vec::new();
        };
        set.beneficial
            .iter()
            .filter(|companion| {
                self.set(companion)
                    .is_some_and(|other| other.beneficial.iter().any(|b| b == category))
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guide() -> CompanionGuide {
        let config = GlobalCalendarConfig::from_json(
            r#"{
                "companion_plants": {
                    "tomate": {
                        "beneficial": ["albahaca", "ajo", "rosa-trepadora"],
                        "neutral": ["lechuga"],
                        "avoid": ["hinojo"]
                    },
                    "albahaca": {"beneficial": ["tomate"]},
                    "ajo": {"beneficial": ["rosa"]}
                }
            }"#,
        )
        .unwrap();
        CompanionGuide::new(
            Arc::new(config),
            vec!["albahaca".into(), "rosa".into(), "tomate".into()],
        )
    }

    #[test]
    fn companions_link_to_matching_categories() {
        let c = guide().companions("tomate");
        assert_eq!(c.beneficial.len(), 3);
        assert_eq!(c.beneficial[0].category_slug.as_deref(), Some("albahaca"));
        assert!(!c.beneficial[1].has_link);
        // "rosa-trepadora" contains the category "rosa".
        assert_eq!(c.beneficial[2].category_slug.as_deref(), Some("rosa"));
        assert_eq!(c.neutral[0].name, "lechuga");
        assert!(!c.avoid[0].has_link);
    }

    #[test]
    fn unknown_category_has_no_companions() {
        let c = guide().companions("cactus");
        assert!(c.is_empty());
    }

    #[test]
    fn details_carry_icon_description_and_link() {
        let d = guide().companions_with_details("tomate");
        assert_eq!(d.total_count, 5);
        let albahaca = &d.beneficial[0];
        assert_eq!(albahaca.icon, "🌿");
        assert_eq!(albahaca.description, "Repele insectos y mejora el sabor");
        assert_eq!(albahaca.link.as_deref(), Some("/albahaca/"));
        assert_eq!(albahaca.relationship, Relationship::Beneficial);

        let trepadora = &d.beneficial[2];
        assert_eq!(trepadora.description, "Relación beneficiosa");
        assert_eq!(trepadora.icon, "🌹");

        let hinojo = &d.avoid[0];
        assert_eq!(hinojo.description, "Inhibe el crecimiento");
        assert!(hinojo.link.is_none());
        assert_eq!(hinojo.icon, "🌱");
    }

    #[test]
    fn mutual_companions_in_both_directions() {
        let g = guide();
        assert_eq!(g.mutual_companions("tomate"), vec!["albahaca"]);
        assert!(g.mutual_companions("ajo").is_empty());
        assert!(g.mutual_companions("cactus").is_empty());
    }

    #[test]
    fn bulk_lookup() {
        let bulk = guide().bulk_companions(&["tomate".into(), "cactus".into()]);
        assert_eq!(bulk["tomate"].beneficial.len(), 3);
        assert!(bulk["cactus"].is_empty());
    }

    #[test]
    fn serializes_flat() {
        let d = guide().companions_with_details("tomate");
        let value = serde_json::to_value(&d).unwrap();
        assert_eq!(value["beneficial"][0]["name"], "albahaca");
        assert_eq!(value["beneficial"][0]["relationship"], "beneficial");
        assert_eq!(value["total_count"], 5);
    }
}
