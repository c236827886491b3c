//! Site-wide calendar validation.
//!
//! Resolves every plant, checks it with [`validate_plant_config`] and reports
//! progress over an optional channel so the CLI can print while it runs.

use super::resolver::{ArticleIndex, CalendarResolver, validate_plant_config};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::mpsc::Sender;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationEvent {
    CategoryStarted {
        category: String,
        plant_count: usize,
    },
    PlantChecked {
        category: String,
        slug: String,
        errors: Vec<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub checked: usize,
    /// Problems keyed by `category/plant`; clean plants are absent.
    pub problems: BTreeMap<String, Vec<String>>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn problem_count(&self) -> usize {
        self.problems.values().map(Vec::len).sum()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} plants checked, {} with problems ({} total)",
            self.checked,
            self.problems.len(),
            self.problem_count()
        )
    }
}

/// Validate every plant under the resolver's calendar directory.
pub fn validate_site<I: ArticleIndex>(
    resolver: &CalendarResolver<I>,
    events: Option<Sender<ValidationEvent>>,
) -> ValidationReport {
    let global = resolver.global_config();
    let mut report = ValidationReport::default();

    for category in resolver.available_categories() {
        let plants = resolver.category_plants(&category);
        if let Some(tx) = &events {
            let _ = tx.send(ValidationEvent::CategoryStarted {
                category: category.clone(),
                plant_count: plants.len(),
            });
        }
        for plant in plants {
            let errors = validate_plant_config(&plant.calendar.data, &global);
            report.checked += 1;
            if !errors.is_empty() {
                log::warn!("{}/{}: {} problems", plant.category, plant.slug, errors.len());
                report
                    .problems
                    .insert(format!("{}/{}", plant.category, plant.slug), errors.clone());
            }
            if let Some(tx) = &events {
                let _ = tx.send(ValidationEvent::PlantChecked {
                    category: plant.category,
                    slug: plant.slug,
                    errors,
                });
            }
        }
    }
    report
}
