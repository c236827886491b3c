//! Planting calendar engine.
//!
//! Calendar data lives in three tiers of JSON files: one global config with
//! the shared vocabulary, a base calendar per plant category, and optional
//! per-plant overrides. The resolver merges them, applies hemisphere offsets,
//! links entries to content articles, and answers month and activity queries.
//!
//! | Module          | Role                                              |
//! |-----------------|---------------------------------------------------|
//! | `resolver`      | Tier loading, merge, article links, site queries  |
//! | `global`        | `global-config.json` model and built-in defaults  |
//! | `merge`         | Recursive JSON merge                              |
//! | `hemisphere`    | Month offsets and timezone detection              |
//! | `ui`            | Icons, colours, month names, task labels          |
//! | `labels`        | Origin flags and activity slugs                   |
//! | `companions`    | Companion planting lookups                        |
//! | `validate`      | Site-wide vocabulary checks with progress events  |

pub mod companions;
pub mod global;
pub mod hemisphere;
pub mod labels;
pub mod merge;
pub mod resolver;
pub mod ui;
pub mod validate;

pub use companions::{CompanionGuide, Relationship};
pub use global::GlobalCalendarConfig;
pub use hemisphere::{Hemisphere, adjust_month, apply_hemisphere, is_southern_timezone};
pub use labels::{activity_to_slug, origin_flag, slug_to_activity};
pub use merge::deep_merge;
pub use resolver::{
    ArticleIndex, ArticleRef, CalendarResolver, NoArticles, ResolvedPlantCalendar,
    validate_plant_config,
};
pub use ui::UiHelpers;
pub use validate::{ValidationEvent, ValidationReport, validate_site};
