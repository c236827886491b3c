//! CLI output formatting.
//!
//! Every command has a `format_*` function that returns `Vec<String>` and a
//! `print_*` wrapper that writes it to stdout. Format functions do no I/O so
//! tests can assert on exact lines.
//!
//! Entities follow one display pattern: a header line with a positional
//! index and a name, then indented context lines.
//!
//! ```text
//! Categories
//! 001 rosa (2 posts)
//! 002 tomate (1 posts)
//!
//! 🌹 Rosa banksiae
//!     Inheritance: global, category, plant
//!     Link: /rosa/banksiae/
//!     Flowering
//!         Best: Abril, Mayo
//!         Peak: Abril
//! ```

use crate::calendar::resolver::{ActivityMatch, MonthOverview, PlantCalendar, ResolvedPlantCalendar};
use crate::calendar::{
    Hemisphere, Relationship, UiHelpers, ValidationEvent, ValidationReport, origin_flag,
};
use crate::calendar::companions::CompanionDetails;
use crate::collections::{Collection, PlantCard};
use crate::content::CategoryStat;
use crate::favorites::FavoritesStats;
use crate::random::RandomItem;
use crate::split::SplitContent;
use serde_json::Value;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Positional index + name, with an optional counted detail.
///
/// ```text
/// 001 rosa (2 posts)
/// 001 rosa
/// ```
fn entity_header(index: usize, name: &str, count: Option<(usize, &str)>) -> String {
    match count {
        Some((n, noun)) => format!("{} {} ({} {})", format_index(index), name, n, noun),
        None => format!("{} {}", format_index(index), name),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

fn month_list(ui: &UiHelpers<'_>, months: &[i64]) -> String {
    months
        .iter()
        .map(|m| ui.month_label(*m))
        .collect::<Vec<_>>()
        .join(", ")
}

fn int_list(value: Option<&Value>) -> Vec<i64> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_i64).collect())
        .unwrap_or_default()
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Content pipeline
// ============================================================================

/// Summary of a split: totals, then categories largest first.
pub fn format_split_output(content: &SplitContent) -> Vec<String> {
    let mut lines = vec![
        format!("Pages: {}", content.pages.len()),
        format!("Posts: {}", content.posts.len()),
    ];
    let counts = content.category_counts();
    if !counts.is_empty() {
        lines.push(String::new());
        lines.push("Categories".to_string());
        for (i, (slug, count)) in counts.iter().enumerate() {
            lines.push(entity_header(i + 1, slug, Some((*count, "posts"))));
        }
    }
    lines
}

pub fn print_split_output(content: &SplitContent) {
    print_lines(format_split_output(content));
}

pub fn format_category_stats(stats: &[CategoryStat]) -> Vec<String> {
    stats
        .iter()
        .enumerate()
        .map(|(i, s)| entity_header(i + 1, &s.name, Some((s.count, "posts"))))
        .collect()
}

pub fn print_category_stats(stats: &[CategoryStat]) {
    print_lines(format_category_stats(stats));
}

/// One static route per line.
pub fn format_paths(paths: &[String]) -> Vec<String> {
    paths.to_vec()
}

pub fn print_paths(paths: &[String]) {
    print_lines(format_paths(paths));
}

pub fn format_random(item: Option<&RandomItem>) -> Vec<String> {
    let Some(item) = item else {
        return vec!["No content available".to_string()];
    };
    let mut lines = vec![item.title.clone(), format!("{}URL: {}", indent(1), item.url)];
    let excerpt = truncate_desc(item.excerpt.trim(), 80);
    if !excerpt.is_empty() {
        lines.push(format!("{}{}", indent(1), excerpt));
    }
    lines
}

pub fn print_random(item: Option<&RandomItem>) {
    print_lines(format_random(item));
}

// ============================================================================
// Calendar
// ============================================================================

/// One resolved plant calendar, months already in display numbering.
pub fn format_calendar(
    category: &str,
    plant: &str,
    calendar: &ResolvedPlantCalendar,
    hemisphere: Hemisphere,
    language: &str,
) -> Vec<String> {
    let ui = calendar.ui().with_language(language);
    let mut lines = Vec::new();

    let inh = &calendar.inheritance;
    lines.push(format!(
        "{} {} ({})",
        ui.category_icon(category),
        ui.format_plant_name(&format!("{category}-{plant}")),
        hemisphere
    ));
    let tiers: Vec<&str> = [
        (inh.has_global, "global"),
        (inh.has_category, "category"),
        (inh.has_plant_specific, "plant"),
    ]
    .iter()
    .filter(|(present, _)| *present)
    .map(|(_, name)| *name)
    .collect();
    lines.push(format!("{}Inheritance: {}", indent(1), tiers.join(", ")));
    if let Some(error) = &inh.error {
        lines.push(format!("{}Error: {}", indent(1), error));
    }
    if let Some(link) = &calendar.article_links.resolved_link {
        lines.push(format!("{}Link: {}", indent(1), link));
    }
    if let Some(origin) = calendar
        .data
        .get("plant_info")
        .and_then(|i| i.get("origin"))
        .and_then(Value::as_str)
    {
        lines.push(format!("{}Origin: {} {}", indent(1), origin_flag(origin), origin));
    }

    if let Some(data) = calendar.calendar_data() {
        for (activity, value) in data {
            if activity == "care_calendar" {
                continue;
            }
            lines.push(format!("{}{}", indent(1), ui.format_task_name(activity)));
            for (key, label) in [
                ("best_months", "Best"),
                ("alternative_months", "Alternative"),
                ("peak_months", "Peak"),
            ] {
                let months = int_list(value.get(key));
                if !months.is_empty() {
                    lines.push(format!("{}{}: {}", indent(2), label, month_list(&ui, &months)));
                }
            }
            if let Some(subtypes) = value.as_object() {
                for (name, sub) in subtypes {
                    let months = int_list(sub.get("best_months"));
                    if sub.is_object() && !months.is_empty() {
                        lines.push(format!(
                            "{}{}: {}",
                            indent(2),
                            ui.format_task_name(name),
                            month_list(&ui, &months)
                        ));
                    }
                }
            }
        }
    }

    let care: Vec<(i64, Vec<String>)> = (1..=12)
        .map(|m| (m, calendar.tasks_for_month(m)))
        .filter(|(_, tasks)| !tasks.is_empty())
        .collect();
    if !care.is_empty() {
        lines.push(format!("{}Care", indent(1)));
        for (month, tasks) in care {
            let labels: Vec<String> = tasks
                .iter()
                .map(|t| format!("{} {}", ui.task_icon(t), ui.format_task_name(t)))
                .collect();
            lines.push(format!(
                "{}{}: {}",
                indent(2),
                ui.month_label(month),
                labels.join(", ")
            ));
        }
    }
    lines
}

pub fn print_calendar(
    category: &str,
    plant: &str,
    calendar: &ResolvedPlantCalendar,
    hemisphere: Hemisphere,
    language: &str,
) {
    print_lines(format_calendar(category, plant, calendar, hemisphere, language));
}

/// Care tasks for a month, grouped by category.
pub fn format_month_overview(overview: &MonthOverview, ui: &UiHelpers<'_>) -> Vec<String> {
    let mut lines = vec![overview.month_name.clone()];
    if let Some(title) = overview
        .seasonal_tips
        .as_ref()
        .and_then(|t| t.get("title"))
        .and_then(Value::as_str)
    {
        lines.push(format!("{}{}", indent(1), title));
    }
    if overview.tasks.is_empty() {
        lines.push(format!("{}No tasks", indent(1)));
    }
    for (category, plants) in &overview.tasks {
        lines.push(format!(
            "{}{} {}",
            indent(1),
            ui.category_icon(category),
            ui.format_category_name(category)
        ));
        for (slug, tasks) in plants {
            let labels: Vec<String> = tasks.iter().map(|t| ui.format_task_name(t)).collect();
            lines.push(format!("{}{}: {}", indent(2), slug, labels.join(", ")));
        }
    }
    lines
}

pub fn print_month_overview(overview: &MonthOverview, ui: &UiHelpers<'_>) {
    print_lines(format_month_overview(overview, ui));
}

/// Plants doing an activity in a month.
pub fn format_month_plants(plants: &[PlantCalendar]) -> Vec<String> {
    if plants.is_empty() {
        return vec!["No plants".to_string()];
    }
    plants
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let header = entity_header(i + 1, &format!("{}/{}", p.category, p.slug), None);
            match &p.calendar.article_links.resolved_link {
                Some(link) => format!("{} → {}", header, link),
                None => header,
            }
        })
        .collect()
}

pub fn print_month_plants(plants: &[PlantCalendar]) {
    print_lines(format_month_plants(plants));
}

/// Plants with an activity and the months it happens in.
pub fn format_activity_matches(matches: &[ActivityMatch], ui: &UiHelpers<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, m) in matches.iter().enumerate() {
        lines.push(entity_header(i + 1, &format!("{}/{}", m.category, m.slug), None));
        if !m.months.best.is_empty() {
            lines.push(format!("{}Best: {}", indent(1), month_list(ui, &m.months.best)));
        }
        if !m.months.peak.is_empty() {
            lines.push(format!("{}Peak: {}", indent(1), month_list(ui, &m.months.peak)));
        }
    }
    lines
}

pub fn print_activity_matches(matches: &[ActivityMatch], ui: &UiHelpers<'_>) {
    print_lines(format_activity_matches(matches, ui));
}

pub fn format_companions(category: &str, details: &CompanionDetails) -> Vec<String> {
    let mut lines = vec![format!("Companions of {} ({})", category, details.total_count)];
    for relationship in Relationship::ALL {
        let entries = match relationship {
            Relationship::Beneficial => &details.beneficial,
            Relationship::Neutral => &details.neutral,
            Relationship::Avoid => &details.avoid,
        };
        if entries.is_empty() {
            continue;
        }
        lines.push(format!("{}{}", indent(1), relationship));
        for d in entries {
            let link = d.link.as_deref().map(|l| format!(" → {l}")).unwrap_or_default();
            lines.push(format!(
                "{}{} {}{}",
                indent(2),
                d.icon,
                d.companion.name,
                link
            ));
            lines.push(format!("{}{}", indent(3), d.description));
        }
    }
    lines
}

pub fn print_companions(category: &str, details: &CompanionDetails) {
    print_lines(format_companions(category, details));
}

pub fn format_collection(collection: &Collection, cards: &[PlantCard]) -> Vec<String> {
    let mut lines = vec![format!("{} ({} plants)", collection.title, cards.len())];
    if let Some(description) = &collection.description {
        lines.push(format!("{}{}", indent(1), truncate_desc(description, 60)));
    }
    for (i, card) in cards.iter().enumerate() {
        lines.push(format!("{}{}", indent(1), entity_header(i + 1, &card.name, None)));
        lines.push(format!("{}Link: {}", indent(2), card.link));
        if !card.badges.is_empty() {
            lines.push(format!("{}Badges: {}", indent(2), card.badges.join(", ")));
        }
    }
    lines
}

pub fn print_collection(collection: &Collection, cards: &[PlantCard]) {
    print_lines(format_collection(collection, cards));
}

// ============================================================================
// Validation
// ============================================================================

/// Format a single validation progress event as display lines.
pub fn format_validation_event(event: &ValidationEvent) -> Vec<String> {
    match event {
        ValidationEvent::CategoryStarted {
            category,
            plant_count,
        } => vec![format!("{} ({} plants)", category, plant_count)],
        ValidationEvent::PlantChecked { slug, errors, .. } => {
            if errors.is_empty() {
                vec![format!("{}{}: ok", indent(1), slug)]
            } else {
                let mut lines = vec![format!("{}{}:", indent(1), slug)];
                lines.extend(errors.iter().map(|e| format!("{}{}", indent(2), e)));
                lines
            }
        }
    }
}

pub fn print_validation_report(report: &ValidationReport) {
    println!("{}", report);
}

// ============================================================================
// Favorites
// ============================================================================

pub fn format_favorites(favorites: &[String], stats: &FavoritesStats) -> Vec<String> {
    let mut lines = vec![format!(
        "Favorites: {}/{} ({:.1}% full)",
        stats.count, stats.max_allowed, stats.percentage_full
    )];
    for (i, id) in favorites.iter().enumerate() {
        lines.push(format!("{}{}", indent(1), entity_header(i + 1, id, None)));
    }
    lines
}

pub fn print_favorites(favorites: &[String], stats: &FavoritesStats) {
    print_lines(format_favorites(favorites, stats));
}
