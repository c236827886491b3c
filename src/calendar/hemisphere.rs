//! Hemisphere month offsets.
//!
//! Calendar files are written for the northern hemisphere. A southern reader
//! sees every month shifted by the hemisphere's offset (six by default), so
//! "sow in March" becomes "sow in September".

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Keys whose integer arrays hold month numbers.
const MONTH_LIST_KEYS: &[&str] = &["best_months", "peak_months", "alternative_months"];

/// Timezone prefixes treated as southern hemisphere.
const SOUTHERN_ZONES: &[&str] = &[
    "Australia/",
    "Pacific/Auckland",
    "Pacific/Fiji",
    "America/Argentina",
    "America/Sao_Paulo",
    "America/Santiago",
    "Africa/Johannesburg",
    "Indian/Mauritius",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    #[default]
    Northern,
    Southern,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown hemisphere '{0}', expected northern or southern")]
pub struct ParseHemisphereError(pub String);

impl Hemisphere {
    pub fn as_str(self) -> &'static str {
        match self {
            Hemisphere::Northern => "northern",
            Hemisphere::Southern => "southern",
        }
    }

    /// Offset used when the global config has no `hemispheres` entry.
    pub fn default_offset(self) -> i64 {
        match self {
            Hemisphere::Northern => 0,
            Hemisphere::Southern => 6,
        }
    }

    /// Best guess from an IANA timezone name such as `America/Santiago`.
    pub fn from_timezone(timezone: &str) -> Self {
        if is_southern_timezone(timezone) {
            Hemisphere::Southern
        } else {
            Hemisphere::Northern
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Hemisphere {
    type Err = ParseHemisphereError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "northern" => Ok(Hemisphere::Northern),
            "southern" => Ok(Hemisphere::Southern),
            other => Err(ParseHemisphereError(other.to_string())),
        }
    }
}

/// Whether `timezone` is one of the known southern-hemisphere zones.
pub fn is_southern_timezone(timezone: &str) -> bool {
    SOUTHERN_ZONES.iter().any(|zone| timezone.contains(zone))
}

/// Shift a 1-based month by `offset`, wrapping at twelve.
///
/// Both operands are reduced first, so any `i64` from a config file is safe.
pub fn adjust_month(month: i64, offset: i64) -> i64 {
    (month.rem_euclid(12) + 11 + offset.rem_euclid(12)) % 12 + 1
}

/// Return a copy of a resolved calendar with every month shifted by `offset`.
///
/// Touches the month lists anywhere under `calendar_data` and the month keys
/// of `calendar_data.care_calendar.monthly_tasks`. Everything else is copied
/// unchanged. An offset that is a multiple of twelve is the identity.
pub fn apply_hemisphere(calendar: &Value, offset: i64) -> Value {
    let mut adjusted = calendar.clone();
    if offset.rem_euclid(12) == 0 {
        return adjusted;
    }
    if let Some(data) = adjusted.get_mut("calendar_data") {
        shift_month_lists(data, offset);
        if let Some(tasks) = data
            .get_mut("care_calendar")
            .and_then(|c| c.get_mut("monthly_tasks"))
            .and_then(Value::as_object_mut)
        {
            *tasks = shift_month_keys(std::mem::take(tasks), offset);
        }
    }
    adjusted
}

fn shift_month_lists(value: &mut Value, offset: i64) {
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                match child {
                    Value::Array(items) if MONTH_LIST_KEYS.contains(&key.as_str()) => {
                        for item in items.iter_mut() {
                            if let Some(m) = item.as_i64() {
                                *item = Value::from(adjust_month(m, offset));
                            }
                        }
                    }
                    other => shift_month_lists(other, offset),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                shift_month_lists(item, offset);
            }
        }
        _ => {}
    }
}

fn shift_month_keys(tasks: Map<String, Value>, offset: i64) -> Map<String, Value> {
    tasks
        .into_iter()
        .map(|(key, value)| match key.trim().parse::<i64>() {
            Ok(m) => (adjust_month(m, offset).to_string(), value),
            Err(_) => (key, value),
        })
        .collect()
}
