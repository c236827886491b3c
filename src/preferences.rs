//! Hemisphere and debug-country preferences.
//!
//! The effective hemisphere is the stored choice if there is one, otherwise
//! southern when the timezone is a southern zone, otherwise the configured
//! default. Changing it notifies an optional listener so views can re-render.

use crate::calendar::{Hemisphere, is_southern_timezone};
use crate::storage::{KeyValueStore, StoreError};
use std::sync::mpsc::Sender;

pub const HEMISPHERE_KEY: &str = "calendar-hemisphere";
pub const DEBUG_COUNTRY_KEY: &str = "debug-country";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceEvent {
    HemisphereChanged(Hemisphere),
}

pub struct Preferences<'s, S: KeyValueStore + ?Sized> {
    store: &'s mut S,
    events: Option<Sender<PreferenceEvent>>,
}

impl<'s, S: KeyValueStore + ?Sized> Preferences<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self {
            store,
            events: None,
        }
    }

    pub fn with_events(mut self, events: Sender<PreferenceEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Stored hemisphere. Unknown stored values are ignored.
    pub fn hemisphere(&self) -> Option<Hemisphere> {
        let raw = self.store.get(HEMISPHERE_KEY)?;
        match raw.parse() {
            Ok(h) => Some(h),
            Err(_) => {
                log::warn!("ignoring stored hemisphere {raw:?}");
                None
            }
        }
    }

    /// Stored choice, then a southern `timezone`, then `default`.
    ///
    /// Only southern zones count as a signal; `UTC` or `Europe/Madrid` leave
    /// the default in place.
    pub fn effective_hemisphere(&self, timezone: Option<&str>, default: Hemisphere) -> Hemisphere {
        self.hemisphere()
            .or_else(|| {
                timezone
                    .filter(|tz| is_southern_timezone(tz))
                    .map(|_| Hemisphere::Southern)
            })
            .unwrap_or(default)
    }

    /// Store a hemisphere by name. Invalid names are ignored and return `None`.
    pub fn set_hemisphere(&mut self, value: &str) -> Result<Option<Hemisphere>, StoreError> {
        let Ok(hemisphere) = value.parse::<Hemisphere>() else {
            log::warn!("invalid hemisphere {value:?}");
            return Ok(None);
        };
        self.store.set(HEMISPHERE_KEY, hemisphere.as_str())?;
        log::info!("hemisphere set to {hemisphere}");
        if let Some(tx) = &self.events {
            let _ = tx.send(PreferenceEvent::HemisphereChanged(hemisphere));
        }
        Ok(Some(hemisphere))
    }

    pub fn debug_country(&self) -> Option<String> {
        self.store.get(DEBUG_COUNTRY_KEY).filter(|c| !c.is_empty())
    }

    pub fn set_debug_country(&mut self, code: &str) -> Result<(), StoreError> {
        self.store.set(DEBUG_COUNTRY_KEY, &code.trim().to_uppercase())
    }

    pub fn clear_debug_country(&mut self) -> Result<(), StoreError> {
        self.store.remove(DEBUG_COUNTRY_KEY)
    }
}
