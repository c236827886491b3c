//! Favorite plants.
//!
//! Stored under one key as
//! `{"version": 1, "favorites": [...], "created": <ms>, "count": n}`.
//! At most [`MAX_FAVORITES`] ids are kept. Unreadable data is treated as
//! an empty list rather than an error.

use crate::storage::{KeyValueStore, StoreError};
use serde::Serialize;
use serde_json::{Value, json};

pub const FAVORITES_KEY: &str = "plantas-favorites";
pub const MAX_FAVORITES: usize = 200;
const FAVORITES_VERSION: u64 = 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FavoritesStats {
    pub count: usize,
    pub max_allowed: usize,
    pub percentage_full: f64,
    pub can_add_more: bool,
}

fn valid_ids<'a, I>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    ids.into_iter()
        .filter(|id| !id.trim().is_empty())
        .map(str::to_string)
        .take(MAX_FAVORITES)
        .collect()
}

/// Favorites kept in a [`KeyValueStore`].
pub struct Favorites<'s, S: KeyValueStore + ?Sized> {
    store: &'s mut S,
}

impl<'s, S: KeyValueStore + ?Sized> Favorites<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self { store }
    }

    /// Current favorites; corrupt or foreign data reads as none.
    pub fn load(&self) -> Vec<String> {
        let Some(raw) = self.store.get(FAVORITES_KEY) else {
            return Vec::new();
        };
        let data: Value = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("error loading favorites: {e}");
                return Vec::new();
            }
        };
        let version_ok = data.get("version").and_then(Value::as_u64) == Some(FAVORITES_VERSION);
        match data.get("favorites").and_then(Value::as_array) {
            Some(list) if version_ok => valid_ids(list.iter().filter_map(Value::as_str)),
            _ => {
                log::warn!("corrupt favorites data, resetting");
                Vec::new()
            }
        }
    }

    /// Replace the stored list. Blank ids are dropped and the list is capped.
    pub fn save(&mut self, favorites: &[String]) -> Result<Vec<String>, StoreError> {
        let kept = valid_ids(favorites.iter().map(String::as_str));
        let data = json!({
            "version": FAVORITES_VERSION,
            "favorites": kept,
            "created": chrono::Utc::now().timestamp_millis(),
            "count": kept.len(),
        });
        self.store.set(FAVORITES_KEY, &data.to_string())?;
        Ok(kept)
    }

    /// Add `id`. Duplicates and additions past the limit leave the list as is.
    pub fn add(&mut self, id: &str) -> Result<Vec<String>, StoreError> {
        let mut favorites = self.load();
        if id.trim().is_empty() {
            log::warn!("invalid plant id: {id:?}");
            return Ok(favorites);
        }
        if favorites.iter().any(|f| f == id) {
            return Ok(favorites);
        }
        if favorites.len() >= MAX_FAVORITES {
            log::warn!("favorites limit of {MAX_FAVORITES} reached");
            return Ok(favorites);
        }
        favorites.push(id.to_string());
        self.save(&favorites)
    }

    pub fn remove(&mut self, id: &str) -> Result<Vec<String>, StoreError> {
        let favorites = self.load();
        if id.trim().is_empty() {
            log::warn!("invalid plant id: {id:?}");
            return Ok(favorites);
        }
        let kept: Vec<String> = favorites.into_iter().filter(|f| f != id).collect();
        self.save(&kept)
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        !id.trim().is_empty() && self.load().iter().any(|f| f == id)
    }

    /// Flip `id` and return whether it is now a favorite.
    pub fn toggle(&mut self, id: &str) -> Result<bool, StoreError> {
        if self.is_favorite(id) {
            self.remove(id)?;
            Ok(false)
        } else {
            Ok(self.add(id)?.iter().any(|f| f == id))
        }
    }

    pub fn stats(&self) -> FavoritesStats {
        let count = self.load().len();
        FavoritesStats {
            count,
            max_allowed: MAX_FAVORITES,
            percentage_full: count as f64 / MAX_FAVORITES as f64 * 100.0,
            can_add_more: count < MAX_FAVORITES,
        }
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.store.remove(FAVORITES_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn add_remove_and_query() {
        let mut store = MemoryStore::new();
        let mut favs = Favorites::new(&mut store);
        assert!(favs.load().is_empty());

        assert_eq!(favs.add("rosa/banksiae").unwrap(), vec!["rosa/banksiae"]);
        assert_eq!(favs.add("rosa/banksiae").unwrap().len(), 1);
        favs.add("tomate/cherry").unwrap();
        assert!(favs.is_favorite("tomate/cherry"));

        assert_eq!(favs.remove("rosa/banksiae").unwrap(), vec!["tomate/cherry"]);
        assert!(!favs.is_favorite("rosa/banksiae"));
    }

    #[test]
    fn stored_shape() {
        let mut store = MemoryStore::new();
        Favorites::new(&mut store).add("a").unwrap();
        let raw: Value = serde_json::from_str(&store.get(FAVORITES_KEY).unwrap()).unwrap();
        assert_eq!(raw["version"], 1);
        assert_eq!(raw["favorites"], json!(["a"]));
        assert_eq!(raw["count"], 1);
        assert!(raw["created"].as_i64().unwrap() > 0);
    }

    #[test]
    fn blank_ids_rejected() {
        let mut store = MemoryStore::new();
        let mut favs = Favorites::new(&mut store);
        assert!(favs.add("  ").unwrap().is_empty());
        assert!(!favs.is_favorite(""));
        let saved = favs.save(&["a".into(), "".into(), " ".into(), "b".into()]).unwrap();
        assert_eq!(saved, vec!["a", "b"]);
    }

    #[test]
    fn never_more_than_limit() {
        let mut store = MemoryStore::new();
        let mut favs = Favorites::new(&mut store);
        let many: Vec<String> = (0..250).map(|i| format!("planta-{i}")).collect();
        assert_eq!(favs.save(&many).unwrap().len(), MAX_FAVORITES);

        let after = favs.add("una-mas").unwrap();
        assert_eq!(after.len(), MAX_FAVORITES);
        assert!(!after.contains(&"una-mas".to_string()));

        let stats = favs.stats();
        assert_eq!(stats.count, MAX_FAVORITES);
        assert!(!stats.can_add_more);
        assert_eq!(stats.percentage_full, 100.0);
    }

    #[test]
    fn corrupt_data_reads_empty() {
        let mut store = MemoryStore::new();
        store.set(FAVORITES_KEY, "{oops").unwrap();
        assert!(Favorites::new(&mut store).load().is_empty());

        store
            .set(FAVORITES_KEY, r#"{"version": 2, "favorites": ["a"]}"#)
            .unwrap();
        assert!(Favorites::new(&mut store).load().is_empty());

        store
            .set(FAVORITES_KEY, r#"{"version": 1, "favorites": "a"}"#)
            .unwrap();
        assert!(Favorites::new(&mut store).load().is_empty());
    }

    #[test]
    fn non_string_entries_dropped_on_load() {
        let mut store = MemoryStore::new();
        store
            .set(FAVORITES_KEY, r#"{"version": 1, "favorites": ["a", 3, null, "b"]}"#)
            .unwrap();
        assert_eq!(Favorites::new(&mut store).load(), vec!["a", "b"]);
    }

    #[test]
    fn toggle_and_clear() {
        let mut store = MemoryStore::new();
        let mut favs = Favorites::new(&mut store);
        assert!(favs.toggle("a").unwrap());
        assert!(!favs.toggle("a").unwrap());
        favs.add("b").unwrap();
        favs.clear().unwrap();
        assert!(favs.load().is_empty());
        assert_eq!(favs.stats().percentage_full, 0.0);
    }
}
