//! Persistent Preferences
//!
//! A typed value mirrored into a [`Storage`] under a string key. Storage
//! problems are logged and never reach the caller; the in-memory value is
//! always authoritative for the running process.

use crate::logging;
use crate::storage::Storage;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage key for the scroll mode preference
pub const SCROLL_MODE_KEY: &str = "scrollMode";

/// A value kept in sync with durable storage
pub struct Preference<T> {
    storage: Arc<dyn Storage>,
    key: String,
    initial: T,
    value: T,
}

impl<T> Preference<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Load the value stored under `key`, falling back to `initial` when it
    /// is absent or unreadable, then write the current value back.
    pub fn new(storage: Arc<dyn Storage>, key: impl Into<String>, initial: T) -> Self {
        let key = key.into();
        let value = read_value(storage.as_ref(), &key).unwrap_or_else(|| initial.clone());
        let pref = Self {
            storage,
            key,
            initial,
            value,
        };
        pref.persist();
        pref
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value and persist it
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.persist();
    }

    /// Modify the value in place and persist it
    pub fn update(&mut self, f: impl FnOnce(&mut T)) {
        f(&mut self.value);
        self.persist();
    }

    /// Forget the stored value and go back to the initial one
    pub fn remove(&mut self) {
        if let Err(e) = self.storage.remove(&self.key) {
            logging::error(
                "PREFS",
                &format!("Error removing storage key '{}': {}", self.key, e),
            );
        }
        self.value = self.initial.clone();
    }

    fn persist(&self) {
        let raw = match serde_json::to_string(&self.value) {
            Ok(raw) => raw,
            Err(e) => {
                logging::error(
                    "PREFS",
                    &format!("Error serializing storage key '{}': {}", self.key, e),
                );
                return;
            }
        };
        if let Err(e) = self.storage.set(&self.key, &raw) {
            logging::error(
                "PREFS",
                &format!("Error setting storage key '{}': {}", self.key, e),
            );
        }
    }
}

fn read_value<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            logging::error("PREFS", &format!("Error reading storage key '{}': {}", key, e));
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            logging::error("PREFS", &format!("Error reading storage key '{}': {}", key, e));
            None
        }
    }
}

// ============================================================================
// Scroll mode
// ============================================================================

/// How the post list grows: appended pages or one page at a time.
///
/// Stored as a boolean flag (`true` = infinite scroll).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "bool", into = "bool")]
pub enum ScrollMode {
    #[default]
    Infinite,
    Paginated,
}

impl ScrollMode {
    pub fn toggled(self) -> Self {
        match self {
            ScrollMode::Infinite => ScrollMode::Paginated,
            ScrollMode::Paginated => ScrollMode::Infinite,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollMode::Infinite => "infinite",
            ScrollMode::Paginated => "paginated",
        }
    }
}

impl From<bool> for ScrollMode {
    fn from(infinite: bool) -> Self {
        if infinite {
            ScrollMode::Infinite
        } else {
            ScrollMode::Paginated
        }
    }
}

impl From<ScrollMode> for bool {
    fn from(mode: ScrollMode) -> bool {
        mode == ScrollMode::Infinite
    }
}

impl std::str::FromStr for ScrollMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "infinite" | "scroll" | "true" => Ok(ScrollMode::Infinite),
            "paginated" | "pages" | "false" => Ok(ScrollMode::Paginated),
            other => Err(format!(
                "unknown scroll mode '{}' (expected 'infinite' or 'paginated')",
                other
            )),
        }
    }
}

/// The scroll mode preference, defaulting to infinite scroll
pub fn scroll_mode(storage: Arc<dyn Storage>) -> Preference<ScrollMode> {
    Preference::new(storage, SCROLL_MODE_KEY, ScrollMode::Infinite)
}
