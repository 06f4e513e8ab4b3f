//! # Settings Store
//!
//! Settings are three flat categories (`layout`, `wallpaper`, `appearance`)
//! persisted as one object under the `settings` key.
//!
//! Stored settings may be old, partial or written by a different version of
//! the page, so loading never trusts them: each category starts from its
//! defaults and every stored key is overlaid only if it is known and its value
//! has the right type. Whatever is stored, loading yields a complete
//! [`Settings`].
//!
//! Writes go through [`SettingsStore`], which persists first and only then
//! replaces its in-memory copy and notifies listeners. A failed write leaves
//! everything as it was.

use crate::error::{NewtabError, Result};
use crate::search::SearchEngine;
use crate::store::{DataStore, Record, StoreKey};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub const MAX_BLUR: u32 = 20;
pub const MAX_OVERLAY: u32 = 100;

/// Defaults in their stored JSON shape, the base every load overlays onto.
static DEFAULT_SETTINGS: Lazy<Value> =
    Lazy::new(|| serde_json::to_value(Settings::default()).unwrap_or(Value::Null));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsCategory {
    Layout,
    Wallpaper,
    Appearance,
}

impl SettingsCategory {
    pub const ALL: [SettingsCategory; 3] = [
        SettingsCategory::Layout,
        SettingsCategory::Wallpaper,
        SettingsCategory::Appearance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsCategory::Layout => "layout",
            SettingsCategory::Wallpaper => "wallpaper",
            SettingsCategory::Appearance => "appearance",
        }
    }

    /// Whether `value` is a complete, well-typed object for this category.
    fn accepts(&self, value: &Value) -> bool {
        let value = value.clone();
        match self {
            SettingsCategory::Layout => serde_json::from_value::<LayoutSettings>(value).is_ok(),
            SettingsCategory::Wallpaper => {
                serde_json::from_value::<WallpaperSettings>(value).is_ok()
            }
            SettingsCategory::Appearance => {
                serde_json::from_value::<AppearanceSettings>(value).is_ok()
            }
        }
    }
}

impl fmt::Display for SettingsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingsCategory {
    type Err = NewtabError;

    fn from_str(s: &str) -> Result<Self> {
        SettingsCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| NewtabError::InvalidSetting(format!("Unknown settings category: {}", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSettings {
    pub show_clock: bool,
    pub show_search: bool,
    pub show_bookmarks: bool,
    pub show_weather: bool,
    pub search_engine: SearchEngine,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            show_clock: true,
            show_search: true,
            show_bookmarks: true,
            show_weather: false,
            search_engine: SearchEngine::Google,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WallpaperKind {
    #[default]
    Gradient,
    Preset,
    #[serde(alias = "local")]
    LocalImage,
    #[serde(alias = "video")]
    LocalVideo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallpaperSettings {
    #[serde(rename = "type")]
    pub kind: WallpaperKind,
    pub value: String,
    pub blur: u32,
    pub overlay: u32,
}

impl Default for WallpaperSettings {
    fn default() -> Self {
        Self {
            kind: WallpaperKind::Gradient,
            value: String::new(),
            blur: 0,
            overlay: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClockFormat {
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,
    #[serde(rename = "12h")]
    TwelveHour,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    #[default]
    Long,
    Short,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceSettings {
    pub clock_format: ClockFormat,
    pub date_format: DateFormat,
    pub enhanced_animations: bool,
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            clock_format: ClockFormat::TwentyFourHour,
            date_format: DateFormat::Long,
            enhanced_animations: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    pub layout: LayoutSettings,
    pub wallpaper: WallpaperSettings,
    pub appearance: AppearanceSettings,
}

impl Settings {
    /// Rebuilds complete settings from whatever was stored.
    ///
    /// Missing categories and keys take their defaults. Unknown keys and
    /// values of the wrong type are dropped. Numbers outside their range are
    /// clamped.
    pub fn merge_with_defaults(persisted: Option<&Value>) -> Settings {
        let persisted = match persisted {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(other) => {
                warn!("stored settings are not an object ({}), using defaults", other);
                None
            }
        };

        let mut merged = Map::new();
        for category in SettingsCategory::ALL {
            let saved = persisted.and_then(|p| p.get(category.as_str()));
            merged.insert(
                category.as_str().to_string(),
                merge_category(category, saved),
            );
        }

        let mut settings: Settings =
            serde_json::from_value(Value::Object(merged)).unwrap_or_default();
        settings.clamp_ranges();
        settings
    }

    fn clamp_ranges(&mut self) {
        if self.wallpaper.blur > MAX_BLUR {
            debug!("clamping wallpaper blur {} to {}", self.wallpaper.blur, MAX_BLUR);
            self.wallpaper.blur = MAX_BLUR;
        }
        if self.wallpaper.overlay > MAX_OVERLAY {
            debug!(
                "clamping wallpaper overlay {} to {}",
                self.wallpaper.overlay, MAX_OVERLAY
            );
            self.wallpaper.overlay = MAX_OVERLAY;
        }
    }

    /// A copy with one key replaced. The key must exist in `category` and the
    /// value must have its type.
    pub fn with_value(&self, category: SettingsCategory, key: &str, value: Value) -> Result<Settings> {
        let mut root = serde_json::to_value(self)?;
        let section = root
            .get_mut(category.as_str())
            .and_then(Value::as_object_mut)
            .ok_or_else(|| NewtabError::InvalidSetting(format!("Missing category {}", category)))?;
        if !section.contains_key(key) {
            return Err(NewtabError::InvalidSetting(format!(
                "Unknown setting {}.{}",
                category, key
            )));
        }
        section.insert(key.to_string(), value);

        let mut next: Settings = serde_json::from_value(root)
            .map_err(|e| NewtabError::InvalidSetting(format!("{}.{}: {}", category, key, e)))?;
        next.clamp_ranges();
        Ok(next)
    }

    /// Reads one value in its stored JSON shape.
    pub fn value(&self, category: SettingsCategory, key: &str) -> Option<Value> {
        let root = serde_json::to_value(self).ok()?;
        root.get(category.as_str())?.get(key).cloned()
    }

    /// The `settings` key as it is written to the store.
    pub fn to_record(&self) -> Result<Record> {
        let mut record = Record::new();
        record.insert(
            StoreKey::Settings.as_str().to_string(),
            serde_json::to_value(self)?,
        );
        Ok(record)
    }
}

fn merge_category(category: SettingsCategory, saved: Option<&Value>) -> Value {
    let mut base = DEFAULT_SETTINGS
        .get(category.as_str())
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));

    let saved = match saved {
        None | Some(Value::Null) => return base,
        Some(Value::Object(map)) => map,
        Some(other) => {
            warn!("stored {} settings are not an object ({}), using defaults", category, other);
            return base;
        }
    };

    for (key, value) in saved {
        if base.get(key).is_none() {
            warn!("dropping unknown setting {}.{}", category, key);
            continue;
        }
        let mut candidate = base.clone();
        if let Some(section) = candidate.as_object_mut() {
            section.insert(key.clone(), value.clone());
        }
        if category.accepts(&candidate) {
            base = candidate;
        } else {
            warn!("dropping ill-typed setting {}.{} = {}", category, key, value);
        }
    }
    base
}

pub type Listener = Box<dyn Fn(&Settings)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// The live settings plus everyone who wants to hear about changes.
pub struct SettingsStore {
    current: Settings,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl SettingsStore {
    pub fn new(current: Settings) -> Self {
        Self {
            current,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Reads and repairs the stored settings.
    pub fn load<S: DataStore>(store: &S) -> Result<Settings> {
        let record = store.get(&[StoreKey::Settings])?;
        Ok(Settings::merge_with_defaults(
            record.get(StoreKey::Settings.as_str()),
        ))
    }

    pub fn open<S: DataStore>(store: &S) -> Result<Self> {
        Ok(Self::new(Self::load(store)?))
    }

    pub fn current(&self) -> &Settings {
        &self.current
    }

    pub fn get(&self, category: &str, key: &str) -> Option<Value> {
        let category = category.parse::<SettingsCategory>().ok()?;
        self.current.value(category, key)
    }

    /// Sets one key. Returns `Ok(false)` without touching anything when the
    /// category does not exist.
    pub fn update<S: DataStore>(
        &mut self,
        store: &mut S,
        category: &str,
        key: &str,
        value: Value,
    ) -> Result<bool> {
        let Ok(category) = category.parse::<SettingsCategory>() else {
            debug!("ignoring update to unknown settings category {}", category);
            return Ok(false);
        };
        let next = self.current.with_value(category, key, value)?;
        self.replace(store, next)?;
        info!("updated setting {}.{}", category, key);
        Ok(true)
    }

    pub fn reset<S: DataStore>(&mut self, store: &mut S) -> Result<Settings> {
        self.replace(store, Settings::default())?;
        info!("settings reset to defaults");
        Ok(self.current.clone())
    }

    /// Persists `next`, then makes it current.
    pub fn replace<S: DataStore>(&mut self, store: &mut S, next: Settings) -> Result<()> {
        store.set(next.to_record()?)?;
        self.commit(next);
        Ok(())
    }

    /// Makes already persisted settings current and notifies listeners.
    pub fn commit(&mut self, next: Settings) {
        self.current = next;
        for (_, listener) in &self.listeners {
            listener(&self.current);
        }
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&Settings) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }
}
