use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::settings::SettingsStore;
use crate::store::DataStore;
use serde_json::Value;

pub fn show(settings: &SettingsStore) -> Result<CmdResult> {
    Ok(CmdResult::default().with_settings(settings.current().clone()))
}

/// Sets `category.key`. The raw value is read as JSON when it parses
/// (`true`, `12`, `"x"`), otherwise as a plain string. Keys holding text
/// always take the text as given.
pub fn set<S: DataStore>(
    store: &mut S,
    settings: &mut SettingsStore,
    category: &str,
    key: &str,
    raw: &str,
) -> Result<CmdResult> {
    let value = parse_value(raw, settings.get(category, key).as_ref());
    let mut result = CmdResult::default();
    if !settings.update(store, category, key, value)? {
        result.add_message(CmdMessage::warning(format!(
            "Unknown settings category: {}",
            category
        )));
        return Ok(result);
    }

    let shown = settings
        .get(category, key)
        .map(|v| v.to_string())
        .unwrap_or_default();
    result.add_message(CmdMessage::success(format!(
        "{}.{} set to {}",
        category, key, shown
    )));
    Ok(result.with_settings(settings.current().clone()))
}

pub fn reset<S: DataStore>(store: &mut S, settings: &mut SettingsStore) -> Result<CmdResult> {
    let defaults = settings.reset(store)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success("Settings reset to defaults"));
    Ok(result.with_settings(defaults))
}

fn parse_value(raw: &str, current: Option<&Value>) -> Value {
    let parsed = serde_json::from_str::<Value>(raw.trim());
    match (current, parsed) {
        (Some(Value::String(_)), Ok(Value::String(text))) => Value::String(text),
        (Some(Value::String(_)), _) => Value::String(raw.to_string()),
        (_, Ok(value)) => value,
        (_, Err(_)) => Value::String(raw.to_string()),
    }
}
