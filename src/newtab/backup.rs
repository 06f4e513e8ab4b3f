//! # Backup Envelope
//!
//! A backup is the whole store record wrapped in a small envelope:
//!
//! ```json
//! { "version": "1.0", "exportDate": "2024-05-01T09:30:00.000Z", "data": { ... } }
//! ```
//!
//! `data` holds stored keys verbatim. `settings`, `bookmarks` and `folders` are
//! understood; anything else belongs to some other feature and is carried
//! through export and import untouched.
//!
//! Envelope problems (not JSON, no version, no data object) reject the whole
//! file before anything is changed. Problems inside `data` are repaired by the
//! import path, never rejected here.
//!
//! Files may be gzip-compressed; reading sniffs the gzip magic bytes so the
//! file name does not matter.

use crate::error::{NewtabError, Result};
use crate::store::{Record, StoreKey};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::{debug, warn};
use serde_json::{json, Value};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

pub const BACKUP_VERSION: &str = "1.0";

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Clone, PartialEq)]
pub struct Backup {
    pub version: String,
    /// Kept as written; older exports may carry odd formats.
    pub export_date: Option<String>,
    pub data: Record,
}

impl Backup {
    /// Wraps `data` in a fresh envelope stamped with the current time.
    pub fn new(data: Record) -> Self {
        Self {
            version: BACKUP_VERSION.to_string(),
            export_date: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            data,
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| NewtabError::InvalidBackup(format!("not valid JSON: {}", e)))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut envelope) = value else {
            return Err(NewtabError::InvalidBackup(
                "backup must be a JSON object".to_string(),
            ));
        };

        let version = match envelope.remove("version") {
            Some(Value::String(v)) if !v.trim().is_empty() => v,
            Some(_) => {
                return Err(NewtabError::InvalidBackup(
                    "version must be a non-empty string".to_string(),
                ))
            }
            None => return Err(NewtabError::InvalidBackup("missing version".to_string())),
        };

        let data = match envelope.remove("data") {
            Some(Value::Object(data)) => data,
            Some(_) => {
                return Err(NewtabError::InvalidBackup(
                    "data must be an object".to_string(),
                ))
            }
            None => return Err(NewtabError::InvalidBackup("missing data".to_string())),
        };

        let export_date = match envelope.remove("exportDate") {
            Some(Value::String(d)) => Some(d),
            Some(other) => {
                debug!("ignoring non-string exportDate {}", other);
                None
            }
            None => None,
        };

        if version != BACKUP_VERSION {
            warn!("reading backup version {} as {}", version, BACKUP_VERSION);
        }

        Ok(Self {
            version,
            export_date,
            data,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut envelope = json!({
            "version": self.version,
            "data": Value::Object(self.data.clone()),
        });
        if let (Some(date), Some(obj)) = (&self.export_date, envelope.as_object_mut()) {
            obj.insert("exportDate".to_string(), Value::String(date.clone()));
        }
        envelope
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_value())?)
    }

    pub fn exported_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.export_date.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }

    /// Raw bookmark entries. A non-list value counts as no bookmarks.
    pub fn bookmarks(&self) -> &[Value] {
        match self.data.get(StoreKey::Bookmarks.as_str()) {
            Some(Value::Array(list)) => list.as_slice(),
            Some(other) => {
                warn!("backup bookmarks is not a list ({}), ignoring", type_name(other));
                &[]
            }
            None => &[],
        }
    }

    /// Folder names; entries that are not strings are skipped.
    pub fn folders(&self) -> Vec<String> {
        match self.data.get(StoreKey::Folders.as_str()) {
            Some(Value::Array(list)) => list
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn todos(&self) -> &[Value] {
        match self.data.get(StoreKey::Todos.as_str()) {
            Some(Value::Array(list)) => list.as_slice(),
            Some(other) => {
                warn!("backup todos is not a list ({}), ignoring", type_name(other));
                &[]
            }
            None => &[],
        }
    }

    /// Whether `data` carries `key` at all.
    pub fn has(&self, key: StoreKey) -> bool {
        self.data.contains_key(key.as_str())
    }

    pub fn settings(&self) -> Option<&Value> {
        self.data.get(StoreKey::Settings.as_str())
    }

    /// Keys that belong to nobody in this crate.
    pub fn passthrough(&self) -> Record {
        self.data
            .iter()
            .filter(|(k, _)| !StoreKey::ALL.iter().any(|known| known.as_str() == k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// `<prefix>-YYYY-MM-DD.json`, with `.gz` appended when compressed.
pub fn default_filename(prefix: &str, date: NaiveDate, compress: bool) -> String {
    let mut name = format!("{}-{}.json", prefix, date.format("%Y-%m-%d"));
    if compress {
        name.push_str(".gz");
    }
    name
}

pub fn read_file(path: &Path) -> Result<Backup> {
    let bytes = fs::read(path)?;
    let text = if bytes.starts_with(&GZIP_MAGIC) {
        debug!("{} is gzip-compressed", path.display());
        let mut text = String::new();
        GzDecoder::new(bytes.as_slice())
            .read_to_string(&mut text)
            .map_err(|e| NewtabError::InvalidBackup(format!("bad gzip data: {}", e)))?;
        text
    } else {
        String::from_utf8(bytes)
            .map_err(|_| NewtabError::InvalidBackup("file is not UTF-8 text".to_string()))?
    };
    Backup::parse(&text)
}

pub fn write_file(path: &Path, backup: &Backup, compress: bool) -> Result<()> {
    let text = backup.to_json_pretty()?;
    if compress {
        let file = fs::File::create(path)?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(text.as_bytes())?;
        encoder.finish()?;
    } else {
        fs::write(path, text)?;
    }
    debug!("wrote backup to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_minimal_envelope() {
        let backup = Backup::parse(r#"{"version":"1.0","data":{}}"#).unwrap();
        assert_eq!(backup.version, "1.0");
        assert_eq!(backup.export_date, None);
        assert!(backup.bookmarks().is_empty());
        assert!(backup.folders().is_empty());
        assert!(backup.settings().is_none());
    }

    #[test]
    fn parse_rejects_broken_envelopes() {
        for text in [
            "not json",
            "[1,2]",
            r#"{"data":{}}"#,
            r#"{"version":"","data":{}}"#,
            r#"{"version":1,"data":{}}"#,
            r#"{"version":"1.0"}"#,
            r#"{"version":"1.0","data":[]}"#,
        ] {
            assert!(
                matches!(Backup::parse(text), Err(NewtabError::InvalidBackup(_))),
                "accepted {}",
                text
            );
        }
    }

    #[test]
    fn known_and_unknown_keys_are_split() {
        let backup = Backup::parse(
            r#"{"version":"1.0","exportDate":"2024-05-01T09:30:00.000Z","data":{
                "bookmarks":[{"url":"a.com"}],
                "folders":["All","Work",3],
                "todos":[{"text":"x"}],
                "weather":{"city":"Oslo"}
            }}"#,
        )
        .unwrap();
        assert_eq!(backup.bookmarks().len(), 1);
        assert_eq!(backup.folders(), vec!["All", "Work"]);
        let extra = backup.passthrough();
        assert_eq!(extra.len(), 1);
        assert!(extra.contains_key("weather"));
        assert_eq!(backup.todos().len(), 1);
        assert!(backup.has(StoreKey::Todos));
        assert!(!backup.has(StoreKey::Settings));
        assert_eq!(
            backup.exported_at().unwrap().format("%Y-%m-%d").to_string(),
            "2024-05-01"
        );
    }

    #[test]
    fn new_envelope_is_stamped() {
        let backup = Backup::new(Record::new());
        assert_eq!(backup.version, BACKUP_VERSION);
        assert!(backup.exported_at().is_some());
        let value = backup.to_value();
        assert!(value["exportDate"].is_string());
        assert!(value["data"].is_object());
    }

    #[test]
    fn default_filename_uses_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            default_filename("newtab-backup", date, false),
            "newtab-backup-2024-03-07.json"
        );
        assert_eq!(
            default_filename("mine", date, true),
            "mine-2024-03-07.json.gz"
        );
    }

    #[test]
    fn files_roundtrip_plain_and_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let mut data = Record::new();
        data.insert("folders".into(), json!(["All", "Work"]));
        let backup = Backup::new(data);

        let plain = dir.path().join("b.json");
        write_file(&plain, &backup, false).unwrap();
        assert_eq!(read_file(&plain).unwrap(), backup);

        // compressed content is detected regardless of the name
        let packed = dir.path().join("b.json");
        write_file(&packed, &backup, true).unwrap();
        assert!(fs::read(&packed).unwrap().starts_with(&GZIP_MAGIC));
        assert_eq!(read_file(&packed).unwrap(), backup);
    }
}
