use super::{select, DataStore, Record, StoreKey};
use crate::error::{NewtabError, Result};
use log::debug;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const RECORD_FILENAME: &str = "sync.json";

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn record_path(&self) -> PathBuf {
        self.root.join(RECORD_FILENAME)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(NewtabError::Io)?;
        }
        Ok(())
    }

    fn load_record(&self) -> Result<Record> {
        let path = self.record_path();
        if !path.exists() {
            return Ok(Record::new());
        }
        let content = fs::read_to_string(&path).map_err(NewtabError::Io)?;
        if content.trim().is_empty() {
            return Ok(Record::new());
        }
        match serde_json::from_str::<Value>(&content).map_err(NewtabError::Serialization)? {
            Value::Object(record) => Ok(record),
            _ => Err(NewtabError::Store(format!(
                "{} does not hold a JSON object",
                path.display()
            ))),
        }
    }

    fn save_record(&self, record: &Record) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(record).map_err(NewtabError::Serialization)?;

        // Write to a temp file and rename so readers never see half a record
        let tmp_file = self.root.join(format!(".sync-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(NewtabError::Io)?;
        if let Err(e) = fs::rename(&tmp_file, self.record_path()) {
            let _ = fs::remove_file(&tmp_file);
            return Err(NewtabError::Io(e));
        }
        Ok(())
    }
}

impl DataStore for FileStore {
    fn get(&self, keys: &[StoreKey]) -> Result<Record> {
        let all = self.load_record()?;
        Ok(select(&all, keys))
    }

    fn get_all(&self) -> Result<Record> {
        self.load_record()
    }

    fn set(&mut self, record: Record) -> Result<()> {
        let mut all = self.load_record()?;
        let keys: Vec<String> = record.keys().cloned().collect();
        all.extend(record);
        self.save_record(&all)?;
        debug!("stored keys {:?} in {}", keys, self.record_path().display());
        Ok(())
    }
}
