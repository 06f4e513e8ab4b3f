//! Byte storage for payloads too large for the synchronized store. The page
//! keeps a single uploaded video wallpaper here; the core never looks inside
//! the bytes.

use crate::error::{NewtabError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// The one slot the wallpaper feature uses.
pub const VIDEO_SLOT: &str = "current-video";

pub trait BlobStore {
    fn get(&self, slot: &str) -> Result<Option<Vec<u8>>>;

    fn put(&mut self, slot: &str, bytes: &[u8]) -> Result<()>;

    /// Deleting an empty slot is not an error.
    fn delete(&mut self, slot: &str) -> Result<()>;
}

/// One file per slot under `root`.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn slot_path(&self, slot: &str) -> Result<PathBuf> {
        if slot.is_empty()
            || !slot
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(NewtabError::Store(format!("Invalid blob slot: {:?}", slot)));
        }
        Ok(self.root.join(format!("blob-{}.bin", slot)))
    }
}

impl BlobStore for FsBlobStore {
    fn get(&self, slot: &str) -> Result<Option<Vec<u8>>> {
        let path = self.slot_path(slot)?;
        if !path.exists() {
            return Ok(None);
        }
        fs::read(path).map(Some).map_err(NewtabError::Io)
    }

    fn put(&mut self, slot: &str, bytes: &[u8]) -> Result<()> {
        let path = self.slot_path(slot)?;
        fs::create_dir_all(&self.root).map_err(NewtabError::Io)?;
        let tmp = self.root.join(format!(".blob-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, bytes).map_err(NewtabError::Io)?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(NewtabError::Io(e));
        }
        Ok(())
    }

    fn delete(&mut self, slot: &str) -> Result<()> {
        let path = self.slot_path(slot)?;
        if path.exists() {
            fs::remove_file(path).map_err(NewtabError::Io)?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemBlobStore {
    slots: HashMap<String, Vec<u8>>,
}

impl MemBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemBlobStore {
    fn get(&self, slot: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.slots.get(slot).cloned())
    }

    fn put(&mut self, slot: &str, bytes: &[u8]) -> Result<()> {
        self.slots.insert(slot.to_string(), bytes.to_vec());
        Ok(())
    }

    fn delete(&mut self, slot: &str) -> Result<()> {
        self.slots.remove(slot);
        Ok(())
    }
}
