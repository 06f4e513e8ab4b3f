use crate::commands::{CmdMessage, CmdResult};
use crate::error::{NewtabError, Result};
use crate::settings::{SettingsStore, WallpaperKind};
use crate::store::blob::{BlobStore, VIDEO_SLOT};
use crate::store::DataStore;
use log::warn;

/// Marker stored as the wallpaper value while the video lives in the blob slot.
pub const LOCAL_VIDEO_VALUE: &str = "local";

/// Stores the video, then points the wallpaper at it. When the settings write
/// fails the slot gets its previous bytes back.
pub fn set_video<S: DataStore, B: BlobStore>(
    store: &mut S,
    settings: &mut SettingsStore,
    blobs: &mut B,
    bytes: &[u8],
) -> Result<CmdResult> {
    if bytes.is_empty() {
        return Err(NewtabError::Contract("Video file is empty".to_string()));
    }
    let previous = blobs.get(VIDEO_SLOT)?;
    blobs.put(VIDEO_SLOT, bytes)?;

    let mut next = settings.current().clone();
    next.wallpaper.kind = WallpaperKind::LocalVideo;
    next.wallpaper.value = LOCAL_VIDEO_VALUE.to_string();
    if let Err(e) = settings.replace(store, next) {
        let restored = match previous {
            Some(old) => blobs.put(VIDEO_SLOT, &old),
            None => blobs.delete(VIDEO_SLOT),
        };
        if let Err(undo) = restored {
            warn!("could not restore the previous video: {}", undo);
        }
        return Err(e);
    }

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Video wallpaper set ({} bytes)",
        bytes.len()
    )));
    Ok(result.with_settings(settings.current().clone()))
}

/// Points the wallpaper back at the gradient, then drops the video. A video
/// left behind by a failed delete is unreferenced and only reported.
pub fn clear_video<S: DataStore, B: BlobStore>(
    store: &mut S,
    settings: &mut SettingsStore,
    blobs: &mut B,
) -> Result<CmdResult> {
    let mut next = settings.current().clone();
    next.wallpaper.kind = WallpaperKind::Gradient;
    next.wallpaper.value = String::new();
    settings.replace(store, next)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success("Wallpaper reset to gradient"));
    if let Err(e) = blobs.delete(VIDEO_SLOT) {
        warn!("could not delete the stored video: {}", e);
        result.add_message(CmdMessage::warning(format!(
            "The old video could not be removed: {}",
            e
        )));
    }
    Ok(result.with_settings(settings.current().clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::blob::MemBlobStore;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn video_roundtrip() {
        let mut store = InMemoryStore::new();
        let mut settings = SettingsStore::open(&store).unwrap();
        let mut blobs = MemBlobStore::new();

        set_video(&mut store, &mut settings, &mut blobs, b"mp4").unwrap();
        assert_eq!(settings.current().wallpaper.kind, WallpaperKind::LocalVideo);
        assert_eq!(settings.current().wallpaper.value, LOCAL_VIDEO_VALUE);
        assert_eq!(blobs.get(VIDEO_SLOT).unwrap(), Some(b"mp4".to_vec()));

        clear_video(&mut store, &mut settings, &mut blobs).unwrap();
        assert_eq!(settings.current().wallpaper.kind, WallpaperKind::Gradient);
        assert!(settings.current().wallpaper.value.is_empty());
        assert_eq!(blobs.get(VIDEO_SLOT).unwrap(), None);
    }

    #[test]
    fn empty_video_is_rejected() {
        let mut store = InMemoryStore::new();
        let mut settings = SettingsStore::open(&store).unwrap();
        let mut blobs = MemBlobStore::new();
        assert!(set_video(&mut store, &mut settings, &mut blobs, b"").is_err());
        assert_eq!(blobs.get(VIDEO_SLOT).unwrap(), None);
    }

    #[test]
    fn failed_settings_write_restores_the_slot() {
        let mut store = InMemoryStore::new();
        let mut settings = SettingsStore::open(&store).unwrap();
        let mut blobs = MemBlobStore::new();

        store.set_simulate_write_error(true);
        assert!(set_video(&mut store, &mut settings, &mut blobs, b"first").is_err());
        assert_eq!(blobs.get(VIDEO_SLOT).unwrap(), None);
        assert_eq!(settings.current().wallpaper.kind, WallpaperKind::Gradient);

        store.set_simulate_write_error(false);
        set_video(&mut store, &mut settings, &mut blobs, b"mp4").unwrap();

        store.set_simulate_write_error(true);
        assert!(set_video(&mut store, &mut settings, &mut blobs, b"other").is_err());
        assert_eq!(blobs.get(VIDEO_SLOT).unwrap(), Some(b"mp4".to_vec()));

        assert!(clear_video(&mut store, &mut settings, &mut blobs).is_err());
        assert_eq!(settings.current().wallpaper.kind, WallpaperKind::LocalVideo);
        assert_eq!(blobs.get(VIDEO_SLOT).unwrap(), Some(b"mp4".to_vec()));
    }
}
