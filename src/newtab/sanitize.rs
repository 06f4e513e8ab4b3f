//! # Bookmark Sanitizer and Merger
//!
//! Stored bookmark lists come from many places: older versions of the page,
//! hand-edited backups, two devices whose copies were merged by the sync
//! layer. This module turns any such list into a collection that respects the
//! [`Bookmark`] invariants.
//!
//! ## Passes
//!
//! - [`sanitize`]: fills in missing ids and folders, drops duplicate ids
//!   (first one wins) and backfills `order` with a per-folder counter that
//!   continues after any explicit order it meets.
//! - [`normalize_orders`]: rewrites every folder's orders to `0..n-1` following
//!   `(order, id)`.
//! - [`merge_imported`]: the import path. Normalizes URLs, collapses records
//!   that point at the same page within a folder, then runs both passes above
//!   and rebuilds the folder registry.
//!
//! All passes are idempotent, so they run on every load. Per-record problems
//! are never errors: bad records are dropped and counted.

use crate::folders::list_folders;
use crate::model::{Bookmark, BookmarkDraft, BookmarkId, Library, SENTINEL_FOLDER};
use crate::urls;
use log::{debug, warn};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Counts of what happened to the records fed to [`merge_imported`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Bookmarks in the merged result.
    pub accepted: usize,
    /// Records folded into an earlier record with the same folder and page.
    pub duplicates: usize,
    /// Entries that could not be read as a bookmark at all.
    pub malformed: usize,
    /// Entries whose URL could not be keyed.
    pub unkeyable: usize,
    /// Entries whose URL is not http or https.
    pub unsupported: usize,
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub library: Library,
    pub report: MergeReport,
}

/// Canonicalizes drafts into bookmarks, keeping input order.
pub fn sanitize<I>(drafts: I) -> Vec<Bookmark>
where
    I: IntoIterator<Item = BookmarkDraft>,
{
    let mut seen: HashSet<BookmarkId> = HashSet::new();
    let mut counters: HashMap<String, u32> = HashMap::new();
    let mut out = Vec::new();

    for draft in drafts {
        let folder = folder_or_sentinel(draft.folder.as_deref());
        let id = match draft.id {
            Some(id) if !id.is_empty() => id,
            _ => BookmarkId::generate(),
        };

        if !seen.insert(id.clone()) {
            debug!("dropping bookmark with duplicate id {}", id);
            continue;
        }

        let counter = counters.entry(folder.clone()).or_insert(0);
        let order = draft.order.unwrap_or(*counter);
        *counter = order.saturating_add(1);

        let name = draft
            .name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| urls::hostname(&draft.url))
            .unwrap_or_else(|| draft.url.clone());
        let icon = draft
            .icon
            .filter(|i| !i.trim().is_empty())
            .unwrap_or_else(|| urls::favicon_url(&draft.url, urls::DEFAULT_FAVICON_SIZE));

        out.push(Bookmark {
            id,
            url: draft.url,
            name,
            icon,
            folder,
            order,
        });
    }

    out
}

fn folder_or_sentinel(folder: Option<&str>) -> String {
    match folder.map(str::trim) {
        Some(f) if !f.is_empty() => f.to_string(),
        _ => SENTINEL_FOLDER.to_string(),
    }
}

/// Rewrites orders to `0..n-1` per folder, following `(order, id)`.
///
/// Positions in the slice do not change.
pub fn normalize_orders(bookmarks: &mut [Bookmark]) {
    let mut by_folder: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, b) in bookmarks.iter().enumerate() {
        by_folder.entry(b.folder.as_str()).or_default().push(idx);
    }

    let mut assignments: Vec<(usize, u32)> = Vec::with_capacity(bookmarks.len());
    for mut members in by_folder.into_values() {
        members.sort_by(|&a, &b| bookmarks[a].rank().cmp(&bookmarks[b].rank()));
        assignments.extend(
            members
                .into_iter()
                .enumerate()
                .map(|(rank, idx)| (idx, rank as u32)),
        );
    }

    for (idx, order) in assignments {
        bookmarks[idx].order = order;
    }
}

/// Reads raw JSON entries as drafts. Returns the drafts and how many entries
/// were unreadable.
pub fn drafts_from_values(values: &[Value]) -> (Vec<BookmarkDraft>, usize) {
    let mut malformed = 0;
    let drafts = values
        .iter()
        .filter_map(|v| match serde_json::from_value::<BookmarkDraft>(v.clone()) {
            Ok(draft) => Some(draft),
            Err(e) => {
                debug!("skipping malformed bookmark entry: {}", e);
                malformed += 1;
                None
            }
        })
        .collect();
    (drafts, malformed)
}

/// Builds a consistent library from stored data: sanitize, densify, and derive
/// the folder registry.
pub fn restore(drafts: Vec<BookmarkDraft>, explicit_folders: &[String]) -> Library {
    let mut bookmarks = sanitize(drafts);
    normalize_orders(&mut bookmarks);
    let folders = list_folders(explicit_folders, &bookmarks);
    Library { bookmarks, folders }
}

/// Merges bookmarks from an external source.
///
/// Records sharing a folder and canonical URL collapse into the first one:
/// its id, url and order stay, while later non-empty names and icons replace
/// earlier ones.
pub fn merge_imported(raw: &[Value], explicit_folders: &[String]) -> MergeOutcome {
    let (drafts, malformed) = drafts_from_values(raw);
    let mut report = MergeReport {
        malformed,
        ..Default::default()
    };

    let mut merged: Vec<BookmarkDraft> = Vec::with_capacity(drafts.len());
    let mut slots: HashMap<String, usize> = HashMap::new();

    for mut draft in drafts {
        draft.url = urls::normalize(&draft.url);
        let folder = folder_or_sentinel(draft.folder.as_deref());

        let Some(canonical) = urls::canonical_key(&draft.url) else {
            debug!("skipping bookmark with unkeyable url {:?}", draft.url);
            report.unkeyable += 1;
            continue;
        };
        if !urls::is_valid(&draft.url) {
            debug!("skipping bookmark with non-web url {:?}", draft.url);
            report.unsupported += 1;
            continue;
        }
        let key = format!("{}|{}", folder, canonical);
        draft.folder = Some(folder);

        match slots.get(&key).copied() {
            Some(slot) => {
                let earlier = &mut merged[slot];
                if let Some(name) = draft.name.filter(|n| !n.trim().is_empty()) {
                    earlier.name = Some(name);
                }
                if let Some(icon) = draft.icon.filter(|i| !i.trim().is_empty()) {
                    earlier.icon = Some(icon);
                }
                report.duplicates += 1;
            }
            None => {
                slots.insert(key, merged.len());
                merged.push(draft);
            }
        }
    }

    let library = restore(merged, explicit_folders);
    report.accepted = library.bookmarks.len();

    if report.malformed > 0 || report.unkeyable > 0 || report.unsupported > 0 {
        warn!(
            "import dropped {} malformed, {} unkeyable and {} non-web bookmark entries",
            report.malformed, report.unkeyable, report.unsupported
        );
    }

    MergeOutcome { library, report }
}
