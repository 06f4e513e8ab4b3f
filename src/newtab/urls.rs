//! URL handling for bookmarks: turning what a user typed into an absolute
//! http(s) URL, deciding whether two URLs point at the same page, and picking
//! an icon.

use url::Url;

/// Rounded square with a plus sign, shown whenever a favicon fails to load.
pub const DEFAULT_ICON: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMzIiIGhlaWdodD0iMzIiIHZpZXdCb3g9IjAgMCAzMiAzMiIgZmlsbD0ibm9uZSIgeG1sbnM9Imh0dHA6Ly93d3cudzMub3JnLzIwMDAvc3ZnIj48cmVjdCB3aWR0aD0iMzIiIGhlaWdodD0iMzIiIHJ4PSI4IiBmaWxsPSIjNjM2NmYxIi8+PHBhdGggZD0iTTE2IDhWMjRNOCAxNkgyNCIgc3Ryb2tlPSJ3aGl0ZSIgc3Ryb2tlLXdpZHRoPSIyIiBzdHJva2UtbGluZWNhcD0icm91bmQiLz48L3N2Zz4=";

pub const DEFAULT_FAVICON_SIZE: u32 = 64;

const FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons";

/// Trims the input and prefixes `https://` when it has no `scheme://` part.
///
/// Never fails; the result may still not be a usable URL.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

fn has_scheme(s: &str) -> bool {
    match s.find("://") {
        Some(0) | None => false,
        Some(idx) => s[..idx].chars().all(|c| c.is_ascii_alphabetic()),
    }
}

/// True only for absolute URLs whose scheme is exactly `http` or `https`.
pub fn is_valid(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Lower-cased `origin + path` of the normalized URL, used to spot duplicate
/// bookmarks that differ only in query string or fragment.
///
/// Returns `None` when the URL cannot be parsed or has no tuple origin.
pub fn canonical_key(url: &str) -> Option<String> {
    let parsed = Url::parse(&normalize(url)).ok()?;
    let origin = parsed.origin();
    if !origin.is_tuple() {
        return None;
    }
    Some(format!("{}{}", origin.ascii_serialization(), parsed.path()).to_lowercase())
}

pub fn hostname(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .filter(|h| !h.is_empty())
}

/// Favicon service URL for the bookmark's host, or [`DEFAULT_ICON`] if the URL
/// has no host.
pub fn favicon_url(url: &str, size: u32) -> String {
    match hostname(url) {
        Some(host) => format!("{}?domain={}&sz={}", FAVICON_SERVICE, host, size),
        None => DEFAULT_ICON.to_string(),
    }
}
