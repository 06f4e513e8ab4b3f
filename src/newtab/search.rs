use crate::error::NewtabError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    #[default]
    Google,
    Bing,
    Baidu,
    Duckduckgo,
}

impl SearchEngine {
    pub const ALL: [SearchEngine; 4] = [
        SearchEngine::Google,
        SearchEngine::Bing,
        SearchEngine::Baidu,
        SearchEngine::Duckduckgo,
    ];

    /// The key stored in settings.
    pub fn key(&self) -> &'static str {
        match self {
            SearchEngine::Google => "google",
            SearchEngine::Bing => "bing",
            SearchEngine::Baidu => "baidu",
            SearchEngine::Duckduckgo => "duckduckgo",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SearchEngine::Google => "Google",
            SearchEngine::Bing => "Bing",
            SearchEngine::Baidu => "百度",
            SearchEngine::Duckduckgo => "DuckDuckGo",
        }
    }

    pub fn query_prefix(&self) -> &'static str {
        match self {
            SearchEngine::Google => "https://www.google.com/search?q=",
            SearchEngine::Bing => "https://www.bing.com/search?q=",
            SearchEngine::Baidu => "https://www.baidu.com/s?wd=",
            SearchEngine::Duckduckgo => "https://duckduckgo.com/?q=",
        }
    }

    pub fn search_url(&self, query: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        format!("{}{}", self.query_prefix(), encoded)
    }
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SearchEngine {
    type Err = NewtabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SearchEngine::ALL
            .into_iter()
            .find(|e| e.key() == wanted)
            .ok_or_else(|| NewtabError::InvalidSetting(format!("Unknown search engine: {}", s)))
    }
}
