use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewtabError {
    #[error("Bookmark not found: {0}")]
    BookmarkNotFound(String),

    #[error("Todo not found: {0}")]
    TodoNotFound(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid backup file: {0}")]
    InvalidBackup(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Invalid request: {0}")]
    Contract(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, NewtabError>;
