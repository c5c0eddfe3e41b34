use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid mailbox name pattern: {0}")]
    Pattern(String),

    #[error("Query builder misuse: {0}")]
    QueryBuilder(String),

    #[error("Search backend error: {0}")]
    Backend(String),

    #[error("Backend hit {hit_id} carries no message id")]
    MissingMessageId { hit_id: String },

    #[error("Backend hit {hit_id} carries an unparsable message id: {value}")]
    InvalidMessageId { hit_id: String, value: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;
