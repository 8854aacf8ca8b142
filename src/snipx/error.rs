use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnipxError {
    #[error("Snippet not found: {0}")]
    SnippetNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Invalid name '{name}': contains forbidden characters {chars:?}")]
    InvalidName { name: String, chars: Vec<char> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, SnipxError>;
