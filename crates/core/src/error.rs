use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("partial match requires at least one search word of {min_len} or more characters, got: {phrase:?}")]
    InsufficientQueryWords { phrase: String, min_len: usize },

    #[error("regex error: {0}")]
    Regex(String),
}

impl From<regex::Error> for MatchError {
    fn from(error: regex::Error) -> Self {
        Self::Regex(error.to_string())
    }
}

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pdf parse error: {0}")]
    PdfParse(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("extraction pool closed: {0}")]
    PoolClosed(#[from] tokio::sync::AcquireError),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum RevealError {
    #[error("path does not exist: {0}")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
