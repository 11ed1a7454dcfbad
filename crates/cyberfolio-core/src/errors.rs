//! Error types shared by the engine.
//!
//! None of these ever reach a visitor as a failure: the session converts every one of
//! them into displayable content (an empty news panel, an inline preview error). They
//! exist so that the fetch and parse layers can report precisely what went wrong to the
//! log before the fail-open policy swallows them.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FolioError {
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("Proxy returned an error: {0}")]
    Proxy(String),
    #[error("Feed parsing failed: {0}")]
    FeedParse(String),
    #[error("Command '{0}' is already registered")]
    DuplicateCommand(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for FolioError {
    fn from(err: std::io::Error) -> Self {
        FolioError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for FolioError {
    fn from(err: reqwest::Error) -> Self {
        FolioError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(err: serde_json::Error) -> Self {
        FolioError::Proxy(format!("invalid JSON body: {}", err))
    }
}
