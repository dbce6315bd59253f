use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read or write file: {0}")]
    Io(#[from] io::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("question id {0:?} is not an integer")]
    InvalidQuestionId(String),
    #[error("expected a list of questions, got {0}")]
    NotASequence(&'static str),
    #[error("no session token found. Ensure LEETCODE_SESSION is set in .env or the environment")]
    MissingSessionToken,
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("unknown difficulty {0:?} (expected Easy, Medium or Hard)")]
    UnknownDifficulty(String),
}

pub type Result<T> = std::result::Result<T, Error>;
