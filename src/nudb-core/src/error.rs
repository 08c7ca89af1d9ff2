use std::path::PathBuf;
use thiserror::Error;

/// Raised while normalizing call arguments, before any request is built.
#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("query must be a non-empty object")]
    WrongQueryFormat,

    #[error("file does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("invalid format parameter '{0}', must be 'json' or 'text'")]
    WrongFormatParameter(String),

    #[error("wrong data format, {0}")]
    WrongFormat(String),

    #[error("missing recbeg parameter, required when format is 'text'")]
    MissingRecBeg,
}
