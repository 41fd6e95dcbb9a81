use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid region code: {0}")]
    InvalidRegion(String),
    #[error("invalid property name: {0}")]
    InvalidPropertyName(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum PhoneParseError {
    #[error("unknown region code: {0}")]
    UnknownRegion(String),
    #[error("{0}")]
    Rejected(String),
}
