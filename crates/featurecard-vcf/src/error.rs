use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VcfError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("contact '{contact}': {item} cannot be represented in vCard 2.1")]
    Unsupported { contact: String, item: String },
    #[error("contact '{contact}': malformed {item}")]
    Malformed { contact: String, item: String },
}

impl VcfError {
    pub fn is_strictness(&self) -> bool {
        matches!(self, VcfError::Unsupported { .. } | VcfError::Malformed { .. })
    }
}

pub type Result<T> = std::result::Result<T, VcfError>;
