use thiserror::Error;

/// Errors produced by ledger decoding, encoding and payload conversion
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A structured payload did not have the `{entries, keymap}` shape
    #[error("invalid payload shape: {0}")]
    InvalidPayloadShape(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    pub(crate) fn shape(message: impl Into<String>) -> Self {
        LedgerError::InvalidPayloadShape(message.into())
    }
}

#[cfg(feature = "yaml")]
impl From<serde_yaml::Error> for LedgerError {
    fn from(err: serde_yaml::Error) -> Self {
        LedgerError::Yaml(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
