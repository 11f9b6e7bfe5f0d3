use thiserror::Error;

#[derive(Debug, Error)]
pub enum CfsError {
    #[error("Sheet not found: '{sheet}' (available: {})", available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("Header row not found: no row contains a cell labelled '{label}'")]
    HeaderRowNotFound { label: String },

    #[error("Empty or malformed input: {0}")]
    EmptyOrMalformedInput(String),

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CfsError {
    fn from(e: serde_json::Error) -> Self {
        CfsError::SerializationError(e.to_string())
    }
}

impl From<csv::Error> for CfsError {
    fn from(e: csv::Error) -> Self {
        CfsError::EmptyOrMalformedInput(e.to_string())
    }
}
