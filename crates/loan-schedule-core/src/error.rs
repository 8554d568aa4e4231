use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanScheduleError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Loan term \"{term}\" cannot be lower than 1")]
    TermOutOfRange { term: u32 },

    #[error("Rate override with segment number \"{segment_number}\" already exists (position {position})")]
    DuplicateOverride { segment_number: u32, position: usize },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LoanScheduleError {
    fn from(e: serde_json::Error) -> Self {
        LoanScheduleError::SerializationError(e.to_string())
    }
}
