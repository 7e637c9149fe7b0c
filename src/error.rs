use thiserror::Error;

/// A source row that could not be turned into a meeting record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("row {row}: invalid session date {value:?}")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: invalid session time {value:?}")]
    InvalidTime { row: usize, value: String },

    #[error("row {row}: unreadable ({reason})")]
    Unreadable { row: usize, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("no match proposal with id {0:?}")]
    UnknownProposal(String),
}
