use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CableError {
    #[error("block {0} was not found in the diagnostic data")]
    MissingBlock(String),

    #[error("block {0} contains no rows")]
    EmptyBlock(String),

    #[error("no cable records to analyze")]
    NoRecords,
}
