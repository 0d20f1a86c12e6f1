use thiserror::Error;

/// Fatal input-validation failures. Everything past validation is a
/// `Warning`, never an error: a run always completes its matrix.
#[derive(Error, Debug)]
pub enum ShiftError {
    #[error("staff input is missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("config is missing required key '{0}'")]
    MissingConfigKey(&'static str),
    #[error("invalid month (expected YYYY-MM): {0}")]
    InvalidMonth(String),
    #[error("invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    #[error("duplicate staff id: {0}")]
    DuplicateStaffId(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
