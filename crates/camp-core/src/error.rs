use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CampError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl CampError {
    /// The message without the variant prefix, for showing next to a form.
    pub fn message(&self) -> &str {
        match self {
            CampError::NotFound(m) | CampError::InvalidInput(m) => m,
        }
    }
}
