use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
}

impl ModelError {
    /// The bare message, without the variant prefix.
    pub fn into_message(self) -> String {
        match self {
            ModelError::Validation(m) => m,
        }
    }
}
