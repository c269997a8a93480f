use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid phase catalog: {0}")]
    InvalidCatalog(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
