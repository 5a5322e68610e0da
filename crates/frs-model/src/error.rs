use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown entity level: {0}")]
    UnknownEntityLevel(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
