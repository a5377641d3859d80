use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CarrelError {
    #[error("An item with this file path already exists: {0}")]
    DuplicatePath(String),

    #[error("Item not found: {0}")]
    ItemNotFound(Uuid),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, CarrelError>;
