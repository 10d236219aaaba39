use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Customer '{id}' not found")]
    CustomerNotFound { id: String },

    #[error("Page '{page}' requires a signed-in session")]
    SessionRequired { page: String },

    #[error("Unknown page '{name}'")]
    UnknownPage { name: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DashResult<T> = Result<T, DashError>;
