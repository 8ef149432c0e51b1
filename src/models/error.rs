use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid address format: {0}")]
    InvalidAddress(String),

    #[error("Invalid transaction hash: {0}")]
    InvalidTxHash(String),

    #[error("RPC error on {chain}: {message}")]
    RpcError { chain: String, message: String },

    #[error("Data fetch timeout for {chain}")]
    DataFetchTimeout { chain: String },

    #[error("Identity generation failed: {0}")]
    GenerationError(String),

    #[error("No identity found for {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl IdentityError {
    /// Errors that come from a remote collaborator and may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            IdentityError::RpcError { .. }
                | IdentityError::DataFetchTimeout { .. }
                | IdentityError::HttpError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, IdentityError>;
