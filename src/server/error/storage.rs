use thiserror::Error;

/// Object store failures.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Key would escape the storage root or is otherwise malformed.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// No object stored under the key.
    #[error("Object not found: {0}")]
    NotFound(String),
}
