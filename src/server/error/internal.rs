use thiserror::Error;

/// Internal issues with the codebase indicating unexpected behavior & possible bugs
#[derive(Error, Debug)]
pub enum InternalError {
    /// Password hashing or hash parsing failed.
    ///
    /// Results in a 500 Internal Server Error with a generic message returned
    /// to client.
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// Could not produce a unique identifier after repeated attempts.
    #[error("Failed to generate a unique {kind} after {attempts} attempts")]
    IdExhausted {
        /// What kind of identifier was being generated
        kind: &'static str,
        /// How many candidates were tried
        attempts: usize,
    },
}
