use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is not set.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable is set but its value cannot be used.
    #[error("Invalid value for environment variable {name}: {reason}")]
    InvalidEnvVar {
        /// Name of the environment variable
        name: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Only part of an all-or-nothing group of variables is set.
    #[error("Environment variables {0} must be set together")]
    IncompleteGroup(String),
}
