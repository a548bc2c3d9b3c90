use thiserror::Error;

/// Failures reported by third-party APIs (DNS and email providers).
#[derive(Error, Debug)]
pub enum ProviderError {
    /// DNS provider rejected the request or returned an unusable response.
    #[error("DNS provider error: {0}")]
    Dns(String),

    /// Email provider rejected the message.
    #[error("Email provider error (status {status}): {message}")]
    Mail {
        /// HTTP status returned by the provider
        status: u16,
        /// Response body or reason
        message: String,
    },
}
