//! One-time setup code for creating the first admin account.
//!
//! When the server starts without any admin user it generates a code, prints it to the
//! log and keeps it in memory. Registering with that code in place of a referral code
//! creates an admin. The code is single-use and expires after a short TTL.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::server::util::random::alphanumeric;

/// Default time-to-live of a setup code.
pub const SETUP_CODE_TTL: Duration = Duration::from_secs(60);

const SETUP_CODE_LENGTH: usize = 32;

#[derive(Clone)]
struct SetupCode {
    code: String,
    expires_at: Instant,
}

impl SetupCode {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Holds the currently active setup code, if any.
///
/// Cloning shares the underlying code so the service can live in `AppState`.
#[derive(Clone)]
pub struct SetupCodeService {
    code: Arc<RwLock<Option<SetupCode>>>,
    ttl: Duration,
}

impl SetupCodeService {
    pub fn new(ttl: Duration) -> Self {
        Self {
            code: Arc::new(RwLock::new(None)),
            ttl,
        }
    }

    /// Generates a new 32-character code, replacing any previous one.
    ///
    /// # Returns
    /// - `String` - The generated code
    pub async fn generate(&self) -> String {
        let code = alphanumeric(SETUP_CODE_LENGTH);

        *self.code.write().await = Some(SetupCode {
            code: code.clone(),
            expires_at: Instant::now() + self.ttl,
        });

        code
    }

    /// Validates `input` against the stored code and consumes it on success.
    ///
    /// Expired codes are dropped on access.
    ///
    /// # Returns
    /// - `true` - Code matched and was still valid; it can no longer be used
    /// - `false` - Code doesn't match, is expired, or no code exists
    pub async fn validate_and_consume(&self, input: &str) -> bool {
        let mut code = self.code.write().await;

        let Some(stored) = code.as_ref() else {
            return false;
        };

        if stored.is_expired() {
            *code = None;
            return false;
        }

        if stored.code == input {
            *code = None;
            return true;
        }

        false
    }

    /// Checks `input` against the stored code without consuming it.
    pub async fn matches(&self, input: &str) -> bool {
        let code = self.code.read().await;

        code.as_ref()
            .is_some_and(|stored| !stored.is_expired() && stored.code == input)
    }

    /// Puts a consumed code back with a fresh TTL, unless a newer code exists.
    ///
    /// Used when the registration that consumed the code could not be committed.
    pub async fn restore(&self, input: &str) {
        let mut code = self.code.write().await;

        if code.is_none() {
            *code = Some(SetupCode {
                code: input.to_string(),
                expires_at: Instant::now() + self.ttl,
            });
        }
    }

    #[cfg(test)]
    pub async fn has_valid_code(&self) -> bool {
        let mut code = self.code.write().await;

        match code.as_ref() {
            Some(stored) if stored.is_expired() => {
                *code = None;
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    #[cfg(test)]
    pub async fn invalidate(&self) {
        *self.code.write().await = None;
    }
}

impl Default for SetupCodeService {
    fn default() -> Self {
        Self::new(SETUP_CODE_TTL)
    }
}
