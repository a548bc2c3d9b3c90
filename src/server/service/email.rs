//! Outgoing email.
//!
//! `Mailer` is the seam between services and the email provider. `HttpMailer` posts
//! JSON to a transactional email API; `LogMailer` is used when no provider is
//! configured and only writes the message to the log.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;

use crate::server::{
    error::{provider::ProviderError, AppError},
    util::template::render,
};

/// A plain-text message to a single recipient.
#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> Result<(), AppError>;
}

/// Mailer backed by an HTTP email API using bearer authentication.
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl HttpMailer {
    pub fn new(client: reqwest::Client, api_url: String, api_key: String, from: String) -> Self {
        Self {
            client,
            api_url,
            api_key,
            from,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: Email) -> Result<(), AppError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&SendRequest {
                from: &self.from,
                to: &email.to,
                subject: &email.subject,
                text: &email.text,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Mail {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        tracing::debug!("Sent '{}' email to {}", email.subject, email.to);

        Ok(())
    }
}

/// Mailer that only logs messages; used when no provider is configured.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: Email) -> Result<(), AppError> {
        tracing::info!(
            "Email to {} ({}):\n{}",
            email.to,
            email.subject,
            email.text
        );
        Ok(())
    }
}

const VERIFICATION_TEMPLATE: &str = "Hi {{username}},

Your verification code is {{code}}. It expires in {{minutes}} minutes.

If you did not create an account you can ignore this email.";

const PASSWORD_RESET_TEMPLATE: &str = "Hi {{username}},

Someone asked to reset the password of your account. Open the link below within
{{minutes}} minutes to choose a new one:

{{link}}

If this was not you, ignore this email and your password stays the same.";

pub fn verification_email(to: &str, username: &str, code: &str, minutes: i64) -> Email {
    let vars = HashMap::from([
        ("username", username.to_string()),
        ("code", code.to_string()),
        ("minutes", minutes.to_string()),
    ]);

    Email {
        to: to.to_string(),
        subject: "Verify your email".to_string(),
        text: render(VERIFICATION_TEMPLATE, &vars),
    }
}

pub fn password_reset_email(to: &str, username: &str, link: &str, minutes: i64) -> Email {
    let vars = HashMap::from([
        ("username", username.to_string()),
        ("link", link.to_string()),
        ("minutes", minutes.to_string()),
    ]);

    Email {
        to: to.to_string(),
        subject: "Reset your password".to_string(),
        text: render(PASSWORD_RESET_TEMPLATE, &vars),
    }
}

/// Mailer recording every message in memory.
#[cfg(test)]
#[derive(Default, Clone)]
pub struct MemoryMailer {
    sent: std::sync::Arc<std::sync::Mutex<Vec<Email>>>,
}

#[cfg(test)]
impl MemoryMailer {
    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: Email) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_verification_email() {
        let email = verification_email("a@example.com", "alice", "123456", 30);

        assert_eq!(email.to, "a@example.com");
        assert!(email.text.contains("Hi alice"));
        assert!(email.text.contains("123456"));
        assert!(email.text.contains("30 minutes"));
        assert!(!email.text.contains("{{"));
    }

    #[test]
    fn renders_password_reset_email() {
        let email = password_reset_email(
            "a@example.com",
            "alice",
            "https://img.test/reset?token=abc",
            60,
        );

        assert!(email.text.contains("https://img.test/reset?token=abc"));
        assert!(email.text.contains("60 minutes"));
    }

    #[tokio::test]
    async fn memory_mailer_records_messages() {
        let mailer = MemoryMailer::default();
        mailer
            .send(verification_email("a@example.com", "alice", "1", 30))
            .await
            .unwrap();

        assert_eq!(mailer.sent().len(), 1);
    }
}
