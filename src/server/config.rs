use crate::server::{
    error::{config::ConfigError, AppError},
    util::parse::parse_byte_size,
};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_STORAGE_PATH: &str = "./uploads";
const DEFAULT_MAX_UPLOAD_SIZE: &str = "50MB";
const DEFAULT_UPLOAD_LIMIT: &str = "500MB";
const DEFAULT_REFERRAL_LIMIT: i32 = 3;

pub struct Config {
    pub database_url: String,
    pub app_url: String,
    pub bind_address: String,
    pub session_secure: bool,

    pub storage_path: String,
    pub max_upload_size: u64,
    pub default_upload_limit: u64,
    pub default_referral_limit: i32,

    pub mail: Option<MailConfig>,
    pub cloudflare: Option<CloudflareConfig>,
}

/// Credentials for the HTTP email provider.
pub struct MailConfig {
    pub api_url: String,
    pub api_key: String,
    pub from: String,
}

/// Credentials for the Cloudflare zone API used by domain donations.
pub struct CloudflareConfig {
    pub api_token: String,
    pub account_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let app_url = required("APP_URL")?;
        url::Url::parse(&app_url).map_err(|e| ConfigError::InvalidEnvVar {
            name: "APP_URL".to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            app_url: app_url.trim_end_matches('/').to_string(),
            bind_address: optional("BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            session_secure: optional("SESSION_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            storage_path: optional("STORAGE_PATH")
                .unwrap_or_else(|| DEFAULT_STORAGE_PATH.to_string()),
            max_upload_size: byte_size("MAX_UPLOAD_SIZE", DEFAULT_MAX_UPLOAD_SIZE)?,
            default_upload_limit: byte_size("DEFAULT_UPLOAD_LIMIT", DEFAULT_UPLOAD_LIMIT)?,
            default_referral_limit: match optional("DEFAULT_REFERRAL_LIMIT") {
                Some(value) => value.parse().map_err(|_| ConfigError::InvalidEnvVar {
                    name: "DEFAULT_REFERRAL_LIMIT".to_string(),
                    reason: format!("'{}' is not a number", value),
                })?,
                None => DEFAULT_REFERRAL_LIMIT,
            },
            mail: mail_config()?,
            cloudflare: cloudflare_config()?,
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn byte_size(name: &str, default: &str) -> Result<u64, ConfigError> {
    let value = optional(name).unwrap_or_else(|| default.to_string());
    parse_byte_size(&value).map_err(|reason| ConfigError::InvalidEnvVar {
        name: name.to_string(),
        reason,
    })
}

fn mail_config() -> Result<Option<MailConfig>, ConfigError> {
    match (
        optional("MAIL_API_URL"),
        optional("MAIL_API_KEY"),
        optional("MAIL_FROM"),
    ) {
        (Some(api_url), Some(api_key), Some(from)) => Ok(Some(MailConfig {
            api_url,
            api_key,
            from,
        })),
        (None, None, None) => Ok(None),
        _ => Err(ConfigError::IncompleteGroup(
            "MAIL_API_URL, MAIL_API_KEY and MAIL_FROM".to_string(),
        )),
    }
}

fn cloudflare_config() -> Result<Option<CloudflareConfig>, ConfigError> {
    match (
        optional("CLOUDFLARE_API_TOKEN"),
        optional("CLOUDFLARE_ACCOUNT_ID"),
    ) {
        (Some(api_token), Some(account_id)) => Ok(Some(CloudflareConfig {
            api_token,
            account_id,
        })),
        (None, None) => Ok(None),
        _ => Err(ConfigError::IncompleteGroup(
            "CLOUDFLARE_API_TOKEN and CLOUDFLARE_ACCOUNT_ID".to_string(),
        )),
    }
}

/// Runtime settings shared with services, derived from `Config` without secrets.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Public base URL without trailing slash, e.g. `https://img.example.com`.
    pub app_url: String,
    pub max_upload_size: u64,
    pub default_upload_limit: u64,
    pub default_referral_limit: i32,
}

impl Settings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            app_url: config.app_url.clone(),
            max_upload_size: config.max_upload_size,
            default_upload_limit: config.default_upload_limit,
            default_referral_limit: config.default_referral_limit,
        }
    }

    /// Host part of `app_url`, used as the default upload host.
    pub fn app_host(&self) -> String {
        url::Url::parse(&self.app_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| self.app_url.clone())
    }

    /// Scheme of `app_url`, reused for custom domains.
    pub fn scheme(&self) -> &str {
        if self.app_url.starts_with("http://") {
            "http"
        } else {
            "https"
        }
    }
}

#[cfg(test)]
impl Settings {
    pub fn for_tests() -> Self {
        Self {
            app_url: "https://img.test".to_string(),
            max_upload_size: 10 * 1024 * 1024,
            default_upload_limit: 100 * 1024 * 1024,
            default_referral_limit: 3,
        }
    }
}
