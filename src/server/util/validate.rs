//! Input validation shared by services.
//!
//! Every check returns a `ValidationError` naming the offending field so the client
//! can highlight it.

use crate::server::error::validation::ValidationError;

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 24;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 128;
pub const EMBED_FIELD_MAX: usize = 256;

pub fn username(value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(ValidationError::new(
            "username",
            format!(
                "Username must be between {} and {} characters",
                USERNAME_MIN, USERNAME_MAX
            ),
        ));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(ValidationError::new(
            "username",
            "Username may only contain letters, digits, '_', '.' and '-'",
        ));
    }
    Ok(())
}

/// Loose email shape check: one `@`, a non-empty local part and a dotted domain.
pub fn email(value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::new("email", "Invalid email address");

    if value.len() > 254 || value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let Some((local, domain)) = value.split_once('@') else {
        return Err(invalid());
    };
    if local.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(invalid());
    }
    Ok(())
}

pub fn password(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
        return Err(ValidationError::new(
            field,
            format!(
                "Password must be between {} and {} characters",
                PASSWORD_MIN, PASSWORD_MAX
            ),
        ));
    }
    Ok(())
}

pub fn embed_field(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(v) if v.chars().count() > EMBED_FIELD_MAX => Err(ValidationError::new(
            field,
            format!("Must be at most {} characters", EMBED_FIELD_MAX),
        )),
        _ => Ok(()),
    }
}

/// Accepts `#RRGGBB` hex colours.
pub fn color(value: &str) -> Result<(), ValidationError> {
    let valid = value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(ValidationError::new(
            "embed.color",
            "Colour must look like #RRGGBB",
        ));
    }
    Ok(())
}

fn is_dns_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Validates a subdomain as a single lowercase DNS label.
pub fn subdomain(value: &str) -> Result<(), ValidationError> {
    if !is_dns_label(value) {
        return Err(ValidationError::new(
            "subdomain",
            "Subdomain must be 1-63 lowercase letters, digits or '-'",
        ));
    }
    Ok(())
}

/// Normalizes user input into a bare hostname and validates it.
///
/// Lowercases, trims, strips any scheme, path, port and trailing dot. The result
/// must have at least two labels, each a valid DNS label, and an alphabetic TLD.
pub fn hostname(input: &str) -> Result<String, ValidationError> {
    let invalid = || ValidationError::new("domain", "Invalid domain name");

    let mut host = input.trim().to_ascii_lowercase();
    if let Some((_, rest)) = host.split_once("://") {
        host = rest.to_string();
    }
    if let Some(idx) = host.find(|c: char| matches!(c, '/' | '?' | '#')) {
        host.truncate(idx);
    }
    if let Some(idx) = host.find(':') {
        host.truncate(idx);
    }
    let host = host.trim_end_matches('.').to_string();

    if host.len() > 253 {
        return Err(invalid());
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 || !labels.iter().all(|l| is_dns_label(l)) {
        return Err(invalid());
    }
    let tld = labels[labels.len() - 1];
    if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_lowercase()) {
        return Err(invalid());
    }

    Ok(host)
}
