//! Shared field-constraint helpers for the schema registry.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::SchemaViolation;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").unwrap());
static COUNTRY_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").unwrap());
static MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Reject strings longer than `max` characters.
pub fn max_len(field: &str, value: &str, max: usize) -> Result<(), SchemaViolation> {
    if value.chars().count() > max {
        return Err(SchemaViolation::new(
            field,
            format!("too long (max {max} characters)"),
        ));
    }
    Ok(())
}

/// `max_len` over an optional field.
pub fn opt_max_len(field: &str, value: Option<&str>, max: usize) -> Result<(), SchemaViolation> {
    match value {
        Some(v) => max_len(field, v, max),
        None => Ok(()),
    }
}

/// Reject anything that looks like embedded markup.
pub fn no_markup(field: &str, value: &str) -> Result<(), SchemaViolation> {
    if MARKUP.is_match(value) {
        return Err(SchemaViolation::new(field, "contains markup"));
    }
    Ok(())
}

/// URLs must be http(s) and bounded in length.
pub fn url(field: &str, value: &str) -> Result<(), SchemaViolation> {
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(SchemaViolation::new(
            field,
            "URL must start with http:// or https://",
        ));
    }
    max_len(field, value, 2000)
}

/// `url` over an optional field.
pub fn opt_url(field: &str, value: Option<&str>) -> Result<(), SchemaViolation> {
    match value {
        Some(v) => url(field, v),
        None => Ok(()),
    }
}

/// Basic email shape check.
pub fn opt_email(field: &str, value: Option<&str>) -> Result<(), SchemaViolation> {
    match value {
        Some(v) if !EMAIL.is_match(v) => {
            Err(SchemaViolation::new(field, "invalid email format"))
        }
        _ => Ok(()),
    }
}

/// ISO-3166-1 alpha-2 country codes, e.g. US, AU, IN.
pub fn opt_country_code(field: &str, value: Option<&str>) -> Result<(), SchemaViolation> {
    match value {
        Some(v) if !COUNTRY_CODE.is_match(v) => {
            Err(SchemaViolation::new(field, "invalid country code format"))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(opt_email("e", Some("a@b.co")).is_ok());
        assert!(opt_email("e", Some("not-an-email")).is_err());
        assert!(opt_email("e", Some("a@b")).is_err());
        assert!(opt_email("e", None).is_ok());
    }

    #[test]
    fn country_codes() {
        assert!(opt_country_code("c", Some("US")).is_ok());
        assert!(opt_country_code("c", Some("usa")).is_err());
        assert!(opt_country_code("c", Some("u")).is_err());
    }

    #[test]
    fn urls_require_http_scheme() {
        assert!(url("u", "https://example.com").is_ok());
        assert!(url("u", "ftp://example.com").is_err());
        assert!(url("u", "javascript:alert(1)").is_err());
    }

    #[test]
    fn markup_rejected() {
        assert!(no_markup("n", "Jane Doe").is_ok());
        assert!(no_markup("n", "Jane <b>Doe</b>").is_err());
    }
}
