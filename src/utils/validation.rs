use crate::utils::error::{CartError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> CartError {
    CartError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Stock service base URL. Request paths are appended to it, so query
/// strings and fragments are rejected.
pub fn validate_service_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "Stock service URL cannot be empty"));
    }

    let url = Url::parse(url_str).map_err(|e| {
        invalid(field_name, url_str, format!("Invalid stock service URL: {}", e))
    })?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(invalid(
                field_name,
                url_str,
                format!("Stock service must use http or https, got {}", scheme),
            ))
        }
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(
            field_name,
            url_str,
            "Stock service URL must not carry a query or fragment",
        ));
    }

    Ok(())
}

/// Directory the cart snapshot is written to.
pub fn validate_storage_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field_name, path, "Snapshot directory cannot be empty"));
    }

    if path.contains('\0') {
        return Err(invalid(field_name, path, "Snapshot directory contains null bytes"));
    }

    let existing = std::path::Path::new(path);
    if existing.exists() && !existing.is_dir() {
        return Err(invalid(
            field_name,
            path,
            "Snapshot directory points at an existing file",
        ));
    }

    Ok(())
}

pub fn validate_storage_key(field_name: &str, key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(invalid(field_name, key, "Snapshot key cannot be empty"));
    }
    if key.chars().any(char::is_control) {
        return Err(invalid(field_name, key, "Snapshot key contains control characters"));
    }
    Ok(())
}

pub fn validate_timeout_seconds(field_name: &str, seconds: u64) -> Result<()> {
    const MIN: u64 = 1;
    const MAX: u64 = 300;
    if !(MIN..=MAX).contains(&seconds) {
        return Err(invalid(
            field_name,
            seconds,
            format!("Stock request timeout must be between {} and {} seconds", MIN, MAX),
        ));
    }
    Ok(())
}
