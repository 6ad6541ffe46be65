use crate::utils::error::{PricingError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> PricingError {
    PricingError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Base URL of the pricing service. The API key is appended as a query
/// parameter on each call, so the endpoint itself may not carry one.
pub fn validate_endpoint(field: &str, endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint)
        .map_err(|e| invalid(field, endpoint, format!("not an absolute URL: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field,
            endpoint,
            format!("the pricing service needs http or https, not {}", url.scheme()),
        ));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(
            field,
            endpoint,
            "drop the query string; the API key is added per request",
        ));
    }
    Ok(())
}

/// Model names become a path segment of `models/{model}:generateContent`.
pub fn validate_model_name(field: &str, model: &str) -> Result<()> {
    if model.trim().is_empty() {
        return Err(invalid(field, model, "a model name is required"));
    }
    if model.chars().any(|c| c.is_whitespace() || c == '/' || c == ':') {
        return Err(invalid(
            field,
            model,
            "model names may not contain whitespace, '/' or ':'",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field,
            value,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// Location of the JSON credential file.
pub fn validate_store_path(field: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field, path, "a credential file path is required"));
    }
    if path.contains('\0') {
        return Err(invalid(field, path.escape_default(), "path contains a NUL byte"));
    }
    if path.ends_with('/') || path.ends_with(std::path::MAIN_SEPARATOR) {
        return Err(invalid(field, path, "must name a file, not a directory"));
    }
    Ok(())
}
