use thiserror::Error;

/// Failures of a single call to the remote pricing service.
///
/// None of these reach the end user: the orchestrator converts every one of
/// them into a heuristic estimate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteEstimationError {
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Pricing service returned HTTP {status}")]
    HttpError { status: u16 },

    #[error("Malformed response body: {0}")]
    MalformedBody(String),

    #[error("Response violates pricing schema: {0}")]
    SchemaViolation(String),
}

impl RemoteEstimationError {
    pub fn kind_name(&self) -> &'static str {
        match self {
            RemoteEstimationError::NetworkFailure(_) => "network_failure",
            RemoteEstimationError::HttpError { .. } => "http_error",
            RemoteEstimationError::MalformedBody(_) => "malformed_body",
            RemoteEstimationError::SchemaViolation(_) => "schema_violation",
        }
    }
}

impl From<reqwest::Error> for RemoteEstimationError {
    fn from(e: reqwest::Error) -> Self {
        // The request URL carries the credential as a query parameter.
        let e = e.without_url();
        if e.is_timeout() {
            RemoteEstimationError::NetworkFailure(format!("Request timeout: {}", e))
        } else if e.is_connect() {
            RemoteEstimationError::NetworkFailure(format!("Connection failed: {}", e))
        } else if let Some(status) = e.status() {
            RemoteEstimationError::HttpError {
                status: status.as_u16(),
            }
        } else {
            RemoteEstimationError::NetworkFailure(format!("Request failed: {}", e))
        }
    }
}

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Remote estimation failed: {0}")]
    Remote(#[from] RemoteEstimationError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {reason} (got '{value}')")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid request field '{field}': {reason}")]
    InvalidRequest { field: String, reason: String },
}

impl PricingError {
    pub fn invalid_request(field: &str, reason: impl Into<String>) -> Self {
        PricingError::InvalidRequest {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Message suitable for stderr, without internal detail.
    pub fn user_friendly_message(&self) -> String {
        match self {
            PricingError::HttpClientError(_) => {
                "Could not set up the HTTP client for the pricing service".to_string()
            }
            PricingError::IoError(e) => format!("File access failed: {}", e),
            PricingError::SerializationError(_) => "Could not read or write JSON data".to_string(),
            PricingError::Remote(e) => format!("The pricing service could not be used: {}", e),
            PricingError::ConfigError { message } => format!("Configuration problem: {}", message),
            PricingError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            PricingError::InvalidRequest { field, reason } => {
                format!("Request field '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PricingError::HttpClientError(_) => "Check the TLS setup of this machine",
            PricingError::IoError(_) => "Check that the path exists and is writable",
            PricingError::SerializationError(_) => {
                "Delete or fix the credential file, then set the key again"
            }
            PricingError::Remote(_) => "Run with --offline to use the built-in heuristic",
            PricingError::ConfigError { .. }
            | PricingError::InvalidConfigValueError { .. } => {
                "Review the TOML configuration file passed with --config"
            }
            PricingError::InvalidRequest { .. } => {
                "Provide a non-empty title and at least one person"
            }
        }
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            PricingError::IoError(_) | PricingError::SerializationError(_) => 3,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, PricingError>;
