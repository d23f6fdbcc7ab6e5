use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpError {
    #[error("HTTP transport failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Resource not found: {url}")]
    NotFound { url: String },

    #[error("Request to {url} failed with status {status}: {message}")]
    HttpStatus {
        status: u16,
        url: String,
        message: String,
    },

    #[error("Unexpected response: {message}")]
    UnexpectedResponse { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Remote,
    Data,
    Configuration,
}

impl SpError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SpError::TransportError(_) | SpError::IoError(_) => ErrorCategory::Network,
            SpError::NotFound { .. } | SpError::HttpStatus { .. } => ErrorCategory::Remote,
            SpError::SerializationError(_) | SpError::UnexpectedResponse { .. } => {
                ErrorCategory::Data
            }
            SpError::ConfigValidationError { .. }
            | SpError::InvalidConfigValueError { .. }
            | SpError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    /// HTTP status of a failed remote call, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            SpError::NotFound { .. } => Some(404),
            SpError::HttpStatus { status, .. } => Some(*status),
            SpError::TransportError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SpError::NotFound { url } => format!("Nothing exists at {}", url),
            SpError::HttpStatus {
                status, message, ..
            } => format!("The server rejected the request ({}): {}", status, message),
            SpError::TransportError(_) => "Could not reach the server".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.status() {
            Some(401) | Some(403) => "Check the access token and its permissions on the site",
            Some(404) => "Check the server relative url; it is case sensitive and must start at the site root",
            Some(412) => "The item changed on the server; fetch it again and retry with the new eTag",
            _ => match self.category() {
                ErrorCategory::Network => "Check the site url and your network connection",
                ErrorCategory::Remote => "Inspect the server message above",
                ErrorCategory::Data => "The server returned an unexpected payload; try again with --verbose",
                ErrorCategory::Configuration => "Fix the configuration value and run again",
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, SpError>;
