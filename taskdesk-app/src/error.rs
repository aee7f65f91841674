use serde_json::Value;
use thiserror::Error;

/// Failures of a single HTTP exchange with the API
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never reached the server or no response came back
    #[error("Network error: {source}")]
    Network {
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status
    #[error("HTTP error {status}{}", describe_body(.body))]
    Http {
        status: u16,
        /// Parsed error payload when the body was JSON
        body: Option<Value>,
    },

    /// A 2xx response whose body could not be decoded
    #[error("Failed to parse response: {message}")]
    Decode { message: String },

    #[error("Invalid URL: {message}")]
    InvalidUrl { message: String },

    /// The client could not be set up; nothing was sent
    #[error("Failed to build HTTP client: {message}")]
    Build { message: String },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

fn describe_body(body: &Option<Value>) -> String {
    match body {
        Some(Value::Object(map)) if map.contains_key("detail") => match &map["detail"] {
            Value::String(detail) => format!(": {}", detail),
            other => format!(": {}", other),
        },
        Some(body) => format!(": {}", body),
        None => String::new(),
    }
}

/// A required input was missing; nothing was sent to the server.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self(message.into())
    }
}

/// Outcome of a failed user action, after it has been surfaced to the user
#[derive(Error, Debug)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error for the `taskdesk` binary
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) => 2,
            AppError::Io(_) | AppError::Action(ActionError::Io(_)) => 3,
            AppError::Action(ActionError::Validation(_)) => 4,
            AppError::Action(ActionError::Api(_)) => 7,
            AppError::Logging(_) => 1,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_error_shows_detail() {
        let err = ApiError::Http {
            status: 404,
            body: Some(json!({"detail": "Project not found"})),
        };
        assert_eq!(err.to_string(), "HTTP error 404: Project not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_http_error_without_body() {
        let err = ApiError::Http {
            status: 500,
            body: None,
        };
        assert_eq!(err.to_string(), "HTTP error 500");
    }

    #[test]
    fn test_exit_codes() {
        let validation = AppError::from(ActionError::from(ValidationError::new("missing")));
        assert_eq!(validation.exit_code(), 4);

        let api = AppError::from(ActionError::from(ApiError::Http {
            status: 400,
            body: None,
        }));
        assert_eq!(api.exit_code(), 7);

        assert_eq!(AppError::Config("bad".to_string()).exit_code(), 2);
    }
}
