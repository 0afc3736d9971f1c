use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Line item rejected by local validation
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    /// Payment requested with no line items
    #[error("Cart is empty: add at least one item before creating a payment")]
    EmptyCart,

    /// Missing or malformed configuration (credentials, redirect URLs)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failure surfaced by PayPal, including connectivity failures
    #[error("Gateway error during {operation} [{code}]: {message}{}", correlation_suffix(.correlation_id))]
    Gateway {
        operation: String,
        code: String,
        message: String,
        correlation_id: Option<String>,
    },

    /// Session state could not be read or written
    #[error("Session error: {0}")]
    Session(String),

    /// Validation errors for request payloads
    #[error("Validation error: {0}")]
    Validation(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

fn correlation_suffix(correlation_id: &Option<String>) -> String {
    match correlation_id {
        Some(id) => format!(" (correlation id: {})", id),
        None => String::new(),
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        HttpResponse::build(status_code).json(serde_json::json!({
            "error": {
                "message": error_message,
                "code": status_code.as_u16(),
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidItem(_) => StatusCode::BAD_REQUEST,
            AppError::EmptyCart => StatusCode::BAD_REQUEST,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Gateway { .. } => StatusCode::BAD_GATEWAY,
            AppError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,
            AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn invalid_item(msg: impl Into<String>) -> Self {
        AppError::InvalidItem(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn session(msg: impl Into<String>) -> Self {
        AppError::Session(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Gateway failure for a named operation
    pub fn gateway(
        operation: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        AppError::Gateway {
            operation: operation.into(),
            code: code.into(),
            message: message.into(),
            correlation_id: None,
        }
    }

    /// Attach a correlation id (intent, plan or agreement id) to a gateway error.
    ///
    /// Other variants are returned unchanged.
    pub fn with_correlation_id(self, id: impl Into<String>) -> Self {
        match self {
            AppError::Gateway {
                operation,
                code,
                message,
                ..
            } => AppError::Gateway {
                operation,
                code,
                message,
                correlation_id: Some(id.into()),
            },
            other => other,
        }
    }

    pub fn is_gateway(&self) -> bool {
        matches!(self, AppError::Gateway { .. })
    }
}
