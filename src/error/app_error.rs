use thiserror::Error;

use crate::auth::AuthError;
use crate::cache::FetchError;
use crate::config::ConfigError;
use crate::logger::LoggerError;

/// A single failed field from payload validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFieldError {
    pub field: String,
    pub message: String,
}

/// Application-wide error type that represents all possible errors in the system.
///
/// Module errors ([`FetchError`], [`AuthError`], [`ConfigError`]) convert
/// into it with `?`, so services and CLI handlers can return [`AppResult`].
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found error with entity, field, and value information
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Payload validation failed on one or more fields
    #[error("Validation failed: {}", format_field_errors(.errors))]
    ValidationErrors { errors: Vec<ValidationFieldError> },

    /// The operation needs a signed-in user
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Backend request failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Auth backend rejected or failed the request
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Configuration could not be loaded or validated
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Logger could not be set up or reconfigured
    #[error(transparent)]
    Logger(#[from] LoggerError),

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

fn format_field_errors(errors: &[ValidationFieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut errors: Vec<ValidationFieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationFieldError {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string()),
                })
            })
            .collect();
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::ValidationErrors { errors }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use validator::Validate;

    #[derive(Validate)]
    struct Signup {
        #[validate(email(message = "Invalid email format"))]
        email: String,
        #[validate(length(min = 6))]
        password: String,
    }

    #[test]
    fn test_from_validation_errors() {
        let signup = Signup {
            email: "not-an-email".to_string(),
            password: "123".to_string(),
        };
        let err: AppError = signup.validate().unwrap_err().into();

        match err {
            AppError::ValidationErrors { errors } => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].field, "email");
                assert_eq!(errors[0].message, "Invalid email format");
                assert_eq!(errors[1].field, "password");
                assert_eq!(errors[1].message, "length");
            }
            other => panic!("Expected ValidationErrors, got {:?}", other),
        }
    }

    #[test]
    fn test_fetch_error_is_transparent() {
        let err: AppError = FetchError::Status {
            status: StatusCode::NOT_FOUND,
            body: String::new(),
        }
        .into();
        assert_eq!(err.to_string(), "HTTP error! status: 404 Not Found");
    }

    #[test]
    fn test_auth_error_keeps_backend_message() {
        let err: AppError = AuthError::Rejected {
            status: StatusCode::BAD_REQUEST,
            message: "User already registered".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "User already registered");
    }

    #[test]
    fn test_not_found_display() {
        let err = AppError::NotFound {
            entity: "influencer".to_string(),
            field: "id".to_string(),
            value: "42".to_string(),
        };
        assert_eq!(err.to_string(), "Resource not found: influencer with id=42");
    }
}
