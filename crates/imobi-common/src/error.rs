//! Error types and error codes for imobi
//!
//! This module defines:
//! - `ImobiError`: Application-specific error enum
//! - `AppError`: Wrapper for integration with web frameworks
//! - `ErrorCode`: Structured error codes for API responses

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Application-specific error types
#[derive(thiserror::Error, Debug)]
pub enum ImobiError {
    #[error("caused: {0}")]
    IllegalArgument(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ImobiError {
    pub fn not_found(what: impl Display) -> Self {
        ImobiError::NotFound(format!("{} not found", what))
    }

    /// Numeric code and HTTP status used when this error reaches a client
    pub fn code_and_status(&self) -> (ErrorCode<'static>, u16) {
        match self {
            ImobiError::IllegalArgument(_) | ImobiError::InvalidData(_) => {
                (PARAMETER_VALIDATE_ERROR, 400)
            }
            ImobiError::NotFound(_) => (RESOURCE_NOT_FOUND, 404),
            ImobiError::AlreadyExists(_) => (RESOURCE_CONFLICT, 409),
            ImobiError::Upstream(_) => (UPSTREAM_ERROR, 502),
            ImobiError::Database(_) => (DATA_ACCESS_ERROR, 500),
            ImobiError::Auth(_) => (ACCESS_DENIED, 401),
            ImobiError::Internal(_) => (SERVER_ERROR, 500),
        }
    }
}

/// Wrapper for application errors
#[derive(Debug)]
pub struct AppError {
    inner: anyhow::Error,
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        AppError { inner: value }
    }
}

impl From<ImobiError> for AppError {
    fn from(value: ImobiError) -> Self {
        AppError {
            inner: value.into(),
        }
    }
}

impl AppError {
    pub fn inner(&self) -> &anyhow::Error {
        &self.inner
    }

    pub fn downcast_ref<E: std::error::Error + Send + Sync + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }

    /// Code and HTTP status for this error; anything that is not an
    /// `ImobiError` is an internal server error.
    pub fn code_and_status(&self) -> (ErrorCode<'static>, u16) {
        self.downcast_ref::<ImobiError>()
            .map(ImobiError::code_and_status)
            .unwrap_or((SERVER_ERROR, 500))
    }
}

/// Error code structure for API responses
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub message: &'a str,
}

pub const SUCCESS: ErrorCode<'static> = ErrorCode {
    code: 0,
    message: "success",
};

pub const PARAMETER_MISSING: ErrorCode<'static> = ErrorCode {
    code: 10000,
    message: "parameter missing",
};

pub const ACCESS_DENIED: ErrorCode<'static> = ErrorCode {
    code: 10001,
    message: "access denied",
};

pub const DATA_ACCESS_ERROR: ErrorCode<'static> = ErrorCode {
    code: 10002,
    message: "data access error",
};

pub const PARAMETER_VALIDATE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20002,
    message: "parameter validate error",
};

pub const RESOURCE_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: 20004,
    message: "resource not found",
};

pub const RESOURCE_CONFLICT: ErrorCode<'static> = ErrorCode {
    code: 20005,
    message: "resource conflict",
};

pub const SERVER_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30000,
    message: "server error",
};

pub const UPSTREAM_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30001,
    message: "upstream error",
};

pub const TOO_MANY_REQUESTS: ErrorCode<'static> = ErrorCode {
    code: 30002,
    message: "too many requests",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imobi_error_display() {
        let err = ImobiError::IllegalArgument("invalid param".to_string());
        assert_eq!(format!("{}", err), "caused: invalid param");

        let err = ImobiError::InvalidData("titulo: length".to_string());
        assert_eq!(format!("{}", err), "invalid data: titulo: length");

        let err = ImobiError::not_found("listing 123");
        assert_eq!(format!("{}", err), "listing 123 not found");

        let err = ImobiError::Upstream("vista returned 500".to_string());
        assert_eq!(format!("{}", err), "upstream error: vista returned 500");

        let err = ImobiError::AlreadyExists("site configuration already exists".to_string());
        assert_eq!(format!("{}", err), "site configuration already exists");
    }

    #[test]
    fn test_code_and_status_mapping() {
        assert_eq!(
            ImobiError::InvalidData(String::new()).code_and_status().1,
            400
        );
        assert_eq!(ImobiError::not_found("x").code_and_status().1, 404);
        assert_eq!(
            ImobiError::AlreadyExists(String::new()).code_and_status().1,
            409
        );
        assert_eq!(ImobiError::Upstream(String::new()).code_and_status().1, 502);
        assert_eq!(ImobiError::Auth(String::new()).code_and_status().1, 401);
        assert_eq!(
            ImobiError::Database(String::new()).code_and_status().0.code,
            DATA_ACCESS_ERROR.code
        );
    }

    #[test]
    fn test_app_error_from_anyhow() {
        let anyhow_err = anyhow::anyhow!("test error");
        let app_err = AppError::from(anyhow_err);
        assert_eq!(format!("{}", app_err), "test error");
        assert_eq!(app_err.code_and_status().1, 500);
    }

    #[test]
    fn test_app_error_downcast() {
        let app_err = AppError::from(anyhow::Error::from(ImobiError::not_found("page")));
        assert!(matches!(
            app_err.downcast_ref::<ImobiError>(),
            Some(ImobiError::NotFound(_))
        ));
        assert_eq!(app_err.code_and_status().0.code, RESOURCE_NOT_FOUND.code);
    }

    #[test]
    fn test_error_code_constants() {
        assert_eq!(SUCCESS.code, 0);
        assert_eq!(SUCCESS.message, "success");
        assert_eq!(PARAMETER_MISSING.code, 10000);
        assert_eq!(ACCESS_DENIED.code, 10001);
        assert_eq!(PARAMETER_VALIDATE_ERROR.code, 20002);
        assert_eq!(RESOURCE_CONFLICT.code, 20005);
        assert_eq!(UPSTREAM_ERROR.code, 30001);
    }
}
