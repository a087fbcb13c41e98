//! HTTP mapping for service errors

use std::fmt::{Display, Formatter};

use actix_web::{HttpResponse, http::StatusCode};
use imobi_common::ImobiError;
use imobi_console::model::ApiResult;
use tracing::error;

/// Local wrapper so service errors can be returned from handlers with `?`
#[derive(Debug)]
pub struct AppError {
    inner: imobi_common::AppError,
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        AppError {
            inner: value.into(),
        }
    }
}

impl From<ImobiError> for AppError {
    fn from(value: ImobiError) -> Self {
        AppError {
            inner: value.into(),
        }
    }
}

impl actix_web::error::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        let (_, status) = self.inner.code_and_status();
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let (code, status) = self.inner.code_and_status();
        if status >= 500 {
            error!(error = %self.inner, "Request failed");
        }

        ApiResult::<String>::http_response(
            status,
            code.code,
            code.message.to_string(),
            self.inner.to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use actix_web::ResponseError;

    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ImobiError::InvalidData("x".into()), 400),
            (ImobiError::not_found("listing 1"), 404),
            (ImobiError::AlreadyExists("x".into()), 409),
            (ImobiError::Upstream("x".into()), 502),
            (ImobiError::Auth("x".into()), 401),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code().as_u16(), status);
        }
    }

    #[test]
    fn test_foreign_errors_are_internal() {
        let err = AppError::from(anyhow::anyhow!("connection reset"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
