//! Response envelope and request bodies shared by the console endpoints

use actix_web::{HttpResponse, http::StatusCode};
use imobi_common::AppError;
use imobi_persistence::BulkOutcome;
use serde::{Deserialize, Serialize};
use tracing::error;

/// API result wrapper
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResult<T> {
    pub code: i32,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResult<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            message: "success".to_string(),
            data,
        }
    }

    pub fn http_success(data: T) -> HttpResponse {
        HttpResponse::Ok().json(Self::success(data))
    }

    pub fn http_created(data: T) -> HttpResponse {
        HttpResponse::Created().json(Self::success(data))
    }

    pub fn http_response(status: u16, code: i32, message: String, data: T) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR))
            .json(Self {
                code,
                message,
                data,
            })
    }
}

impl ApiResult<String> {
    /// Map a service error to its status and error code
    pub fn http_error(err: anyhow::Error) -> HttpResponse {
        let err = AppError::from(err);
        let (code, status) = err.code_and_status();
        if status >= 500 {
            error!(error = %err, "Console request failed");
        }

        Self::http_response(status, code.code, code.message.to_string(), err.to_string())
    }

    pub fn http_unauthorized(reason: &str) -> HttpResponse {
        HttpResponse::Unauthorized().json(Self {
            code: imobi_common::error::ACCESS_DENIED.code,
            message: imobi_common::error::ACCESS_DENIED.message.to_string(),
            data: reason.to_string(),
        })
    }
}

/// Selection posted by the bulk endpoints
#[derive(Clone, Debug, Deserialize)]
pub struct IdsForm {
    pub ids: Vec<i32>,
}

/// Bulk outcome plus the ids the table should keep selected
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkResult {
    #[serde(flatten)]
    pub outcome: BulkOutcome,
    pub remaining_selection: Vec<i32>,
}

impl BulkResult {
    /// 200 when every id was applied, 207 when some failed
    pub fn http_response(outcome: BulkOutcome) -> HttpResponse {
        let status = if outcome.is_complete() {
            StatusCode::OK
        } else {
            StatusCode::MULTI_STATUS
        };
        let result = BulkResult {
            remaining_selection: outcome.remaining_selection(),
            outcome,
        };

        HttpResponse::build(status).json(ApiResult::success(result))
    }
}

#[cfg(test)]
mod tests {
    use imobi_common::ImobiError;
    use imobi_persistence::BulkFailure;

    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let resp = ApiResult::http_error(ImobiError::not_found("banner 1").into());
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = ApiResult::http_error(
            ImobiError::AlreadyExists("site configuration already exists".to_string()).into(),
        );
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = ApiResult::http_error(anyhow::anyhow!("disk full"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_bulk_status() {
        let complete = BulkResult::http_response(BulkOutcome {
            succeeded: vec![1],
            failed: vec![],
        });
        assert_eq!(complete.status(), StatusCode::OK);

        let partial = BulkResult::http_response(BulkOutcome {
            succeeded: vec![1],
            failed: vec![BulkFailure {
                id: 2,
                reason: "not found".to_string(),
            }],
        });
        assert_eq!(partial.status(), StatusCode::MULTI_STATUS);
    }
}
