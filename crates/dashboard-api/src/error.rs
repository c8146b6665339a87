//! API 에러 응답.
//!
//! 캐시 엔진 에러를 HTTP 상태 코드와 JSON 본문으로 변환합니다.
//!
//! ```json
//! { "code": "NOT_FOUND", "message": "Not found: 차트 캐시 없음: AAPL/1mo/1d" }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dashboard_data::DataError;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// API 에러 응답 본문.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "INVALID_INPUT", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 메시지
    pub message: String,
}

impl ApiErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// 핸들러 에러.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorResponse::new(code, message),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }
}

impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        let (status, code) = match &err {
            DataError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            DataError::UnknownCategory(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_CATEGORY"),
            DataError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            DataError::Generation { .. } => (StatusCode::BAD_GATEWAY, "GENERATION_FAILED"),
            DataError::QuoteFetch { .. } => (StatusCode::BAD_GATEWAY, "QUOTE_FETCH_FAILED"),
            DataError::SentimentFetch { .. } => {
                (StatusCode::BAD_GATEWAY, "SENTIMENT_FETCH_FAILED")
            }
            DataError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            DataError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };

        if status.is_server_error() {
            error!(code, error = %err, "요청 처리 실패");
        } else {
            warn!(code, error = %err, "잘못된 요청");
        }

        Self::new(status, code, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;
