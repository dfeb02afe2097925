//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 에러를 `AppError` 하나로 통합하고,
//! `IntoResponse` 구현으로 HTTP 응답에 매핑합니다.
//!
//! 응답 본문 형식: `{ "error": { "code": "...", "message": "..." } }`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::storage::StorageError;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러가 `Result<T, AppError>`를 반환하면 Axum이 `into_response`를
/// 호출하여 상태 코드와 JSON 에러 본문을 만듭니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스(일기, 코디, 이미지 키)를 찾을 수 없음 (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// 필수 입력 누락 등 잘못된 요청 (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 인증 실패 (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 리소스 충돌 (HTTP 409), 예: 이미 존재하는 사용자 이름
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 오브젝트 스토리지 전송 오류 (HTTP 500). 재시도하지 않습니다.
    #[error("Storage error: {0}")]
    Storage(String),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// `#[from]` 덕분에 sqlx 호출 뒤의 `?`가 자동으로 이 variant로 변환됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 파일 입출력 오류 (HTTP 500)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// 스토리지 계층의 에러를 HTTP 계층의 에러로 옮깁니다.
// 키가 없으면 404, 그 밖의 전송 오류는 500입니다.
impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(_) => AppError::NotFound,
            StorageError::Io(msg) => AppError::Storage(msg),
        }
    }
}

impl IntoResponse for AppError {
    /// 내부 에러(Storage, Database, Io, Internal)는 실제 내용을 로그에만 남기고
    /// 클라이언트에는 일반적인 메시지만 돌려줍니다.
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
            AppError::Unauthorized(ref msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone())
            }
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::Storage(ref msg) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_error",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Io(ref e) => {
                tracing::error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "io_error",
                    "An IO error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
