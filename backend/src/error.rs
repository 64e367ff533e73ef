//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 에러 타입을 두 계층으로 나눠 정의합니다.
//!
//! - `ClientError`: 영속 계층(`db::RecipeClient`)이 반환하는 에러
//! - `AppError`: 라우트 핸들러가 반환하는 에러. `IntoResponse`를 구현하여
//!   핸들러에서 `Err(AppError)`를 반환하면 그대로 HTTP 응답이 됩니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::FieldError;

/// 영속 계층 에러
///
/// 연결 없이 쿼리를 호출한 경우(`NotConnected`)가 이 계층 고유의 에러이고,
/// 나머지는 드라이버/직렬화 에러를 그대로 감쌉니다.
/// "레코드 없음"은 에러가 아니라 `Option::None` 등 반환값으로 표현합니다.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Not connected to database")]
    NotConnected,

    /// #[from]: sqlx::Error에 `?`를 쓰면 자동으로 이 variant로 변환됩니다.
    #[error("{0}")]
    Query(#[from] sqlx::Error),

    #[error("failed to encode ingredients: {0}")]
    Encode(#[from] serde_json::Error),
}

/// 라우트 핸들러에서 발생할 수 있는 모든 에러 종류
///
/// 각 variant는 적절한 HTTP 상태 코드와 JSON 본문으로 변환됩니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 레시피가 없음 (HTTP 404). 메시지에 ID가 포함됩니다.
    #[error("{0}")]
    NotFound(String),

    /// 잘못된 요청 (HTTP 400). 예: 수정할 필드가 하나도 없는 PATCH
    #[error("{0}")]
    BadRequest(String),

    /// 요청 본문/경로 검증 실패 (HTTP 422)
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// DB 연결 획득 실패 (HTTP 500)
    #[error("Failed to connect to database")]
    Connection,

    /// 그 밖의 모든 에러 (HTTP 500). "<작업 설명>: <원인>" 형태의 메시지를 그대로 노출합니다.
    #[error("{0}")]
    Unexpected(String),
}

impl AppError {
    /// 레시피 ID를 포함한 404 에러를 만듭니다.
    pub fn recipe_not_found(id: i64) -> Self {
        AppError::NotFound(format!("Recipe with ID {id} not found"))
    }

    /// 단일 필드에 대한 422 에러를 만듭니다.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(field, reason)])
    }

    /// 영속 계층 에러를 작업 설명(`context`)과 함께 500 에러로 감쌉니다.
    ///
    /// 핸들러에서 `.map_err(AppError::unexpected("Error retrieving recipes"))` 형태로 씁니다.
    pub fn unexpected(context: &'static str) -> impl FnOnce(ClientError) -> AppError {
        move |err| AppError::Unexpected(format!("{context}: {err}"))
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 본문 형태: `{ "error": { "code": "...", "message": "...", "details": [...] } }`
    /// (`details`는 검증 에러에만 포함)
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, code, details) = match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", None),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request", None),
            AppError::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                Some(fields),
            ),
            AppError::Connection => {
                tracing::error!("Database connection unavailable");
                (StatusCode::INTERNAL_SERVER_ERROR, "connection_error", None)
            }
            AppError::Unexpected(ref msg) => {
                tracing::error!("Unexpected error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let mut error = json!({
            "code": code,
            "message": message,
        });
        if let Some(fields) = details {
            error["details"] = json!(fields);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
