//! # 요청 추출기(Extractor)
//!
//! axum 기본 추출기의 거부(rejection) 응답을 이 서비스의 에러 형식으로 바꿉니다.
//! - `RecipeId`: `/recipes/{id}`의 정수 ID. 정수가 아니면 422
//! - `ValidatedJson<T>`: JSON 본문 파싱 + `Validate` 검사. 실패하면 422 (필드 경로 포함)

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, FromRequest, FromRequestParts, Path, Request},
    http::{header, request::Parts, HeaderMap},
};
use serde::de::DeserializeOwned;

use crate::{
    error::AppError,
    models::{field_error_from_json, Validate},
};

/// 경로의 레시피 ID
#[derive(Debug, Clone, Copy)]
pub struct RecipeId(pub i64);

impl<S> FromRequestParts<S> for RecipeId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<i64>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(RecipeId(id)),
            Err(PathRejection::FailedToDeserializePathParams(e)) => Err(AppError::invalid_field(
                "recipe_id",
                format!("Input should be a valid integer: {}", e.body_text()),
            )),
            Err(e) => Err(AppError::invalid_field("recipe_id", e.body_text())),
        }
    }
}

/// 검증까지 통과한 JSON 본문
///
/// 본문을 바이트로 받은 뒤 `serde_path_to_error`로 역직렬화해서
/// 실패한 필드의 경로를 구조적으로 얻습니다.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !json_content_type(req.headers()) {
            return Err(AppError::invalid_field(
                "content-type",
                "Expected request with `Content-Type: application/json`",
            ));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::invalid_field("body", e.body_text()))?;

        let mut de = serde_json::Deserializer::from_slice(&bytes);
        let value: T = serde_path_to_error::deserialize(&mut de)
            .map_err(|e| AppError::Validation(vec![field_error_from_json(&e)]))?;
        // 값 뒤에 남은 문자가 있으면 문법 오류
        de.end()
            .map_err(|e| AppError::invalid_field("body", e.to_string()))?;

        value.validate().map_err(AppError::Validation)?;
        Ok(ValidatedJson(value))
    }
}

/// `application/json` 또는 `application/*+json`이면 `true`
fn json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.strip_prefix("application/") {
        Some(subtype) => subtype == "json" || subtype.ends_with("+json"),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn json_content_types_are_recognized() {
        assert!(json_content_type(&headers("application/json")));
        assert!(json_content_type(&headers("application/json; charset=utf-8")));
        assert!(json_content_type(&headers("Application/JSON")));
        assert!(json_content_type(&headers("application/merge-patch+json")));
        assert!(!json_content_type(&headers("text/json")));
        assert!(!json_content_type(&headers("text/plain")));
        assert!(!json_content_type(&HeaderMap::new()));
    }
}
