//! # 요청 본문 검증
//!
//! serde 역직렬화가 타입(숫자/문자열/배열)을 보장한 뒤,
//! 이 모듈의 규칙이 값의 범위를 확인합니다.
//! 실패는 `FieldError` 목록으로 모아서 한 번에 돌려줍니다.

use serde::Serialize;
use serde_path_to_error::Segment;

/// 필드 단위 검증 에러
///
/// `field`는 문제가 된 경로입니다. 예: `"main_ingredients[0].quantity"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// 역직렬화 이후 값 검증을 수행하는 요청 타입
///
/// `extract::ValidatedJson<T>`가 본문을 파싱한 직후 호출합니다.
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

/// 검증 에러 수집기
#[derive(Debug, Default)]
pub(crate) struct Violations(Vec<FieldError>);

impl Violations {
    pub(crate) fn push(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.0.push(FieldError::new(field, reason));
    }

    pub(crate) fn name(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "must not be empty");
        }
    }

    pub(crate) fn prep_time(&mut self, field: &str, value: i64) {
        if value < 0 {
            self.push(field, "must be greater than or equal to 0");
        }
    }

    pub(crate) fn portions(&mut self, field: &str, value: i64) {
        if value < 1 {
            self.push(field, "must be greater than or equal to 1");
        }
    }

    pub(crate) fn ingredients(&mut self, field: &str, items: &[super::Ingredient]) {
        for (i, item) in items.iter().enumerate() {
            if !item.quantity.is_finite() || item.quantity < 0.0 {
                self.push(
                    format!("{field}[{i}].quantity"),
                    "must be a non-negative number",
                );
            }
        }
    }

    pub(crate) fn into_result(self) -> Result<(), Vec<FieldError>> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self.0)
        }
    }
}

/// `serde_path_to_error`가 보고한 JSON 역직렬화 실패를 `FieldError`로 바꿉니다.
///
/// - 문법 오류나 본문이 중간에 끝난 경우: 필드 `"body"`
/// - 타입 불일치: 실패한 값의 경로 (예: `main_ingredients[0].quantity`)
/// - 필드 누락: 경로는 바깥 객체를 가리키므로 빠진 필드 이름을 덧붙입니다.
pub fn field_error_from_json(err: &serde_path_to_error::Error<serde_json::Error>) -> FieldError {
    let inner = err.inner();
    let reason = inner.to_string();
    if !inner.is_data() {
        return FieldError::new("body", reason);
    }

    let path = err.path().iter().fold(String::new(), |mut path, segment| {
        match segment {
            Segment::Seq { index } => path.push_str(&format!("[{index}]")),
            Segment::Map { key } => push_key(&mut path, key),
            Segment::Enum { variant } => push_key(&mut path, variant),
            Segment::Unknown => push_key(&mut path, "?"),
        }
        path
    });

    let mut field = path;
    if let Some(name) = missing_field(&reason) {
        push_key(&mut field, name);
    }
    if field.is_empty() {
        field.push_str("body");
    }
    FieldError::new(field, reason)
}

fn push_key(path: &mut String, key: &str) {
    if !path.is_empty() {
        path.push('.');
    }
    path.push_str(key);
}

/// serde의 `missing field `name`` 메시지에서 필드 이름을 꺼냅니다.
fn missing_field(reason: &str) -> Option<&str> {
    reason
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split_once('`'))
        .map(|(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateRecipeRequest, Ingredient};

    #[test]
    fn collects_every_violation() {
        let mut v = Violations::default();
        v.name("name", "   ");
        v.prep_time("prep_time", -1);
        v.portions("portions", 0);
        v.ingredients(
            "main_ingredients",
            &[
                Ingredient::new(1.0, "pcs", "chicken"),
                Ingredient::new(-2.0, "g", "salt"),
            ],
        );

        let errors = v.into_result().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            ["name", "prep_time", "portions", "main_ingredients[1].quantity"]
        );
    }

    #[test]
    fn zero_prep_time_and_quantity_are_fine() {
        let mut v = Violations::default();
        v.prep_time("prep_time", 0);
        v.portions("portions", 1);
        v.ingredients("main_ingredients", &[Ingredient::new(0.0, "pinch", "salt")]);
        assert!(v.into_result().is_ok());
    }

    fn parse_error(body: &str) -> FieldError {
        let mut de = serde_json::Deserializer::from_str(body);
        let err = serde_path_to_error::deserialize::<_, CreateRecipeRequest>(&mut de).unwrap_err();
        field_error_from_json(&err)
    }

    const VALID_TAIL: &str = r#""category": "lunch", "common_ingredients": [],
        "instructions": "Simmer.", "prep_time": 35, "portions": 2"#;

    #[test]
    fn mistyped_value_reports_its_path() {
        let err = parse_error(&format!(
            r#"{{"name": "Soup", "main_ingredients": [{{"quantity": "a lot", "unit": "g", "name": "rice"}}], {VALID_TAIL}}}"#
        ));
        assert_eq!(err.field, "main_ingredients[0].quantity");
        assert!(err.reason.starts_with("invalid type"));
    }

    #[test]
    fn missing_field_is_named() {
        let err = parse_error(r#"{"name": "Soup", "main_ingredients": []}"#);
        assert_eq!(err.field, "category");
        assert!(err.reason.contains("missing field"));
    }

    #[test]
    fn nested_missing_field_extends_the_path() {
        let err = parse_error(&format!(
            r#"{{"name": "Soup", "main_ingredients": [{{"quantity": 1, "name": "rice"}}], {VALID_TAIL}}}"#
        ));
        assert_eq!(err.field, "main_ingredients[0].unit");
    }

    #[test]
    fn key_with_spaces_keeps_its_path() {
        let mut de = serde_json::Deserializer::from_str(r#"{"odd key: here": "x"}"#);
        let err = serde_path_to_error::deserialize::<_, std::collections::HashMap<String, i64>>(
            &mut de,
        )
        .unwrap_err();
        assert_eq!(field_error_from_json(&err).field, "odd key: here");
    }

    #[test]
    fn syntax_error_reports_body() {
        assert_eq!(parse_error(r#"{"name": "Soup","#).field, "body");
        assert_eq!(parse_error(r#"{"name": }"#).field, "body");
    }

    #[test]
    fn wrong_top_level_type_reports_body() {
        assert_eq!(parse_error(r#""just a string""#).field, "body");
    }
}
