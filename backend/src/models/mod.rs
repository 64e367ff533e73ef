//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `recipe`: 레시피/재료 엔티티와 생성·수정 요청 구조체
//! - `validation`: 요청 본문 검증 규칙과 필드 단위 에러 타입
//!
//! 예: `crate::models::recipe::Recipe` 대신 `crate::models::Recipe`로 접근 가능

pub mod recipe;
pub mod validation;

pub use recipe::*;
pub use validation::*;
