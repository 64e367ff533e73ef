//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `recipes`: 레시피 CRUD 핸들러

pub mod health;
pub mod recipes;

pub use health::*;
pub use recipes::*;
