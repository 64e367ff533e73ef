//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /health` → `{ "status": "healthy", "message": "..." }`
//!
//! DB에 접근하지 않으므로 서버 프로세스가 살아 있으면 항상 200입니다.

use axum::Json;
use serde_json::{json, Value};

/// `GET /health`: 서버 상태를 확인합니다.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "Meal Planner API is running !"
    }))
}
