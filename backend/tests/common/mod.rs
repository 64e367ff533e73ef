//! 통합 테스트 공용 헬퍼
//!
//! 라우터를 `tower::ServiceExt::oneshot`으로 직접 호출하므로 TCP 리스너가 필요 없습니다.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{HeaderValue, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

pub const FRONTEND: &str = "http://localhost:5173";

/// 마이그레이션이 적용된 인메모리 SQLite 풀
pub async fn memory_pool() -> SqlitePool {
    meal_planner::db::memory_pool()
        .await
        .expect("in-memory sqlite")
}

pub fn build_test_app(pool: SqlitePool) -> Router {
    meal_planner::build_app(pool, HeaderValue::from_static(FRONTEND))
}

pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// 본문을 문자열 그대로 보냅니다. 깨진 JSON이나 헤더 누락을 재현할 때 씁니다.
pub async fn send_raw(
    app: Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// 점심용 "Test Soup" 레시피 본문
pub fn soup() -> Value {
    json!({
        "name": "Test Soup",
        "category": "lunch",
        "main_ingredients": [{"name": "chicken", "unit": "pcs", "quantity": 1}],
        "common_ingredients": ["salt"],
        "instructions": "Simmer.",
        "prep_time": 35,
        "portions": 2
    })
}

/// 레시피를 만들고 생성된 ID를 돌려줍니다.
pub async fn create(pool: &SqlitePool, body: Value) -> i64 {
    let response = post_json(build_test_app(pool.clone()), "/recipes", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().expect("id")
}
