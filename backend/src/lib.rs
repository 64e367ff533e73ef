//! # Meal Planner 백엔드
//!
//! 레시피 CRUD REST API입니다. `main.rs`와 통합 테스트(tests/)가
//! 같은 라우터를 쓰도록 조립 코드를 라이브러리로 둡니다.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod models;
pub mod routes;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use routes::AppState;
use sqlx::SqlitePool;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// 전체 라우터를 조립합니다.
///
/// - `frontend_origin`: CORS로 허용할 출처 (예: `http://localhost:5173`)
pub fn build_app(pool: SqlitePool, frontend_origin: HeaderValue) -> Router {
    let state = AppState { pool };

    let cors = CorsLayer::new()
        .allow_origin(frontend_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health_check))
        .route(
            "/recipes",
            get(routes::list_recipes).post(routes::create_recipe),
        )
        // {id}: 경로 파라미터. extract::RecipeId가 정수로 파싱합니다.
        .route(
            "/recipes/{id}",
            get(routes::get_recipe)
                .patch(routes::update_recipe)
                .delete(routes::delete_recipe),
        )
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
