//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 코드를 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)는 요청마다 `RecipeClient`를 만들어
//! 연결 → 쿼리 → 연결 해제 순서로 사용합니다.
//!
//! - `recipes`: 레시피 CRUD 쿼리와 연결 수명 관리

pub mod recipes;

pub use recipes::*;

use std::{str::FromStr, time::Duration};

use sqlx::{
    migrate::MigrateError,
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
};

/// 다른 연결이 쓰기 잠금을 쥐고 있을 때 기다리는 최대 시간
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite 연결 풀을 생성합니다.
///
/// 풀은 서버 시작 시 한 번 만들어지고, `RecipeClient`가 요청마다
/// 여기서 연결을 빌려 갔다가 돌려줍니다.
pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.busy_timeout(BUSY_TIMEOUT);
    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// `./migrations`의 SQL 파일 중 아직 적용되지 않은 것을 순서대로 실행합니다.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// 마이그레이션이 적용된 인메모리 DB 풀 (단위 테스트와 통합 테스트 공용)
///
/// `sqlite::memory:`는 연결마다 별도 DB이므로 연결을 하나로 고정하고,
/// 유휴 연결이 닫혀 데이터가 사라지지 않도록 타임아웃을 끕니다.
pub async fn memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}
