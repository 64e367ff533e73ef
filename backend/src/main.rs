//! # Meal Planner 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 설정 읽기
//! 4. SQLite 연결 풀 생성
//! 5. 마이그레이션 실행
//! 6. 라우터 조립
//! 7. HTTP 서버 시작

// ── 외부 크레이트 및 라이브러리 항목 가져오기 ──
// 라우터 조립과 DB 코드는 lib(meal_planner)에 있고, 이 파일은 실행 순서만 담당합니다.
use anyhow::Result; // 어떤 에러 타입이든 `?`로 올릴 수 있는 범용 Result
use axum::http::HeaderValue; // CORS 허용 출처를 담는 헤더 값 타입
use meal_planner::{build_app, config::Config, db}; // 라우터 조립, 설정, 풀/마이그레이션
use std::path::Path; // DB 파일 경로 처리
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt}; // 로깅 초기화 유틸리티

// #[tokio::main]: Tokio 비동기 런타임을 만들고 그 안에서 main을 실행합니다.
#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // RUST_LOG가 없으면 meal_planner, tower_http, axum 모듈을 debug 레벨로
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meal_planner=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 읽기 ──
    // 값이 없거나 잘못되면 기본값을 씁니다 (config.rs 참고).
    let config = Config::from_env();
    tracing::info!("Starting Meal Planner API on {}:{}", config.host, config.port);

    // ── 4단계: SQLite 연결 풀 생성 ──
    // "sqlite:data/meal_planner.db" 같은 파일 DB라면 상위 디렉토리를 먼저 만듭니다.
    if let Some(parent) = sqlite_parent_dir(&config.database_url) {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            tokio::fs::create_dir_all(parent).await?;
            tracing::info!("Created database directory: {}", parent.display());
        }
    }

    let pool = db::init_pool(&config.database_url, config.max_connections).await?;

    // ── 5단계: 마이그레이션 실행 ──
    // migrations/의 SQL이 바이너리에 포함되어 있고, 적용 안 된 것만 실행됩니다.
    tracing::info!("Running database migrations...");
    db::run_migrations(&pool).await?;

    // ── 6단계: 라우터 조립 ──
    // 프론트엔드 출처가 헤더 값으로 쓸 수 없는 문자열이면 여기서 시작을 멈춥니다.
    let frontend_origin = HeaderValue::from_str(&config.frontend_url)?;
    tracing::info!("Allowing cross-origin requests from {}", config.frontend_url);

    let app = build_app(pool, frontend_origin);

    // ── 7단계: HTTP 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// `sqlite:` URL에서 DB 파일의 상위 디렉토리를 꺼냅니다. 인메모리 DB는 `None`.
fn sqlite_parent_dir(database_url: &str) -> Option<&Path> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next()?;
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Path::new(path).parent()
}
