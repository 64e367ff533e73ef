//! # 레시피(Recipe) 라우트 핸들러
//!
//! ## 엔드포인트
//! | 메서드 | 경로 | 핸들러 | 성공 응답 |
//! |--------|------|--------|-----------|
//! | GET | /recipes | `list_recipes` | 200 `{status, count, recipes}` |
//! | GET | /recipes/{id} | `get_recipe` | 200 레시피 |
//! | POST | /recipes | `create_recipe` | 201 `{id, status, message}` |
//! | PATCH | /recipes/{id} | `update_recipe` | 200 수정된 레시피 |
//! | DELETE | /recipes/{id} | `delete_recipe` | 200 `{status, message}` |
//!
//! 모든 핸들러는 같은 순서를 따릅니다:
//! 연결 → 쿼리 실행 → 연결 해제 → 결과를 HTTP 응답으로 변환.
//! 쿼리가 실패해도 연결은 에러를 변환하기 전에 먼저 해제됩니다.

use axum::{extract::State, http::StatusCode, Json}; // 공유 상태 추출, 상태 코드, JSON 응답
use serde_json::{json, Value}; // json! 매크로로 응답 본문을 즉석에서 조립
use sqlx::SqlitePool;

use crate::{
    db::{RecipeClient, UpdateOutcome}, // 요청마다 만드는 DB 클라이언트
    error::AppError,                   // 모든 핸들러의 에러 타입 (IntoResponse 구현)
    extract::{RecipeId, ValidatedJson}, // 경로 ID / 검증된 본문 추출기
    models::*,
};

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// SqlitePool은 내부적으로 Arc를 쓰므로 clone해도 같은 풀을 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
}

/// 요청 하나가 사용할 클라이언트를 만들고 연결합니다.
async fn connect(state: &AppState) -> Result<RecipeClient, AppError> {
    let mut client = RecipeClient::new(state.pool.clone());
    if !client.connect().await {
        return Err(AppError::Connection);
    }
    Ok(client)
}

/// `GET /recipes`: 전체 레시피 목록 (비어 있을 수 있음)
pub async fn list_recipes(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    // ── 1단계: 연결 → 조회 → 연결 해제 ──
    let mut client = connect(&state).await?;
    let result = client.list_recipes().await;
    client.disconnect();

    // ── 2단계: 결과를 응답으로 변환 ──
    let recipes = result.map_err(AppError::unexpected("Error retrieving recipes"))?;
    Ok(Json(json!({
        "status": "success",
        "count": recipes.len(),
        "recipes": recipes,
    })))
}

/// `GET /recipes/{id}`: 단일 레시피 조회
pub async fn get_recipe(
    State(state): State<AppState>,
    RecipeId(id): RecipeId,
) -> Result<Json<Recipe>, AppError> {
    let mut client = connect(&state).await?;
    let result = client.get_recipe_by_id(id).await;
    client.disconnect();

    // 쿼리 실패는 500, 행이 없으면 404
    let recipe = result
        .map_err(AppError::unexpected("Error retrieving recipe"))?
        .ok_or_else(|| AppError::recipe_not_found(id))?;
    Ok(Json(recipe))
}

/// `POST /recipes`: 새 레시피 생성
///
/// 본문 검증은 `ValidatedJson`이 핸들러 실행 전에 끝냅니다.
pub async fn create_recipe(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let mut client = connect(&state).await?;
    let result = client.create_recipe(&req).await;
    client.disconnect();

    let recipe = result.map_err(AppError::unexpected("Error creating recipe"))?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": recipe.id,
            "status": "success",
            "message": "Recipe created successfully",
        })),
    ))
}

/// `PATCH /recipes/{id}`: 부분 업데이트
///
/// 본문에 있는 필드만 바뀝니다. 알 수 없는 키만 있거나 `{}`이면 400.
pub async fn update_recipe(
    State(state): State<AppState>,
    RecipeId(id): RecipeId,
    ValidatedJson(req): ValidatedJson<UpdateRecipeRequest>,
) -> Result<Json<Recipe>, AppError> {
    // ── 1단계: 바꿀 필드 목록 만들기 ──
    // 알 수 없는 키는 역직렬화에서 이미 버려졌습니다.
    let changes = req.into_changes();
    if changes.is_empty() {
        return Err(AppError::BadRequest(
            "No fields provided for update".to_string(),
        ));
    }

    // ── 2단계: 존재 확인과 UPDATE를 한 트랜잭션으로 실행 ──
    let mut client = connect(&state).await?;
    let result = client.update_recipe(id, &changes).await;
    client.disconnect();

    // ── 3단계: 결과 분기 ──
    match result.map_err(AppError::unexpected("Error updating recipe"))? {
        UpdateOutcome::Updated(recipe) => Ok(Json(recipe)),
        UpdateOutcome::NotFound => Err(AppError::recipe_not_found(id)),
        // 빈 변경은 위에서 이미 400으로 처리됨
        UpdateOutcome::NoChanges => Err(AppError::BadRequest(
            "No fields provided for update".to_string(),
        )),
    }
}

/// `DELETE /recipes/{id}`: 레시피 삭제
pub async fn delete_recipe(
    State(state): State<AppState>,
    RecipeId(id): RecipeId,
) -> Result<Json<Value>, AppError> {
    let mut client = connect(&state).await?;
    let result = client.delete_recipe(id).await;
    client.disconnect();

    // false = 삭제할 행이 없었음 → 404
    if !result.map_err(AppError::unexpected("Error deleting recipe"))? {
        return Err(AppError::recipe_not_found(id));
    }
    Ok(Json(json!({
        "status": "success",
        "message": format!("Recipe with ID {id} deleted successfully"),
    })))
}
