//! # 레시피 데이터베이스 클라이언트
//!
//! `recipes` 테이블에 대한 CRUD 쿼리와 연결 수명 관리를 담당합니다.
//!
//! ## 사용 패턴
//! ```ignore
//! let mut client = RecipeClient::new(pool);
//! if !client.connect().await { /* 500 */ }
//! let result = client.list_recipes().await;
//! client.disconnect();
//! ```
//!
//! 연결 없이 쿼리를 호출하면 `ClientError::NotConnected`가 반환됩니다.
//! 쓰기 작업(create/update/delete)은 각각 트랜잭션 하나로 실행되고
//! 연결을 돌려주기 전에 커밋됩니다.
//!
//! 쓰기 트랜잭션은 `BEGIN IMMEDIATE`로 시작합니다. SQLite의 기본(deferred)
//! 트랜잭션은 읽기 잠금을 쓰기 잠금으로 올릴 때 다른 작성자와 부딪히면
//! `busy_timeout`을 기다리지 않고 바로 "database is locked"로 실패합니다.

use sqlx::{
    pool::PoolConnection, Connection, QueryBuilder, Sqlite, SqliteConnection, SqlitePool,
};

use crate::error::ClientError;
use crate::models::*;

/// SELECT/RETURNING에서 공통으로 쓰는 컬럼 목록 (`Recipe` 필드와 일치)
const RECIPE_COLUMNS: &str = "id, name, category, main_ingredients, common_ingredients, \
                              instructions, prep_time, portions";

/// 시작 시점에 쓰기 잠금을 잡는 트랜잭션
const WRITE_TRANSACTION: &str = "BEGIN IMMEDIATE";

/// 부분 업데이트 결과
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// 변경이 적용되었고, 다시 조회한 최신 레코드
    Updated(Recipe),
    /// 해당 ID의 레시피가 없음
    NotFound,
    /// 적용할 필드가 없어 DB를 건드리지 않음
    NoChanges,
}

/// 레시피 영속 계층 접근 객체
///
/// 풀에서 연결 하나를 빌려 보관합니다. `disconnect()`를 부르거나
/// 클라이언트가 drop되면 연결이 풀로 반환됩니다.
pub struct RecipeClient {
    pool: SqlitePool,
    conn: Option<PoolConnection<Sqlite>>,
}

impl RecipeClient {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool, conn: None }
    }

    /// 풀에서 연결을 획득합니다.
    ///
    /// 실패해도 에러를 올리지 않고 로그만 남긴 뒤 `false`를 반환합니다.
    /// 이미 연결되어 있으면 그대로 `true`.
    pub async fn connect(&mut self) -> bool {
        if self.conn.is_some() {
            return true;
        }
        match self.pool.acquire().await {
            Ok(conn) => {
                self.conn = Some(conn);
                true
            }
            Err(e) => {
                tracing::error!("Error connecting to database: {}", e);
                false
            }
        }
    }

    /// 연결을 풀로 반환합니다. 연결이 없으면 아무 일도 하지 않습니다.
    pub fn disconnect(&mut self) {
        self.conn = None;
    }

    /// `SELECT 1` 왕복이 성공할 때만 `true`
    pub async fn is_connected(&mut self) -> bool {
        let Some(conn) = self.conn.as_deref_mut() else {
            return false;
        };
        match sqlx::query("SELECT 1").execute(&mut *conn).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Connection check failed: {}", e);
                false
            }
        }
    }

    /// 살아 있는 연결을 빌려줍니다. 없으면 `NotConnected`.
    async fn connection(&mut self) -> Result<&mut SqliteConnection, ClientError> {
        if !self.is_connected().await {
            return Err(ClientError::NotConnected);
        }
        self.conn.as_deref_mut().ok_or(ClientError::NotConnected)
    }

    /// 모든 레시피를 ID 오름차순으로 조회합니다.
    pub async fn list_recipes(&mut self) -> Result<Vec<Recipe>, ClientError> {
        let conn = self.connection().await?;
        let recipes = sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY id"
        ))
        .fetch_all(&mut *conn)
        .await?;

        tracing::debug!(count = recipes.len(), "Listed recipes");
        Ok(recipes)
    }

    /// ID로 레시피 하나를 조회합니다.
    ///
    /// # 반환값
    /// - `Ok(Some(Recipe))`: 찾은 경우
    /// - `Ok(None)`: 해당 ID가 없는 경우 (에러 아님)
    pub async fn get_recipe_by_id(&mut self, id: i64) -> Result<Option<Recipe>, ClientError> {
        let conn = self.connection().await?;
        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(recipe)
    }

    /// 새 레시피를 삽입하고, DB가 부여한 ID를 포함한 레코드를 반환합니다.
    ///
    /// `INSERT ... RETURNING`으로 삽입과 조회를 한 번의 왕복으로 처리합니다.
    pub async fn create_recipe(&mut self, req: &CreateRecipeRequest) -> Result<Recipe, ClientError> {
        let main_ingredients = serde_json::to_string(&req.main_ingredients)?;
        let common_ingredients = serde_json::to_string(&req.common_ingredients)?;

        let conn = self.connection().await?;
        let mut tx = conn.begin_with(WRITE_TRANSACTION).await?;

        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            INSERT INTO recipes (name, category, main_ingredients, common_ingredients,
                                 instructions, prep_time, portions)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {RECIPE_COLUMNS}
            "#
        ))
        .bind(&req.name)
        .bind(&req.category)
        .bind(main_ingredients)
        .bind(common_ingredients)
        .bind(&req.instructions)
        .bind(req.prep_time)
        .bind(req.portions)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(id = recipe.id, name = %recipe.name, "Created recipe");
        Ok(recipe)
    }

    /// 레시피를 삭제합니다.
    ///
    /// # 반환값
    /// - `Ok(true)`: 1행 이상 삭제됨
    /// - `Ok(false)`: 해당 ID가 없음 (아무것도 하지 않음)
    pub async fn delete_recipe(&mut self, id: i64) -> Result<bool, ClientError> {
        let conn = self.connection().await?;
        let mut tx = conn.begin_with(WRITE_TRANSACTION).await?;

        if !recipe_exists(&mut tx, id).await? {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(id, "Deleted recipe");
        }
        Ok(deleted)
    }

    /// 레시피를 부분 업데이트합니다.
    ///
    /// `changes`에 담긴 컬럼만 하나의 `UPDATE ... SET a = ?, b = ?` 문으로 바꾸고,
    /// 커밋한 뒤 최신 레코드를 다시 조회해 돌려줍니다.
    pub async fn update_recipe(
        &mut self,
        id: i64,
        changes: &RecipeChanges,
    ) -> Result<UpdateOutcome, ClientError> {
        let conn = self.connection().await?;
        let mut tx = conn.begin_with(WRITE_TRANSACTION).await?;

        if !recipe_exists(&mut tx, id).await? {
            return Ok(UpdateOutcome::NotFound);
        }
        if changes.is_empty() {
            return Ok(UpdateOutcome::NoChanges);
        }

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE recipes SET ");
        let mut assignments = builder.separated(", ");
        for field in changes.fields() {
            assignments.push(field.column());
            assignments.push_unseparated(" = ");
            match field {
                RecipeField::Name(value)
                | RecipeField::Category(value)
                | RecipeField::Instructions(value) => {
                    assignments.push_bind_unseparated(value.clone());
                }
                RecipeField::PrepTime(value) | RecipeField::Portions(value) => {
                    assignments.push_bind_unseparated(*value);
                }
                RecipeField::MainIngredients(items) => {
                    assignments.push_bind_unseparated(serde_json::to_string(items)?);
                }
                RecipeField::CommonIngredients(items) => {
                    assignments.push_bind_unseparated(serde_json::to_string(items)?);
                }
            }
        }
        builder.push(" WHERE id = ").push_bind(id);

        builder.build().execute(&mut *tx).await?;
        tx.commit().await?;

        tracing::info!(id, fields = changes.fields().len(), "Updated recipe");

        Ok(match self.get_recipe_by_id(id).await? {
            Some(recipe) => UpdateOutcome::Updated(recipe),
            None => UpdateOutcome::NotFound,
        })
    }
}

async fn recipe_exists(conn: &mut SqliteConnection, id: i64) -> Result<bool, ClientError> {
    let row: Option<i64> = sqlx::query_scalar("SELECT id FROM recipes WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}
