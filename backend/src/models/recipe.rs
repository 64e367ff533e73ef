//! # 레시피 모델 정의
//!
//! ## 구조체 역할
//! - `Recipe`: DB `recipes` 테이블 한 행(row)에 대응 (응답용)
//! - `Ingredient`: 레시피의 주재료 하나 (수량/단위/이름)
//! - `CreateRecipeRequest`: `POST /recipes` 요청 본문
//! - `UpdateRecipeRequest`: `PATCH /recipes/{id}` 요청 본문
//! - `RecipeField` / `RecipeChanges`: 부분 업데이트에서 실제로 바꿀 컬럼 목록

use serde::{Deserialize, Deserializer, Serialize};

use super::validation::{FieldError, Validate, Violations};

/// 주재료: 독립적인 식별자 없이 레시피 안의 위치로만 구분되는 값 객체
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// 수량. JSON 정수(`1`)도 받아서 실수로 저장합니다.
    pub quantity: f64,
    pub unit: String,
    pub name: String,
}

impl Ingredient {
    pub fn new(quantity: f64, unit: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            quantity,
            unit: unit.into(),
            name: name.into(),
        }
    }
}

/// 레시피 엔티티: DB의 `recipes` 테이블 한 행에 대응합니다.
///
/// 두 재료 목록은 DB에 JSON 텍스트로 저장되고,
/// `#[sqlx(json)]`이 조회 시 `Vec`으로 되돌립니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub category: String,
    #[sqlx(json)]
    pub main_ingredients: Vec<Ingredient>,
    #[sqlx(json)]
    pub common_ingredients: Vec<String>,
    pub instructions: String,
    /// 준비 시간(분)
    pub prep_time: i64,
    /// 인분
    pub portions: i64,
}

/// 레시피 생성 요청: 모든 필드가 필수입니다.
///
/// 필드가 빠졌거나 타입이 맞지 않으면 역직렬화 단계에서 422가 됩니다.
/// 재료 목록은 비어 있어도 됩니다.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecipeRequest {
    pub name: String,
    pub category: String,
    pub main_ingredients: Vec<Ingredient>,
    pub common_ingredients: Vec<String>,
    pub instructions: String,
    pub prep_time: i64,
    pub portions: i64,
}

impl Validate for CreateRecipeRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Violations::default();
        v.name("name", &self.name);
        v.ingredients("main_ingredients", &self.main_ingredients);
        v.prep_time("prep_time", self.prep_time);
        v.portions("portions", self.portions);
        v.into_result()
    }
}

/// 레시피 수정 요청: PATCH(부분 업데이트)
///
/// 각 필드는 세 가지 상태를 가집니다.
/// - `None`: 본문에 키가 없음 (변경 안 함)
/// - `Some(None)`: 키가 `null`로 명시됨 (검증에서 거부)
/// - `Some(Some(v))`: 새 값
///
/// 알 수 없는 키는 serde가 무시합니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRecipeRequest {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub main_ingredients: Option<Option<Vec<Ingredient>>>,
    #[serde(default, deserialize_with = "present")]
    pub common_ingredients: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "present")]
    pub instructions: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub prep_time: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub portions: Option<Option<i64>>,
}

/// 키가 존재하면 `Some(..)`으로 감쌉니다. 키가 없을 때는 `#[serde(default)]`가 `None`을 채웁니다.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Validate for UpdateRecipeRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Violations::default();

        // 명시적 null 검사. 모든 컬럼은 레시피가 존재하는 동안 값이 있어야 합니다.
        let nulls = [
            ("name", matches!(self.name, Some(None))),
            ("category", matches!(self.category, Some(None))),
            ("main_ingredients", matches!(self.main_ingredients, Some(None))),
            ("common_ingredients", matches!(self.common_ingredients, Some(None))),
            ("instructions", matches!(self.instructions, Some(None))),
            ("prep_time", matches!(self.prep_time, Some(None))),
            ("portions", matches!(self.portions, Some(None))),
        ];
        for (field, is_null) in nulls {
            if is_null {
                v.push(field, "may not be null");
            }
        }

        if let Some(Some(name)) = &self.name {
            v.name("name", name);
        }
        if let Some(Some(items)) = &self.main_ingredients {
            v.ingredients("main_ingredients", items);
        }
        if let Some(Some(prep_time)) = self.prep_time {
            v.prep_time("prep_time", prep_time);
        }
        if let Some(Some(portions)) = self.portions {
            v.portions("portions", portions);
        }

        v.into_result()
    }
}

impl UpdateRecipeRequest {
    /// 값이 주어진 필드만 골라 변경 목록으로 만듭니다.
    ///
    /// null 필드는 `validate()`에서 이미 걸러지므로 여기서는 건너뜁니다.
    pub fn into_changes(self) -> RecipeChanges {
        let mut changes = RecipeChanges::default();
        if let Some(Some(name)) = self.name {
            changes.push(RecipeField::Name(name));
        }
        if let Some(Some(category)) = self.category {
            changes.push(RecipeField::Category(category));
        }
        if let Some(Some(instructions)) = self.instructions {
            changes.push(RecipeField::Instructions(instructions));
        }
        if let Some(Some(prep_time)) = self.prep_time {
            changes.push(RecipeField::PrepTime(prep_time));
        }
        if let Some(Some(portions)) = self.portions {
            changes.push(RecipeField::Portions(portions));
        }
        if let Some(Some(items)) = self.main_ingredients {
            changes.push(RecipeField::MainIngredients(items));
        }
        if let Some(Some(items)) = self.common_ingredients {
            changes.push(RecipeField::CommonIngredients(items));
        }
        changes
    }
}

/// 부분 업데이트에서 바꿀 수 있는 컬럼 하나와 그 새 값
#[derive(Debug, Clone, PartialEq)]
pub enum RecipeField {
    Name(String),
    Category(String),
    Instructions(String),
    PrepTime(i64),
    Portions(i64),
    MainIngredients(Vec<Ingredient>),
    CommonIngredients(Vec<String>),
}

impl RecipeField {
    /// 이 변경이 쓰는 `recipes` 테이블 컬럼 이름
    pub fn column(&self) -> &'static str {
        match self {
            RecipeField::Name(_) => "name",
            RecipeField::Category(_) => "category",
            RecipeField::Instructions(_) => "instructions",
            RecipeField::PrepTime(_) => "prep_time",
            RecipeField::Portions(_) => "portions",
            RecipeField::MainIngredients(_) => "main_ingredients",
            RecipeField::CommonIngredients(_) => "common_ingredients",
        }
    }
}

/// 한 번의 UPDATE 문으로 적용할 변경 목록
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeChanges(Vec<RecipeField>);

impl RecipeChanges {
    pub fn push(&mut self, field: RecipeField) {
        self.0.push(field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &[RecipeField] {
        &self.0
    }
}

impl FromIterator<RecipeField> for RecipeChanges {
    fn from_iter<I: IntoIterator<Item = RecipeField>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
