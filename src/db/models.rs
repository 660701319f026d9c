use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub steps_text: Option<String>,
    pub source_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewRecipe {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub steps_text: Option<String>,
    pub source_image_url: Option<String>,
    /// Defaults to now when absent
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: i64,
    pub canonical_name: String,
    pub normalized_name: String,
    pub group_name: String,
}

/// A recipe's ingredient line. `ingredient_id` is `None` for freeform text
/// that was never matched to the ingredient master.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecipeIngredient {
    pub ingredient_id: Option<i64>,
    pub original_name: String,
    pub amount: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub normalized_name: String,
    pub description: Option<String>,
    pub sort_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Synonym {
    pub id: i64,
    pub synonym: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Tag row joined for bulk hydration
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecipeTagRow {
    pub recipe_id: i64,
    pub tag_id: i64,
    pub tag_name: String,
}

/// Ingredient line joined (LEFT) with the ingredient master
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecipeIngredientRow {
    pub recipe_id: i64,
    pub ingredient_id: Option<i64>,
    pub original_name: String,
    pub amount: Option<String>,
    pub note: Option<String>,
    pub canonical_name: Option<String>,
}

/// Row returned by the synonym-aware recipe search
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SynonymSearchRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IngredientSynonymLink {
    pub ingredient_id: i64,
    pub canonical_name: String,
    pub synonym_id: i64,
    pub synonym: String,
}
