use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type RecipeId = i64;

/// A fully hydrated search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeResult {
    pub id: RecipeId,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub steps_text: Option<String>,
    pub tags: Vec<TagSummary>,
    pub ingredients: Vec<IngredientEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSummary {
    pub id: i64,
    pub name: String,
}

/// One ingredient line of a recipe. `id` and `canonical_name` are `None`
/// when the line was never matched to the ingredient master.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientEntry {
    pub id: Option<i64>,
    pub original_name: String,
    pub canonical_name: Option<String>,
    pub amount: Option<String>,
    pub note: Option<String>,
}

/// A similar recipe. `similarity` is cosine similarity clamped to `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecipe {
    pub id: RecipeId,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub similarity: f32,
}

/// Recipe row as returned by a bulk fetch
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeRecord {
    pub id: RecipeId,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub steps_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagLink {
    pub recipe_id: RecipeId,
    pub tag_id: i64,
    pub tag_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngredientLink {
    pub recipe_id: RecipeId,
    pub ingredient_id: Option<i64>,
    pub original_name: String,
    pub amount: Option<String>,
    pub note: Option<String>,
    pub canonical_name: Option<String>,
}

/// Row returned by a synonym-aware search
#[derive(Debug, Clone, PartialEq)]
pub struct SynonymHit {
    pub id: RecipeId,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}
