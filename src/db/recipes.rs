use crate::db::{id_list_json, like_pattern, models::*, DbPool};
use crate::error::{Error, Result};
use crate::search::normalize::normalize;
use chrono::Utc;

const RECIPE_COLUMNS: &str =
    "id, title, description, category, steps_text, source_image_url, created_at";

/// Create a new recipe
pub async fn create_recipe(pool: &DbPool, new_recipe: &NewRecipe) -> Result<Recipe> {
    if new_recipe.title.trim().is_empty() {
        return Err(Error::Validation("Recipe title cannot be empty".to_string()));
    }

    let created_at = new_recipe.created_at.unwrap_or_else(Utc::now);

    let recipe = sqlx::query_as::<_, Recipe>(&format!(
        r#"
        INSERT INTO recipes (title, description, category, steps_text, source_image_url,
                             normalized_title, normalized_description, normalized_category,
                             created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {RECIPE_COLUMNS}
        "#
    ))
    .bind(&new_recipe.title)
    .bind(&new_recipe.description)
    .bind(&new_recipe.category)
    .bind(&new_recipe.steps_text)
    .bind(&new_recipe.source_image_url)
    .bind(normalize(&new_recipe.title))
    .bind(new_recipe.description.as_deref().map(normalize))
    .bind(new_recipe.category.as_deref().map(normalize))
    .bind(created_at)
    .fetch_one(pool)
    .await?;

    Ok(recipe)
}

/// Get recipe by ID
pub async fn get_recipe(pool: &DbPool, recipe_id: i64) -> Result<Recipe> {
    let recipe =
        sqlx::query_as::<_, Recipe>(&format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ?"))
            .bind(recipe_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Recipe {recipe_id} not found")))?;

    Ok(recipe)
}

/// Fetch recipes for a set of IDs in one query. Unknown IDs are skipped.
pub async fn fetch_recipes_by_ids(pool: &DbPool, recipe_ids: &[i64]) -> Result<Vec<Recipe>> {
    if recipe_ids.is_empty() {
        return Ok(Vec::new());
    }

    let recipes = sqlx::query_as::<_, Recipe>(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id IN (SELECT value FROM json_each(?))"
    ))
    .bind(id_list_json(recipe_ids)?)
    .fetch_all(pool)
    .await?;

    Ok(recipes)
}

/// Recipe IDs whose title, description or category contains `needle`,
/// as written or in normalized form
pub async fn match_recipe_fields(pool: &DbPool, needle: &str) -> Result<Vec<i64>> {
    let pattern = like_pattern(needle);

    let ids: Vec<i64> = sqlx::query_scalar(
        r#"
        SELECT id
        FROM recipes
        WHERE title LIKE ?1 ESCAPE '\'
           OR description LIKE ?1 ESCAPE '\'
           OR category LIKE ?1 ESCAPE '\'
           OR normalized_title LIKE ?1 ESCAPE '\'
           OR normalized_description LIKE ?1 ESCAPE '\'
           OR normalized_category LIKE ?1 ESCAPE '\'
        "#,
    )
    .bind(pattern)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

/// List recipes newest first
pub async fn list_recipes(pool: &DbPool, limit: i64, offset: i64) -> Result<Vec<Recipe>> {
    let recipes = sqlx::query_as::<_, Recipe>(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(recipes)
}

/// Count all recipes
pub async fn count_recipes(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

/// Delete recipe (join rows cascade)
pub async fn delete_recipe(pool: &DbPool, recipe_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM recipes WHERE id = ?")
        .bind(recipe_id)
        .execute(pool)
        .await?;

    Ok(())
}
