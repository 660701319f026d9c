use crate::db::{id_list_json, like_pattern, models::*, DbPool};
use crate::error::{Error, Result};
use crate::search::normalize::normalize;

/// Get or create an ingredient by canonical name
pub async fn get_or_create_ingredient(
    pool: &DbPool,
    canonical_name: &str,
    group_name: &str,
) -> Result<Ingredient> {
    let canonical_name = canonical_name.trim();
    if canonical_name.is_empty() {
        return Err(Error::Validation(
            "Ingredient name cannot be empty".to_string(),
        ));
    }

    let existing =
        sqlx::query_as::<_, Ingredient>("SELECT * FROM ingredients WHERE canonical_name = ?")
            .bind(canonical_name)
            .fetch_optional(pool)
            .await?;

    if let Some(ingredient) = existing {
        Ok(ingredient)
    } else {
        let ingredient = sqlx::query_as::<_, Ingredient>(
            r#"
            INSERT INTO ingredients (canonical_name, normalized_name, group_name)
            VALUES (?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(canonical_name)
        .bind(normalize(canonical_name))
        .bind(group_name)
        .fetch_one(pool)
        .await?;

        Ok(ingredient)
    }
}

/// Add an ingredient line to a recipe
pub async fn add_recipe_ingredient(
    pool: &DbPool,
    recipe_id: i64,
    line: &NewRecipeIngredient,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO recipe_ingredients (recipe_id, ingredient_id, original_name, amount, note)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(recipe_id)
    .bind(line.ingredient_id)
    .bind(&line.original_name)
    .bind(&line.amount)
    .bind(&line.note)
    .execute(pool)
    .await?;

    Ok(())
}

/// Recipe IDs using an ingredient whose canonical or normalized name contains `needle`
pub async fn match_ingredients(pool: &DbPool, needle: &str) -> Result<Vec<i64>> {
    let ids: Vec<i64> = sqlx::query_scalar(
        r#"
        SELECT DISTINCT ri.recipe_id
        FROM ingredients i
        JOIN recipe_ingredients ri ON ri.ingredient_id = i.id
        WHERE i.canonical_name LIKE ?1 ESCAPE '\'
           OR i.normalized_name LIKE ?1 ESCAPE '\'
        "#,
    )
    .bind(like_pattern(needle))
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

/// Get ingredient lines for multiple recipes in a single query.
/// Lines without a master ingredient come back with `canonical_name = None`.
pub async fn fetch_ingredients_for_recipes(
    pool: &DbPool,
    recipe_ids: &[i64],
) -> Result<Vec<RecipeIngredientRow>> {
    if recipe_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query_as::<_, RecipeIngredientRow>(
        r#"
        SELECT ri.recipe_id, ri.ingredient_id, ri.original_name, ri.amount, ri.note,
               i.canonical_name
        FROM recipe_ingredients ri
        LEFT JOIN ingredients i ON ri.ingredient_id = i.id
        WHERE ri.recipe_id IN (SELECT value FROM json_each(?))
        ORDER BY ri.recipe_id, ri.id
        "#,
    )
    .bind(id_list_json(recipe_ids)?)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count total ingredients
pub async fn count_ingredients(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ingredients")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}
