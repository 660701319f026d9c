use crate::db::{id_list_json, like_pattern, models::*, DbPool};
use crate::error::{Error, Result};
use crate::search::normalize::normalize;

/// Get or create a tag by display name
pub async fn get_or_create_tag(pool: &DbPool, name: &str) -> Result<Tag> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("Tag name cannot be empty".to_string()));
    }

    let existing = sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    if let Some(tag) = existing {
        Ok(tag)
    } else {
        let tag = sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name, normalized_name) VALUES (?, ?) RETURNING *",
        )
        .bind(name)
        .bind(normalize(name))
        .fetch_one(pool)
        .await?;

        Ok(tag)
    }
}

/// Add tag to recipe
pub async fn add_recipe_tag(pool: &DbPool, recipe_id: i64, tag_id: i64) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO recipe_tags (recipe_id, tag_id) VALUES (?, ?)")
        .bind(recipe_id)
        .bind(tag_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Add multiple tags to recipe
pub async fn add_recipe_tags(pool: &DbPool, recipe_id: i64, tag_names: &[String]) -> Result<()> {
    for tag_name in tag_names {
        let tag = get_or_create_tag(pool, tag_name).await?;
        add_recipe_tag(pool, recipe_id, tag.id).await?;
    }

    Ok(())
}

/// Recipe IDs linked to a tag whose name or normalized name contains `needle`
pub async fn match_tags(pool: &DbPool, needle: &str) -> Result<Vec<i64>> {
    let ids: Vec<i64> = sqlx::query_scalar(
        r#"
        SELECT DISTINCT rt.recipe_id
        FROM tags t
        JOIN recipe_tags rt ON rt.tag_id = t.id
        WHERE t.name LIKE ?1 ESCAPE '\'
           OR t.normalized_name LIKE ?1 ESCAPE '\'
        "#,
    )
    .bind(like_pattern(needle))
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

/// Get tags for multiple recipes in a single query (batch loading to avoid N+1)
pub async fn fetch_tags_for_recipes(pool: &DbPool, recipe_ids: &[i64]) -> Result<Vec<RecipeTagRow>> {
    if recipe_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query_as::<_, RecipeTagRow>(
        r#"
        SELECT rt.recipe_id, t.id AS tag_id, t.name AS tag_name
        FROM recipe_tags rt
        JOIN tags t ON rt.tag_id = t.id
        WHERE rt.recipe_id IN (SELECT value FROM json_each(?))
        ORDER BY rt.recipe_id, t.sort_order, t.name
        "#,
    )
    .bind(id_list_json(recipe_ids)?)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count total tags
pub async fn count_tags(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tags")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}
