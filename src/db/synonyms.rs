//! Synonym registry and the synonym-aware recipe search.
//!
//! A synonym is a free-standing term linked to zero or more master
//! ingredients through `ingredient_synonyms`.

use crate::db::{like_pattern, models::*, DbPool};
use crate::error::{Error, Result};
use chrono::Utc;

/// Get or create a synonym term
pub async fn get_or_create_synonym(pool: &DbPool, term: &str) -> Result<Synonym> {
    let term = term.trim();
    if term.is_empty() {
        return Err(Error::Validation("Synonym cannot be empty".to_string()));
    }

    let existing = sqlx::query_as::<_, Synonym>("SELECT * FROM synonyms WHERE synonym = ?")
        .bind(term)
        .fetch_optional(pool)
        .await?;

    if let Some(synonym) = existing {
        Ok(synonym)
    } else {
        let synonym = sqlx::query_as::<_, Synonym>(
            "INSERT INTO synonyms (synonym, created_at) VALUES (?, ?) RETURNING *",
        )
        .bind(term)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(synonym)
    }
}

/// Link a synonym to a master ingredient
pub async fn link_synonym(pool: &DbPool, ingredient_id: i64, synonym_id: i64) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR IGNORE INTO ingredient_synonyms (ingredient_id, synonym_id, created_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(ingredient_id)
    .bind(synonym_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// Synonyms whose text contains `needle`
pub async fn find_synonyms(pool: &DbPool, needle: &str) -> Result<Vec<Synonym>> {
    let synonyms = sqlx::query_as::<_, Synonym>(
        r#"
        SELECT * FROM synonyms
        WHERE synonym LIKE ? ESCAPE '\'
        ORDER BY synonym
        "#,
    )
    .bind(like_pattern(needle))
    .fetch_all(pool)
    .await?;

    Ok(synonyms)
}

/// Ingredient/synonym pairs, optionally restricted to synonyms containing `needle`
pub async fn list_ingredient_synonyms(
    pool: &DbPool,
    needle: Option<&str>,
    limit: i64,
) -> Result<Vec<IngredientSynonymLink>> {
    let links = sqlx::query_as::<_, IngredientSynonymLink>(
        r#"
        SELECT i.id AS ingredient_id, i.canonical_name, s.id AS synonym_id, s.synonym
        FROM ingredient_synonyms isy
        JOIN ingredients i ON i.id = isy.ingredient_id
        JOIN synonyms s ON s.id = isy.synonym_id
        WHERE ?1 IS NULL OR s.synonym LIKE ?1 ESCAPE '\'
        ORDER BY s.synonym, i.canonical_name
        LIMIT ?2
        "#,
    )
    .bind(needle.map(like_pattern))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(links)
}

/// Recipes reachable from `needle` through the synonym graph, plus recipes
/// whose master ingredient names contain `needle` directly.
pub async fn search_recipes_with_synonyms(
    pool: &DbPool,
    needle: &str,
) -> Result<Vec<SynonymSearchRow>> {
    let rows = sqlx::query_as::<_, SynonymSearchRow>(
        r#"
        SELECT r.id, r.title, r.description, r.category, r.created_at
        FROM recipes r
        WHERE r.id IN (
            SELECT ri.recipe_id
            FROM synonyms s
            JOIN ingredient_synonyms isy ON isy.synonym_id = s.id
            JOIN recipe_ingredients ri ON ri.ingredient_id = isy.ingredient_id
            WHERE s.synonym LIKE ?1 ESCAPE '\'
            UNION
            SELECT ri.recipe_id
            FROM ingredients i
            JOIN recipe_ingredients ri ON ri.ingredient_id = i.id
            WHERE i.canonical_name LIKE ?1 ESCAPE '\'
               OR i.normalized_name LIKE ?1 ESCAPE '\'
        )
        ORDER BY r.created_at DESC, r.id DESC
        "#,
    )
    .bind(like_pattern(needle))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
