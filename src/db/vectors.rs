//! Embedding storage and nearest-neighbor lookup
//!
//! Stores embeddings as little-endian f32 BLOBs on the recipe row and
//! computes cosine similarity in Rust.

use crate::db::DbPool;
use crate::error::{Error, Result};
use std::cmp::Ordering;

/// A recipe near the query recipe in embedding space
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub similarity: f32,
}

/// Store an embedding for a recipe, replacing any previous one
pub async fn set_recipe_embedding(
    pool: &DbPool,
    recipe_id: i64,
    embedding: &[f32],
    dimensions: usize,
) -> Result<()> {
    if embedding.len() != dimensions {
        return Err(Error::Validation(format!(
            "Embedding has {} dimensions, expected {dimensions}",
            embedding.len()
        )));
    }

    let result = sqlx::query("UPDATE recipes SET embedding = ? WHERE id = ?")
        .bind(embedding_to_bytes(embedding))
        .bind(recipe_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Recipe {recipe_id} not found")));
    }

    Ok(())
}

/// Get the stored embedding, `None` if the recipe has none or does not exist
pub async fn get_recipe_embedding(pool: &DbPool, recipe_id: i64) -> Result<Option<Vec<f32>>> {
    let bytes: Option<Option<Vec<u8>>> =
        sqlx::query_scalar("SELECT embedding FROM recipes WHERE id = ?")
            .bind(recipe_id)
            .fetch_optional(pool)
            .await?;

    Ok(bytes.flatten().map(|b| bytes_to_embedding(&b)))
}

/// The `k` recipes closest to `recipe_id` by cosine similarity, excluding
/// the recipe itself. Empty when the recipe has no embedding or one of the
/// wrong size. Candidates that are not `dimensions` long are skipped.
pub async fn nearest_neighbors(
    pool: &DbPool,
    recipe_id: i64,
    k: usize,
    dimensions: usize,
) -> Result<Vec<NeighborRow>> {
    let Some(target) = get_recipe_embedding(pool, recipe_id).await? else {
        return Ok(Vec::new());
    };

    if target.len() != dimensions {
        tracing::warn!(
            "Recipe {} has a {}-dimensional embedding (expected {}), no neighbours",
            recipe_id,
            target.len(),
            dimensions
        );
        return Ok(Vec::new());
    }

    if k == 0 {
        return Ok(Vec::new());
    }

    let candidates: Vec<(i64, String, Option<String>, Option<String>, Vec<u8>)> = sqlx::query_as(
        r#"
        SELECT id, title, description, category, embedding
        FROM recipes
        WHERE embedding IS NOT NULL AND id != ?
        "#,
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;

    let mut scored: Vec<NeighborRow> = candidates
        .into_iter()
        .filter_map(|(id, title, description, category, bytes)| {
            let embedding = bytes_to_embedding(&bytes);
            if embedding.len() != dimensions {
                tracing::warn!(
                    "Skipping recipe {} with {}-dimensional embedding (expected {})",
                    id,
                    embedding.len(),
                    dimensions
                );
                return None;
            }
            Some(NeighborRow {
                id,
                title,
                description,
                category,
                similarity: cosine_similarity(&target, &embedding),
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
            .then(a.id.cmp(&b.id))
    });
    scored.truncate(k);

    Ok(scored)
}

/// Convert f32 embedding to bytes (little-endian)
pub fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert bytes to f32 embedding
pub fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Compute cosine similarity between two embeddings
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
