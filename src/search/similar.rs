use super::sources::{with_deadline, NearestNeighbors};
use super::types::{RecipeId, ScoredRecipe};
use crate::error::{Error, Result};
use std::time::Duration;
use tracing::debug;

/// Clamp a raw cosine score to `[0, 1]`; NaN becomes 0
pub fn clamp_similarity(score: f32) -> f32 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

/// The `count` recipes nearest to `recipe_id`, excluding itself, sorted by
/// similarity descending then id ascending. A recipe without an embedding
/// has no neighbours.
pub async fn find_similar(
    index: &dyn NearestNeighbors,
    recipe_id: RecipeId,
    count: usize,
    timeout: Duration,
) -> Result<Vec<ScoredRecipe>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    // One extra in case the index returns the target itself
    let neighbors = with_deadline(
        timeout,
        "nearest-neighbour lookup",
        index.nearest_neighbors(recipe_id, count.saturating_add(1)),
    )
    .await
    .map_err(|e| match e {
        Error::BackendUnavailable(_) | Error::Timeout(_) => e,
        other => Error::BackendUnavailable(other.to_string()),
    })?;

    let mut scored: Vec<ScoredRecipe> = neighbors
        .into_iter()
        .filter(|n| n.id != recipe_id)
        .map(|mut n| {
            n.similarity = clamp_similarity(n.similarity);
            n
        })
        .collect();

    scored.sort_by(|a, b| {
        b.similarity
            .total_cmp(&a.similarity)
            .then_with(|| a.id.cmp(&b.id))
    });
    scored.truncate(count);

    debug!("Recipe {} has {} similar recipes", recipe_id, scored.len());
    Ok(scored)
}
