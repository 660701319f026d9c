use super::sources::{with_deadline, RecipeFetcher};
use super::types::*;
use crate::error::{Error, Result};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::{debug, warn};

/// Order results newest first, ties broken by descending id
pub fn sort_newest_first(results: &mut [RecipeResult]) {
    results.sort_by_key(|r| Reverse((r.created_at, r.id)));
}

/// Load full records for `ids` with one bulk read per kind.
///
/// Ids whose recipe row no longer exists are dropped. A failed recipe read
/// is an outage; failed tag or ingredient reads are logged and leave those
/// lists empty.
pub async fn hydrate(
    fetcher: &dyn RecipeFetcher,
    ids: &HashSet<RecipeId>,
    timeout: Duration,
) -> Result<Vec<RecipeResult>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut ids: Vec<RecipeId> = ids.iter().copied().collect();
    ids.sort_unstable();

    let records = with_deadline(timeout, "recipe fetch", fetcher.fetch_recipes_by_ids(&ids))
        .await
        .map_err(|e| match e {
            Error::BackendUnavailable(_) | Error::Timeout(_) => e,
            other => Error::BackendUnavailable(other.to_string()),
        })?;

    if records.is_empty() {
        debug!("None of {} matched recipes still exist", ids.len());
        return Ok(Vec::new());
    }

    let found: Vec<RecipeId> = records.iter().map(|r| r.id).collect();
    let (tags, ingredients) = tokio::join!(
        with_deadline(timeout, "tag fetch", fetcher.fetch_tags_for_recipes(&found)),
        with_deadline(
            timeout,
            "ingredient fetch",
            fetcher.fetch_ingredients_for_recipes(&found)
        ),
    );

    let mut tags_by_recipe: HashMap<RecipeId, Vec<TagSummary>> = HashMap::new();
    match tags {
        Ok(links) => {
            for link in links {
                tags_by_recipe.entry(link.recipe_id).or_default().push(TagSummary {
                    id: link.tag_id,
                    name: link.tag_name,
                });
            }
        }
        Err(e) => warn!("Tag fetch failed, returning recipes without tags: {}", e.log_safe()),
    }

    let mut ingredients_by_recipe: HashMap<RecipeId, Vec<IngredientEntry>> = HashMap::new();
    match ingredients {
        Ok(links) => {
            for link in links {
                ingredients_by_recipe
                    .entry(link.recipe_id)
                    .or_default()
                    .push(IngredientEntry {
                        id: link.ingredient_id,
                        original_name: link.original_name,
                        canonical_name: link.canonical_name,
                        amount: link.amount,
                        note: link.note,
                    });
            }
        }
        Err(e) => warn!(
            "Ingredient fetch failed, returning recipes without ingredients: {}",
            e.log_safe()
        ),
    }

    let mut results: Vec<RecipeResult> = records
        .into_iter()
        .map(|record| RecipeResult {
            tags: tags_by_recipe.remove(&record.id).unwrap_or_default(),
            ingredients: ingredients_by_recipe.remove(&record.id).unwrap_or_default(),
            id: record.id,
            title: record.title,
            description: record.description,
            category: record.category,
            created_at: record.created_at,
            steps_text: record.steps_text,
        })
        .collect();

    sort_newest_first(&mut results);
    Ok(results)
}
