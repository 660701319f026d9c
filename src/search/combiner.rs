use super::resolver::{resolve_token, TokenResolution};
use super::sources::Sources;
use super::types::RecipeId;
use crate::error::{Error, Result};
use futures::future::join_all;
use std::collections::{BTreeSet, HashSet};
use std::time::Duration;
use tracing::debug;

/// Intersect per-token id sets. No sets means no results.
pub fn intersect<I>(sets: I) -> HashSet<RecipeId>
where
    I: IntoIterator<Item = HashSet<RecipeId>>,
{
    let mut sets = sets.into_iter();
    let Some(mut acc) = sets.next() else {
        return HashSet::new();
    };
    for set in sets {
        if acc.is_empty() {
            break;
        }
        acc.retain(|id| set.contains(id));
    }
    acc
}

/// Recipe ids matching every token (AND across tokens, OR across sources).
///
/// Tokens are resolved concurrently. Degraded tokens contribute an empty set;
/// only when every lookup of every token failed is the backend reported
/// unavailable.
pub async fn combine(
    sources: &Sources,
    tokens: &[String],
    timeout: Duration,
) -> Result<HashSet<RecipeId>> {
    if tokens.is_empty() {
        return Ok(HashSet::new());
    }

    // Repeated tokens cannot change an intersection
    let unique: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();

    let resolutions: Vec<TokenResolution> = join_all(
        unique
            .iter()
            .map(|token| resolve_token(sources, token, timeout)),
    )
    .await;

    if resolutions.iter().all(TokenResolution::all_failed) {
        return Err(Error::BackendUnavailable(format!(
            "every lookup failed for {} token(s)",
            resolutions.len()
        )));
    }

    for resolution in &resolutions {
        debug!(
            "Token {:?} resolved to {} recipes",
            resolution.token,
            resolution.ids.len()
        );
    }

    Ok(intersect(resolutions.into_iter().map(|r| r.ids)))
}
