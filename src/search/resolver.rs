use super::sources::{with_deadline, Adapter, Sources};
use super::synonyms::expand;
use super::types::RecipeId;
use futures::future::join_all;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};

/// Outcome of resolving one query token
#[derive(Debug, Clone, Default)]
pub struct TokenResolution {
    pub token: String,
    /// Union of every adapter's matches; empty when any call failed
    pub ids: HashSet<RecipeId>,
    pub attempted: usize,
    pub failed: usize,
}

impl TokenResolution {
    pub fn is_degraded(&self) -> bool {
        self.failed > 0
    }

    pub fn all_failed(&self) -> bool {
        self.attempted > 0 && self.failed == self.attempted
    }
}

/// Resolve a token to the recipes matching any of its lookup strings in any
/// candidate source. Every (lookup string, adapter) call runs concurrently
/// under `timeout`; a single failure makes the token match nothing.
pub async fn resolve_token(sources: &Sources, token: &str, timeout: Duration) -> TokenResolution {
    let variants = expand(token);
    let adapters = sources.adapters();

    let mut calls: Vec<(&str, Adapter)> = Vec::with_capacity(variants.len() * adapters.len());
    for variant in &variants {
        for &adapter in &adapters {
            calls.push((variant.as_str(), adapter));
        }
    }

    let outcomes = join_all(calls.into_iter().map(|(needle, adapter)| async move {
        let what = format!("{adapter} lookup");
        let outcome = with_deadline(timeout, &what, sources.run(adapter, needle)).await;
        (needle, adapter, outcome)
    }))
    .await;

    let mut resolution = TokenResolution {
        token: token.to_string(),
        attempted: outcomes.len(),
        ..Default::default()
    };

    for (needle, adapter, outcome) in outcomes {
        match outcome {
            Ok(ids) => {
                debug!("{} lookup for {:?} matched {} recipes", adapter, needle, ids.len());
                resolution.ids.extend(ids);
            }
            Err(e) => {
                warn!("{} lookup for {:?} failed: {}", adapter, needle, e.log_safe());
                resolution.failed += 1;
            }
        }
    }

    if resolution.is_degraded() {
        warn!(
            "Token {:?} treated as matching nothing ({} of {} lookups failed)",
            token, resolution.failed, resolution.attempted
        );
        resolution.ids.clear();
    }

    resolution
}
