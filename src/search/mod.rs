//! Recipe search and similarity engine.
//!
//! A query is tokenized, each token is resolved against every candidate
//! source (OR), and the per-token sets are intersected (AND). Matches are
//! then hydrated with their tags and ingredients and ordered newest first.

pub mod combiner;
pub mod hydrate;
pub mod normalize;
pub mod resolver;
pub mod similar;
pub mod sources;
pub mod synonyms;
pub mod types;

#[cfg(test)]
pub mod testing;

use crate::config::SearchConfig;
use crate::error::Result;
use sources::{NearestNeighbors, RecipeFetcher, Sources, SubstringSearch, SynonymSearch};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub use types::{IngredientEntry, RecipeId, RecipeResult, ScoredRecipe, TagSummary};

#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    /// Deadline for each candidate-source and hydration call
    pub adapter_timeout: Duration,
    /// Route ingredient matching through the synonym index when available
    pub use_synonyms: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            adapter_timeout: Duration::from_millis(5000),
            use_synonyms: true,
        }
    }
}

impl From<&SearchConfig> for SearchOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            adapter_timeout: config.adapter_timeout(),
            use_synonyms: config.use_synonyms,
        }
    }
}

/// Search engine over a storage backend. Cheap to clone.
#[derive(Clone)]
pub struct RecipeSearch {
    substring: Arc<dyn SubstringSearch>,
    synonym_index: Option<Arc<dyn SynonymSearch>>,
    fetcher: Arc<dyn RecipeFetcher>,
    neighbors: Arc<dyn NearestNeighbors>,
    options: SearchOptions,
}

impl RecipeSearch {
    /// Engine over a store that provides every capability
    pub fn new<S>(store: Arc<S>) -> Self
    where
        S: SubstringSearch + SynonymSearch + RecipeFetcher + NearestNeighbors + 'static,
    {
        Self::from_parts(store.clone(), Some(store.clone()), store.clone(), store)
    }

    pub fn from_parts(
        substring: Arc<dyn SubstringSearch>,
        synonym_index: Option<Arc<dyn SynonymSearch>>,
        fetcher: Arc<dyn RecipeFetcher>,
        neighbors: Arc<dyn NearestNeighbors>,
    ) -> Self {
        Self {
            substring,
            synonym_index,
            fetcher,
            neighbors,
            options: SearchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    fn sources(&self) -> Sources {
        let sources = Sources::new(self.substring.clone());
        match (&self.synonym_index, self.options.use_synonyms) {
            (Some(index), true) => sources.with_synonyms(index.clone()),
            _ => sources,
        }
    }

    /// Tokens a raw query splits into
    pub fn tokens(&self, query: &str) -> Vec<String> {
        normalize::tokenize(query)
    }

    /// Recipes matching every token of `query`, newest first.
    /// An empty or whitespace-only query matches nothing.
    pub async fn search(&self, query: &str) -> Result<Vec<RecipeResult>> {
        let tokens = self.tokens(query);
        if tokens.is_empty() {
            debug!("Empty query, nothing to search");
            return Ok(Vec::new());
        }

        let timeout = self.options.adapter_timeout;
        let ids = combiner::combine(&self.sources(), &tokens, timeout).await?;
        debug!("Query {:?}: {} tokens, {} matches", query, tokens.len(), ids.len());

        let results = hydrate::hydrate(self.fetcher.as_ref(), &ids, timeout).await?;
        info!("Search {:?} returned {} recipes", query, results.len());
        Ok(results)
    }

    /// Up to `count` recipes most similar to `recipe_id`
    pub async fn similar_to(&self, recipe_id: RecipeId, count: usize) -> Result<Vec<ScoredRecipe>> {
        similar::find_similar(
            self.neighbors.as_ref(),
            recipe_id,
            count,
            self.options.adapter_timeout,
        )
        .await
    }

    /// Hydrate an explicit set of recipes, newest first
    pub async fn recipes_by_ids(&self, ids: &[RecipeId]) -> Result<Vec<RecipeResult>> {
        let ids: HashSet<RecipeId> = ids.iter().copied().collect();
        hydrate::hydrate(self.fetcher.as_ref(), &ids, self.options.adapter_timeout).await
    }
}
