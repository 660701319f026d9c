//! Storage capabilities the engine depends on, and the candidate-source
//! adapters built on top of them.

use super::types::*;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// A group of columns searched together by one candidate source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldGroup {
    /// Ingredient master: canonical and normalized names
    Ingredients,
    /// Tags: display and normalized names
    Tags,
    /// Recipe title, description and category, as written and normalized
    RecipeFields,
}

/// Case-insensitive substring match over a field group, returning the ids
/// of the owning recipes
#[async_trait]
pub trait SubstringSearch: Send + Sync {
    async fn substring_search(&self, group: FieldGroup, needle: &str) -> Result<Vec<RecipeId>>;
}

/// Ingredient matching that also follows registered synonyms
#[async_trait]
pub trait SynonymSearch: Send + Sync {
    async fn synonym_search(&self, query: &str) -> Result<Vec<SynonymHit>>;
}

/// Vector index lookup. Implementations return an empty list when the
/// recipe has no embedding.
#[async_trait]
pub trait NearestNeighbors: Send + Sync {
    async fn nearest_neighbors(&self, recipe_id: RecipeId, k: usize) -> Result<Vec<ScoredRecipe>>;
}

/// Bulk reads used to hydrate results; one call per kind, never per id
#[async_trait]
pub trait RecipeFetcher: Send + Sync {
    async fn fetch_recipes_by_ids(&self, ids: &[RecipeId]) -> Result<Vec<RecipeRecord>>;
    async fn fetch_tags_for_recipes(&self, ids: &[RecipeId]) -> Result<Vec<TagLink>>;
    async fn fetch_ingredients_for_recipes(&self, ids: &[RecipeId]) -> Result<Vec<IngredientLink>>;
}

/// Recipes with a linked ingredient whose canonical or normalized name contains `needle`
pub async fn match_by_ingredient(
    source: &dyn SubstringSearch,
    needle: &str,
) -> Result<HashSet<RecipeId>> {
    let ids = source.substring_search(FieldGroup::Ingredients, needle).await?;
    Ok(ids.into_iter().collect())
}

/// Recipes with a linked tag whose display or normalized name contains `needle`
pub async fn match_by_tag(source: &dyn SubstringSearch, needle: &str) -> Result<HashSet<RecipeId>> {
    let ids = source.substring_search(FieldGroup::Tags, needle).await?;
    Ok(ids.into_iter().collect())
}

/// Recipes whose title, description or category contains `needle`
pub async fn match_by_recipe_fields(
    source: &dyn SubstringSearch,
    needle: &str,
) -> Result<HashSet<RecipeId>> {
    let ids = source.substring_search(FieldGroup::RecipeFields, needle).await?;
    Ok(ids.into_iter().collect())
}

/// Ingredient matches including those reached only through a synonym
pub async fn match_with_synonym_index(
    index: &dyn SynonymSearch,
    needle: &str,
) -> Result<HashSet<RecipeId>> {
    let hits = index.synonym_search(needle).await?;
    Ok(hits.into_iter().map(|hit| hit.id).collect())
}

/// One candidate source, as scheduled by the token resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Adapter {
    Ingredient,
    Tag,
    RecipeFields,
    SynonymIndex,
}

impl fmt::Display for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Adapter::Ingredient => "ingredient",
            Adapter::Tag => "tag",
            Adapter::RecipeFields => "recipe-fields",
            Adapter::SynonymIndex => "synonym-index",
        };
        f.write_str(name)
    }
}

/// The candidate sources available to a search
#[derive(Clone)]
pub struct Sources {
    pub substring: Arc<dyn SubstringSearch>,
    pub synonyms: Option<Arc<dyn SynonymSearch>>,
}

impl Sources {
    pub fn new(substring: Arc<dyn SubstringSearch>) -> Self {
        Self {
            substring,
            synonyms: None,
        }
    }

    pub fn with_synonyms(mut self, synonyms: Arc<dyn SynonymSearch>) -> Self {
        self.synonyms = Some(synonyms);
        self
    }

    /// Adapters run for every lookup string. The synonym index, when
    /// present, replaces the plain ingredient adapter.
    pub fn adapters(&self) -> Vec<Adapter> {
        let ingredient = if self.synonyms.is_some() {
            Adapter::SynonymIndex
        } else {
            Adapter::Ingredient
        };
        vec![ingredient, Adapter::Tag, Adapter::RecipeFields]
    }

    pub async fn run(&self, adapter: Adapter, needle: &str) -> Result<HashSet<RecipeId>> {
        let substring = self.substring.as_ref();
        match adapter {
            Adapter::Ingredient => match_by_ingredient(substring, needle).await,
            Adapter::Tag => match_by_tag(substring, needle).await,
            Adapter::RecipeFields => match_by_recipe_fields(substring, needle).await,
            Adapter::SynonymIndex => match &self.synonyms {
                Some(index) => match_with_synonym_index(index.as_ref(), needle).await,
                None => match_by_ingredient(substring, needle).await,
            },
        }
    }
}

/// Run a storage call under a deadline, mapping expiry to `Error::Timeout`
pub async fn with_deadline<T, F>(timeout: Duration, what: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout(format!(
            "{what} exceeded {}ms",
            timeout.as_millis()
        ))),
    }
}
