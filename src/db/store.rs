//! SQLite-backed implementation of the search engine's storage capabilities

use crate::db::{ingredients, recipes, synonyms, tags, vectors, DbPool};
use crate::error::Result;
use crate::search::sources::{
    FieldGroup, NearestNeighbors, RecipeFetcher, SubstringSearch, SynonymSearch,
};
use crate::search::types::*;
use async_trait::async_trait;

#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
    embedding_dimensions: usize,
}

impl SqliteStore {
    /// Store over `pool` whose embeddings are `embedding_dimensions` long
    pub fn new(pool: DbPool, embedding_dimensions: usize) -> Self {
        Self {
            pool,
            embedding_dimensions,
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl SubstringSearch for SqliteStore {
    async fn substring_search(&self, group: FieldGroup, needle: &str) -> Result<Vec<RecipeId>> {
        match group {
            FieldGroup::Ingredients => ingredients::match_ingredients(&self.pool, needle).await,
            FieldGroup::Tags => tags::match_tags(&self.pool, needle).await,
            FieldGroup::RecipeFields => recipes::match_recipe_fields(&self.pool, needle).await,
        }
    }
}

#[async_trait]
impl SynonymSearch for SqliteStore {
    async fn synonym_search(&self, query: &str) -> Result<Vec<SynonymHit>> {
        let rows = synonyms::search_recipes_with_synonyms(&self.pool, query).await?;
        Ok(rows
            .into_iter()
            .map(|row| SynonymHit {
                id: row.id,
                title: row.title,
                description: row.description,
                category: row.category,
                created_at: row.created_at,
            })
            .collect())
    }
}

#[async_trait]
impl NearestNeighbors for SqliteStore {
    async fn nearest_neighbors(&self, recipe_id: RecipeId, k: usize) -> Result<Vec<ScoredRecipe>> {
        let rows =
            vectors::nearest_neighbors(&self.pool, recipe_id, k, self.embedding_dimensions).await?;
        Ok(rows
            .into_iter()
            .map(|row| ScoredRecipe {
                id: row.id,
                title: row.title,
                description: row.description,
                category: row.category,
                similarity: row.similarity,
            })
            .collect())
    }
}

#[async_trait]
impl RecipeFetcher for SqliteStore {
    async fn fetch_recipes_by_ids(&self, ids: &[RecipeId]) -> Result<Vec<RecipeRecord>> {
        let rows = recipes::fetch_recipes_by_ids(&self.pool, ids).await?;
        Ok(rows
            .into_iter()
            .map(|recipe| RecipeRecord {
                id: recipe.id,
                title: recipe.title,
                description: recipe.description,
                category: recipe.category,
                steps_text: recipe.steps_text,
                created_at: recipe.created_at,
            })
            .collect())
    }

    async fn fetch_tags_for_recipes(&self, ids: &[RecipeId]) -> Result<Vec<TagLink>> {
        let rows = tags::fetch_tags_for_recipes(&self.pool, ids).await?;
        Ok(rows
            .into_iter()
            .map(|row| TagLink {
                recipe_id: row.recipe_id,
                tag_id: row.tag_id,
                tag_name: row.tag_name,
            })
            .collect())
    }

    async fn fetch_ingredients_for_recipes(&self, ids: &[RecipeId]) -> Result<Vec<IngredientLink>> {
        let rows = ingredients::fetch_ingredients_for_recipes(&self.pool, ids).await?;
        Ok(rows
            .into_iter()
            .map(|row| IngredientLink {
                recipe_id: row.recipe_id,
                ingredient_id: row.ingredient_id,
                original_name: row.original_name,
                amount: row.amount,
                note: row.note,
                canonical_name: row.canonical_name,
            })
            .collect())
    }
}
