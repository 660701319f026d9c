//! In-memory store with call counters and failure injection for engine tests

use super::normalize::normalize;
use super::sources::*;
use super::types::*;
use crate::db::vectors::cosine_similarity;
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
struct MockIngredient {
    ingredient_id: Option<i64>,
    original_name: String,
    canonical_name: Option<String>,
}

#[derive(Default)]
struct Inner {
    recipes: HashMap<RecipeId, RecipeRecord>,
    tags: HashMap<RecipeId, Vec<String>>,
    ingredients: HashMap<RecipeId, Vec<MockIngredient>>,
    ingredient_ids: HashMap<String, i64>,
    tag_ids: HashMap<String, i64>,
    synonyms: Vec<(String, String)>,
    embeddings: HashMap<RecipeId, Vec<f32>>,
    failing_groups: HashSet<FieldGroup>,
    failing_needles: HashSet<String>,
    fail_synonyms: bool,
    fail_recipe_fetch: bool,
    fail_tag_fetch: bool,
    delay: Option<Duration>,
}

#[derive(Default)]
pub struct MockStore {
    inner: Mutex<Inner>,
    pub substring_calls: AtomicUsize,
    pub synonym_calls: AtomicUsize,
    pub recipe_fetches: AtomicUsize,
    pub tag_fetches: AtomicUsize,
    pub ingredient_fetches: AtomicUsize,
    /// Lookups that ran to completion after their delay
    pub completed_lookups: AtomicUsize,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Match the stored text as written or in normalized form
fn text_matches(text: &str, needle: &str) -> bool {
    contains_ci(text, needle) || contains_ci(&normalize(text), needle)
}

pub fn timestamp(minutes: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + minutes * 60, 0)
        .single()
        .unwrap()
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a recipe created `id` minutes after a fixed epoch. Ingredients are
    /// `(original_name, canonical_name)` pairs linked to the master.
    pub fn add_recipe(
        &self,
        id: RecipeId,
        title: &str,
        tags: &[&str],
        ingredients: &[(&str, &str)],
    ) -> RecipeId {
        let mut inner = self.inner.lock().unwrap();
        inner.recipes.insert(
            id,
            RecipeRecord {
                id,
                title: title.to_string(),
                description: None,
                category: None,
                steps_text: None,
                created_at: timestamp(id),
            },
        );

        for tag in tags {
            let next = inner.tag_ids.len() as i64 + 1;
            inner.tag_ids.entry(tag.to_string()).or_insert(next);
            inner.tags.entry(id).or_default().push(tag.to_string());
        }

        for (original, canonical) in ingredients {
            let next = inner.ingredient_ids.len() as i64 + 1;
            let ingredient_id = *inner
                .ingredient_ids
                .entry(canonical.to_string())
                .or_insert(next);
            inner.ingredients.entry(id).or_default().push(MockIngredient {
                ingredient_id: Some(ingredient_id),
                original_name: original.to_string(),
                canonical_name: Some(canonical.to_string()),
            });
        }

        id
    }

    pub fn add_freeform_ingredient(&self, id: RecipeId, original: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.ingredients.entry(id).or_default().push(MockIngredient {
            ingredient_id: None,
            original_name: original.to_string(),
            canonical_name: None,
        });
    }

    pub fn set_description(&self, id: RecipeId, description: &str) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(recipe) = inner.recipes.get_mut(&id) {
            recipe.description = Some(description.to_string());
        }
    }

    pub fn set_created_at(&self, id: RecipeId, created_at: DateTime<Utc>) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(recipe) = inner.recipes.get_mut(&id) {
            recipe.created_at = created_at;
        }
    }

    /// Drop the recipe row but keep its join rows
    pub fn remove_recipe(&self, id: RecipeId) {
        self.inner.lock().unwrap().recipes.remove(&id);
    }

    pub fn add_synonym(&self, term: &str, canonical: &str) {
        self.inner
            .lock()
            .unwrap()
            .synonyms
            .push((term.to_string(), canonical.to_string()));
    }

    pub fn set_embedding(&self, id: RecipeId, embedding: Vec<f32>) {
        self.inner.lock().unwrap().embeddings.insert(id, embedding);
    }

    pub fn fail_group(&self, group: FieldGroup) {
        self.inner.lock().unwrap().failing_groups.insert(group);
    }

    pub fn fail_needle(&self, needle: &str) {
        self.inner
            .lock()
            .unwrap()
            .failing_needles
            .insert(needle.to_string());
    }

    pub fn fail_synonyms(&self) {
        self.inner.lock().unwrap().fail_synonyms = true;
    }

    pub fn fail_recipe_fetch(&self) {
        self.inner.lock().unwrap().fail_recipe_fetch = true;
    }

    pub fn fail_tag_fetch(&self) {
        self.inner.lock().unwrap().fail_tag_fetch = true;
    }

    pub fn set_delay(&self, delay: Duration) {
        self.inner.lock().unwrap().delay = Some(delay);
    }

    async fn pause(&self) {
        let delay = self.inner.lock().unwrap().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn check_needle(&self, needle: &str) -> Result<()> {
        if self.inner.lock().unwrap().failing_needles.contains(needle) {
            return Err(Error::BackendUnavailable(format!("lookup for {needle} failed")));
        }
        Ok(())
    }

    fn recipes_using(inner: &Inner, canonical_names: &HashSet<String>) -> Vec<RecipeId> {
        inner
            .ingredients
            .iter()
            .filter(|(_, lines)| {
                lines.iter().any(|line| {
                    line.canonical_name
                        .as_ref()
                        .is_some_and(|c| canonical_names.contains(c))
                })
            })
            .map(|(id, _)| *id)
            .collect()
    }
}

#[async_trait]
impl SubstringSearch for MockStore {
    async fn substring_search(&self, group: FieldGroup, needle: &str) -> Result<Vec<RecipeId>> {
        self.substring_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.completed_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_needle(needle)?;

        let inner = self.inner.lock().unwrap();
        if inner.failing_groups.contains(&group) {
            return Err(Error::BackendUnavailable(format!("{group:?} lookup failed")));
        }

        let ids = match group {
            FieldGroup::RecipeFields => inner
                .recipes
                .values()
                .filter(|r| {
                    text_matches(&r.title, needle)
                        || r.description.as_deref().is_some_and(|d| text_matches(d, needle))
                        || r.category.as_deref().is_some_and(|c| text_matches(c, needle))
                })
                .map(|r| r.id)
                .collect(),
            FieldGroup::Tags => inner
                .tags
                .iter()
                .filter(|(_, tags)| {
                    tags.iter().any(|t| text_matches(t, needle))
                })
                .map(|(id, _)| *id)
                .collect(),
            FieldGroup::Ingredients => {
                let matching: HashSet<String> = inner
                    .ingredient_ids
                    .keys()
                    .filter(|c| text_matches(c, needle))
                    .cloned()
                    .collect();
                Self::recipes_using(&inner, &matching)
            }
        };

        Ok(ids)
    }
}

#[async_trait]
impl SynonymSearch for MockStore {
    async fn synonym_search(&self, query: &str) -> Result<Vec<SynonymHit>> {
        self.synonym_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.completed_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_needle(query)?;

        let inner = self.inner.lock().unwrap();
        if inner.fail_synonyms {
            return Err(Error::BackendUnavailable("synonym search failed".to_string()));
        }

        let mut canonical: HashSet<String> = inner
            .synonyms
            .iter()
            .filter(|(term, _)| contains_ci(term, query))
            .map(|(_, c)| c.clone())
            .collect();
        canonical.extend(
            inner
                .ingredient_ids
                .keys()
                .filter(|c| text_matches(c, query))
                .cloned(),
        );

        let hits = Self::recipes_using(&inner, &canonical)
            .into_iter()
            .filter_map(|id| inner.recipes.get(&id))
            .map(|r| SynonymHit {
                id: r.id,
                title: r.title.clone(),
                description: r.description.clone(),
                category: r.category.clone(),
                created_at: r.created_at,
            })
            .collect();

        Ok(hits)
    }
}

#[async_trait]
impl NearestNeighbors for MockStore {
    // Deliberately includes the target itself, like a raw index scan would
    async fn nearest_neighbors(&self, recipe_id: RecipeId, k: usize) -> Result<Vec<ScoredRecipe>> {
        let inner = self.inner.lock().unwrap();
        let Some(target) = inner.embeddings.get(&recipe_id) else {
            return Ok(Vec::new());
        };

        let mut scored: Vec<ScoredRecipe> = inner
            .embeddings
            .iter()
            .filter_map(|(id, embedding)| {
                let recipe = inner.recipes.get(id)?;
                Some(ScoredRecipe {
                    id: *id,
                    title: recipe.title.clone(),
                    description: recipe.description.clone(),
                    category: recipe.category.clone(),
                    similarity: cosine_similarity(target, embedding),
                })
            })
            .collect();
        scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        scored.truncate(k);

        Ok(scored)
    }
}

#[async_trait]
impl RecipeFetcher for MockStore {
    async fn fetch_recipes_by_ids(&self, ids: &[RecipeId]) -> Result<Vec<RecipeRecord>> {
        self.recipe_fetches.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.lock().unwrap();
        if inner.fail_recipe_fetch {
            return Err(Error::BackendUnavailable("recipe fetch failed".to_string()));
        }
        Ok(ids
            .iter()
            .filter_map(|id| inner.recipes.get(id).cloned())
            .collect())
    }

    async fn fetch_tags_for_recipes(&self, ids: &[RecipeId]) -> Result<Vec<TagLink>> {
        self.tag_fetches.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.lock().unwrap();
        if inner.fail_tag_fetch {
            return Err(Error::BackendUnavailable("tag fetch failed".to_string()));
        }

        let mut links = Vec::new();
        for id in ids {
            for name in inner.tags.get(id).into_iter().flatten() {
                links.push(TagLink {
                    recipe_id: *id,
                    tag_id: inner.tag_ids[name],
                    tag_name: name.clone(),
                });
            }
        }
        Ok(links)
    }

    async fn fetch_ingredients_for_recipes(&self, ids: &[RecipeId]) -> Result<Vec<IngredientLink>> {
        self.ingredient_fetches.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.lock().unwrap();

        let mut links = Vec::new();
        for id in ids {
            for line in inner.ingredients.get(id).into_iter().flatten() {
                links.push(IngredientLink {
                    recipe_id: *id,
                    ingredient_id: line.ingredient_id,
                    original_name: line.original_name.clone(),
                    amount: None,
                    note: None,
                    canonical_name: line.canonical_name.clone(),
                });
            }
        }
        Ok(links)
    }
}
