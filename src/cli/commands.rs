use crate::config::Settings;
use crate::db::{self, DbPool};
use crate::search::{RecipeResult, RecipeSearch, ScoredRecipe};
use crate::{Error, Result};
use reqwest::Client;
use serde::Deserialize;

/// Server to query: the `--server` flag, else `EXTERNAL_URL`.
/// `None` means the local database.
pub fn server_url(flag: Option<String>, settings: &Settings) -> Option<String> {
    flag.or_else(|| settings.server.external_url.clone())
        .filter(|url| !url.trim().is_empty())
}

/// Search the local database and print the results
pub async fn search_local(engine: &RecipeSearch, query: &str, json: bool) -> Result<()> {
    let results = engine.search(query).await?;
    print_search_results(query, &results, json)
}

/// Search through a running server's API
pub async fn search_remote(server_url: &str, query: &str, json: bool) -> Result<()> {
    let url = format!(
        "{}/api/recipes/search?q={}",
        server_url.trim_end_matches('/'),
        urlencoding::encode(query)
    );
    let response: SearchResponse = get_json(&url).await?;
    print_search_results(query, &response.data, json)
}

/// Print recipes similar to `recipe_id` from the local database
pub async fn similar_local(engine: &RecipeSearch, recipe_id: i64, limit: usize) -> Result<()> {
    let similar = engine.similar_to(recipe_id, limit).await?;
    print_similar(recipe_id, &similar);
    Ok(())
}

/// Print similar recipes through a running server's API
pub async fn similar_remote(server_url: &str, recipe_id: i64, limit: usize) -> Result<()> {
    let url = format!(
        "{}/api/recipes/{recipe_id}/similar?limit={limit}",
        server_url.trim_end_matches('/')
    );
    let response: SimilarResponse = get_json(&url).await?;
    print_similar(recipe_id, &response.data);
    Ok(())
}

/// Print synonyms containing `term` and the ingredients they link to
pub async fn synonyms(pool: &DbPool, term: &str, limit: i64) -> Result<()> {
    let synonyms = db::synonyms::find_synonyms(pool, term).await?;
    println!("Found {} synonyms containing \"{term}\":", synonyms.len());
    for synonym in &synonyms {
        println!("  - {} (ID: {})", synonym.synonym, synonym.id);
    }

    let links = db::synonyms::list_ingredient_synonyms(pool, Some(term), limit).await?;
    println!("\nIngredient links (showing up to {limit}):");
    if links.is_empty() {
        println!("  (none)");
    }
    for link in &links {
        println!(
            "  - Ingredient: {} <-> Synonym: {}",
            link.canonical_name, link.synonym
        );
    }

    Ok(())
}

async fn get_json<T: for<'de> Deserialize<'de>>(url: &str) -> Result<T> {
    let response = Client::new().get(url).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let body: Option<ErrorBody> = response.json().await.ok();
        let message = body
            .map(|b| b.error)
            .unwrap_or_else(|| status.to_string());
        return Err(match status.as_u16() {
            400 => Error::Validation(message),
            404 => Error::NotFound(message),
            503 => Error::BackendUnavailable(message),
            _ => Error::Internal(format!("Server returned {status}: {message}")),
        });
    }

    Ok(response.json().await?)
}

fn print_search_results(query: &str, results: &[RecipeResult], json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(results)
            .map_err(|e| Error::Internal(format!("Failed to encode results: {e}")))?;
        println!("{out}");
        return Ok(());
    }

    println!("Searching for: \"{query}\"\n");
    if results.is_empty() {
        println!("No recipes found matching your query.");
        return Ok(());
    }

    println!("Found {} recipe(s):\n", results.len());
    for recipe in results {
        println!("{}", "-".repeat(60));
        println!("{}", recipe.title);
        println!("   ID: {}", recipe.id);
        if let Some(description) = &recipe.description {
            println!("   Description: {description}");
        }
        if let Some(category) = &recipe.category {
            println!("   Category: {category}");
        }
        if !recipe.tags.is_empty() {
            let tags: Vec<&str> = recipe.tags.iter().map(|t| t.name.as_str()).collect();
            println!("   Tags: {}", tags.join(", "));
        }
        if !recipe.ingredients.is_empty() {
            println!("   Ingredients ({}):", recipe.ingredients.len());
            for (idx, ingredient) in recipe.ingredients.iter().enumerate() {
                let canonical = ingredient
                    .canonical_name
                    .as_deref()
                    .map(|c| format!(" ({c})"))
                    .unwrap_or_default();
                println!(
                    "     {}. {}{} {}",
                    idx + 1,
                    ingredient.original_name,
                    canonical,
                    ingredient.amount.as_deref().unwrap_or("")
                );
            }
        }
        println!();
    }
    println!("{}", "-".repeat(60));

    Ok(())
}

fn print_similar(recipe_id: i64, similar: &[ScoredRecipe]) {
    if similar.is_empty() {
        println!("No similar recipes for {recipe_id} (missing embedding or unknown recipe)");
        return;
    }

    println!("\nRecipes similar to {recipe_id}:\n");
    println!("{:<6} {:<10} {:<50}", "ID", "Match", "Title");
    println!("{}", "-".repeat(66));
    for recipe in similar {
        println!(
            "{:<6} {:<10} {:<50}",
            recipe.id,
            format!("{:.1}%", recipe.similarity * 100.0),
            truncate(&recipe.title, 48)
        );
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

// Response types (matching API models)

#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: Vec<RecipeResult>,
}

#[derive(Debug, Deserialize)]
struct SimilarResponse {
    data: Vec<ScoredRecipe>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}
