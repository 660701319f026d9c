mod common;

use common::*;
use recipe_search::db::SqliteStore;
use recipe_search::search::{RecipeResult, RecipeSearch, SearchOptions};
use std::sync::Arc;

fn engine(pool: &recipe_search::db::DbPool) -> RecipeSearch {
    RecipeSearch::new(Arc::new(SqliteStore::new(pool.clone(), DIMENSIONS)))
}

fn ids(results: &[RecipeResult]) -> Vec<i64> {
    results.iter().map(|r| r.id).collect()
}

#[tokio::test]
async fn test_single_token_matches_any_source() {
    let pool = test_pool().await;
    let k = seed_kitchen(&pool).await;
    let engine = engine(&pool);

    // Title and ingredient master both contribute
    let results = engine.search("豚").await.unwrap();
    assert_eq!(ids(&results), vec![k.stew, k.ginger_pork]);

    // Category only
    let results = engine.search("汁物").await.unwrap();
    assert_eq!(ids(&results), vec![k.soup]);
}

#[tokio::test]
async fn test_tokens_are_intersected() {
    let pool = test_pool().await;
    let k = seed_kitchen(&pool).await;
    let engine = engine(&pool);

    let results = engine.search("豚 鶏").await.unwrap();
    assert_eq!(ids(&results), vec![k.stew]);

    // Full-width space separates tokens too
    let results = engine.search("和風　ヘルシー").await.unwrap();
    assert_eq!(ids(&results), vec![k.stew]);

    assert!(engine.search("豚 カレー").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_synonyms_reach_linked_ingredients() {
    let pool = test_pool().await;
    let k = seed_kitchen(&pool).await;
    let engine = engine(&pool);

    // "鶏肉" appears in no title, tag or master name
    let results = engine.search("鶏肉 スパイシー").await.unwrap();
    assert_eq!(ids(&results), vec![k.chicken_curry]);

    // "鶏" reaches the curry via the synonym and the stew via 鶏手羽元
    let results = engine.search("鶏").await.unwrap();
    assert_eq!(ids(&results), vec![k.stew, k.chicken_curry]);
}

#[tokio::test]
async fn test_synonyms_disabled() {
    let pool = test_pool().await;
    seed_kitchen(&pool).await;
    let engine = engine(&pool).with_options(SearchOptions {
        use_synonyms: false,
        ..Default::default()
    });

    assert!(engine.search("鶏肉").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_normalized_spellings_match() {
    let pool = test_pool().await;
    let k = seed_kitchen(&pool).await;
    let engine = engine(&pool);

    // Hiragana query against the tags' normalized names
    let results = engine.search("へるしー").await.unwrap();
    assert_eq!(ids(&results), vec![k.soup, k.stew]);

    let results = engine.search("ヘルシー").await.unwrap();
    assert_eq!(ids(&results), vec![k.soup, k.stew]);
}

#[tokio::test]
async fn test_ascii_case_and_fullwidth() {
    let pool = test_pool().await;
    let salad = add_recipe(&pool, 5, "Chicken Salad", None, None, &["BBQ"], &[]).await;
    let engine = engine(&pool);

    assert_eq!(ids(&engine.search("chicken").await.unwrap()), vec![salad]);
    assert_eq!(ids(&engine.search("ＢＢＱ").await.unwrap()), vec![salad]);
}

#[tokio::test]
async fn test_fullwidth_title_matches_any_width() {
    let pool = test_pool().await;
    let bbq = add_recipe(&pool, 5, "ＢＢＱチキン", None, Some("グリル"), &[], &[]).await;
    let engine = engine(&pool);

    assert_eq!(ids(&engine.search("ｂｂｑ").await.unwrap()), vec![bbq]);
    assert_eq!(ids(&engine.search("bbq").await.unwrap()), vec![bbq]);
    assert_eq!(ids(&engine.search("BBQ ちきん").await.unwrap()), vec![bbq]);
    assert_eq!(ids(&engine.search("ぐりる").await.unwrap()), vec![bbq]);
}

#[tokio::test]
async fn test_like_wildcards_are_literal() {
    let pool = test_pool().await;
    seed_kitchen(&pool).await;
    let engine = engine(&pool);

    assert!(engine.search("%").await.unwrap().is_empty());
    assert!(engine.search("_").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_query() {
    let pool = test_pool().await;
    seed_kitchen(&pool).await;
    let engine = engine(&pool);

    assert!(engine.search("").await.unwrap().is_empty());
    assert!(engine.search("  　 ").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_is_idempotent() {
    let pool = test_pool().await;
    seed_kitchen(&pool).await;
    let engine = engine(&pool);

    let first = engine.search("和風").await.unwrap();
    let second = engine.search("和風").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_results_are_hydrated() {
    let pool = test_pool().await;
    let k = seed_kitchen(&pool).await;
    let engine = engine(&pool);

    let results = engine.search("スパイシー").await.unwrap();
    assert_eq!(results.len(), 1);
    let curry = &results[0];
    assert_eq!(curry.id, k.chicken_curry);
    assert_eq!(curry.category.as_deref(), Some("カレー"));

    let tag_names: Vec<&str> = curry.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(tag_names, vec!["スパイシー"]);

    assert_eq!(curry.ingredients.len(), 2);
    let thigh = curry
        .ingredients
        .iter()
        .find(|i| i.original_name == "鶏もも肉")
        .unwrap();
    assert_eq!(thigh.canonical_name.as_deref(), Some("鳥もも肉"));
    assert!(thigh.id.is_some());

    let powder = curry
        .ingredients
        .iter()
        .find(|i| i.original_name == "カレー粉")
        .unwrap();
    assert_eq!(powder.id, None);
    assert_eq!(powder.canonical_name, None);
}

#[tokio::test]
async fn test_amounts_survive_hydration() {
    let pool = test_pool().await;
    let k = seed_kitchen(&pool).await;
    let engine = engine(&pool);

    let results = engine.recipes_by_ids(&[k.ginger_pork]).await.unwrap();
    let loin = &results[0].ingredients[0];
    assert_eq!(loin.original_name, "豚ロース薄切り");
    assert_eq!(loin.amount.as_deref(), Some("200g"));
}

#[tokio::test]
async fn test_similar_recipes() {
    let pool = test_pool().await;
    let k = seed_kitchen(&pool).await;
    set_embedding(&pool, k.ginger_pork, [1.0, 0.0, 0.0]).await;
    set_embedding(&pool, k.chicken_curry, [0.0, 1.0, 0.0]).await;
    set_embedding(&pool, k.stew, [0.9, 0.1, 0.0]).await;
    let engine = engine(&pool);

    let similar = engine.similar_to(k.ginger_pork, 5).await.unwrap();
    let similar_ids: Vec<i64> = similar.iter().map(|s| s.id).collect();
    assert_eq!(similar_ids, vec![k.stew, k.chicken_curry]);
    assert!(similar
        .windows(2)
        .all(|w| w[0].similarity >= w[1].similarity));
    assert!(similar.iter().all(|s| (0.0..=1.0).contains(&s.similarity)));

    let top = engine.similar_to(k.ginger_pork, 1).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].id, k.stew);
    assert_eq!(top[0].title, "豚と鶏の煮込み");
}

#[tokio::test]
async fn test_similar_without_embedding_is_empty() {
    let pool = test_pool().await;
    let k = seed_kitchen(&pool).await;
    set_embedding(&pool, k.ginger_pork, [1.0, 0.0, 0.0]).await;
    let engine = engine(&pool);

    assert!(engine.similar_to(k.soup, 5).await.unwrap().is_empty());
    assert!(engine.similar_to(9999, 5).await.unwrap().is_empty());
    assert!(engine.similar_to(k.ginger_pork, 0).await.unwrap().is_empty());
}
