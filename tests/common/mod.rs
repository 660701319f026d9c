#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use recipe_search::db::models::{NewRecipe, NewRecipeIngredient};
use recipe_search::db::{self, ingredients, recipes, synonyms, tags, vectors, DbPool};

pub const DIMENSIONS: usize = 3;

/// Fresh in-memory database with migrations applied
pub async fn test_pool() -> DbPool {
    let pool = db::init_pool("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

pub struct Line<'a> {
    pub original: &'a str,
    pub canonical: Option<&'a str>,
    pub amount: Option<&'a str>,
}

pub fn linked<'a>(original: &'a str, canonical: &'a str) -> Line<'a> {
    Line {
        original,
        canonical: Some(canonical),
        amount: None,
    }
}

pub fn freeform(original: &str) -> Line<'_> {
    Line {
        original,
        canonical: None,
        amount: None,
    }
}

/// Insert a recipe created `day` days after a fixed date
pub async fn add_recipe(
    pool: &DbPool,
    day: u32,
    title: &str,
    description: Option<&str>,
    category: Option<&str>,
    tag_names: &[&str],
    lines: &[Line<'_>],
) -> i64 {
    let recipe = recipes::create_recipe(
        pool,
        &NewRecipe {
            title: title.to_string(),
            description: description.map(String::from),
            category: category.map(String::from),
            created_at: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).single(),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to create recipe");

    let tag_names: Vec<String> = tag_names.iter().map(|t| t.to_string()).collect();
    tags::add_recipe_tags(pool, recipe.id, &tag_names)
        .await
        .expect("Failed to add tags");

    for line in lines {
        let ingredient_id = match line.canonical {
            Some(canonical) => Some(
                ingredients::get_or_create_ingredient(pool, canonical, "")
                    .await
                    .expect("Failed to create ingredient")
                    .id,
            ),
            None => None,
        };
        ingredients::add_recipe_ingredient(
            pool,
            recipe.id,
            &NewRecipeIngredient {
                ingredient_id,
                original_name: line.original.to_string(),
                amount: line.amount.map(String::from),
                note: None,
            },
        )
        .await
        .expect("Failed to add ingredient");
    }

    recipe.id
}

/// Register `term` as a synonym of the master ingredient `canonical`
pub async fn add_synonym(pool: &DbPool, term: &str, canonical: &str) {
    let ingredient = ingredients::get_or_create_ingredient(pool, canonical, "")
        .await
        .expect("Failed to create ingredient");
    let synonym = synonyms::get_or_create_synonym(pool, term)
        .await
        .expect("Failed to create synonym");
    synonyms::link_synonym(pool, ingredient.id, synonym.id)
        .await
        .expect("Failed to link synonym");
}

pub async fn set_embedding(pool: &DbPool, recipe_id: i64, embedding: [f32; DIMENSIONS]) {
    vectors::set_recipe_embedding(pool, recipe_id, &embedding, DIMENSIONS)
        .await
        .expect("Failed to store embedding");
}

/// Ids of the standard fixture, in insertion order
pub struct Kitchen {
    pub ginger_pork: i64,
    pub chicken_curry: i64,
    pub stew: i64,
    pub soup: i64,
}

/// Four recipes with tags, linked and freeform ingredients, and two
/// synonyms for the chicken thigh master ingredient
pub async fn seed_kitchen(pool: &DbPool) -> Kitchen {
    let ginger_pork = add_recipe(
        pool,
        1,
        "豚の生姜焼き",
        Some("定番のおかず"),
        Some("主菜"),
        &["和風"],
        &[
            Line {
                original: "豚ロース薄切り",
                canonical: Some("豚ロース"),
                amount: Some("200g"),
            },
            linked("しょうが", "生姜"),
        ],
    )
    .await;

    let chicken_curry = add_recipe(
        pool,
        2,
        "スパイシーチキンカレー",
        None,
        Some("カレー"),
        &["スパイシー"],
        &[linked("鶏もも肉", "鳥もも肉"), freeform("カレー粉")],
    )
    .await;

    let stew = add_recipe(
        pool,
        3,
        "豚と鶏の煮込み",
        None,
        Some("主菜"),
        &["和風", "ヘルシー"],
        &[linked("豚バラ", "豚バラ肉"), linked("手羽元", "鶏手羽元")],
    )
    .await;

    let soup = add_recipe(
        pool,
        4,
        "野菜スープ",
        Some("ヘルシーな具だくさんスープ"),
        Some("汁物"),
        &["ヘルシー"],
        &[linked("にんじん", "人参")],
    )
    .await;

    add_synonym(pool, "鶏肉", "鳥もも肉").await;
    add_synonym(pool, "チキン", "鳥もも肉").await;

    Kitchen {
        ginger_pork,
        chicken_curry,
        stew,
        soup,
    }
}
