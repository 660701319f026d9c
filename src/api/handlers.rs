use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::{api::models::*, config::Settings, db, search::RecipeSearch, Error, Result};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: db::DbPool,
    pub engine: RecipeSearch,
    pub settings: Settings,
}

impl AppState {
    /// State backed by the SQLite store on `pool`
    pub fn new(pool: db::DbPool, settings: Settings) -> Self {
        let store = std::sync::Arc::new(db::SqliteStore::new(
            pool.clone(),
            settings.search.embedding_dimensions,
        ));
        let engine = RecipeSearch::new(store).with_options((&settings.search).into());
        Self {
            pool,
            engine,
            settings,
        }
    }
}

/// GET / - Service description
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        status: "ok".to_string(),
        message: "Recipe Search API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: Endpoints {
            health: "GET /health".to_string(),
            list: "GET /api/recipes".to_string(),
            search: "GET /api/recipes/search?q=<query>".to_string(),
            detail: "GET /api/recipes/:id".to_string(),
            similar: "GET /api/recipes/:id/similar?limit=<n>".to_string(),
        },
    })
}

/// GET /api/recipes - Newest-first listing
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>> {
    debug!("List recipes request: {:?}", params);

    let pagination = &state.settings.pagination;
    let limit = params.limit(pagination.api_default_limit, pagination.api_max_limit)?;
    let offset = params.offset()?;

    let (page, total) = tokio::try_join!(
        db::recipes::list_recipes(&state.pool, limit as i64, offset as i64),
        db::recipes::count_recipes(&state.pool),
    )?;

    let ids: Vec<i64> = page.iter().map(|r| r.id).collect();
    let data = state.engine.recipes_by_ids(&ids).await?;

    Ok(Json(ListResponse {
        success: true,
        total,
        count: data.len(),
        limit,
        offset,
        has_more: ((offset + data.len()) as i64) < total,
        data,
    }))
}

/// GET /api/recipes/search - Search recipes
pub async fn search_recipes(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let Some(query) = params.text() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "Query parameter is required",
                "Please provide a search query using ?q=<search_term>",
            )),
        )
            .into_response();
    };

    debug!("Search request: {:?}", query);

    match state.engine.search(query).await {
        Ok(data) => Json(SearchResponse {
            success: true,
            query: query.to_string(),
            count: data.len(),
            data,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /api/recipes/:id - Get recipe details
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecipeResponse>> {
    let id = parse_id(&id)?;
    debug!("Get recipe request: {}", id);

    let data = state
        .engine
        .recipes_by_ids(&[id])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| Error::NotFound("Recipe not found".to_string()))?;

    Ok(Json(RecipeResponse {
        success: true,
        data,
    }))
}

/// GET /api/recipes/:id/similar - Nearest recipes by embedding
pub async fn similar_recipes(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<SimilarParams>,
) -> Result<Json<SimilarResponse>> {
    let id = parse_id(&id)?;
    let search = &state.settings.search;
    let limit = params.limit(search.similar_default_limit, search.similar_max_limit)?;
    debug!("Similar recipes request: {} (limit {})", id, limit);

    let data = state.engine.similar_to(id, limit).await?;

    Ok(Json(SimilarResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

/// GET /health - Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

/// GET /ready - Readiness check endpoint
pub async fn readiness_check(State(state): State<AppState>) -> Response {
    let recipes = db::recipes::count_recipes(&state.pool).await.ok();
    let ready = recipes.is_some();

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            ready,
            database: if ready { "ok" } else { "error" }.to_string(),
            recipes,
        }),
    )
        .into_response()
}

/// Unknown routes
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(
            "Not found",
            "The requested endpoint does not exist",
        )),
    )
}

fn parse_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Error::Validation("Invalid recipe ID".to_string()))
}
