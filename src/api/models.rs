use crate::search::{RecipeResult, ScoredRecipe};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Search request parameters. `query` is accepted as an alias of `q`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
}

impl SearchParams {
    /// The trimmed query text, or `None` when missing or blank
    pub fn text(&self) -> Option<&str> {
        self.q
            .as_deref()
            .filter(|q| !q.trim().is_empty())
            .or(self.query.as_deref())
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

/// Listing parameters, kept as text so malformed numbers get a 400 envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub offset: Option<String>,
}

impl ListParams {
    pub fn limit(&self, default: usize, max: usize) -> Result<usize> {
        match self.limit.as_deref().map(str::trim) {
            None | Some("") => Ok(default),
            Some(raw) => match raw.parse::<usize>() {
                Ok(limit) if (1..=max).contains(&limit) => Ok(limit),
                _ => Err(Error::Validation(format!(
                    "Limit must be between 1 and {max}"
                ))),
            },
        }
    }

    pub fn offset(&self) -> Result<usize> {
        match self.offset.as_deref().map(str::trim) {
            None | Some("") => Ok(0),
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| Error::Validation("Offset must be 0 or greater".to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimilarParams {
    #[serde(default)]
    pub limit: Option<String>,
}

impl SimilarParams {
    /// Requested count, clamped to `max`
    pub fn limit(&self, default: usize, max: usize) -> Result<usize> {
        match self.limit.as_deref().map(str::trim) {
            None | Some("") => Ok(default),
            Some(raw) => raw
                .parse::<usize>()
                .map(|limit| limit.min(max))
                .map_err(|_| Error::Validation("Limit must be a non-negative integer".to_string())),
        }
    }
}

/// Error envelope with a human-readable hint
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: Some(message.into()),
        }
    }
}

/// Paginated recipe listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub success: bool,
    pub total: i64,
    pub count: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
    pub data: Vec<RecipeResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    pub count: usize,
    pub data: Vec<RecipeResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeResponse {
    pub success: bool,
    pub data: RecipeResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<ScoredRecipe>,
}

/// Service description served at `/`
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub status: String,
    pub message: String,
    pub version: String,
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, Serialize)]
pub struct Endpoints {
    pub health: String,
    pub list: String,
    pub search: String,
    pub detail: String,
    pub similar: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub database: String,
    pub recipes: Option<i64>,
}
