use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::{
    api::models::*,
    resolver::{QueryResolver, ResolveMode},
    Error, Result,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<QueryResolver>,
    pub settings: crate::config::Settings,
}

fn required(value: Option<String>, param: &str) -> Result<String> {
    value.ok_or_else(|| Error::Validation(format!("Missing '{param}' query parameter")))
}

fn parse_count(value: &str, param: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Validation(format!("'{param}' must be a non-negative integer")))
}

fn parse_limit(value: Option<String>, default: usize, max: usize) -> Result<usize> {
    let limit = match value {
        Some(raw) => parse_count(&raw, "limit")?,
        None => default,
    };
    Ok(limit.min(max))
}

/// GET /recommend/ - Ranked recommendations for an ingredient list
pub async fn recommend(
    State(state): State<AppState>,
    Query(params): Query<RecommendParams>,
) -> Result<Json<QueryResponse>> {
    debug!("Recommend request: {:?}", params);

    let ingredients = required(params.ingredients, "ingredients")?;
    let k = parse_limit(
        params.limit,
        state.resolver.config().top_k,
        state.settings.pagination.api_max_limit,
    )?;

    let resolution = state
        .resolver
        .resolve(&ingredients, ResolveMode::RankedList(k))?;

    Ok(Json(resolution.into()))
}

/// GET /api/recipe - Single best recipe for a dish name or ingredient list
pub async fn get_recipe(
    State(state): State<AppState>,
    Query(params): Query<RecipeParams>,
) -> Result<Json<QueryResponse>> {
    debug!("Recipe request: {:?}", params);

    let query = required(params.query, "query")?;
    let resolution = state.resolver.resolve(&query, ResolveMode::SingleBest)?;

    Ok(Json(resolution.into()))
}

/// GET /api/recipes/:index - Catalog entry by position
pub async fn get_recipe_at(
    State(state): State<AppState>,
    Path(index): Path<String>,
) -> Result<Json<RecordView>> {
    debug!("Recipe by position request: {}", index);

    let index = parse_count(&index, "index")?;
    let catalog = state.resolver.catalog()?;
    let recipe = catalog
        .recipe(index)
        .ok_or_else(|| Error::NotFound(format!("No recipe at position {index}")))?;

    Ok(Json(RecordView::from(recipe)))
}

/// GET /api/suggested - First catalog entries, unranked
pub async fn suggested(
    State(state): State<AppState>,
    Query(params): Query<SuggestedParams>,
) -> Result<Json<SuggestedResponse>> {
    debug!("Suggested request: {:?}", params);

    let limit = parse_limit(
        params.limit,
        state.settings.pagination.suggested_default,
        state.settings.pagination.api_max_limit,
    )?;

    let catalog = state.resolver.catalog()?;
    let recipes: Vec<RecordView> = catalog.suggested(limit).iter().map(RecordView::from).collect();

    Ok(Json(SuggestedResponse {
        recipes,
        total: catalog.len(),
    }))
}

/// GET /api/stats - Catalog statistics
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Stats>> {
    debug!("Get stats request");

    let catalog = state.resolver.catalog()?;
    Ok(Json(Stats {
        recipes: catalog.len(),
        vocabulary: catalog.vocabulary_size(),
    }))
}

/// GET /health - Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

/// GET /ready - Readiness check endpoint
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<ReadinessResponse>> {
    let ready = state.resolver.is_ready();

    Ok(Json(ReadinessResponse {
        ready,
        catalog: if ready { "ok" } else { "loading" }.to_string(),
    }))
}
