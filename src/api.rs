use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::analysis::{self, TitleIndex};
use crate::core::error::ScoutError;
use crate::hierarchy;
use crate::repository::{CAP_EDIT_POSTS, CAP_READ};
use crate::tags::RenderState;
use crate::types::*;
use crate::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/analyze", post(analyze_handler))
        .route("/analyze/batch", post(analyze_batch_handler))
        .route("/hierarchy", post(hierarchy_handler))
        .route("/tags/render", post(render_tags_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn reject(e: ScoutError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &e {
        ScoutError::NotFound(_) => StatusCode::NOT_FOUND,
        ScoutError::Forbidden(_) => StatusCode::FORBIDDEN,
        ScoutError::InvalidConfig(_) | ScoutError::MissingParameter(_) => StatusCode::BAD_REQUEST,
        ScoutError::Io(_) | ScoutError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!("request failed: {}", e);
    } else {
        warn!("request rejected ({}): {}", status.as_u16(), e);
    }
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

/// Request config overrides the configured defaults field by field.
fn effective_config(
    state: &AppState,
    overrides: Option<AnalysisConfigOverrides>,
) -> Result<AnalysisConfig, ScoutError> {
    let config = match overrides {
        Some(o) => state.analysis_defaults.merged(&o),
        None => state.analysis_defaults.clone(),
    };
    config.validate()?;
    Ok(config)
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "seo-scout",
        "version": env!("CARGO_PKG_VERSION"),
        "tags": state.tag_registry.names(),
        "content_path": state.scout_config.resolve_content_path().display().to_string(),
        "site_url": state.analysis_defaults.site_url,
        "max_hierarchy_depth": state.max_hierarchy_depth,
    }))
}

async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult<AnalysisReport> {
    let repo = state.repository.as_ref();
    repo.require(CAP_EDIT_POSTS).map_err(reject)?;
    let config = effective_config(&state, request.config).map_err(reject)?;

    let item = match (request.id, request.item) {
        (_, Some(item)) => item,
        (Some(id), None) => repo.fetch_content_item(id).map_err(reject)?,
        (None, None) => return Err(reject(ScoutError::MissingParameter("id or item"))),
    };

    let listing = repo.list_content_items(&ContentFilter::default());
    let titles = TitleIndex::build(&listing);
    let report = analysis::analyze(&item, &config, &titles);
    info!(
        "analyze: content {} scored {} ({} issues)",
        report.content_id,
        report.overall_score,
        report.issues.len()
    );
    Ok(Json(report))
}

async fn analyze_batch_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BatchAnalyzeRequest>,
) -> ApiResult<BatchReport> {
    let repo = state.repository.as_ref();
    repo.require(CAP_EDIT_POSTS).map_err(reject)?;
    let config = effective_config(&state, request.config).map_err(reject)?;

    let items = if let Some(items) = request.items {
        items
    } else if let Some(ids) = request.ids {
        repo.fetch_many(&ids).map_err(reject)?
    } else {
        repo.list_content_items(&request.filter.unwrap_or_default())
    };

    let report = analysis::analyze_batch(&items, &config);
    info!(
        "analyze/batch: {} items, average {}",
        report.summary.total_items, report.summary.average_score
    );
    Ok(Json(report))
}

async fn hierarchy_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<HierarchyRequest>,
) -> ApiResult<HierarchyResponse> {
    let repo = state.repository.as_ref();
    repo.require(CAP_READ).map_err(reject)?;

    let cap = state.max_hierarchy_depth;
    let depth = request.max_depth.unwrap_or(cap).min(cap);
    let post_type = request.post_type.as_deref();

    let ancestor_depth = hierarchy::ancestor_depth(repo, request.id, cap).map_err(reject)?;
    Ok(Json(HierarchyResponse {
        id: request.id,
        ancestor_depth,
        descendant_count: hierarchy::descendant_count(repo, request.id, post_type, depth),
        child_count: hierarchy::child_count(repo, request.id, post_type),
    }))
}

async fn render_tags_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RenderTagsRequest>,
) -> ApiResult<RenderTagsResponse> {
    let repo = state.repository.as_ref();
    repo.require(CAP_READ).map_err(reject)?;

    let ids = match (request.ids, request.id) {
        (Some(ids), _) => ids,
        (None, Some(id)) => vec![id],
        (None, None) => return Err(reject(ScoutError::MissingParameter("id or ids"))),
    };
    let items = repo.fetch_many(&ids).map_err(reject)?;

    let mut render_state = RenderState::new();
    let rendered = state.tag_registry.render_loop(
        &request.template,
        repo,
        &items,
        state.max_hierarchy_depth,
        &mut render_state,
    );
    Ok(Json(RenderTagsResponse { rendered }))
}
