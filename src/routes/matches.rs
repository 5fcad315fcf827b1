use axum::{extract::State, Json};
use serde::Deserialize;

use super::AppState;
use crate::error::AppResult;
use crate::models::{Chart, MatchSummary, MatchesResponse};
use crate::services::{matching, prefilter};

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub chart: Chart,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Handler for the similarity-matching endpoint
pub async fn find_matches(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> AppResult<Json<MatchesResponse>> {
    let limit = request
        .limit
        .unwrap_or(state.config.default_match_limit)
        .min(state.config.max_match_limit) as usize;

    // The prefilter is computed for inspection only; scoring always runs
    // over the full chart-data-present set.
    let filter = prefilter::build_prefilter(&request.chart);
    tracing::debug!(
        conditions = filter.conditions.len(),
        fallback = filter.is_fallback(),
        sql = %filter.to_sql(),
        "Built candidate prefilter"
    );

    let candidates = state.store.fetch_candidates().await?;
    let total_compared = candidates.len();

    tracing::info!(
        candidates = total_compared,
        limit,
        "Ranking reference people"
    );

    let outcomes = matching::rank(&request.chart, &candidates, limit);
    let matches: Vec<MatchSummary> = outcomes.iter().map(MatchSummary::from).collect();
    let matches_found = matches.len();

    tracing::info!(matches_found, "Similarity ranking completed");

    Ok(Json(MatchesResponse {
        matches,
        total_compared,
        matches_found,
    }))
}
