//! HTTP route handlers

use std::sync::Arc;

use axum::{extract::State, response::Html, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::data::aggregate::{compute, GenreRating, ScorePoint, Summary, YearPlatformCount};
use crate::data::filter::{Selection, YearRange};
use crate::data::model::Dataset;

pub(crate) const DASHBOARD_PAGE: &str = include_str!("../../assets/dashboard.html");

/// Shared state
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub year_bounds: YearRange,
}

/// Values for populating the selection controls
#[derive(Debug, Clone, Serialize)]
pub struct OptionsResponse {
    pub platforms: Vec<String>,
    pub genres: Vec<String>,
    pub year_bounds: YearRange,
    /// Release years actually present in the data, if any.
    pub data_years: Option<YearRange>,
}

/// Summary numbers plus their display text.
///
/// Undefined means are `null`.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    pub total_count: usize,
    pub avg_user_score: Option<f64>,
    pub avg_critic_score: Option<f64>,
    pub total_text: String,
    pub user_score_text: String,
    pub critic_score_text: String,
}

impl From<&Summary> for SummaryView {
    fn from(s: &Summary) -> Self {
        let defined = |v: f64| (!v.is_nan()).then_some(v);
        Self {
            total_count: s.total_count,
            avg_user_score: defined(s.avg_user_score),
            avg_critic_score: defined(s.avg_critic_score),
            total_text: s.total_text(),
            user_score_text: s.user_score_text(),
            critic_score_text: s.critic_score_text(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub summary: SummaryView,
    pub by_year_platform: Vec<YearPlatformCount>,
    pub genre_ratings: Vec<GenreRating>,
    pub score_points: Vec<ScorePoint>,
}

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(DASHBOARD_PAGE)
}

/// GET /api/health
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /api/options
pub async fn options(State(state): State<Arc<AppState>>) -> Json<OptionsResponse> {
    Json(OptionsResponse {
        platforms: state.dataset.platforms().to_vec(),
        genres: state.dataset.genres().to_vec(),
        year_bounds: state.year_bounds,
        data_years: state
            .dataset
            .year_extent()
            .map(|(min, max)| YearRange::new(min, max)),
    })
}

/// POST /api/dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Json(selection): Json<Selection>,
) -> Json<DashboardResponse> {
    log::debug!("Recomputing dashboard for {selection:?}");

    let output = compute(&state.dataset, &selection);
    Json(DashboardResponse {
        summary: SummaryView::from(&output.summary),
        by_year_platform: output.by_year_platform,
        genre_ratings: output.genre_ratings,
        score_points: output.score_points,
    })
}
