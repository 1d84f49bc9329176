pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::recommendation::handlers as recommendation;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Compatibility analysis
        .route("/api/v1/analysis", post(analysis::handle_analyze))
        .route(
            "/api/v1/analysis/parse-resume",
            post(analysis::handle_parse_resume),
        )
        .route("/api/v1/analysis/parse-jd", post(analysis::handle_parse_jd))
        // Job recommendations
        .route("/api/v1/recommendations", post(recommendation::handle_rank))
        .route(
            "/api/v1/candidates/:id/recommendations",
            get(recommendation::handle_candidate_recommendations),
        )
        .with_state(state)
}
