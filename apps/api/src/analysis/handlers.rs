use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::scorer::AnalysisReport;
use crate::errors::AppError;
use crate::extraction::job_description::{parse_job_description, ParsedJobDescription};
use crate::extraction::resume::{parse_resume, ParsedResume};
use crate::extraction::Extraction;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: String,
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub report: AnalysisReport,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ParseResumeRequest {
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ParseJdRequest {
    pub jd_text: String,
}

/// POST /api/v1/analysis
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let report = state.scorer.analyze(&req.resume_text, &req.jd_text);
    Ok(Json(AnalyzeResponse {
        report,
        analyzed_at: Utc::now(),
    }))
}

/// POST /api/v1/analysis/parse-resume
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    Json(req): Json<ParseResumeRequest>,
) -> Result<Json<Extraction<ParsedResume>>, AppError> {
    Ok(Json(parse_resume(&req.resume_text, &state.vocabulary)))
}

/// POST /api/v1/analysis/parse-jd
pub async fn handle_parse_jd(
    State(state): State<AppState>,
    Json(req): Json<ParseJdRequest>,
) -> Result<Json<Extraction<ParsedJobDescription>>, AppError> {
    Ok(Json(parse_job_description(&req.jd_text, &state.vocabulary)))
}
