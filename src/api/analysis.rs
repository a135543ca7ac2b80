//! REST API endpoint for RCA analysis

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::error::{ApiError, ErrorResponse};
use crate::model::AnalysisResult;
use crate::service::AnalysisService;

/// Request body for analyzing an RCA document
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Full text of the RCA document
    pub document_text: String,
    /// Comments returned by a previous analysis of the same document
    #[serde(default)]
    pub existing_issues: Option<Vec<ExistingIssue>>,
}

/// Previously issued comment; only the id is used
#[derive(Debug, Deserialize, ToSchema)]
pub struct ExistingIssue {
    #[serde(default)]
    pub issue_id: Option<String>,
}

impl AnalyzeRequest {
    fn existing_issue_ids(&self) -> Vec<String> {
        self.existing_issues
            .iter()
            .flatten()
            .filter_map(|issue| issue.issue_id.as_deref())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Analyze an RCA document
#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Analysis completed", body = AnalysisResult),
        (status = 400, description = "Document text is empty", body = ErrorResponse),
        (status = 500, description = "LLM analysis failed", body = ErrorResponse)
    ),
    tag = "analysis"
)]
#[post("/analyze")]
pub async fn analyze(
    service: web::Data<AnalysisService>,
    body: web::Json<AnalyzeRequest>,
) -> Result<HttpResponse, ApiError> {
    run_analysis(&service, body.into_inner()).await
}

/// Analyze an RCA document (path used by existing clients)
#[utoipa::path(
    post,
    path = "/analyze-rca",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Analysis completed", body = AnalysisResult),
        (status = 400, description = "Document text is empty", body = ErrorResponse),
        (status = 500, description = "LLM analysis failed", body = ErrorResponse)
    ),
    tag = "analysis"
)]
#[post("/analyze-rca")]
pub async fn analyze_rca(
    service: web::Data<AnalysisService>,
    body: web::Json<AnalyzeRequest>,
) -> Result<HttpResponse, ApiError> {
    run_analysis(&service, body.into_inner()).await
}

async fn run_analysis(
    service: &AnalysisService,
    request: AnalyzeRequest,
) -> Result<HttpResponse, ApiError> {
    let existing_ids = request.existing_issue_ids();
    let analysis = service
        .analyze(&request.document_text, &existing_ids)
        .await?;

    tracing::info!(
        analysis_id = %analysis.analysis_id,
        total_score = analysis.total_score,
        comments = analysis.comments.len(),
        "RCA analysis completed"
    );

    Ok(HttpResponse::Ok().json(analysis))
}

/// Configure analysis routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(analyze).service(analyze_rca);
}
