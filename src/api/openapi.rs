//! OpenAPI specification endpoints

use actix_web::{HttpResponse, get};
use utoipa::OpenApi;

use crate::api::error::{ApiError, ErrorResponse};
use crate::api::{analysis, chat, health, history};
use crate::model::{
    AnalysisResult, ChatMessage, ChatRole, Comment, DimensionScore, DimensionScores,
    ExecutiveSummary, IssueType, RecurrenceRisk,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "RCA Reviewer API",
        description = "LLM-assisted review of root cause analysis documents"
    ),
    paths(
        analysis::analyze,
        analysis::analyze_rca,
        chat::chat,
        chat::process_reply,
        history::list_analyses,
        history::chat_history,
        health::liveness,
        health::readiness,
    ),
    components(schemas(
        analysis::AnalyzeRequest,
        analysis::ExistingIssue,
        chat::ChatRequest,
        chat::ChatResponse,
        chat::ReplyRequest,
        chat::ReplyResponse,
        health::HealthStatus,
        health::ReadinessStatus,
        health::DependencyHealth,
        AnalysisResult,
        DimensionScores,
        DimensionScore,
        Comment,
        IssueType,
        ExecutiveSummary,
        RecurrenceRisk,
        ChatMessage,
        ChatRole,
        ErrorResponse,
    )),
    tags(
        (name = "analysis", description = "RCA scoring and inline comments"),
        (name = "chat", description = "Follow-up discussion and comment replies"),
        (name = "history", description = "Stored analyses and chat transcripts"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
#[get("/openapi.json")]
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Serve OpenAPI YAML specification
#[get("/openapi.yaml")]
pub async fn openapi_yaml() -> Result<HttpResponse, ApiError> {
    let yaml = ApiDoc::openapi()
        .to_yaml()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().content_type("text/yaml").body(yaml))
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json).service(openapi_yaml);
}
