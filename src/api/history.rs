//! REST API endpoints for stored analyses and chat transcripts

use actix_web::{HttpResponse, get, web};

use crate::api::error::{ApiError, ErrorResponse};
use crate::model::{AnalysisResult, ChatMessage};
use crate::service::HistoryService;

/// List the most recent analyses, newest first
#[utoipa::path(
    get,
    path = "/analyses",
    responses(
        (status = 200, description = "Recent analyses", body = Vec<AnalysisResult>),
        (status = 500, description = "Database failure", body = ErrorResponse)
    ),
    tag = "history"
)]
#[get("/analyses")]
pub async fn list_analyses(service: web::Data<HistoryService>) -> Result<HttpResponse, ApiError> {
    let analyses = service.recent_analyses().await?;
    Ok(HttpResponse::Ok().json(analyses))
}

/// Full transcript of a chat session, oldest first
#[utoipa::path(
    get,
    path = "/chat-history/{session_id}",
    params(
        ("session_id" = String, Path, description = "Chat session identifier")
    ),
    responses(
        (status = 200, description = "Session transcript; empty for unknown sessions", body = Vec<ChatMessage>),
        (status = 500, description = "Database failure", body = ErrorResponse)
    ),
    tag = "history"
)]
#[get("/chat-history/{session_id}")]
pub async fn chat_history(
    service: web::Data<HistoryService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let session_id = path.into_inner();
    let messages = service.chat_history(&session_id).await?;
    Ok(HttpResponse::Ok().json(messages))
}

/// Configure history routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_analyses).service(chat_history);
}
