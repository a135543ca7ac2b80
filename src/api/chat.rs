//! REST API endpoints for RCA chat and inline comment replies

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::{ApiError, ErrorResponse};
use crate::service::ChatService;
use crate::service::chat::CommentReply;

/// Request body for a chat message
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
    /// RCA text the conversation is about
    #[serde(default)]
    pub document_context: Option<String>,
    /// Existing session to continue; a new one is created when absent
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub reply: String,
    pub session_id: String,
}

/// Request body for replying to an inline review comment
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplyRequest {
    #[serde(default)]
    pub thread_context: String,
    pub user_reply: String,
    #[serde(default)]
    pub issue_type: String,
    #[serde(default)]
    pub original_comment: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReplyResponse {
    pub reply: String,
}

/// Send a chat message within a session
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse),
        (status = 400, description = "Message is empty", body = ErrorResponse),
        (status = 500, description = "LLM or database failure", body = ErrorResponse)
    ),
    tag = "chat"
)]
#[post("/chat")]
pub async fn chat(
    service: web::Data<ChatService>,
    body: web::Json<ChatRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    let reply = service
        .chat(
            &request.message,
            request.document_context.as_deref(),
            request.session_id.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ChatResponse {
        reply: reply.reply,
        session_id: reply.session_id,
    }))
}

/// Respond to a user's reply on an inline comment
#[utoipa::path(
    post,
    path = "/process-reply",
    request_body = ReplyRequest,
    responses(
        (status = 200, description = "Reviewer reply", body = ReplyResponse),
        (status = 400, description = "User reply is empty", body = ErrorResponse),
        (status = 500, description = "LLM failure", body = ErrorResponse)
    ),
    tag = "chat"
)]
#[post("/process-reply")]
pub async fn process_reply(
    service: web::Data<ChatService>,
    body: web::Json<ReplyRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    let reply = service
        .reply_to_comment(&CommentReply {
            thread_context: request.thread_context,
            user_reply: request.user_reply,
            issue_type: request.issue_type,
            original_comment: request.original_comment,
        })
        .await?;

    Ok(HttpResponse::Ok().json(ReplyResponse { reply }))
}

/// Configure chat routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(chat).service(process_reply);
}
