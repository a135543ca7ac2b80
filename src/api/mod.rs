pub mod analysis;
pub mod chat;
pub mod error;
pub mod health;
pub mod history;
pub mod openapi;

use actix_cors::Cors;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::api::error::ApiError;
use crate::model::CorsConfig;

/// Register every API route on the given scope
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::BadRequest(err.to_string()).into()
    }))
    .configure(analysis::configure)
    .configure(chat::configure)
    .configure(history::configure)
    .configure(health::configure)
    .configure(openapi::configure);
}

/// Fallback for unknown routes
pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound(req.path().to_string()))
}

/// CORS middleware for the configured origins
pub fn cors(config: &CorsConfig) -> Cors {
    if config.allows_any_origin() {
        return Cors::permissive();
    }

    config
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}
