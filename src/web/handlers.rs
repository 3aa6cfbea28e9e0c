use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use log::{info, debug, error};

use crate::model::compose_messages;
use crate::web::error::ApiError;
use crate::web::models::{ChatRequest, ChatResponse};
use crate::AppState;

// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

// Chat API endpoint
pub async fn chat(
    data: web::Data<AppState>,
    req: web::Json<ChatRequest>,
) -> Result<HttpResponse, ApiError> {
    let ChatRequest { message, history } = req.into_inner();

    info!("Chat request with {} history entries", history.len());
    debug!("Message: {}", message);

    let messages = compose_messages(&history, &message);

    match data.model.complete(&messages).await {
        Ok(reply) => Ok(HttpResponse::Ok().json(ChatResponse { reply })),
        Err(e) => {
            error!("OpenAI API error: {}", e);
            Err(ApiError::Processing)
        }
    }
}
