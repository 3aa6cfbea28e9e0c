use actix_web::web;
use crate::web::error::ApiError;
use crate::web::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into());

    cfg.app_data(json_config)
        .route("/chat", web::post().to(handlers::chat))
        .route("/health", web::get().to(handlers::health_check));
}
