mod config;
mod model;
mod web;

use actix_web::{App, HttpServer, web::Data};
use anyhow::Context;
use dotenv::dotenv;
use log::{info, error};
use std::sync::Arc;

use config::Config;
use model::{CompletionService, OpenAiModel};
use web::routes;

// App state structure
pub struct AppState {
    pub model: Arc<dyn CompletionService>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting counseling chat relay");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    let app_state = Data::new(AppState {
        model: Arc::new(OpenAiModel::new(&config)),
    });

    let bind_addr = (config.host.clone(), config.port);
    info!("Listening on {}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(routes::configure)
    })
    .bind(bind_addr.clone())
    .with_context(|| format!("failed to bind {}:{}", bind_addr.0, bind_addr.1))?
    .run()
    .await?;

    Ok(())
}
