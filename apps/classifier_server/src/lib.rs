//! # classifier_server
//!
//! Single-page web UI for the cat/dog classifier: upload an image, get a
//! label and a confidence back. Serves
//!
//! - `GET /` the upload page
//! - `POST /classify` the result page for a multipart `file` upload
//! - `GET /health` model status as JSON

pub mod config;
pub mod error;
pub mod handlers;
pub mod page;
pub mod state;

pub use config::ServerConfig;
pub use error::ServerError;
pub use state::AppState;

use actix_web::{web, App, HttpServer};
use runner_core::Runner;
use tracing::{error, info};

/// Register the routes for a state holding runners of type `R`.
pub fn configure<R: Runner + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index::<R>))
        .route("/classify", web::post().to(handlers::classify::<R>))
        .route("/health", web::get().to(handlers::health::<R>));
}

/// Load the model and serve until shutdown.
///
/// A model that fails to load does not stop the process: every page then
/// shows the load error and uploads are refused.
pub async fn run_server<R: Runner + 'static>(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    let state = web::Data::new(AppState::<R>::new(config.clone()));
    match state.pipeline.warm_up() {
        Ok(info) => info!(
            model = %info.name,
            backend = %info.backend,
            input_shape = ?info.input_shape,
            "Model ready"
        ),
        Err(e) => error!(error = %e, "Model failed to load, the session is halted"),
    }

    info!(
        host = %config.host,
        port = config.port,
        max_upload_mb = config.max_upload_bytes / 1024 / 1024,
        inference_timeout_secs = config.inference_timeout_secs,
        "Cat vs Dog classifier starting"
    );
    info!(url = %format!("http://{}:{}", config.host, config.port), "Web UI available");

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure::<R>))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
