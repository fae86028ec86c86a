//! Application state shared across handlers

use std::sync::Arc;

use classifier::{Pipeline, PreprocessConfig};
use runner_core::Runner;

use crate::config::ServerConfig;

pub struct AppState<R: Runner> {
    pub config: ServerConfig,
    pub pipeline: Arc<Pipeline<R>>,
}

impl<R: Runner> AppState<R> {
    pub fn new(config: ServerConfig) -> Self {
        let preprocess = PreprocessConfig::default();
        let pipeline = Pipeline::new(config.runner_config(&preprocess), preprocess);
        Self {
            config,
            pipeline: Arc::new(pipeline),
        }
    }
}
