use std::sync::Arc;
use std::time::Instant;

use once_cell::sync::OnceCell;
use runner_core::{ModelInfo, Runner, RunnerConfig};
use tracing::{error, info};

use crate::error::ModelLoadError;

/// What the loader knows about its model without triggering a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderStatus {
    Unloaded,
    Ready,
    Failed(String),
}

/// Lazily loads one runner and hands out the same instance forever after.
///
/// The first caller of [`ModelLoader::get`] performs the load while any
/// concurrent callers block on it, so the model file is read at most once.
/// A failed load is memoized too: the session cannot recover from it.
pub struct ModelLoader<R: Runner> {
    config: RunnerConfig,
    cell: OnceCell<Result<Arc<R>, ModelLoadError>>,
}

impl<R: Runner> ModelLoader<R> {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            cell: OnceCell::new(),
        }
    }

    pub fn get(&self) -> Result<Arc<R>, ModelLoadError> {
        self.cell.get_or_init(|| load(&self.config)).clone()
    }

    pub fn status(&self) -> LoaderStatus {
        match self.cell.get() {
            None => LoaderStatus::Unloaded,
            Some(Ok(_)) => LoaderStatus::Ready,
            Some(Err(e)) => LoaderStatus::Failed(e.to_string()),
        }
    }

    /// Metadata of the loaded model, if the load already succeeded.
    pub fn info(&self) -> Option<ModelInfo> {
        match self.cell.get() {
            Some(Ok(runner)) => Some(runner.info()),
            _ => None,
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }
}

fn load<R: Runner>(config: &RunnerConfig) -> Result<Arc<R>, ModelLoadError> {
    let started = Instant::now();
    info!(model = %config.model_path, "Loading model");

    match R::from_config(config) {
        Ok(runner) => {
            let info = runner.info();
            info!(
                model = %info.name,
                backend = %info.backend,
                input_shape = ?info.input_shape,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Model loaded"
            );
            Ok(Arc::new(runner))
        }
        Err(e) => {
            let err = ModelLoadError::new(&config.model_path, format!("{e:#}"));
            error!(model = %config.model_path, error = %err, "Model failed to load");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingRunner, FixedRunner, LOADS};
    use std::sync::atomic::Ordering;

    fn config(path: &str) -> RunnerConfig {
        RunnerConfig {
            model_path: path.to_string(),
            ..RunnerConfig::default()
        }
    }

    #[test]
    fn test_memoized_single_load() {
        let loader: ModelLoader<CountingRunner> = ModelLoader::new(config("counting.onnx"));
        assert_eq!(loader.status(), LoaderStatus::Unloaded);

        let first = loader.get().unwrap();
        for _ in 0..9 {
            let again = loader.get().unwrap();
            assert!(Arc::ptr_eq(&first, &again));
        }
        assert_eq!(LOADS.load(Ordering::SeqCst), 1);
        assert_eq!(loader.status(), LoaderStatus::Ready);
    }

    #[test]
    fn test_concurrent_first_calls_share_one_instance() {
        let loader: Arc<ModelLoader<FixedRunner>> = Arc::new(ModelLoader::new(config("0.7")));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let loader = loader.clone();
                std::thread::spawn(move || loader.get().unwrap())
            })
            .collect();
        let runners: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(runners.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn test_failure_is_memoized() {
        let loader: ModelLoader<FixedRunner> = ModelLoader::new(config("missing.onnx"));
        let err = loader.get().unwrap_err();
        assert_eq!(err.path, "missing.onnx");
        assert!(err.cause.contains("No such file"));
        assert_eq!(loader.get().unwrap_err(), err);
        assert!(matches!(loader.status(), LoaderStatus::Failed(_)));
        assert!(loader.info().is_none());
    }
}
