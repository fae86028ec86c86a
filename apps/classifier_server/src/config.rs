use std::time::Duration;

use classifier::PreprocessConfig;
use runner_core::{RunnerConfig, DEFAULT_MODEL_PATH};
use serde::{Deserialize, Serialize};

/// Validated server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model_path: String,
    pub max_upload_bytes: usize,
    pub inference_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            model_path: DEFAULT_MODEL_PATH.to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            inference_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.model_path.trim().is_empty() {
            anyhow::bail!("model path cannot be empty");
        }
        if self.max_upload_bytes == 0 {
            anyhow::bail!("maximum upload size must be positive");
        }
        if self.inference_timeout_secs == 0 {
            anyhow::bail!("inference timeout must be at least one second");
        }
        Ok(())
    }

    pub fn inference_timeout(&self) -> Duration {
        Duration::from_secs(self.inference_timeout_secs)
    }

    /// Runner settings matching the preprocessor's output shape.
    pub fn runner_config(&self, preprocess: &PreprocessConfig) -> RunnerConfig {
        RunnerConfig {
            model_path: self.model_path.clone(),
            input_shape: preprocess.input_shape(),
            ..RunnerConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model_path, "cat_dog_model.onnx");
        assert_eq!(config.inference_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_rejects_zero_limits() {
        let config = ServerConfig {
            max_upload_bytes: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ServerConfig {
            inference_timeout_secs: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_runner_config_follows_preprocess_shape() {
        let runner = ServerConfig::default().runner_config(&PreprocessConfig::default());
        assert_eq!(runner.input_shape, vec![1, 160, 160, 3]);
        assert_eq!(runner.model_path, "cat_dog_model.onnx");
    }
}
