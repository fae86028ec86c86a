//! # runner_core
//!
//! Shared trait and types for the classifier's inference runners.
//! The runtime crate (`runner_tract`) implements the [`Runner`] trait
//! defined here, so the pipeline and the web server stay generic over
//! the model backend and can be driven by a mock in tests.

use anyhow::Result;
use ndarray::{ArrayD, IxDyn};
use serde::{Deserialize, Serialize};

/// Default location of the exported classifier.
pub const DEFAULT_MODEL_PATH: &str = "cat_dog_model.onnx";

/// Metadata describing a loaded model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Human-readable name of the model.
    pub name: String,
    /// Backend used for inference (e.g. "tract", "mock").
    pub backend: String,
    /// Expected input shape, NHWC (e.g. `[1, 160, 160, 3]`).
    pub input_shape: Vec<usize>,
    /// Expected output shape (`[1, 1]` for a single sigmoid score).
    pub output_shape: Vec<usize>,
}

/// Configuration for loading a runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Path to the model file.
    pub model_path: String,
    /// Expected input shape.
    pub input_shape: Vec<usize>,
    /// Whether to apply backend-specific optimizations.
    pub optimize: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            model_path: DEFAULT_MODEL_PATH.to_string(),
            input_shape: vec![1, 160, 160, 3],
            optimize: true,
        }
    }
}

/// The core trait that all inference backends must implement.
///
/// A runner is created once and then only read, so it must be shareable
/// across request handlers.
///
/// # Example
/// ```ignore
/// let runner = TractRunner::from_config(&config)?;
/// let input = ndarray::ArrayD::<f32>::zeros(IxDyn(&[1, 160, 160, 3]));
/// let output = runner.run(&input)?;
/// println!("Output shape: {:?}", output.shape());
/// ```
pub trait Runner: Send + Sync {
    /// Create a runner from a configuration.
    fn from_config(config: &RunnerConfig) -> Result<Self>
    where
        Self: Sized;

    /// Run inference on the given input tensor.
    /// Input and output are dynamic-dimensional arrays to support arbitrary shapes.
    fn run(&self, input: &ArrayD<f32>) -> Result<ArrayD<f32>>;

    /// Return metadata about the loaded model.
    fn info(&self) -> ModelInfo;
}

/// Helper: convert a shape slice `&[usize]` into `IxDyn`.
pub fn shape_to_ix(shape: &[usize]) -> IxDyn {
    IxDyn(shape)
}

/// Number of elements a tensor of `shape` holds.
pub fn numel(shape: &[usize]) -> usize {
    shape.iter().product()
}

#[cfg(test)]
mod tests {
    use ndarray::Dimension;
    use super::*;

    #[test]
    fn test_model_info_serialize() {
        let info = ModelInfo {
            name: "cat_dog_model.onnx".to_string(),
            backend: "mock".to_string(),
            input_shape: vec![1, 160, 160, 3],
            output_shape: vec![1, 1],
        };
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("cat_dog_model.onnx"));
        assert!(json.contains("\"output_shape\":[1,1]"));
    }

    #[test]
    fn test_runner_config_default() {
        let config = RunnerConfig::default();
        assert_eq!(config.model_path, DEFAULT_MODEL_PATH);
        assert_eq!(config.input_shape, vec![1, 160, 160, 3]);
        assert!(config.optimize);
    }

    #[test]
    fn test_shape_to_ix() {
        let ix = shape_to_ix(&[1, 160, 160, 3]);
        assert_eq!(ix.as_array_view().len(), 4);
    }

    #[test]
    fn test_numel() {
        assert_eq!(numel(&[1, 160, 160, 3]), 76_800);
        assert_eq!(numel(&[1, 1]), 1);
    }
}
