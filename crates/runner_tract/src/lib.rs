//! # runner_tract
//!
//! ONNX inference runner built on `tract`. The classifier is the trained
//! Keras model re-exported to ONNX with its native NHWC input layout.

use anyhow::{Context, Result};
use ndarray::ArrayD;
use runner_core::{numel, shape_to_ix, ModelInfo, Runner, RunnerConfig};
use tract_onnx::prelude::*;

pub struct TractRunner {
    model: TypedRunnableModel<TypedModel>,
    config: RunnerConfig,
    output_shape: Vec<usize>,
}

impl Runner for TractRunner {
    fn from_config(config: &RunnerConfig) -> Result<Self> {
        let model = tract_onnx::onnx()
            .model_for_path(&config.model_path)
            .with_context(|| format!("cannot read ONNX model at {}", config.model_path))?
            .with_input_fact(0, f32::fact(config.input_shape.clone()).into())?;

        let typed = if config.optimize {
            model.into_optimized()?
        } else {
            model.into_typed()?.into_decluttered()?
        };

        let output_shape = typed
            .output_fact(0)?
            .shape
            .as_concrete()
            .map(|dims| dims.to_vec())
            .unwrap_or_default();

        let model = typed.into_runnable()?;
        tracing::debug!(
            model = %config.model_path,
            input_shape = ?config.input_shape,
            output_shape = ?output_shape,
            "tract plan ready"
        );

        Ok(Self {
            model,
            config: config.clone(),
            output_shape,
        })
    }

    fn run(&self, input: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        if input.shape() != self.config.input_shape.as_slice() {
            anyhow::bail!(
                "input shape {:?} does not match model input {:?}",
                input.shape(),
                self.config.input_shape
            );
        }

        let flat: Vec<f32> = input.iter().copied().collect();
        let tensor = Tensor::from_shape::<f32>(input.shape(), &flat)?;
        let result = self.model.run(tvec!(tensor.into()))?;

        let output = result
            .first()
            .context("model produced no outputs")?;
        let shape = output.shape().to_vec();
        let data = output.as_slice::<f32>()?.to_vec();
        if data.len() != numel(&shape) {
            anyhow::bail!("output buffer does not match shape {:?}", shape);
        }

        Ok(ArrayD::from_shape_vec(shape_to_ix(&shape), data)?)
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            name: self.config.model_path.clone(),
            backend: "tract".to_string(),
            input_shape: self.config.input_shape.clone(),
            output_shape: self.output_shape.clone(),
        }
    }
}
