//! Stand-in runners for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{bail, Result};
use ndarray::{ArrayD, IxDyn};
use runner_core::{ModelInfo, Runner, RunnerConfig};

/// Runner whose behaviour is chosen through `model_path`:
/// a number is returned as the score, `broken` fails every forward pass,
/// `empty` returns a zero-sized output and `*missing.onnx` fails to load.
#[derive(Debug)]
pub struct FixedRunner {
    behaviour: Behaviour,
    config: RunnerConfig,
}

#[derive(Debug)]
enum Behaviour {
    Score(f32),
    Broken,
    Empty,
}

impl Runner for FixedRunner {
    fn from_config(config: &RunnerConfig) -> Result<Self> {
        let path = config.model_path.as_str();
        let behaviour = match path {
            p if p.ends_with("missing.onnx") => {
                bail!("No such file or directory (os error 2)")
            }
            "broken" => Behaviour::Broken,
            "empty" => Behaviour::Empty,
            p => Behaviour::Score(p.parse()?),
        };
        Ok(Self {
            behaviour,
            config: config.clone(),
        })
    }

    fn run(&self, input: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        if input.shape() != self.config.input_shape.as_slice() {
            bail!("unexpected input shape {:?}", input.shape());
        }
        match self.behaviour {
            Behaviour::Score(score) => Ok(ArrayD::from_shape_vec(IxDyn(&[1, 1]), vec![score])?),
            Behaviour::Broken => bail!("shape mismatch in dense layer"),
            Behaviour::Empty => Ok(ArrayD::zeros(IxDyn(&[1, 0]))),
        }
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            name: self.config.model_path.clone(),
            backend: "mock".to_string(),
            input_shape: self.config.input_shape.clone(),
            output_shape: vec![1, 1],
        }
    }
}

pub static LOADS: AtomicUsize = AtomicUsize::new(0);

/// Counts how often it is constructed. Only one test may use it.
#[derive(Debug)]
pub struct CountingRunner;

impl Runner for CountingRunner {
    fn from_config(_config: &RunnerConfig) -> Result<Self> {
        LOADS.fetch_add(1, Ordering::SeqCst);
        Ok(Self)
    }

    fn run(&self, _input: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        Ok(ArrayD::from_elem(IxDyn(&[1, 1]), 0.9))
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            name: "counting".to_string(),
            backend: "mock".to_string(),
            input_shape: vec![1, 160, 160, 3],
            output_shape: vec![1, 1],
        }
    }
}
