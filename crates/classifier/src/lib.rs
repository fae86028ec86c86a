//! # classifier
//!
//! Cat/dog image classification pipeline: a memoized model loader, an
//! image preprocessor producing `1 × 160 × 160 × 3` tensors, and a
//! thresholded binary decision over the model's single sigmoid score.
//!
//! The model backend is anything implementing [`runner_core::Runner`].

pub mod error;
pub mod loader;
pub mod pipeline;
pub mod predict;
pub mod preprocess;
pub mod session;

#[cfg(test)]
mod testing;

pub use error::{ClassifyError, ImageDecodeError, InferenceError, ModelLoadError};
pub use loader::{LoaderStatus, ModelLoader};
pub use pipeline::{Classification, Pipeline};
pub use predict::{classify, Label, PredictionResult, THRESHOLD};
pub use preprocess::{
    decode, preprocess, to_tensor, PreprocessConfig, PreprocessedTensor, UploadedImage, INPUT_SIZE,
};
pub use session::{SessionError, SessionEvent, SessionState};
