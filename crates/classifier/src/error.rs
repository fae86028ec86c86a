//! Error taxonomy of the classification pipeline.
//!
//! Each stage returns its own error type; [`ClassifyError`] unifies them at
//! the outer boundary where they are turned into user-visible messages.

use thiserror::Error;

use crate::session::SessionError;

/// The serialized classifier could not be loaded. Fatal for the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot load model from {path}: {cause}")]
pub struct ModelLoadError {
    pub path: String,
    pub cause: String,
}

impl ModelLoadError {
    pub fn new(path: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            cause: cause.into(),
        }
    }
}

/// The uploaded bytes are not an image this pipeline accepts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageDecodeError {
    #[error("the uploaded file is empty")]
    Empty,

    #[error("unsupported image format {0}; upload a JPEG or PNG")]
    UnsupportedFormat(String),

    #[error("cannot decode image: {0}")]
    Malformed(String),
}

/// The forward pass failed or produced something that is not a score.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("inference failed: {0}")]
    Runtime(String),

    #[error("model returned an empty output tensor")]
    EmptyOutput,

    #[error("model returned score {0}, expected a probability in [0, 1]")]
    InvalidScore(f32),

    #[error("inference did not finish within {0} seconds")]
    Timeout(u64),
}

#[derive(Error, Debug, Clone)]
pub enum ClassifyError {
    #[error(transparent)]
    ModelLoad(#[from] ModelLoadError),

    #[error(transparent)]
    ImageDecode(#[from] ImageDecodeError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ClassifyError {
    /// Fatal errors end the interactive session; everything else waits for
    /// another upload.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ClassifyError::ModelLoad(_))
    }
}

pub type Result<T> = std::result::Result<T, ClassifyError>;
